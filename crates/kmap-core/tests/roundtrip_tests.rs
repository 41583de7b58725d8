//! Round-trip tests: execute the synthesized functions and compare values.

mod support;

use kmap_core::directive::MappingDirective;
use kmap_core::pair::{PairOutcome, PairRequest, process_pair};
use kmap_core::synth::MappingPairResult;
use kmap_core::symbols::TypeTable;

use support::eval::{Evaluator, Object, Value};
use support::fixtures::{PairBuilder, TableBuilder};

const INT: &str = "kotlin.Int";
const STRING: &str = "kotlin.String";

fn generate(table: &TypeTable, pair: &PairRequest) -> MappingPairResult {
    match process_pair(table, pair) {
        PairOutcome::Generated(result) => result,
        PairOutcome::Rejected(diagnostics) => panic!("pair rejected: {:?}", diagnostics),
    }
}

#[test]
fn identity_round_trip_of_scalars() {
    let table = TableBuilder::new()
        .class("rt.Person", &[("id", INT), ("name", STRING), ("age", INT)])
        .class("rt.PersonDto", &[("id", INT), ("name", STRING), ("age", INT)])
        .build();
    let pair = PairBuilder::new("rt.Person", "rt.PersonDto", "rt")
        .same("id", INT)
        .same("name", STRING)
        .same("age", INT)
        .build();
    let result = generate(&table, &pair);
    let eval = Evaluator::new(&[&result]);

    let person: Value = Object::new("rt.Person")
        .with("id", Value::Int(7))
        .with("name", Value::Text("Ada".to_string()))
        .with("age", Value::Int(36))
        .into();
    let dto = eval.call("toPersonDto", &person);
    let Value::Object(dto_object) = &dto else {
        panic!("expected an object, got {:?}", dto);
    };
    assert_eq!(dto_object.ty, "rt.PersonDto");
    assert_eq!(dto_object.get("name"), &Value::Text("Ada".to_string()));

    assert_eq!(eval.call("toPerson", &dto), person);
}

#[test]
fn round_trip_through_accessors_and_nested_paths() {
    let table = TableBuilder::new()
        .class("rt.Client", &[("age", INT), ("width", INT)])
        .class("rt.User", &[("theAge()", INT), ("size", "rt.Size")])
        .class("rt.Size", &[("w", INT)])
        .build();
    let pair = PairBuilder::new("rt.Client", "rt.User", "rt")
        .map(
            "age",
            INT,
            MappingDirective::new()
                .with_target_get("theAge()")
                .with_target_set("theAge()"),
        )
        .map("width", INT, MappingDirective::new().with_value("size.w"))
        .build();
    let result = generate(&table, &pair);
    let eval = Evaluator::new(&[&result]);

    let client: Value = Object::new("rt.Client")
        .with("age", Value::Int(41))
        .with("width", Value::Int(3))
        .into();
    let user = eval.call("toUser", &client);
    let Value::Object(user_object) = &user else {
        panic!("expected an object, got {:?}", user);
    };
    assert_eq!(user_object.get("theAge"), &Value::Int(41));
    let Value::Object(size) = user_object.get("size") else {
        panic!("size was not created");
    };
    assert_eq!(size.ty, "rt.Size");
    assert_eq!(size.get("w"), &Value::Int(3));

    assert_eq!(eval.call("toClient", &user), client);
}

#[test]
fn self_referential_tree_round_trips() {
    let table = TableBuilder::new()
        .class("tree.Node", &[("value", INT), ("rec", "tree.Node")])
        .class("tree.Target", &[("value", INT), ("rec", "tree.Target")])
        .partner("tree.Node", "tree.Target", "tree")
        .build();
    let pair = PairBuilder::new("tree.Node", "tree.Target", "tree")
        .same("value", INT)
        .same("rec", "tree.Node")
        .build();
    let result = generate(&table, &pair);
    let eval = Evaluator::new(&[&result]);

    let leaf = Object::new("tree.Node")
        .with("value", Value::Int(3))
        .with("rec", Value::Null);
    let root: Value = Object::new("tree.Node")
        .with("value", Value::Int(1))
        .with(
            "rec",
            Object::new("tree.Node")
                .with("value", Value::Int(2))
                .with("rec", leaf.into())
                .into(),
        )
        .into();

    let target = eval.call("toTarget", &root);
    let Value::Object(target_root) = &target else {
        panic!("expected an object, got {:?}", target);
    };
    let Value::Object(child) = target_root.get("rec") else {
        panic!("child was not converted");
    };
    assert_eq!(child.ty, "tree.Target");

    assert_eq!(eval.call("toNode", &target), root);
}

#[test]
fn nested_partner_pairs_compose() {
    let table = TableBuilder::new()
        .class("shop.Order", &[("total", INT), ("customer", "crm.Customer")])
        .class("shop.OrderDto", &[("total", INT), ("customer", "crm.CustomerDto")])
        .class("crm.Customer", &[("id", INT)])
        .class("crm.CustomerDto", &[("id", INT)])
        .partner("shop.Order", "shop.OrderDto", "shop")
        .partner("crm.Customer", "crm.CustomerDto", "crm")
        .build();
    let order_pair = PairBuilder::new("shop.Order", "shop.OrderDto", "shop")
        .same("total", INT)
        .same("customer", "crm.Customer")
        .build();
    let customer_pair = PairBuilder::new("crm.Customer", "crm.CustomerDto", "crm")
        .same("id", INT)
        .build();
    let orders = generate(&table, &order_pair);
    let customers = generate(&table, &customer_pair);
    let eval = Evaluator::new(&[&orders, &customers]);

    let order: Value = Object::new("shop.Order")
        .with("total", Value::Int(99))
        .with(
            "customer",
            Object::new("crm.Customer").with("id", Value::Int(5)).into(),
        )
        .into();
    let dto = eval.call("toOrderDto", &order);
    let Value::Object(dto_object) = &dto else {
        panic!("expected an object, got {:?}", dto);
    };
    let Value::Object(customer) = dto_object.get("customer") else {
        panic!("customer was not converted");
    };
    assert_eq!(customer.ty, "crm.CustomerDto");

    assert_eq!(eval.call("toOrder", &dto), order);
}
