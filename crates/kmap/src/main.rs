//! Binary entry point for the kmap CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Generate units for every pair in kmap.json into generated/
//! kmap generate
//!
//! # Print units without writing them
//! kmap generate --dry-run
//!
//! # Validate only, JSON report
//! kmap check --format json
//!
//! # Fail if generated/ does not match what would be generated
//! kmap verify
//! ```
//!
//! Exit codes: 0 success, 2 invalid arguments, 3 unreadable manifest,
//! 4 write failure, 5 rejected pairs or out-of-date units, 10 internal error.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use kmap::cli::{OutputFormat, run_check, run_generate, run_verify};
use kmap::config::{CliOverrides, ResolvedConfig};
use kmap_core::error::KmapError;
use kmap_core::output::{ErrorResponse, emit_response};

// ============================================================================
// CLI Structure
// ============================================================================

/// Generate bidirectional conversion functions between partner types.
#[derive(Parser, Debug)]
#[command(
    name = "kmap",
    version,
    about = "Generate bidirectional conversion functions between partner types"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Project directory holding kmap.toml (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Manifest path (default: kmap.json in the workspace).
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Output directory for generated units (default: generated/).
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Worker threads used to process pairs.
    #[arg(long, short = 'j', global = true)]
    jobs: Option<usize>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

impl GlobalArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            manifest: self.manifest.clone(),
            out_dir: self.out_dir.clone(),
            jobs: self.jobs,
        }
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every pair and write units for the valid ones.
    Generate {
        /// Print units instead of writing them.
        #[arg(long)]
        dry_run: bool,
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Validate every pair without generating.
    Check {
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Compare generated units on disk with what would be generated.
    Verify {
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.error_code().code();
            if err.is_reported() {
                // the command already emitted its report
                eprintln!("kmap: {}", err);
            } else {
                let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                let _ = io::stdout().flush();
            }
            ExitCode::from(code)
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;

    let filter = EnvFilter::try_from_env("KMAP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), KmapError> {
    let config = resolve_config(&cli.global)?;
    let mut stdout = io::stdout().lock();
    let result = match cli.command {
        Command::Generate { dry_run, format } => {
            run_generate(&config, dry_run, format, &mut stdout)
        }
        Command::Check { format } => run_check(&config, format, &mut stdout),
        Command::Verify { format } => run_verify(&config, format, &mut stdout),
    };
    let _ = stdout.flush();
    result
}

fn resolve_config(global: &GlobalArgs) -> Result<ResolvedConfig, KmapError> {
    let workspace = match &global.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| KmapError::internal(format!("cannot read current directory: {}", e)))?,
    };
    if !workspace.is_dir() {
        return Err(KmapError::invalid_args(format!(
            "workspace is not a directory: {}",
            workspace.display()
        )));
    }
    ResolvedConfig::resolve(&workspace, &global.overrides())
}

// ============================================================================
// Tests
// ============================================================================
