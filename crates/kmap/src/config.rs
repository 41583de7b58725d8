//! Configuration resolution.
//!
//! Every setting is tracked with the source it came from. Precedence, lowest
//! to highest:
//!
//! 1. built-in defaults
//! 2. `kmap.toml` in the working directory
//! 3. environment variables (`KMAP_MANIFEST`, `KMAP_OUT_DIR`, `KMAP_JOBS`)
//! 4. CLI flags
//!
//! ```toml
//! # kmap.toml
//! manifest = "build/kmap.json"
//! out_dir = "build/generated"
//! jobs = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use kmap_core::error::KmapError;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "kmap.toml";

/// Default manifest path.
pub const DEFAULT_MANIFEST: &str = "kmap.json";

/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "generated";

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From `kmap.toml`.
    ProjectConfig = 1,
    /// From environment variable.
    EnvVar = 2,
    /// From CLI flag (highest precedence).
    CliFlag = 3,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// Project Config
// ============================================================================

/// Contents of `kmap.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub manifest: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl ProjectConfig {
    /// Parse `kmap.toml` text.
    pub fn parse(text: &str, path: &Path) -> Result<Self, KmapError> {
        toml::from_str(text).map_err(|e| {
            KmapError::invalid_args(format!("{}: {}", path.display(), e.message()))
        })
    }

    /// Load `kmap.toml` from `dir`, if present.
    pub fn load(dir: &Path) -> Result<Option<Self>, KmapError> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| KmapError::invalid_args(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded project config");
        Self::parse(&text, &path).map(Some)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// CLI configuration overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// --manifest flag.
    pub manifest: Option<PathBuf>,
    /// --out-dir flag.
    pub out_dir: Option<PathBuf>,
    /// --jobs flag.
    pub jobs: Option<usize>,
}

/// Resolved configuration with precedence information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Manifest to load.
    pub manifest: ConfigValue<PathBuf>,
    /// Directory generated units are written under.
    pub out_dir: ConfigValue<PathBuf>,
    /// Worker threads for pair processing; 1 is sequential.
    pub jobs: ConfigValue<usize>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            manifest: ConfigValue::new(PathBuf::from(DEFAULT_MANIFEST), ConfigSource::Default),
            out_dir: ConfigValue::new(PathBuf::from(DEFAULT_OUT_DIR), ConfigSource::Default),
            jobs: ConfigValue::new(1, ConfigSource::Default),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from all sources, reading the process environment.
    pub fn resolve(working_dir: &Path, cli_overrides: &CliOverrides) -> Result<Self, KmapError> {
        Self::resolve_with_env(working_dir, cli_overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn resolve_with_env(
        working_dir: &Path,
        cli_overrides: &CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, KmapError> {
        let mut config = ResolvedConfig::default();

        if let Some(project) = ProjectConfig::load(working_dir)? {
            config.apply_project_config(&project);
        }
        config.apply_env_vars(env)?;
        config.apply_cli_overrides(cli_overrides)?;

        // relative paths from any source are taken from the working directory
        config.manifest.value = working_dir.join(&config.manifest.value);
        config.out_dir.value = working_dir.join(&config.out_dir.value);
        Ok(config)
    }

    fn apply_project_config(&mut self, project: &ProjectConfig) {
        if let Some(ref manifest) = project.manifest {
            self.manifest = self.manifest.clone().merge(ConfigValue::new(
                manifest.clone(),
                ConfigSource::ProjectConfig,
            ));
        }
        if let Some(ref out_dir) = project.out_dir {
            self.out_dir = self.out_dir.clone().merge(ConfigValue::new(
                out_dir.clone(),
                ConfigSource::ProjectConfig,
            ));
        }
        if let Some(jobs) = project.jobs {
            self.jobs = self
                .jobs
                .clone()
                .merge(ConfigValue::new(jobs.max(1), ConfigSource::ProjectConfig));
        }
    }

    fn apply_env_vars(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), KmapError> {
        if let Some(manifest) = env("KMAP_MANIFEST") {
            self.manifest = ConfigValue::new(PathBuf::from(manifest), ConfigSource::EnvVar);
        }

        if let Some(out_dir) = env("KMAP_OUT_DIR") {
            self.out_dir = ConfigValue::new(PathBuf::from(out_dir), ConfigSource::EnvVar);
        }

        if let Some(jobs) = env("KMAP_JOBS") {
            let jobs = parse_jobs(&jobs)
                .ok_or_else(|| KmapError::invalid_args(format!("KMAP_JOBS: invalid value '{}'", jobs)))?;
            self.jobs = ConfigValue::new(jobs, ConfigSource::EnvVar);
        }
        Ok(())
    }

    fn apply_cli_overrides(&mut self, overrides: &CliOverrides) -> Result<(), KmapError> {
        if let Some(ref manifest) = overrides.manifest {
            self.manifest = ConfigValue::new(manifest.clone(), ConfigSource::CliFlag);
        }

        if let Some(ref out_dir) = overrides.out_dir {
            self.out_dir = ConfigValue::new(out_dir.clone(), ConfigSource::CliFlag);
        }

        if let Some(jobs) = overrides.jobs {
            if jobs == 0 {
                return Err(KmapError::invalid_args("--jobs must be at least 1"));
            }
            self.jobs = ConfigValue::new(jobs, ConfigSource::CliFlag);
        }
        Ok(())
    }
}

fn parse_jobs(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|jobs| *jobs > 0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod precedence {
        use super::*;

        #[test]
        fn defaults_apply_without_sources() {
            let dir = tempfile::tempdir().unwrap();
            let config =
                ResolvedConfig::resolve_with_env(dir.path(), &CliOverrides::default(), no_env)
                    .unwrap();
            assert_eq!(config.out_dir.source, ConfigSource::Default);
            assert_eq!(config.out_dir.value, dir.path().join("generated"));
            assert_eq!(config.manifest.value, dir.path().join("kmap.json"));
            assert_eq!(config.jobs.value, 1);
        }

        #[test]
        fn project_config_overrides_defaults() {
            let dir = tempfile::tempdir().unwrap();
            fs::write(
                dir.path().join(PROJECT_CONFIG_FILE),
                "out_dir = \"build/gen\"\njobs = 3\n",
            )
            .unwrap();
            let config =
                ResolvedConfig::resolve_with_env(dir.path(), &CliOverrides::default(), no_env)
                    .unwrap();
            assert_eq!(config.out_dir.source, ConfigSource::ProjectConfig);
            assert_eq!(config.out_dir.value, dir.path().join("build/gen"));
            assert_eq!(config.jobs.value, 3);
            assert_eq!(config.manifest.source, ConfigSource::Default);
        }

        #[test]
        fn env_overrides_project_config() {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join(PROJECT_CONFIG_FILE), "out_dir = \"a\"\n").unwrap();
            let config = ResolvedConfig::resolve_with_env(
                dir.path(),
                &CliOverrides::default(),
                env_of(&[("KMAP_OUT_DIR", "b"), ("KMAP_JOBS", "2")]),
            )
            .unwrap();
            assert_eq!(config.out_dir.source, ConfigSource::EnvVar);
            assert_eq!(config.out_dir.value, dir.path().join("b"));
            assert_eq!(config.jobs.value, 2);
        }

        #[test]
        fn cli_flag_wins() {
            let dir = tempfile::tempdir().unwrap();
            let overrides = CliOverrides {
                out_dir: Some(PathBuf::from("c")),
                jobs: Some(8),
                ..Default::default()
            };
            let config = ResolvedConfig::resolve_with_env(
                dir.path(),
                &overrides,
                env_of(&[("KMAP_OUT_DIR", "b"), ("KMAP_JOBS", "2")]),
            )
            .unwrap();
            assert_eq!(config.out_dir.source, ConfigSource::CliFlag);
            assert_eq!(config.out_dir.value, dir.path().join("c"));
            assert_eq!(config.jobs.value, 8);
        }

        #[test]
        fn absolute_paths_are_kept() {
            let dir = tempfile::tempdir().unwrap();
            let out = tempfile::tempdir().unwrap();
            let overrides = CliOverrides {
                out_dir: Some(out.path().to_path_buf()),
                ..Default::default()
            };
            let config =
                ResolvedConfig::resolve_with_env(dir.path(), &overrides, no_env).unwrap();
            assert_eq!(config.out_dir.value, out.path());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn invalid_jobs_env_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let err = ResolvedConfig::resolve_with_env(
                dir.path(),
                &CliOverrides::default(),
                env_of(&[("KMAP_JOBS", "many")]),
            )
            .unwrap_err();
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn zero_jobs_flag_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let overrides = CliOverrides {
                jobs: Some(0),
                ..Default::default()
            };
            assert!(ResolvedConfig::resolve_with_env(dir.path(), &overrides, no_env).is_err());
        }

        #[test]
        fn unknown_project_key_is_rejected() {
            let err = ProjectConfig::parse("output = \"x\"\n", Path::new("kmap.toml")).unwrap_err();
            assert!(err.to_string().contains("kmap.toml"));
        }
    }

    #[test]
    fn merge_prefers_higher_source() {
        let low = ConfigValue::new(1, ConfigSource::Default);
        let high = ConfigValue::new(2, ConfigSource::EnvVar);
        assert_eq!(low.clone().merge(high.clone()).value, 2);
        assert_eq!(high.merge(low).value, 2);
    }
}
