//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PsanError, Result};
use crate::sanitizer::artifacts::{APP_SERVER_SUBDIR, DEFAULT_ROUTES};

/// Full psan configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub sanitize: SanitizeConfig,
    pub report: ReportConfig,
    pub paths: PathsConfig,
}

/// Sanitizer inputs: route set, output layout, deletion behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Routes validated when the invocation supplies none.
    pub routes: Vec<String>,
    /// Relative path from the target directory to the server-rendered
    /// app directory. Owned by the external build system.
    pub app_subdir: PathBuf,
    /// Report removals without unlinking anything.
    pub dry_run: bool,
}

/// Report sinks and verbosity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Optional JSONL audit trail of removals. Disabled when unset.
    pub audit_log: Option<PathBuf>,
    /// Suppress informational stdout lines.
    pub quiet: bool,
}

/// Filesystem paths used by psan itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            routes: DEFAULT_ROUTES.iter().map(ToString::to_string).collect(),
            app_subdir: PathBuf::from(APP_SERVER_SUBDIR),
            dry_run: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[PSAN-CONFIG] WARNING: HOME not set, falling back to /tmp for config path"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("psan").join("config.toml"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// An explicit path that does not exist is an error. A missing default
    /// path is not — it yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| PsanError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(PsanError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(|name| env_var(name))
    }

    /// Apply overrides through an injectable lookup (testable without
    /// mutating process environment).
    fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("PSAN_SANITIZE_ROUTES") {
            self.sanitize.routes = raw
                .split(',')
                .map(str::trim)
                .filter(|route| !route.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(raw) = lookup("PSAN_SANITIZE_APP_SUBDIR") {
            self.sanitize.app_subdir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("PSAN_SANITIZE_DRY_RUN") {
            self.sanitize.dry_run = parse_env_bool("PSAN_SANITIZE_DRY_RUN", &raw)?;
        }
        if let Some(raw) = lookup("PSAN_REPORT_AUDIT_LOG") {
            self.report.audit_log = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup("PSAN_REPORT_QUIET") {
            self.report.quiet = parse_env_bool("PSAN_REPORT_QUIET", &raw)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.sanitize.app_subdir.as_os_str().is_empty() {
            return Err(PsanError::InvalidConfig {
                details: "sanitize.app_subdir must not be empty".to_string(),
            });
        }
        if self.sanitize.app_subdir.is_absolute() {
            return Err(PsanError::InvalidConfig {
                details: format!(
                    "sanitize.app_subdir must be relative to the target directory, got {}",
                    self.sanitize.app_subdir.display()
                ),
            });
        }
        if self
            .sanitize
            .routes
            .iter()
            .any(|route| route.trim().is_empty())
        {
            return Err(PsanError::InvalidConfig {
                details: "sanitize.routes must not contain blank route names".to_string(),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.parse::<bool>().map_err(|error| PsanError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}
