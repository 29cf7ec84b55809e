//! # Dispatch Configuration
//!
//! Layered configuration for the dispatch runtime, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. `DISPATCH_*` environment variables (`DISPATCH_LOG_LEVEL=warn`)
//!
//! ```toml
//! environment = "production"
//! log_level = "info"
//! log_format = "json"
//! trace_invocations = false
//! ```

use crate::error::{DispatchError, DispatchResult};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DISPATCH";

const LOG_FORMATS: &[&str] = &["pretty", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Deployment environment (`development`, `test`, `production`, ...)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Trace every successful capability invocation
    #[serde(default)]
    pub trace_invocations: bool,
}

fn default_environment() -> String {
    crate::logging::detect_environment()
}

fn default_log_level() -> String {
    crate::logging::default_log_level(&default_environment()).to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            trace_invocations: false,
        }
    }
}

impl DispatchConfig {
    /// Load configuration from defaults, `path` (if any) and the environment.
    pub fn load(path: Option<&Path>) -> DispatchResult<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("environment", defaults.environment)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?
            .set_default("trace_invocations", defaults.trace_invocations)?;

        if let Some(path) = path {
            if !path.exists() {
                return Err(DispatchError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Configuration from defaults and environment only.
    pub fn from_env() -> DispatchResult<Self> {
        Self::load(None)
    }

    pub fn validate(&self) -> DispatchResult<()> {
        let mut problems = Vec::new();

        if self.environment.trim().is_empty() {
            problems.push("environment must not be empty".to_string());
        }
        if self.log_level.trim().is_empty() {
            problems.push("log_level must not be empty".to_string());
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            problems.push(format!(
                "log_format '{}' is not one of: {}",
                self.log_format,
                LOG_FORMATS.join(", ")
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Configuration(problems.join("; ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn uses_json_logs(&self) -> bool {
        self.log_format == "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DispatchConfig {
        DispatchConfig {
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_format: "pretty".to_string(),
            trace_invocations: false,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert!(!config().uses_json_logs());
    }

    #[test]
    fn test_validation_collects_problems() {
        let invalid = DispatchConfig {
            log_level: " ".to_string(),
            log_format: "xml".to_string(),
            ..config()
        };

        let error = invalid.validate().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("log_level must not be empty"));
        assert!(message.contains("log_format 'xml'"));
        assert!(error.is_configuration_defect());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let missing = Path::new("/nonexistent/dispatch.toml");
        let error = DispatchConfig::load(Some(missing)).unwrap_err();
        assert!(matches!(error, DispatchError::Configuration(_)));
    }
}
