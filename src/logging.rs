//! # Structured Logging Module
//!
//! Environment-aware structured logging for the dispatch runtime, plus
//! helpers that emit the runtime's structured events with a consistent
//! field set.

use crate::config::DispatchConfig;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging from `config`.
///
/// Only the first call has an effect. `RUST_LOG` takes precedence over
/// `config.log_level`. If a global subscriber is already installed (by the
/// embedding application or a test harness) it is kept.
pub fn init_structured_logging(config: &DispatchConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()))
        };

        let console = if config.uses_json_logs() {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
                .with_filter(filter())
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter())
                .boxed()
        };

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::info!(
            environment = %config.environment,
            log_level = %config.log_level,
            log_format = %config.log_format,
            "Structured logging initialized"
        );
    });
}

/// Variable naming the deployment environment. The config layer maps the
/// same variable onto `DispatchConfig::environment`.
pub const ENVIRONMENT_VAR: &str = "DISPATCH_ENVIRONMENT";

/// Current environment from `DISPATCH_ENVIRONMENT`, then `APP_ENV`.
pub fn detect_environment() -> String {
    std::env::var(ENVIRONMENT_VAR)
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Default filter directive for an environment.
pub fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log an artifact load or proxy construction event
pub fn log_artifact_operation(
    operation: &str,
    artifact_id: &str,
    capability: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        artifact_id = %artifact_id,
        capability = capability,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "ARTIFACT_OPERATION"
    );
}

/// Log the outcome of resolving the listeners of a job or step
pub fn log_listener_resolution(scope_id: &str, listener_count: usize, status: &str) {
    tracing::info!(
        scope_id = %scope_id,
        listener_count = listener_count,
        status = %status,
        timestamp = %Utc::now().to_rfc3339(),
        "LISTENER_RESOLUTION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
