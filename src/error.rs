//! # Error Types
//!
//! Errors raised by the dispatch layer and the failure wrapper handed to
//! callers of lifecycle capability methods.
//!
//! ## Taxonomy
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `LoadFailed` | The loader could not resolve or instantiate the artifact |
//! | `NullArtifact` | The loader succeeded but produced nothing (wiring defect) |
//! | `CapabilityMismatch` | The artifact does not implement the contract the call site needs |
//! | `Runtime` | A lifecycle method on a handler failed; cause is the handler's own error |
//! | `ContextNotAttached` | A proxy was invoked before its execution record was attached |
//! | `MissingStepRecord` | A step-scoped operation was called without a step record |
//! | `Configuration` | Configuration could not be loaded or failed validation |
//!
//! Handler implementations report failures as [`HandlerError`] (`anyhow::Error`).
//! Data-path methods hand that exact value back to the caller so that skip and
//! retry classification can downcast it to the concrete type.

use crate::capability::CapabilityKind;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type returned by handler implementations.
pub type HandlerError = anyhow::Error;

/// Result type returned by handler implementations.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// A handler error shared between an execution record's error slot and the
/// failure surfaced to the caller.
pub type SharedError = Arc<HandlerError>;

pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("Failed to load artifact '{id}': {source}")]
    LoadFailed { id: String, source: LoadError },

    #[error("Artifact '{id}' resolved to nothing; check that the id is wired to a real handler")]
    NullArtifact { id: String },

    #[error("Artifact '{id}' does not implement {expected}")]
    CapabilityMismatch { id: String, expected: CapabilityKind },

    #[error(transparent)]
    Runtime(#[from] RuntimeFailure),

    #[error("{capability}::{operation} invoked before an execution record was attached")]
    ContextNotAttached {
        capability: CapabilityKind,
        operation: &'static str,
    },

    #[error("{operation} requires a step execution record")]
    MissingStepRecord { operation: &'static str },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DispatchError {
    /// The runtime failure carried by this error, if it came from a lifecycle method.
    pub fn as_runtime_failure(&self) -> Option<&RuntimeFailure> {
        match self {
            DispatchError::Runtime(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether the error points at a wiring/configuration defect rather than a
    /// failure inside a handler.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            DispatchError::NullArtifact { .. }
                | DispatchError::CapabilityMismatch { .. }
                | DispatchError::MissingStepRecord { .. }
                | DispatchError::Configuration(_)
        )
    }
}

impl From<::config::ConfigError> for DispatchError {
    fn from(error: ::config::ConfigError) -> Self {
        DispatchError::Configuration(error.to_string())
    }
}

/// Uniform wrapper for failures raised by lifecycle capability methods.
///
/// The original handler error is kept as the cause and is the same value that
/// was recorded on the execution record.
#[derive(Debug, Clone)]
pub struct RuntimeFailure {
    capability: CapabilityKind,
    operation: &'static str,
    artifact_id: String,
    cause: SharedError,
}

impl RuntimeFailure {
    pub fn new(
        capability: CapabilityKind,
        operation: &'static str,
        artifact_id: impl Into<String>,
        cause: SharedError,
    ) -> Self {
        Self {
            capability,
            operation,
            artifact_id: artifact_id.into(),
            cause,
        }
    }

    pub fn capability(&self) -> CapabilityKind {
        self.capability
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn cause(&self) -> &SharedError {
        &self.cause
    }

    /// Downcast the wrapped handler error to its concrete type.
    pub fn downcast_cause_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.cause.downcast_ref::<E>()
    }
}

impl fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{} failed in artifact '{}': {}",
            self.capability, self.operation, self.artifact_id, self.cause
        )
    }
}

impl std::error::Error for RuntimeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&**self.cause)
    }
}

/// Error returned by an [`ArtifactLoader`](crate::registry::ArtifactLoader)
/// when an artifact id cannot be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    /// The artifact id that could not be resolved
    pub id: String,

    /// Human-readable error message
    pub message: String,

    /// Optional hint about how to fix the error
    pub hint: Option<String>,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " Hint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

impl LoadError {
    #[must_use]
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Error for an id no loader knows about.
    #[must_use]
    pub fn not_registered(id: impl Into<String>, known: &[String]) -> Self {
        let id = id.into();
        let message = format!("No artifact registered under id '{id}'");
        let hint = if known.is_empty() {
            "The registry is empty; register artifacts before building proxies.".to_string()
        } else {
            format!("Registered ids: {}", known.join(", "))
        };
        Self {
            id,
            message,
            hint: Some(hint),
        }
    }
}
