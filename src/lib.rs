#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Handler Dispatch
//!
//! Capability dispatch for pluggable batch artifacts.
//!
//! ## Overview
//!
//! Jobs declare their artifacts (readers, writers, listeners, deciders, ...)
//! by id. This crate resolves those ids into handler instances, classifies
//! each instance by the contracts it implements, and wraps every call into a
//! handler in a proxy that keeps the running step's error state current.
//!
//! ## Module Organization
//!
//! - [`capability`] - Artifact contracts, capability kinds and bundles
//! - [`proxy`] - Capability proxies and their two invocation paths
//! - [`registry`] - Artifact loading, proxy factory and listener catalog
//! - [`context`] - Job context, execution records and the injection context
//! - [`model`] - Declarative job/step model and batch value types
//! - [`config`] - Layered runtime configuration
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Structured error handling
//!
//! ## Error Paths
//!
//! Lifecycle methods (open, close, listener callbacks, ...) record a failure
//! on the execution record and surface it as [`DispatchError::Runtime`].
//! `ItemProcessor::process_item` and `ItemWriter::write_items` return the
//! handler's own error untouched so skip and retry policies can inspect it.

pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod proxy;
pub mod registry;

pub use capability::{Capabilities, CapabilityKind, CapabilitySet};
pub use self::config::DispatchConfig;
pub use context::{ExecutionRecord, InjectionContext, JobContext, StepExecutionRecord};
pub use error::{
    DispatchError, DispatchResult, HandlerError, HandlerResult, LoadError, RuntimeFailure,
    SharedError,
};
pub use proxy::CapabilityProxy;
pub use registry::{ArtifactFactory, ArtifactLoader, ExplicitArtifactRegistry, ListenerCatalog};
