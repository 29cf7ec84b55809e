//! # Artifact Registry
//!
//! Turning declared artifact ids into attached capability proxies.
//!
//! ## Architecture
//!
//! ```text
//! Artifact Registry
//! ├── ArtifactLoader            (id + context → Capabilities)
//! │   └── ExplicitArtifactRegistry  (id → instance or factory)
//! ├── ArtifactFactory           (load, classify, wrap, attach)
//! └── ListenerCatalog           (per-job listener classification and step cache)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use handler_dispatch::capability::{Capabilities, ChunkListener, ItemWriteListener};
//! use handler_dispatch::context::{InjectionContext, JobContext, StepExecutionRecord};
//! use handler_dispatch::model::{ArtifactDeclaration, JobDefinition, StepDefinition};
//! use handler_dispatch::registry::{ArtifactFactory, ExplicitArtifactRegistry, ListenerCatalog};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Audit;
//! impl ChunkListener for Audit {}
//! impl ItemWriteListener for Audit {}
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ExplicitArtifactRegistry::new();
//! registry.register("audit", |_| {
//!     let audit = Arc::new(Audit);
//!     Capabilities::new()
//!         .with_chunk_listener(audit.clone())
//!         .with_item_write_listener(audit)
//! });
//!
//! let step = StepDefinition::new("export").with_listener(ArtifactDeclaration::new("audit"));
//! let job = JobDefinition::new("nightly").with_step(step.clone());
//! let job_context = Arc::new(JobContext::new("nightly"));
//!
//! let catalog = ListenerCatalog::new(
//!     ArtifactFactory::new(Arc::new(registry)),
//!     &job,
//!     job_context.clone(),
//! )?;
//!
//! let record = Arc::new(StepExecutionRecord::new("export"));
//! let context = InjectionContext::for_step(job_context, record.clone());
//! let chunk_listeners = catalog.get_chunk_listeners(&step, &context, record)?;
//! chunk_listeners[0].before_chunk()?;
//! # Ok(())
//! # }
//! ```

pub mod artifact_factory;
pub mod listener_catalog;
pub mod loader;

pub use artifact_factory::{
    require_step_record, ArtifactFactory, ChunkArtifacts, PartitionArtifacts,
};
pub use listener_catalog::{CatalogStats, ListenerCatalog, ResolvedListener};
pub use loader::{ArtifactBuilder, ArtifactLoader, ExplicitArtifactRegistry};
