//! # Artifact Loader
//!
//! The seam between the dispatch layer and whatever knows how to turn an
//! artifact id into handler instances.
//!
//! [`ExplicitArtifactRegistry`] is the shipped implementation: a direct
//! id-to-handler mapping holding either a pre-built instance or a factory
//! closure that builds one per load.
//!
//! ```rust
//! use handler_dispatch::capability::{Capabilities, ChunkListener};
//! use handler_dispatch::registry::ExplicitArtifactRegistry;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Metrics { prefix: String }
//! impl ChunkListener for Metrics {}
//!
//! let registry = ExplicitArtifactRegistry::new();
//! registry.register("metrics", |ctx| {
//!     let prefix = ctx.property("prefix").unwrap_or("batch").to_string();
//!     Capabilities::new().with_chunk_listener(Arc::new(Metrics { prefix }))
//! });
//!
//! assert!(registry.is_registered("metrics"));
//! ```

use crate::capability::Capabilities;
use crate::context::InjectionContext;
use crate::error::LoadError;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Resolves an artifact id into the capabilities of a freshly loaded (or
/// shared) handler instance.
///
/// Implementations apply `context.properties()` to the handler they build.
/// `Ok(None)` means the id was understood but produced nothing; the factory
/// treats that as a wiring defect distinct from a load failure.
pub trait ArtifactLoader: Send + Sync + fmt::Debug {
    fn resolve(
        &self,
        id: &str,
        context: &InjectionContext,
    ) -> Result<Option<Capabilities>, LoadError>;
}

/// Factory closure producing a handler for one load.
pub type ArtifactBuilder =
    Arc<dyn Fn(&InjectionContext) -> Result<Option<Capabilities>, LoadError> + Send + Sync>;

#[derive(Clone)]
enum RegistryEntry {
    /// Shared across every load of the id
    Instance(Capabilities),

    /// Invoked once per load
    Factory(ArtifactBuilder),
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEntry::Instance(c) => write!(f, "Instance({})", c.kinds()),
            RegistryEntry::Factory(_) => write!(f, "Factory(...)"),
        }
    }
}

/// Thread-safe id-to-handler registry.
#[derive(Default)]
pub struct ExplicitArtifactRegistry {
    entries: DashMap<String, RegistryEntry>,
}

impl fmt::Debug for ExplicitArtifactRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitArtifactRegistry")
            .field("registered_ids", &self.registered_ids())
            .finish()
    }
}

impl ExplicitArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-built handler. Every load of `id` returns the same
    /// instances.
    pub fn register_instance(&self, id: impl Into<String>, capabilities: Capabilities) {
        let id = id.into();
        debug!(artifact_id = %id, kinds = %capabilities.kinds(), "Registered artifact instance");
        self.entries.insert(id, RegistryEntry::Instance(capabilities));
    }

    /// Register a factory building a new handler per load.
    pub fn register<F>(&self, id: impl Into<String>, factory: F)
    where
        F: Fn(&InjectionContext) -> Capabilities + Send + Sync + 'static,
    {
        self.register_fallible(id, move |ctx| Ok(Some(factory(ctx))));
    }

    /// Register a factory that may fail or produce nothing.
    pub fn register_fallible<F>(&self, id: impl Into<String>, factory: F)
    where
        F: Fn(&InjectionContext) -> Result<Option<Capabilities>, LoadError>
            + Send
            + Sync
            + 'static,
    {
        let id = id.into();
        debug!(artifact_id = %id, "Registered artifact factory");
        self.entries
            .insert(id, RegistryEntry::Factory(Arc::new(factory)));
    }

    /// Remove a registration, returning whether one existed.
    pub fn unregister(&self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArtifactLoader for ExplicitArtifactRegistry {
    fn resolve(
        &self,
        id: &str,
        context: &InjectionContext,
    ) -> Result<Option<Capabilities>, LoadError> {
        // Clone out of the map so a factory may itself load other artifacts
        // without holding a shard lock.
        let entry = self.entries.get(id).map(|entry| entry.value().clone());
        match entry {
            Some(RegistryEntry::Instance(capabilities)) => Ok(Some(capabilities)),
            Some(RegistryEntry::Factory(build)) => build(context),
            None => Err(LoadError::not_registered(id, &self.registered_ids())),
        }
    }
}
