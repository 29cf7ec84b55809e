//! # Listener Catalog
//!
//! Per-job-run catalog of declared listeners, classified by capability.
//!
//! Job-level listeners are resolved when the catalog is built. Step-level
//! listeners are resolved on the first query for a step: every declaration of
//! the step is loaded once, its full capability set computed, and the result
//! memoized under the step id. Later queries for any capability on that step
//! are cache reads.
//!
//! Resolution is serialized per step, not per catalog. A step being resolved
//! for the first time never delays queries against other steps.
//!
//! ```text
//!   get_chunk_listeners(step)        get_item_write_listeners(step)
//!            │                                   │
//!            └──────────────┬────────────────────┘
//!                   ┌───────▼────────┐   miss   ┌──────────────────────────┐
//!                   │ step cache     ├─────────►│ load each declaration,   │
//!                   │ (step id)      │◄─────────┤ compute capability sets  │
//!                   └───────┬────────┘  insert  └──────────────────────────┘
//!                           │ Arc<Vec<ResolvedListener>> (declaration order)
//!                   filter by capability, new proxy per match, attach record
//! ```
//!
//! Proxies are never cached: each query returns fresh proxies bound to the
//! record passed in, while the underlying handler instances are shared.

use super::artifact_factory::ArtifactFactory;
use crate::capability::{Capabilities, CapabilityKind, CapabilitySet};
use crate::context::{ExecutionRecord, InjectionContext, JobContext};
use crate::error::DispatchResult;
use crate::logging::log_listener_resolution;
use crate::model::{ArtifactDeclaration, JobDefinition, StepDefinition};
use crate::proxy::{
    ChunkListenerProxy, ItemProcessListenerProxy, ItemReadListenerProxy, ItemWriteListenerProxy,
    JobListenerProxy, RetryProcessListenerProxy, RetryReadListenerProxy, RetryWriteListenerProxy,
    SkipProcessListenerProxy, SkipReadListenerProxy, SkipWriteListenerProxy, StepListenerProxy,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One declared listener after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedListener {
    declaration: ArtifactDeclaration,
    capabilities: Capabilities,
    kinds: CapabilitySet,
}

impl ResolvedListener {
    fn new(declaration: ArtifactDeclaration, capabilities: Capabilities) -> Self {
        let kinds = capabilities.kinds();
        Self {
            declaration,
            capabilities,
            kinds,
        }
    }

    pub fn declaration(&self) -> &ArtifactDeclaration {
        &self.declaration
    }

    pub fn id(&self) -> &str {
        &self.declaration.id
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn kinds(&self) -> CapabilitySet {
        self.kinds
    }

    pub fn implements(&self, kind: CapabilityKind) -> bool {
        self.kinds.contains(kind)
    }
}

/// Statistics about the step-level cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub resolved_steps: usize,
    pub step_ids: Vec<String>,
}

#[derive(Debug)]
pub struct ListenerCatalog {
    factory: ArtifactFactory,
    job_context: Arc<JobContext>,
    job_listeners: Vec<ResolvedListener>,
    /// Resolved listeners keyed by step id
    step_listeners: DashMap<String, Arc<Vec<ResolvedListener>>>,
    /// Per-step guards serializing first-time resolution
    resolution_locks: DashMap<String, Arc<Mutex<()>>>,
}

macro_rules! step_listener_queries {
    ($($name:ident => $getter:ident, $kind:ident, $proxy:ty;)*) => {
        $(
            pub fn $name(
                &self,
                step: &StepDefinition,
                context: &InjectionContext,
                record: Arc<dyn ExecutionRecord>,
            ) -> DispatchResult<Vec<$proxy>> {
                let resolved = self.resolve_step(step, context)?;
                Ok(resolved
                    .iter()
                    .filter(|listener| listener.implements(CapabilityKind::$kind))
                    .filter_map(|listener| {
                        listener.capabilities.$getter().map(|delegate| {
                            self.factory.wrap(
                                CapabilityKind::$kind,
                                listener.id(),
                                delegate,
                                Arc::clone(&record),
                            )
                        })
                    })
                    .collect())
            }
        )*
    };
}

impl ListenerCatalog {
    /// Build the catalog for one job run, resolving the job-level listeners.
    #[instrument(skip_all, fields(job_id = %job.id))]
    pub fn new(
        factory: ArtifactFactory,
        job: &JobDefinition,
        job_context: Arc<JobContext>,
    ) -> DispatchResult<Self> {
        let context = InjectionContext::new(Arc::clone(&job_context));
        let job_listeners = Self::resolve_declarations(&factory, &job.listeners, context)?;
        log_listener_resolution(&job.id, job_listeners.len(), "job_listeners_resolved");

        Ok(Self {
            factory,
            job_context,
            job_listeners,
            step_listeners: DashMap::new(),
            resolution_locks: DashMap::new(),
        })
    }

    pub fn factory(&self) -> &ArtifactFactory {
        &self.factory
    }

    pub fn job_context(&self) -> &Arc<JobContext> {
        &self.job_context
    }

    /// Job listeners, attached to the job context's error slot.
    pub fn get_job_listeners(&self) -> Vec<JobListenerProxy> {
        let record: Arc<dyn ExecutionRecord> = self.job_context.clone();
        self.job_listeners
            .iter()
            .filter(|listener| listener.implements(CapabilityKind::JobListener))
            .filter_map(|listener| {
                listener.capabilities.job_listener().map(|delegate| {
                    self.factory.wrap(
                        CapabilityKind::JobListener,
                        listener.id(),
                        delegate,
                        Arc::clone(&record),
                    )
                })
            })
            .collect()
    }

    step_listener_queries! {
        get_step_listeners => step_listener, StepListener, StepListenerProxy;
        get_chunk_listeners => chunk_listener, ChunkListener, ChunkListenerProxy;
        get_item_read_listeners => item_read_listener, ItemReadListener, ItemReadListenerProxy;
        get_item_process_listeners =>
            item_process_listener, ItemProcessListener, ItemProcessListenerProxy;
        get_item_write_listeners => item_write_listener, ItemWriteListener, ItemWriteListenerProxy;
        get_skip_read_listeners => skip_read_listener, SkipReadListener, SkipReadListenerProxy;
        get_skip_process_listeners =>
            skip_process_listener, SkipProcessListener, SkipProcessListenerProxy;
        get_skip_write_listeners => skip_write_listener, SkipWriteListener, SkipWriteListenerProxy;
        get_retry_read_listeners => retry_read_listener, RetryReadListener, RetryReadListenerProxy;
        get_retry_process_listeners =>
            retry_process_listener, RetryProcessListener, RetryProcessListenerProxy;
        get_retry_write_listeners =>
            retry_write_listener, RetryWriteListener, RetryWriteListenerProxy;
    }

    pub fn job_listener_count(&self) -> usize {
        self.job_listeners.len()
    }

    pub fn cache_stats(&self) -> CatalogStats {
        let mut step_ids: Vec<String> = self
            .step_listeners
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        step_ids.sort();
        CatalogStats {
            resolved_steps: step_ids.len(),
            step_ids,
        }
    }

    /// The resolved listeners of `step`, resolving them on first access.
    ///
    /// Only the step's own guard is held while its declarations load, so
    /// concurrent first queries for one step resolve it once while other
    /// steps stay readable. No map shard is locked during a load, which lets
    /// a loader query the catalog for a different step. A failed resolution
    /// caches nothing.
    fn resolve_step(
        &self,
        step: &StepDefinition,
        context: &InjectionContext,
    ) -> DispatchResult<Arc<Vec<ResolvedListener>>> {
        if let Some(resolved) = self.cached_step(&step.id) {
            debug!(step_id = %step.id, "Returning cached step listeners");
            return Ok(resolved);
        }

        let guard = self
            .resolution_locks
            .entry(step.id.clone())
            .or_default()
            .value()
            .clone();
        let _resolving = guard.lock();

        // Another query may have finished resolving while this one waited.
        if let Some(resolved) = self.cached_step(&step.id) {
            debug!(step_id = %step.id, "Step listeners resolved by a concurrent query");
            return Ok(resolved);
        }

        let resolved = Arc::new(Self::resolve_declarations(
            &self.factory,
            &step.listeners,
            context.clone(),
        )?);
        self.step_listeners
            .insert(step.id.clone(), Arc::clone(&resolved));
        log_listener_resolution(&step.id, resolved.len(), "step_listeners_resolved");
        Ok(resolved)
    }

    fn cached_step(&self, step_id: &str) -> Option<Arc<Vec<ResolvedListener>>> {
        self.step_listeners
            .get(step_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Load every declaration in order, reusing one context whose properties
    /// are replaced before each load.
    fn resolve_declarations(
        factory: &ArtifactFactory,
        declarations: &[ArtifactDeclaration],
        mut context: InjectionContext,
    ) -> DispatchResult<Vec<ResolvedListener>> {
        let mut resolved = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            context.set_properties(declaration.properties.clone());
            let capabilities = factory.load(&declaration.id, &context)?;
            resolved.push(ResolvedListener::new(declaration.clone(), capabilities));
        }
        Ok(resolved)
    }
}
