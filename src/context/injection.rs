//! Work-unit context threaded into every artifact load.
//!
//! The context is passed explicitly to the [`ArtifactLoader`](crate::registry::ArtifactLoader).
//! For injection code that cannot take it as a parameter, the context of the
//! load in flight is also published on a thread-scoped slot through
//! [`ContextScope`]. Scopes nest: leaving a scope restores whatever was
//! current before it, so a load triggered from inside another load never
//! clobbers the outer context.

use super::job_context::JobContext;
use super::record::ExecutionRecord;
use crate::model::{find_property, Property};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

thread_local! {
    static CURRENT_CONTEXT: RefCell<Option<InjectionContext>> = const { RefCell::new(None) };
}

/// Context for loading one artifact: the job it belongs to, the step record
/// (absent for job-scoped loads) and the properties to inject.
///
/// One instance is reused across the sequential loads of a listener
/// resolution pass; the property list is overwritten before each load.
#[derive(Debug, Clone)]
pub struct InjectionContext {
    job_context: Arc<JobContext>,
    step_record: Option<Arc<dyn ExecutionRecord>>,
    properties: Vec<Property>,
}

impl InjectionContext {
    /// Context for job-scoped loads.
    pub fn new(job_context: Arc<JobContext>) -> Self {
        Self {
            job_context,
            step_record: None,
            properties: Vec::new(),
        }
    }

    /// Context for loads made on behalf of a running step.
    pub fn for_step(job_context: Arc<JobContext>, step_record: Arc<dyn ExecutionRecord>) -> Self {
        Self {
            job_context,
            step_record: Some(step_record),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn job_context(&self) -> &Arc<JobContext> {
        &self.job_context
    }

    pub fn set_job_context(&mut self, job_context: Arc<JobContext>) {
        self.job_context = job_context;
    }

    pub fn step_record(&self) -> Option<&Arc<dyn ExecutionRecord>> {
        self.step_record.as_ref()
    }

    pub fn set_step_record(&mut self, step_record: Option<Arc<dyn ExecutionRecord>>) {
        self.step_record = step_record;
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Replace the properties for the next load.
    pub fn set_properties(&mut self, properties: Vec<Property>) {
        self.properties = properties;
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        find_property(&self.properties, name)
    }
}

/// The context of the load currently in flight on this thread, if any.
pub fn current_injection_context() -> Option<InjectionContext> {
    CURRENT_CONTEXT.with(|slot| slot.borrow().clone())
}

/// Guard publishing an [`InjectionContext`] on the current thread.
///
/// Dropping the guard restores the previously published context (or clears
/// the slot), including when the guarded load fails or panics. The guard is
/// `!Send` so it is always dropped on the thread that created it.
#[must_use = "the context is withdrawn as soon as the scope is dropped"]
pub struct ContextScope {
    previous: Option<InjectionContext>,
    _thread_bound: PhantomData<*const ()>,
}

impl ContextScope {
    pub fn enter(context: InjectionContext) -> Self {
        let previous = CURRENT_CONTEXT.with(|slot| slot.replace(Some(context)));
        Self {
            previous,
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // The slot is gone during thread teardown; nothing left to restore.
        let _ = CURRENT_CONTEXT.try_with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}
