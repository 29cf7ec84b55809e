//! # Work-Unit Context
//!
//! Carriers threaded through artifact loads and proxy invocations:
//!
//! - **JobContext**: job-level context shared across all steps of one job run
//! - **ExecutionRecord / StepExecutionRecord**: the runtime record that owns the error slot
//! - **InjectionContext**: what a single artifact load happens under
//! - **ContextScope**: publishes the in-flight `InjectionContext` on the current thread

pub mod injection;
pub mod job_context;
pub mod record;

pub use injection::{current_injection_context, ContextScope, InjectionContext};
pub use job_context::JobContext;
pub use record::{ExecutionRecord, StepExecutionRecord};
