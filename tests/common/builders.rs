use handler_dispatch::context::{InjectionContext, JobContext, StepExecutionRecord};
use handler_dispatch::model::{ArtifactDeclaration, JobDefinition, StepDefinition};
use std::sync::Arc;

pub fn step_with_listeners(step_id: &str, listener_ids: &[&str]) -> StepDefinition {
    listener_ids
        .iter()
        .fold(StepDefinition::new(step_id), |step, id| {
            step.with_listener(ArtifactDeclaration::new(*id))
        })
}

pub fn job_with_steps(job_id: &str, steps: Vec<StepDefinition>) -> JobDefinition {
    steps
        .into_iter()
        .fold(JobDefinition::new(job_id), |job, step| job.with_step(step))
}

/// A running step: its record and the injection context loads happen under.
pub struct StepRun {
    pub job_context: Arc<JobContext>,
    pub record: Arc<StepExecutionRecord>,
    pub context: InjectionContext,
}

pub fn step_run(job_context: &Arc<JobContext>, step_id: &str) -> StepRun {
    let record = Arc::new(StepExecutionRecord::new(step_id));
    let context = InjectionContext::for_step(Arc::clone(job_context), record.clone());
    StepRun {
        job_context: Arc::clone(job_context),
        record,
        context,
    }
}
