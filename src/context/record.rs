//! Execution records: the runtime objects that own an error slot.

use crate::error::SharedError;
use crate::model::{BatchStatus, StepOutcome};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Runtime record of the executing work unit.
///
/// Every capability proxy holds one of these and records handler failures on
/// it before re-signalling them. Step executions are the usual implementor;
/// job listeners record onto the [`JobContext`](super::JobContext).
pub trait ExecutionRecord: Send + Sync + fmt::Debug {
    /// Name used in diagnostics (step name or job name).
    fn name(&self) -> &str;

    /// Store `error` in the error slot, replacing any earlier one.
    fn set_exception(&self, error: SharedError);

    fn exception(&self) -> Option<SharedError>;
}

/// Runtime record of one step execution (or one partition of it).
#[derive(Debug)]
pub struct StepExecutionRecord {
    step_name: String,
    step_execution_id: Uuid,
    partition: Option<u32>,
    created_at: DateTime<Utc>,
    batch_status: Mutex<BatchStatus>,
    exit_status: Mutex<Option<String>>,
    exception: Mutex<Option<SharedError>>,
}

impl StepExecutionRecord {
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            step_execution_id: Uuid::new_v4(),
            partition: None,
            created_at: Utc::now(),
            batch_status: Mutex::new(BatchStatus::Starting),
            exit_status: Mutex::new(None),
            exception: Mutex::new(None),
        }
    }

    /// Record for one partition of a partitioned step.
    #[must_use]
    pub fn with_partition(mut self, partition: u32) -> Self {
        self.partition = Some(partition);
        self
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    pub fn step_execution_id(&self) -> Uuid {
        self.step_execution_id
    }

    pub fn partition(&self) -> Option<u32> {
        self.partition
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn batch_status(&self) -> BatchStatus {
        *self.batch_status.lock()
    }

    pub fn set_batch_status(&self, status: BatchStatus) {
        *self.batch_status.lock() = status;
    }

    pub fn exit_status(&self) -> Option<String> {
        self.exit_status.lock().clone()
    }

    pub fn set_exit_status(&self, exit_status: impl Into<String>) {
        *self.exit_status.lock() = Some(exit_status.into());
    }

    pub fn has_exception(&self) -> bool {
        self.exception.lock().is_some()
    }

    /// Summary handed to deciders once the step finished.
    pub fn outcome(&self) -> StepOutcome {
        StepOutcome {
            step_name: self.step_name.clone(),
            batch_status: self.batch_status(),
            exit_status: self.exit_status(),
        }
    }
}

impl ExecutionRecord for StepExecutionRecord {
    fn name(&self) -> &str {
        &self.step_name
    }

    fn set_exception(&self, error: SharedError) {
        debug!(
            step_name = %self.step_name,
            step_execution_id = %self.step_execution_id,
            partition = ?self.partition,
            error = %error,
            "Recording exception on step execution"
        );
        *self.exception.lock() = Some(error);
    }

    fn exception(&self) -> Option<SharedError> {
        self.exception.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_record_is_clean() {
        let record = StepExecutionRecord::new("load");
        assert_eq!(record.name(), "load");
        assert_eq!(record.batch_status(), BatchStatus::Starting);
        assert!(record.exception().is_none());
        assert!(record.exit_status().is_none());
        assert!(record.partition().is_none());
    }

    #[test]
    fn test_exception_slot_keeps_latest() {
        let record = StepExecutionRecord::new("load").with_partition(2);
        record.set_exception(Arc::new(anyhow::anyhow!("first")));
        record.set_exception(Arc::new(anyhow::anyhow!("second")));

        assert!(record.has_exception());
        assert_eq!(record.exception().unwrap().to_string(), "second");
        assert_eq!(record.partition(), Some(2));
    }

    #[test]
    fn test_outcome_reflects_status() {
        let record = StepExecutionRecord::new("load");
        record.set_batch_status(BatchStatus::Completed);
        record.set_exit_status("DONE");

        let outcome = record.outcome();
        assert_eq!(outcome.step_name, "load");
        assert_eq!(outcome.batch_status, BatchStatus::Completed);
        assert_eq!(outcome.exit_status.as_deref(), Some("DONE"));
    }
}
