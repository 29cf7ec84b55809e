//! Value types exchanged with artifacts: statuses, step outcomes and partition plans.

use super::declaration::Property;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a job or step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Starting,
    Started,
    Stopping,
    Stopped,
    Failed,
    Completed,
    Abandoned,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Starting => "STARTING",
            BatchStatus::Started => "STARTED",
            BatchStatus::Stopping => "STOPPING",
            BatchStatus::Stopped => "STOPPED",
            BatchStatus::Failed => "FAILED",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Abandoned => "ABANDONED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Stopped
                | BatchStatus::Failed
                | BatchStatus::Completed
                | BatchStatus::Abandoned
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome reported to a partition reducer once all partitions finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartitionReducerStatus {
    Commit,
    Rollback,
}

impl fmt::Display for PartitionReducerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionReducerStatus::Commit => f.write_str("COMMIT"),
            PartitionReducerStatus::Rollback => f.write_str("ROLLBACK"),
        }
    }
}

/// Summary of a finished step handed to a decider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step_name: String,
    pub batch_status: BatchStatus,
    pub exit_status: Option<String>,
}

impl StepOutcome {
    pub fn new(step_name: impl Into<String>, batch_status: BatchStatus) -> Self {
        Self {
            step_name: step_name.into(),
            batch_status,
            exit_status: None,
        }
    }

    #[must_use]
    pub fn with_exit_status(mut self, exit_status: impl Into<String>) -> Self {
        self.exit_status = Some(exit_status.into());
        self
    }

    /// Exit status, falling back to the batch status name when none was set.
    pub fn effective_exit_status(&self) -> String {
        self.exit_status
            .clone()
            .unwrap_or_else(|| self.batch_status.as_str().to_string())
    }
}

/// Partitioning produced by a partition mapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionPlan {
    pub partitions: usize,
    /// Concurrency limit; `None` means one thread per partition
    pub threads: Option<usize>,
    /// Whether the plan replaces the one recorded by a previous run on restart
    pub partitions_override: bool,
    /// Per-partition property lists, indexed by partition number
    pub partition_properties: Vec<Vec<Property>>,
}

impl PartitionPlan {
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    #[must_use]
    pub fn with_partition_properties(mut self, properties: Vec<Vec<Property>>) -> Self {
        self.partition_properties = properties;
        self
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(self.partitions)
    }

    pub fn properties_for(&self, partition: usize) -> &[Property] {
        self.partition_properties
            .get(partition)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
