//! Job-level context shared, read-mostly, by every step of one job run.

use super::record::ExecutionRecord;
use crate::error::SharedError;
use crate::model::{find_property, Property};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
pub struct JobContext {
    job_name: String,
    execution_id: Uuid,
    started_at: DateTime<Utc>,
    properties: Vec<Property>,
    exit_status: Mutex<Option<String>>,
    exception: Mutex<Option<SharedError>>,
}

impl JobContext {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            execution_id: Uuid::new_v4(),
            started_at: Utc::now(),
            properties: Vec::new(),
            exit_status: Mutex::new(None),
            exception: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        find_property(&self.properties, name)
    }

    pub fn exit_status(&self) -> Option<String> {
        self.exit_status.lock().clone()
    }

    pub fn set_exit_status(&self, exit_status: impl Into<String>) {
        *self.exit_status.lock() = Some(exit_status.into());
    }
}

impl ExecutionRecord for JobContext {
    fn name(&self) -> &str {
        &self.job_name
    }

    fn set_exception(&self, error: SharedError) {
        debug!(
            job_name = %self.job_name,
            execution_id = %self.execution_id,
            error = %error,
            "Recording exception on job execution"
        );
        *self.exception.lock() = Some(error);
    }

    fn exception(&self) -> Option<SharedError> {
        self.exception.lock().clone()
    }
}
