//! Recording handlers and a counting loader shared by the integration tests.

use dashmap::DashMap;
use handler_dispatch::capability::*;
use handler_dispatch::context::InjectionContext;
use handler_dispatch::error::{HandlerError, HandlerResult, LoadError};
use handler_dispatch::model::{
    BatchStatus, Item, PartitionPlan, PartitionReducerStatus, StepOutcome,
};
use handler_dispatch::registry::{ArtifactLoader, ExplicitArtifactRegistry};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Ordered log of `"<listener>:<callback>"` entries.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{listener} refused {callback}")]
pub struct ListenerRefused {
    pub listener: String,
    pub callback: &'static str,
}

/// Listener implementing every listener contract; logs each callback and
/// fails the one named by `fail_on`.
#[derive(Debug)]
pub struct RecordingListener {
    pub name: String,
    pub log: CallLog,
    pub fail_on: Option<&'static str>,
}

impl RecordingListener {
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, callback: &'static str) -> Self {
        self.fail_on = Some(callback);
        self
    }

    fn record(&self, callback: &'static str) -> HandlerResult<()> {
        self.log.push(format!("{}:{}", self.name, callback));
        if self.fail_on == Some(callback) {
            return Err(ListenerRefused {
                listener: self.name.clone(),
                callback,
            }
            .into());
        }
        Ok(())
    }
}

impl JobListener for RecordingListener {
    fn before_job(&self) -> HandlerResult<()> {
        self.record("before_job")
    }

    fn after_job(&self) -> HandlerResult<()> {
        self.record("after_job")
    }
}

impl StepListener for RecordingListener {
    fn before_step(&self) -> HandlerResult<()> {
        self.record("before_step")
    }

    fn after_step(&self) -> HandlerResult<()> {
        self.record("after_step")
    }
}

impl ChunkListener for RecordingListener {
    fn before_chunk(&self) -> HandlerResult<()> {
        self.record("before_chunk")
    }

    fn on_error(&self, _error: &HandlerError) -> HandlerResult<()> {
        self.record("on_error")
    }

    fn after_chunk(&self) -> HandlerResult<()> {
        self.record("after_chunk")
    }
}

impl ItemReadListener for RecordingListener {
    fn after_read(&self, _item: &Item) -> HandlerResult<()> {
        self.record("after_read")
    }
}

impl ItemProcessListener for RecordingListener {
    fn before_process(&self, _item: &Item) -> HandlerResult<()> {
        self.record("before_process")
    }
}

impl ItemWriteListener for RecordingListener {
    fn before_write(&self, _items: &[Item]) -> HandlerResult<()> {
        self.record("before_write")
    }

    fn after_write(&self, _items: &[Item]) -> HandlerResult<()> {
        self.record("after_write")
    }
}

impl SkipReadListener for RecordingListener {
    fn on_skip_read_item(&self, _error: &HandlerError) -> HandlerResult<()> {
        self.record("on_skip_read_item")
    }
}

impl SkipProcessListener for RecordingListener {
    fn on_skip_process_item(&self, _item: &Item, _error: &HandlerError) -> HandlerResult<()> {
        self.record("on_skip_process_item")
    }
}

impl SkipWriteListener for RecordingListener {
    fn on_skip_write_item(&self, _items: &[Item], _error: &HandlerError) -> HandlerResult<()> {
        self.record("on_skip_write_item")
    }
}

impl RetryReadListener for RecordingListener {
    fn on_retry_read_exception(&self, _error: &HandlerError) -> HandlerResult<()> {
        self.record("on_retry_read_exception")
    }
}

impl RetryProcessListener for RecordingListener {
    fn on_retry_process_exception(&self, _item: &Item, _error: &HandlerError) -> HandlerResult<()> {
        self.record("on_retry_process_exception")
    }
}

impl RetryWriteListener for RecordingListener {
    fn on_retry_write_exception(
        &self,
        _items: &[Item],
        _error: &HandlerError,
    ) -> HandlerResult<()> {
        self.record("on_retry_write_exception")
    }
}

/// Every listener capability of one shared instance.
pub fn all_listener_capabilities(listener: Arc<RecordingListener>) -> Capabilities {
    Capabilities::new()
        .with_job_listener(listener.clone())
        .with_step_listener(listener.clone())
        .with_chunk_listener(listener.clone())
        .with_item_read_listener(listener.clone())
        .with_item_process_listener(listener.clone())
        .with_item_write_listener(listener.clone())
        .with_skip_read_listener(listener.clone())
        .with_skip_process_listener(listener.clone())
        .with_skip_write_listener(listener.clone())
        .with_retry_read_listener(listener.clone())
        .with_retry_process_listener(listener.clone())
        .with_retry_write_listener(listener)
}

/// Error a processor or writer raises for an item that should be skipped.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid record {record_id}: {reason}")]
pub struct InvalidRecord {
    pub record_id: String,
    pub reason: String,
}

/// Reader, processor and writer over an in-memory list of JSON records.
///
/// Records with `"valid": false` are rejected by `process_item` and
/// `write_items` with [`InvalidRecord`]. `open` fails when
/// `fail_open` is set.
#[derive(Debug, Default)]
pub struct InMemoryPipeline {
    pub source: Mutex<Vec<Item>>,
    pub written: Mutex<Vec<Item>>,
    pub fail_open: bool,
    pub position: Mutex<usize>,
}

impl InMemoryPipeline {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            source: Mutex::new(items),
            ..Self::default()
        }
    }

    fn check(item: &Item) -> HandlerResult<()> {
        if item["valid"] == Value::Bool(false) {
            return Err(InvalidRecord {
                record_id: item["id"].as_str().unwrap_or("?").to_string(),
                reason: "marked invalid".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl ItemReader for InMemoryPipeline {
    fn open(&self, checkpoint: Option<&Value>) -> HandlerResult<()> {
        if self.fail_open {
            anyhow::bail!("source unavailable");
        }
        if let Some(position) = checkpoint.and_then(Value::as_u64) {
            *self.position.lock() = position as usize;
        }
        Ok(())
    }

    fn read_item(&self) -> HandlerResult<Option<Item>> {
        let mut position = self.position.lock();
        let item = self.source.lock().get(*position).cloned();
        if item.is_some() {
            *position += 1;
        }
        Ok(item)
    }

    fn checkpoint_info(&self) -> HandlerResult<Option<Value>> {
        Ok(Some(Value::from(*self.position.lock() as u64)))
    }
}

impl ItemProcessor for InMemoryPipeline {
    fn process_item(&self, item: &Item) -> HandlerResult<Option<Item>> {
        Self::check(item)?;
        Ok(Some(item.clone()))
    }
}

impl ItemWriter for InMemoryPipeline {
    fn close(&self) -> HandlerResult<()> {
        anyhow::bail!("flush failed on close")
    }

    fn write_items(&self, items: &[Item]) -> HandlerResult<()> {
        for item in items {
            Self::check(item)?;
        }
        self.written.lock().extend_from_slice(items);
        Ok(())
    }
}

#[derive(Debug)]
pub struct EveryNItems {
    pub n: usize,
    pub seen: Mutex<usize>,
}

impl CheckpointAlgorithm for EveryNItems {
    fn is_ready_to_checkpoint(&self) -> HandlerResult<bool> {
        let mut seen = self.seen.lock();
        *seen += 1;
        Ok(*seen % self.n == 0)
    }
}

/// Routes on the first failed step, otherwise `COMPLETED`.
#[derive(Debug)]
pub struct FailureRouter;

impl Decider for FailureRouter {
    fn decide(&self, executions: &[StepOutcome]) -> HandlerResult<String> {
        Ok(executions
            .iter()
            .find(|o| o.batch_status == BatchStatus::Failed)
            .map(|o| format!("RETRY_{}", o.step_name.to_uppercase()))
            .unwrap_or_else(|| "COMPLETED".to_string()))
    }
}

#[derive(Debug)]
pub struct EchoTasklet {
    pub exit_status: String,
}

impl Tasklet for EchoTasklet {
    fn process(&self) -> HandlerResult<String> {
        Ok(self.exit_status.clone())
    }

    fn stop(&self) -> HandlerResult<()> {
        anyhow::bail!("tasklet cannot be stopped")
    }
}

/// Partition mapper, reducer, analyzer and collector in one instance.
#[derive(Debug, Default)]
pub struct RangePartitioner {
    pub partitions: usize,
    pub events: CallLog,
}

impl PartitionMapper for RangePartitioner {
    fn map_partitions(&self) -> HandlerResult<PartitionPlan> {
        Ok(PartitionPlan::new(self.partitions).with_threads(2))
    }
}

impl PartitionReducer for RangePartitioner {
    fn begin_partitioned_step(&self) -> HandlerResult<()> {
        self.events.push("begin".to_string());
        Ok(())
    }

    fn rollback_partitioned_step(&self) -> HandlerResult<()> {
        anyhow::bail!("nothing to roll back")
    }

    fn after_partitioned_step_completion(
        &self,
        status: PartitionReducerStatus,
    ) -> HandlerResult<()> {
        self.events.push(format!("after:{status:?}"));
        Ok(())
    }
}

impl PartitionAnalyzer for RangePartitioner {
    fn analyze_collector_data(&self, data: &Value) -> HandlerResult<()> {
        self.events.push(format!("data:{data}"));
        Ok(())
    }

    fn analyze_status(&self, batch_status: BatchStatus, exit_status: &str) -> HandlerResult<()> {
        self.events.push(format!("status:{batch_status}:{exit_status}"));
        Ok(())
    }
}

impl PartitionCollector for RangePartitioner {
    fn collect_partition_data(&self) -> HandlerResult<Option<Value>> {
        Ok(Some(Value::from(self.partitions as u64)))
    }
}

/// Loader decorator counting resolutions per id.
#[derive(Debug, Default)]
pub struct CountingLoader {
    pub inner: ExplicitArtifactRegistry,
    pub resolutions: DashMap<String, usize>,
    pub delay: Option<Duration>,
}

impl CountingLoader {
    pub fn new(inner: ExplicitArtifactRegistry) -> Self {
        Self {
            inner,
            resolutions: DashMap::new(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn count(&self, id: &str) -> usize {
        self.resolutions.get(id).map(|c| *c).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.resolutions.iter().map(|c| *c.value()).sum()
    }
}

impl ArtifactLoader for CountingLoader {
    fn resolve(
        &self,
        id: &str,
        context: &InjectionContext,
    ) -> Result<Option<Capabilities>, LoadError> {
        *self.resolutions.entry(id.to_string()).or_insert(0) += 1;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.inner.resolve(id, context)
    }
}
