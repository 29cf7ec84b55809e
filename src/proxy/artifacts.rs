//! Artifact proxies.
//!
//! `ItemProcessor::process_item` and `ItemWriter::write_items` are the data
//! path: their errors reach the caller unchanged so skip and retry policies
//! can classify them. Everything else is a lifecycle method.

use super::CapabilityProxy;
use crate::capability::{
    CheckpointAlgorithm, Decider, ItemProcessor, ItemReader, ItemWriter, PartitionAnalyzer,
    PartitionCollector, PartitionMapper, PartitionReducer, Tasklet,
};
use crate::error::{DispatchResult, HandlerResult};
use crate::model::{BatchStatus, Item, PartitionPlan, PartitionReducerStatus, StepOutcome};
use serde_json::Value;

pub type DeciderProxy = CapabilityProxy<dyn Decider>;
pub type TaskletProxy = CapabilityProxy<dyn Tasklet>;
pub type CheckpointAlgorithmProxy = CapabilityProxy<dyn CheckpointAlgorithm>;
pub type ItemReaderProxy = CapabilityProxy<dyn ItemReader>;
pub type ItemProcessorProxy = CapabilityProxy<dyn ItemProcessor>;
pub type ItemWriterProxy = CapabilityProxy<dyn ItemWriter>;
pub type PartitionMapperProxy = CapabilityProxy<dyn PartitionMapper>;
pub type PartitionReducerProxy = CapabilityProxy<dyn PartitionReducer>;
pub type PartitionAnalyzerProxy = CapabilityProxy<dyn PartitionAnalyzer>;
pub type PartitionCollectorProxy = CapabilityProxy<dyn PartitionCollector>;

impl CapabilityProxy<dyn Decider> {
    pub fn decide(&self, executions: &[StepOutcome]) -> DispatchResult<String> {
        self.invoke_wrapped("decide", |d| d.decide(executions))
    }
}

impl CapabilityProxy<dyn Tasklet> {
    pub fn process(&self) -> DispatchResult<String> {
        self.invoke_wrapped("process", |t| t.process())
    }

    pub fn stop(&self) -> DispatchResult<()> {
        self.invoke_wrapped("stop", |t| t.stop())
    }
}

impl CapabilityProxy<dyn CheckpointAlgorithm> {
    pub fn checkpoint_timeout(&self) -> DispatchResult<u64> {
        self.invoke_wrapped("checkpoint_timeout", |c| c.checkpoint_timeout())
    }

    pub fn begin_checkpoint(&self) -> DispatchResult<()> {
        self.invoke_wrapped("begin_checkpoint", |c| c.begin_checkpoint())
    }

    pub fn is_ready_to_checkpoint(&self) -> DispatchResult<bool> {
        self.invoke_wrapped("is_ready_to_checkpoint", |c| c.is_ready_to_checkpoint())
    }

    pub fn end_checkpoint(&self) -> DispatchResult<()> {
        self.invoke_wrapped("end_checkpoint", |c| c.end_checkpoint())
    }
}

impl CapabilityProxy<dyn ItemReader> {
    pub fn open(&self, checkpoint: Option<&Value>) -> DispatchResult<()> {
        self.invoke_wrapped("open", |r| r.open(checkpoint))
    }

    pub fn close(&self) -> DispatchResult<()> {
        self.invoke_wrapped("close", |r| r.close())
    }

    pub fn read_item(&self) -> DispatchResult<Option<Item>> {
        self.invoke_wrapped("read_item", |r| r.read_item())
    }

    pub fn checkpoint_info(&self) -> DispatchResult<Option<Value>> {
        self.invoke_wrapped("checkpoint_info", |r| r.checkpoint_info())
    }
}

impl CapabilityProxy<dyn ItemProcessor> {
    pub fn process_item(&self, item: &Item) -> HandlerResult<Option<Item>> {
        self.invoke_transparent("process_item", |p| p.process_item(item))
    }
}

impl CapabilityProxy<dyn ItemWriter> {
    pub fn open(&self, checkpoint: Option<&Value>) -> DispatchResult<()> {
        self.invoke_wrapped("open", |w| w.open(checkpoint))
    }

    pub fn close(&self) -> DispatchResult<()> {
        self.invoke_wrapped("close", |w| w.close())
    }

    pub fn write_items(&self, items: &[Item]) -> HandlerResult<()> {
        self.invoke_transparent("write_items", |w| w.write_items(items))
    }

    pub fn checkpoint_info(&self) -> DispatchResult<Option<Value>> {
        self.invoke_wrapped("checkpoint_info", |w| w.checkpoint_info())
    }
}

impl CapabilityProxy<dyn PartitionMapper> {
    pub fn map_partitions(&self) -> DispatchResult<PartitionPlan> {
        self.invoke_wrapped("map_partitions", |m| m.map_partitions())
    }
}

impl CapabilityProxy<dyn PartitionReducer> {
    pub fn begin_partitioned_step(&self) -> DispatchResult<()> {
        self.invoke_wrapped("begin_partitioned_step", |r| r.begin_partitioned_step())
    }

    pub fn before_partitioned_step_completion(&self) -> DispatchResult<()> {
        self.invoke_wrapped("before_partitioned_step_completion", |r| {
            r.before_partitioned_step_completion()
        })
    }

    pub fn rollback_partitioned_step(&self) -> DispatchResult<()> {
        self.invoke_wrapped("rollback_partitioned_step", |r| {
            r.rollback_partitioned_step()
        })
    }

    pub fn after_partitioned_step_completion(
        &self,
        status: PartitionReducerStatus,
    ) -> DispatchResult<()> {
        self.invoke_wrapped("after_partitioned_step_completion", |r| {
            r.after_partitioned_step_completion(status)
        })
    }
}

impl CapabilityProxy<dyn PartitionAnalyzer> {
    pub fn analyze_collector_data(&self, data: &Value) -> DispatchResult<()> {
        self.invoke_wrapped("analyze_collector_data", |a| a.analyze_collector_data(data))
    }

    pub fn analyze_status(
        &self,
        batch_status: BatchStatus,
        exit_status: &str,
    ) -> DispatchResult<()> {
        self.invoke_wrapped("analyze_status", |a| {
            a.analyze_status(batch_status, exit_status)
        })
    }
}

impl CapabilityProxy<dyn PartitionCollector> {
    pub fn collect_partition_data(&self) -> DispatchResult<Option<Value>> {
        self.invoke_wrapped("collect_partition_data", |c| c.collect_partition_data())
    }
}
