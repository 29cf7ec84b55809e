//! Capability contracts artifacts implement.
//!
//! Listener callbacks default to no-ops so a handler only overrides the events
//! it cares about. Artifact contracts leave their core operation required.
//!
//! Every method takes `&self`: one artifact instance is shared by all proxies
//! built for it during a job run, so stateful handlers keep their state behind
//! interior mutability.

use crate::error::{HandlerError, HandlerResult};
use crate::model::{BatchStatus, Item, PartitionPlan, PartitionReducerStatus, StepOutcome};
use serde_json::Value;
use std::fmt;

pub trait JobListener: Send + Sync + fmt::Debug {
    fn before_job(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn after_job(&self) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait StepListener: Send + Sync + fmt::Debug {
    fn before_step(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn after_step(&self) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait ChunkListener: Send + Sync + fmt::Debug {
    fn before_chunk(&self) -> HandlerResult<()> {
        Ok(())
    }

    /// Called when the chunk is about to roll back because of `error`.
    fn on_error(&self, _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }

    fn after_chunk(&self) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait ItemReadListener: Send + Sync + fmt::Debug {
    fn before_read(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn after_read(&self, _item: &Item) -> HandlerResult<()> {
        Ok(())
    }

    fn on_read_error(&self, _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait ItemProcessListener: Send + Sync + fmt::Debug {
    fn before_process(&self, _item: &Item) -> HandlerResult<()> {
        Ok(())
    }

    /// `result` is `None` when the processor filtered the item out.
    fn after_process(&self, _item: &Item, _result: Option<&Item>) -> HandlerResult<()> {
        Ok(())
    }

    fn on_process_error(&self, _item: &Item, _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait ItemWriteListener: Send + Sync + fmt::Debug {
    fn before_write(&self, _items: &[Item]) -> HandlerResult<()> {
        Ok(())
    }

    fn after_write(&self, _items: &[Item]) -> HandlerResult<()> {
        Ok(())
    }

    fn on_write_error(&self, _items: &[Item], _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait SkipReadListener: Send + Sync + fmt::Debug {
    fn on_skip_read_item(&self, _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait SkipProcessListener: Send + Sync + fmt::Debug {
    fn on_skip_process_item(&self, _item: &Item, _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait SkipWriteListener: Send + Sync + fmt::Debug {
    fn on_skip_write_item(&self, _items: &[Item], _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait RetryReadListener: Send + Sync + fmt::Debug {
    fn on_retry_read_exception(&self, _error: &HandlerError) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait RetryProcessListener: Send + Sync + fmt::Debug {
    fn on_retry_process_exception(
        &self,
        _item: &Item,
        _error: &HandlerError,
    ) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait RetryWriteListener: Send + Sync + fmt::Debug {
    fn on_retry_write_exception(
        &self,
        _items: &[Item],
        _error: &HandlerError,
    ) -> HandlerResult<()> {
        Ok(())
    }
}

/// Chooses the next transition at a decision point.
pub trait Decider: Send + Sync + fmt::Debug {
    /// Returns the exit status used to select the next transition.
    fn decide(&self, executions: &[StepOutcome]) -> HandlerResult<String>;
}

/// A self-contained unit of work run once per step execution.
pub trait Tasklet: Send + Sync + fmt::Debug {
    /// Runs the work and returns its exit status.
    fn process(&self) -> HandlerResult<String>;

    fn stop(&self) -> HandlerResult<()> {
        Ok(())
    }
}

/// Custom checkpoint policy for chunk steps.
pub trait CheckpointAlgorithm: Send + Sync + fmt::Debug {
    /// Transaction timeout in seconds for the next chunk; `0` means the driver default.
    fn checkpoint_timeout(&self) -> HandlerResult<u64> {
        Ok(0)
    }

    fn begin_checkpoint(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn is_ready_to_checkpoint(&self) -> HandlerResult<bool>;

    fn end_checkpoint(&self) -> HandlerResult<()> {
        Ok(())
    }
}

pub trait ItemReader: Send + Sync + fmt::Debug {
    /// `checkpoint` is the value last returned by `checkpoint_info` on restart.
    fn open(&self, _checkpoint: Option<&Value>) -> HandlerResult<()> {
        Ok(())
    }

    fn close(&self) -> HandlerResult<()> {
        Ok(())
    }

    /// Next item, or `None` once the input is exhausted.
    fn read_item(&self) -> HandlerResult<Option<Item>>;

    fn checkpoint_info(&self) -> HandlerResult<Option<Value>> {
        Ok(None)
    }
}

pub trait ItemProcessor: Send + Sync + fmt::Debug {
    /// Transform one item. `None` filters the item out of the chunk.
    fn process_item(&self, item: &Item) -> HandlerResult<Option<Item>>;
}

pub trait ItemWriter: Send + Sync + fmt::Debug {
    fn open(&self, _checkpoint: Option<&Value>) -> HandlerResult<()> {
        Ok(())
    }

    fn close(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn write_items(&self, items: &[Item]) -> HandlerResult<()>;

    fn checkpoint_info(&self) -> HandlerResult<Option<Value>> {
        Ok(None)
    }
}

pub trait PartitionMapper: Send + Sync + fmt::Debug {
    fn map_partitions(&self) -> HandlerResult<PartitionPlan>;
}

pub trait PartitionReducer: Send + Sync + fmt::Debug {
    fn begin_partitioned_step(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn before_partitioned_step_completion(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn rollback_partitioned_step(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn after_partitioned_step_completion(
        &self,
        _status: PartitionReducerStatus,
    ) -> HandlerResult<()> {
        Ok(())
    }
}

/// Runs on the main step thread and consumes what partition collectors sent.
pub trait PartitionAnalyzer: Send + Sync + fmt::Debug {
    fn analyze_collector_data(&self, _data: &Value) -> HandlerResult<()> {
        Ok(())
    }

    fn analyze_status(&self, _batch_status: BatchStatus, _exit_status: &str) -> HandlerResult<()> {
        Ok(())
    }
}

/// Runs on each partition thread and emits data for the analyzer.
pub trait PartitionCollector: Send + Sync + fmt::Debug {
    fn collect_partition_data(&self) -> HandlerResult<Option<Value>>;
}
