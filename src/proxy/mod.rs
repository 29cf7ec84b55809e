//! # Capability Proxies
//!
//! Every call into an artifact goes through a [`CapabilityProxy`], which keeps
//! the executing unit's error state current before a failure escapes.
//!
//! ## Invocation Paths
//!
//! ```text
//!                          ┌──────────────────────┐
//!   lifecycle call ───────►│ invoke_wrapped       │── Err ──► record.set_exception(e)
//!   (open, close,          │                      │           └─► DispatchError::Runtime(e)
//!    listener callbacks)   └──────────────────────┘
//!
//!                          ┌──────────────────────┐
//!   data-path call ───────►│ invoke_transparent   │── Err ──► e (unchanged, slot untouched)
//!   (process_item,         │                      │
//!    write_items)          └──────────────────────┘
//! ```
//!
//! The path is fixed per operation in the capability's `impl` block; callers
//! cannot choose it.

pub mod artifacts;
pub mod capability_proxy;
pub mod listeners;

pub use artifacts::{
    CheckpointAlgorithmProxy, DeciderProxy, ItemProcessorProxy, ItemReaderProxy, ItemWriterProxy,
    PartitionAnalyzerProxy, PartitionCollectorProxy, PartitionMapperProxy, PartitionReducerProxy,
    TaskletProxy,
};
pub use capability_proxy::CapabilityProxy;
pub use listeners::{
    ChunkListenerProxy, ItemProcessListenerProxy, ItemReadListenerProxy, ItemWriteListenerProxy,
    JobListenerProxy, RetryProcessListenerProxy, RetryReadListenerProxy, RetryWriteListenerProxy,
    SkipProcessListenerProxy, SkipReadListenerProxy, SkipWriteListenerProxy, StepListenerProxy,
};
