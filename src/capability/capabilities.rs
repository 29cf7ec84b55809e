//! The capability bundle an artifact loader hands back for one artifact instance.
//!
//! A handler that implements several contracts registers itself once per
//! contract:
//!
//! ```rust
//! use handler_dispatch::capability::{
//!     Capabilities, CapabilityKind, ChunkListener, ItemWriteListener,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Audit;
//! impl ChunkListener for Audit {}
//! impl ItemWriteListener for Audit {}
//!
//! let audit = Arc::new(Audit);
//! let capabilities = Capabilities::new()
//!     .with_chunk_listener(audit.clone())
//!     .with_item_write_listener(audit);
//!
//! assert!(capabilities.kinds().contains(CapabilityKind::ChunkListener));
//! assert!(capabilities.kinds().contains(CapabilityKind::ItemWriteListener));
//! ```

use super::kinds::{CapabilityKind, CapabilitySet};
use super::traits::*;
use std::fmt;
use std::sync::Arc;

macro_rules! capability_bundle {
    ($($field:ident, $with:ident: $contract:ident => $kind:ident;)*) => {
        /// Contracts implemented by one loaded artifact instance.
        #[derive(Clone, Default)]
        pub struct Capabilities {
            $($field: Option<Arc<dyn $contract>>,)*
        }

        impl Capabilities {
            $(
                #[must_use]
                pub fn $with(mut self, handler: Arc<dyn $contract>) -> Self {
                    self.$field = Some(handler);
                    self
                }

                pub fn $field(&self) -> Option<Arc<dyn $contract>> {
                    self.$field.clone()
                }
            )*

            /// The set of contracts present in this bundle.
            pub fn kinds(&self) -> CapabilitySet {
                let mut set = CapabilitySet::empty();
                $(
                    if self.$field.is_some() {
                        set.insert(CapabilityKind::$kind);
                    }
                )*
                set
            }
        }
    };
}

capability_bundle! {
    job_listener, with_job_listener: JobListener => JobListener;
    step_listener, with_step_listener: StepListener => StepListener;
    chunk_listener, with_chunk_listener: ChunkListener => ChunkListener;
    item_read_listener, with_item_read_listener: ItemReadListener => ItemReadListener;
    item_process_listener, with_item_process_listener: ItemProcessListener => ItemProcessListener;
    item_write_listener, with_item_write_listener: ItemWriteListener => ItemWriteListener;
    skip_read_listener, with_skip_read_listener: SkipReadListener => SkipReadListener;
    skip_process_listener, with_skip_process_listener: SkipProcessListener => SkipProcessListener;
    skip_write_listener, with_skip_write_listener: SkipWriteListener => SkipWriteListener;
    retry_read_listener, with_retry_read_listener: RetryReadListener => RetryReadListener;
    retry_process_listener, with_retry_process_listener:
        RetryProcessListener => RetryProcessListener;
    retry_write_listener, with_retry_write_listener: RetryWriteListener => RetryWriteListener;
    decider, with_decider: Decider => Decider;
    tasklet, with_tasklet: Tasklet => Tasklet;
    checkpoint_algorithm, with_checkpoint_algorithm: CheckpointAlgorithm => CheckpointAlgorithm;
    item_reader, with_item_reader: ItemReader => ItemReader;
    item_processor, with_item_processor: ItemProcessor => ItemProcessor;
    item_writer, with_item_writer: ItemWriter => ItemWriter;
    partition_mapper, with_partition_mapper: PartitionMapper => PartitionMapper;
    partition_reducer, with_partition_reducer: PartitionReducer => PartitionReducer;
    partition_analyzer, with_partition_analyzer: PartitionAnalyzer => PartitionAnalyzer;
    partition_collector, with_partition_collector: PartitionCollector => PartitionCollector;
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("kinds", &self.kinds().to_string())
            .finish()
    }
}
