//! # Capabilities
//!
//! The contracts a pluggable artifact may implement, the kind tags used to
//! classify them, and the bundle a loader returns for one artifact instance.
//!
//! ## Overview
//!
//! Classification happens once, when an artifact is resolved: the loader hands
//! back a [`Capabilities`] bundle and its [`CapabilitySet`] is cached next to
//! it. Call sites never probe the concrete type again.
//!
//! ```text
//! ArtifactLoader::resolve(id) ──► Capabilities ──► CapabilitySet (cached)
//!                                      │
//!                                      └──► Arc<dyn ChunkListener>, Arc<dyn ItemWriter>, ...
//! ```

pub mod capabilities;
pub mod kinds;
pub mod traits;

pub use capabilities::Capabilities;
pub use kinds::{CapabilityKind, CapabilitySet};
pub use traits::{
    CheckpointAlgorithm, ChunkListener, Decider, ItemProcessListener, ItemProcessor,
    ItemReadListener, ItemReader, ItemWriteListener, ItemWriter, JobListener, PartitionAnalyzer,
    PartitionCollector, PartitionMapper, PartitionReducer, RetryProcessListener,
    RetryReadListener, RetryWriteListener, SkipProcessListener, SkipReadListener,
    SkipWriteListener, StepListener, Tasklet,
};
