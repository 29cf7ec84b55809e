//! Capability kinds and the tagged capability set computed once per resolved artifact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named contract an artifact may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    // Listeners
    JobListener,
    StepListener,
    ChunkListener,
    ItemReadListener,
    ItemProcessListener,
    ItemWriteListener,
    SkipReadListener,
    SkipProcessListener,
    SkipWriteListener,
    RetryReadListener,
    RetryProcessListener,
    RetryWriteListener,

    // Artifacts
    Decider,
    Tasklet,
    CheckpointAlgorithm,
    ItemReader,
    ItemProcessor,
    ItemWriter,
    PartitionMapper,
    PartitionReducer,
    PartitionAnalyzer,
    PartitionCollector,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 22] = [
        CapabilityKind::JobListener,
        CapabilityKind::StepListener,
        CapabilityKind::ChunkListener,
        CapabilityKind::ItemReadListener,
        CapabilityKind::ItemProcessListener,
        CapabilityKind::ItemWriteListener,
        CapabilityKind::SkipReadListener,
        CapabilityKind::SkipProcessListener,
        CapabilityKind::SkipWriteListener,
        CapabilityKind::RetryReadListener,
        CapabilityKind::RetryProcessListener,
        CapabilityKind::RetryWriteListener,
        CapabilityKind::Decider,
        CapabilityKind::Tasklet,
        CapabilityKind::CheckpointAlgorithm,
        CapabilityKind::ItemReader,
        CapabilityKind::ItemProcessor,
        CapabilityKind::ItemWriter,
        CapabilityKind::PartitionMapper,
        CapabilityKind::PartitionReducer,
        CapabilityKind::PartitionAnalyzer,
        CapabilityKind::PartitionCollector,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::JobListener => "JobListener",
            CapabilityKind::StepListener => "StepListener",
            CapabilityKind::ChunkListener => "ChunkListener",
            CapabilityKind::ItemReadListener => "ItemReadListener",
            CapabilityKind::ItemProcessListener => "ItemProcessListener",
            CapabilityKind::ItemWriteListener => "ItemWriteListener",
            CapabilityKind::SkipReadListener => "SkipReadListener",
            CapabilityKind::SkipProcessListener => "SkipProcessListener",
            CapabilityKind::SkipWriteListener => "SkipWriteListener",
            CapabilityKind::RetryReadListener => "RetryReadListener",
            CapabilityKind::RetryProcessListener => "RetryProcessListener",
            CapabilityKind::RetryWriteListener => "RetryWriteListener",
            CapabilityKind::Decider => "Decider",
            CapabilityKind::Tasklet => "Tasklet",
            CapabilityKind::CheckpointAlgorithm => "CheckpointAlgorithm",
            CapabilityKind::ItemReader => "ItemReader",
            CapabilityKind::ItemProcessor => "ItemProcessor",
            CapabilityKind::ItemWriter => "ItemWriter",
            CapabilityKind::PartitionMapper => "PartitionMapper",
            CapabilityKind::PartitionReducer => "PartitionReducer",
            CapabilityKind::PartitionAnalyzer => "PartitionAnalyzer",
            CapabilityKind::PartitionCollector => "PartitionCollector",
        }
    }

    /// Listener capabilities are the ones served by the listener catalog.
    pub fn is_listener(&self) -> bool {
        matches!(
            self,
            CapabilityKind::JobListener
                | CapabilityKind::StepListener
                | CapabilityKind::ChunkListener
                | CapabilityKind::ItemReadListener
                | CapabilityKind::ItemProcessListener
                | CapabilityKind::ItemWriteListener
                | CapabilityKind::SkipReadListener
                | CapabilityKind::SkipProcessListener
                | CapabilityKind::SkipWriteListener
                | CapabilityKind::RetryReadListener
                | CapabilityKind::RetryProcessListener
                | CapabilityKind::RetryWriteListener
        )
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capability kinds an artifact implements.
///
/// Computed once when the artifact is resolved; membership tests afterwards
/// are a single mask check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: CapabilityKind) {
        self.bits |= kind.bit();
    }

    #[must_use]
    pub fn with(mut self, kind: CapabilityKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn contains(&self, kind: CapabilityKind) -> bool {
        self.bits & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Kinds in the set, in declaration order of [`CapabilityKind`].
    pub fn iter(&self) -> impl Iterator<Item = CapabilityKind> + '_ {
        CapabilityKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(*kind))
    }

    /// Whether any listener capability is present.
    pub fn has_listener(&self) -> bool {
        self.iter().any(|kind| kind.is_listener())
    }
}

impl FromIterator<CapabilityKind> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = CapabilityKind>>(iter: I) -> Self {
        let mut set = CapabilitySet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|kind| kind.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
