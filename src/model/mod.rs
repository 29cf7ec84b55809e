//! # Declarative Model
//!
//! Job and step declarations consumed by the dispatch layer, plus the value
//! types artifacts exchange with the step driver.

pub mod declaration;
pub mod status;

pub use declaration::{
    find_property, ArtifactDeclaration, ChunkDefinition, DecisionDefinition, JobDefinition,
    PartitionDefinition, Property, StepDefinition,
};
pub use status::{BatchStatus, PartitionPlan, PartitionReducerStatus, StepOutcome};

/// Items flowing through readers, processors and writers.
pub type Item = serde_json::Value;
