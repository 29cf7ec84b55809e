//! Declarative job model: artifact declarations grouped by job and step.
//!
//! The model is read-only once parsed. A driver usually deserializes it from
//! JSON and hands it to the [`ListenerCatalog`](crate::registry::ListenerCatalog)
//! and the [`ArtifactFactory`](crate::registry::ArtifactFactory).

use crate::error::{DispatchError, DispatchResult};
use serde::{Deserialize, Serialize};

/// A single name/value configuration pair applied to a freshly loaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Look up a property by name. The last declaration wins when a name repeats.
pub fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a str> {
    properties
        .iter()
        .rev()
        .find(|p| p.name == name)
        .map(|p| p.value.as_str())
}

/// Reference to a named artifact plus the properties to inject into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDeclaration {
    /// Id resolvable by the artifact loader
    #[serde(rename = "ref")]
    pub id: String,

    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ArtifactDeclaration {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        find_property(&self.properties, name)
    }
}

/// Artifacts driving a chunk-oriented step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDefinition {
    pub reader: ArtifactDeclaration,
    #[serde(default)]
    pub processor: Option<ArtifactDeclaration>,
    pub writer: ArtifactDeclaration,
    #[serde(default)]
    pub checkpoint_algorithm: Option<ArtifactDeclaration>,
}

impl ChunkDefinition {
    pub fn new(reader: ArtifactDeclaration, writer: ArtifactDeclaration) -> Self {
        Self {
            reader,
            processor: None,
            writer,
            checkpoint_algorithm: None,
        }
    }

    #[must_use]
    pub fn with_processor(mut self, processor: ArtifactDeclaration) -> Self {
        self.processor = Some(processor);
        self
    }

    #[must_use]
    pub fn with_checkpoint_algorithm(mut self, algorithm: ArtifactDeclaration) -> Self {
        self.checkpoint_algorithm = Some(algorithm);
        self
    }
}

/// Artifacts participating in a partitioned step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDefinition {
    #[serde(default)]
    pub mapper: Option<ArtifactDeclaration>,
    #[serde(default)]
    pub reducer: Option<ArtifactDeclaration>,
    #[serde(default)]
    pub analyzer: Option<ArtifactDeclaration>,
    #[serde(default)]
    pub collector: Option<ArtifactDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,

    /// Listener declarations, in the order they must be dispatched
    #[serde(default)]
    pub listeners: Vec<ArtifactDeclaration>,

    #[serde(default)]
    pub tasklet: Option<ArtifactDeclaration>,

    #[serde(default)]
    pub chunk: Option<ChunkDefinition>,

    #[serde(default)]
    pub partition: Option<PartitionDefinition>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            listeners: Vec::new(),
            tasklet: None,
            chunk: None,
            partition: None,
        }
    }

    #[must_use]
    pub fn with_listener(mut self, declaration: ArtifactDeclaration) -> Self {
        self.listeners.push(declaration);
        self
    }

    #[must_use]
    pub fn with_tasklet(mut self, declaration: ArtifactDeclaration) -> Self {
        self.tasklet = Some(declaration);
        self
    }

    #[must_use]
    pub fn with_chunk(mut self, chunk: ChunkDefinition) -> Self {
        self.chunk = Some(chunk);
        self
    }

    #[must_use]
    pub fn with_partition(mut self, partition: PartitionDefinition) -> Self {
        self.partition = Some(partition);
        self
    }

    pub fn is_partitioned(&self) -> bool {
        self.partition.is_some()
    }
}

/// A decision point between steps, backed by a decider artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDefinition {
    pub id: String,
    pub decider: ArtifactDeclaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub id: String,

    #[serde(default)]
    pub properties: Vec<Property>,

    /// Job-scoped listener declarations
    #[serde(default)]
    pub listeners: Vec<ArtifactDeclaration>,

    #[serde(default)]
    pub steps: Vec<StepDefinition>,

    #[serde(default)]
    pub decisions: Vec<DecisionDefinition>,
}

impl JobDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Vec::new(),
            listeners: Vec::new(),
            steps: Vec::new(),
            decisions: Vec::new(),
        }
    }

    /// Parse a job definition from its JSON form.
    pub fn from_json(json: &str) -> DispatchResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            DispatchError::Configuration(format!("Invalid job definition JSON: {e}"))
        })
    }

    #[must_use]
    pub fn with_listener(mut self, declaration: ArtifactDeclaration) -> Self {
        self.listeners.push(declaration);
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn with_decision(mut self, decision: DecisionDefinition) -> Self {
        self.decisions.push(decision);
        self
    }

    pub fn step(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn decision(&self, decision_id: &str) -> Option<&DecisionDefinition> {
        self.decisions.iter().find(|d| d.id == decision_id)
    }
}
