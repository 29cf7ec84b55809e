//! # Artifact Factory
//!
//! Loads artifacts through an [`ArtifactLoader`] and hands back capability
//! proxies attached to the caller's execution record.
//!
//! ## Load Flow
//!
//! ```text
//!   create_item_reader_proxy(id, ctx, record)
//!        │
//!   ┌────▼─────────────────────┐
//!   │ load(id, ctx)            │  ContextScope::enter(ctx) ... restored on exit
//!   │   loader.resolve(id,ctx) │──► Err(LoadError)  ─► DispatchError::LoadFailed
//!   │                          │──► Ok(None)        ─► DispatchError::NullArtifact
//!   └────┬─────────────────────┘
//!        │ Capabilities
//!   ┌────▼─────────────────────┐
//!   │ pick the item reader     │──► absent          ─► DispatchError::CapabilityMismatch
//!   └────┬─────────────────────┘
//!        │
//!   CapabilityProxy::new(..).attached_to(record)
//! ```
//!
//! Load failures are propagated as-is; the factory never retries.

use super::loader::ArtifactLoader;
use crate::capability::{Capabilities, CapabilityKind};
use crate::config::DispatchConfig;
use crate::context::{ContextScope, ExecutionRecord, InjectionContext};
use crate::error::{DispatchError, DispatchResult};
use crate::logging::{log_artifact_operation, log_error};
use crate::model::{ArtifactDeclaration, ChunkDefinition, PartitionDefinition};
use crate::proxy::{
    CapabilityProxy, CheckpointAlgorithmProxy, DeciderProxy, ItemProcessorProxy,
    ItemReaderProxy, ItemWriterProxy, PartitionAnalyzerProxy, PartitionCollectorProxy,
    PartitionMapperProxy, PartitionReducerProxy, TaskletProxy,
};
use std::sync::Arc;
use tracing::{debug, instrument};

type ProxyConstructor<P> = fn(
    &ArtifactFactory,
    &str,
    &InjectionContext,
    Arc<dyn ExecutionRecord>,
) -> DispatchResult<P>;

/// Builds capability proxies for declared artifact ids.
///
/// Cheap to clone; clones share the loader.
#[derive(Debug, Clone)]
pub struct ArtifactFactory {
    loader: Arc<dyn ArtifactLoader>,
    trace_invocations: bool,
}

macro_rules! artifact_proxy_constructors {
    ($($(#[$doc:meta])* $name:ident => $getter:ident, $kind:ident, $proxy:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(
                &self,
                id: &str,
                context: &InjectionContext,
                record: Arc<dyn ExecutionRecord>,
            ) -> DispatchResult<$proxy> {
                let capabilities = self.load(id, context)?;
                let delegate = capabilities.$getter().ok_or_else(|| {
                    DispatchError::CapabilityMismatch {
                        id: id.to_string(),
                        expected: CapabilityKind::$kind,
                    }
                })?;
                Ok(self.wrap(CapabilityKind::$kind, id, delegate, record))
            }
        )*
    };
}

impl ArtifactFactory {
    pub fn new(loader: Arc<dyn ArtifactLoader>) -> Self {
        Self {
            loader,
            trace_invocations: false,
        }
    }

    /// Factory whose proxies follow the invocation tracing setting of `config`.
    pub fn with_config(loader: Arc<dyn ArtifactLoader>, config: &DispatchConfig) -> Self {
        Self {
            loader,
            trace_invocations: config.trace_invocations,
        }
    }

    pub fn loader(&self) -> &Arc<dyn ArtifactLoader> {
        &self.loader
    }

    pub fn trace_invocations(&self) -> bool {
        self.trace_invocations
    }

    /// Resolve `id` under `context`.
    ///
    /// `context` is handed to the loader and also published through
    /// [`ContextScope`] for the duration of the call, so property injection
    /// code can reach it with
    /// [`current_injection_context`](crate::context::current_injection_context).
    #[instrument(skip(self, id, context), fields(artifact_id = %id))]
    pub fn load(&self, id: &str, context: &InjectionContext) -> DispatchResult<Capabilities> {
        let _scope = ContextScope::enter(context.clone());

        let resolved = self.loader.resolve(id, context).map_err(|source| {
            log_error(
                "ArtifactFactory",
                "load",
                &source.to_string(),
                Some(id),
            );
            DispatchError::LoadFailed {
                id: id.to_string(),
                source,
            }
        })?;

        match resolved {
            Some(capabilities) => {
                debug!(
                    artifact_id = %id,
                    kinds = %capabilities.kinds(),
                    properties = context.properties().len(),
                    "Artifact loaded"
                );
                Ok(capabilities)
            }
            None => {
                log_error(
                    "ArtifactFactory",
                    "load",
                    "loader produced no artifact",
                    Some(id),
                );
                Err(DispatchError::NullArtifact { id: id.to_string() })
            }
        }
    }

    /// Wrap an already-loaded handler and attach `record`.
    pub fn wrap<T: ?Sized>(
        &self,
        kind: CapabilityKind,
        id: &str,
        delegate: Arc<T>,
        record: Arc<dyn ExecutionRecord>,
    ) -> CapabilityProxy<T> {
        CapabilityProxy::new(kind, id, delegate)
            .with_tracing(self.trace_invocations)
            .attached_to(record)
    }

    artifact_proxy_constructors! {
        /// Proxy for the decider of a decision element.
        create_decider_proxy => decider, Decider, DeciderProxy;
        create_tasklet_proxy => tasklet, Tasklet, TaskletProxy;
        create_checkpoint_algorithm_proxy =>
            checkpoint_algorithm, CheckpointAlgorithm, CheckpointAlgorithmProxy;
        create_item_reader_proxy => item_reader, ItemReader, ItemReaderProxy;
        /// Proxy for an item processor. `process_item` failures on this proxy
        /// are returned unwrapped.
        create_item_processor_proxy => item_processor, ItemProcessor, ItemProcessorProxy;
        /// Proxy for an item writer. `write_items` failures on this proxy are
        /// returned unwrapped.
        create_item_writer_proxy => item_writer, ItemWriter, ItemWriterProxy;
        create_partition_mapper_proxy => partition_mapper, PartitionMapper, PartitionMapperProxy;
        create_partition_reducer_proxy =>
            partition_reducer, PartitionReducer, PartitionReducerProxy;
        create_partition_analyzer_proxy =>
            partition_analyzer, PartitionAnalyzer, PartitionAnalyzerProxy;
        create_partition_collector_proxy =>
            partition_collector, PartitionCollector, PartitionCollectorProxy;
    }

    /// Build every artifact of a chunk step.
    ///
    /// Each declaration is loaded with its own properties. The proxies attach
    /// to the step record carried by `context`.
    pub fn chunk_artifacts(
        &self,
        chunk: &ChunkDefinition,
        context: &InjectionContext,
    ) -> DispatchResult<ChunkArtifacts> {
        let record = require_step_record(context, "chunk_artifacts")?;
        let mut context = context.clone();

        let reader = self.create_from(
            &chunk.reader,
            &mut context,
            &record,
            Self::create_item_reader_proxy,
        )?;
        let processor = self.create_optional(
            chunk.processor.as_ref(),
            &mut context,
            &record,
            Self::create_item_processor_proxy,
        )?;
        let writer = self.create_from(
            &chunk.writer,
            &mut context,
            &record,
            Self::create_item_writer_proxy,
        )?;
        let checkpoint_algorithm = self.create_optional(
            chunk.checkpoint_algorithm.as_ref(),
            &mut context,
            &record,
            Self::create_checkpoint_algorithm_proxy,
        )?;

        Ok(ChunkArtifacts {
            reader,
            processor,
            writer,
            checkpoint_algorithm,
        })
    }

    /// Build the declared partition artifacts of a partitioned step.
    pub fn partition_artifacts(
        &self,
        partition: &PartitionDefinition,
        context: &InjectionContext,
    ) -> DispatchResult<PartitionArtifacts> {
        let record = require_step_record(context, "partition_artifacts")?;
        let mut context = context.clone();

        Ok(PartitionArtifacts {
            mapper: self.create_optional(
                partition.mapper.as_ref(),
                &mut context,
                &record,
                Self::create_partition_mapper_proxy,
            )?,
            reducer: self.create_optional(
                partition.reducer.as_ref(),
                &mut context,
                &record,
                Self::create_partition_reducer_proxy,
            )?,
            analyzer: self.create_optional(
                partition.analyzer.as_ref(),
                &mut context,
                &record,
                Self::create_partition_analyzer_proxy,
            )?,
            collector: self.create_optional(
                partition.collector.as_ref(),
                &mut context,
                &record,
                Self::create_partition_collector_proxy,
            )?,
        })
    }

    fn create_from<P>(
        &self,
        declaration: &ArtifactDeclaration,
        context: &mut InjectionContext,
        record: &Arc<dyn ExecutionRecord>,
        create: ProxyConstructor<P>,
    ) -> DispatchResult<P> {
        context.set_properties(declaration.properties.clone());
        let proxy = create(self, &declaration.id, context, Arc::clone(record))?;
        log_artifact_operation(
            "create_proxy",
            &declaration.id,
            None,
            "attached",
            Some(record.name()),
        );
        Ok(proxy)
    }

    fn create_optional<P>(
        &self,
        declaration: Option<&ArtifactDeclaration>,
        context: &mut InjectionContext,
        record: &Arc<dyn ExecutionRecord>,
        create: ProxyConstructor<P>,
    ) -> DispatchResult<Option<P>> {
        declaration
            .map(|d| self.create_from(d, context, record, create))
            .transpose()
    }
}

/// The step record carried by `context`, or `MissingStepRecord`.
pub fn require_step_record(
    context: &InjectionContext,
    operation: &'static str,
) -> DispatchResult<Arc<dyn ExecutionRecord>> {
    context
        .step_record()
        .cloned()
        .ok_or(DispatchError::MissingStepRecord { operation })
}

/// Proxies for the artifacts of one chunk step.
#[derive(Debug)]
pub struct ChunkArtifacts {
    pub reader: ItemReaderProxy,
    pub processor: Option<ItemProcessorProxy>,
    pub writer: ItemWriterProxy,
    pub checkpoint_algorithm: Option<CheckpointAlgorithmProxy>,
}

/// Proxies for the declared artifacts of one partitioned step.
#[derive(Debug)]
pub struct PartitionArtifacts {
    pub mapper: Option<PartitionMapperProxy>,
    pub reducer: Option<PartitionReducerProxy>,
    pub analyzer: Option<PartitionAnalyzerProxy>,
    pub collector: Option<PartitionCollectorProxy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{ItemReader, ItemWriter, Tasklet};
    use crate::context::{current_injection_context, JobContext, StepExecutionRecord};
    use crate::error::{HandlerResult, LoadError};
    use crate::model::{Item, Property};
    use crate::registry::ExplicitArtifactRegistry;
    use parking_lot::Mutex;
    use std::fmt;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Captures the level and message of every event.
    #[derive(Clone, Default)]
    struct EventCapture {
        events: Arc<Mutex<Vec<(Level, String)>>>,
    }

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for EventCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.events.lock().push((*event.metadata().level(), visitor.0));
        }
    }

    #[derive(Debug, Default)]
    struct ContextEcho {
        seen_property: Mutex<Option<String>>,
    }

    impl Tasklet for ContextEcho {
        fn process(&self) -> HandlerResult<String> {
            Ok(self
                .seen_property
                .lock()
                .clone()
                .unwrap_or_else(|| "unset".to_string()))
        }
    }

    #[derive(Debug)]
    struct Lines;

    impl ItemReader for Lines {
        fn read_item(&self) -> HandlerResult<Option<Item>> {
            Ok(None)
        }
    }

    impl ItemWriter for Lines {
        fn write_items(&self, _items: &[Item]) -> HandlerResult<()> {
            Ok(())
        }
    }

    fn registry() -> Arc<ExplicitArtifactRegistry> {
        let registry = Arc::new(ExplicitArtifactRegistry::new());
        registry.register("context_echo", |_| {
            // Injection code reading the published context instead of the parameter.
            let echo = ContextEcho::default();
            *echo.seen_property.lock() = current_injection_context()
                .and_then(|ctx| ctx.property("mode").map(str::to_string));
            Capabilities::new().with_tasklet(Arc::new(echo))
        });
        registry.register("lines", |_| {
            let lines = Arc::new(Lines);
            Capabilities::new()
                .with_item_reader(lines.clone())
                .with_item_writer(lines)
        });
        registry.register_fallible("ghost", |_| Ok(None));
        registry.register_fallible("broken", |_| Err(LoadError::new("broken", "no such class")));
        registry
    }

    fn step_context() -> (Arc<StepExecutionRecord>, InjectionContext) {
        let record = Arc::new(StepExecutionRecord::new("load"));
        let context = InjectionContext::for_step(Arc::new(JobContext::new("job")), record.clone());
        (record, context)
    }

    #[test]
    fn test_load_publishes_context_during_resolution() {
        let factory = ArtifactFactory::new(registry());
        let (record, context) = step_context();
        let context = context.with_properties(vec![Property::new("mode", "fast")]);

        let tasklet = factory.create_tasklet_proxy("context_echo", &context, record).unwrap();
        assert_eq!(tasklet.process().unwrap(), "fast");
        assert!(current_injection_context().is_none());
    }

    #[test]
    fn test_load_error_variants() {
        let factory = ArtifactFactory::new(registry());
        let (record, context) = step_context();

        let ghost = factory.create_tasklet_proxy("ghost", &context, record.clone()).unwrap_err();
        assert!(matches!(ghost, DispatchError::NullArtifact { ref id } if id == "ghost"));

        let broken = factory.create_tasklet_proxy("broken", &context, record.clone()).unwrap_err();
        match broken {
            DispatchError::LoadFailed { id, source } => {
                assert_eq!(id, "broken");
                assert_eq!(source.message, "no such class");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mismatch = factory.create_tasklet_proxy("lines", &context, record).unwrap_err();
        assert!(matches!(
            mismatch,
            DispatchError::CapabilityMismatch {
                expected: CapabilityKind::Tasklet,
                ..
            }
        ));
        assert!(current_injection_context().is_none());
    }

    #[test]
    fn test_null_artifact_is_logged_as_error() {
        let factory = ArtifactFactory::new(registry());
        let (record, context) = step_context();
        let capture = EventCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        let result = tracing::subscriber::with_default(subscriber, || {
            factory.create_tasklet_proxy("ghost", &context, record)
        });

        assert!(matches!(result, Err(DispatchError::NullArtifact { .. })));
        let events = capture.events.lock();
        assert!(events
            .iter()
            .any(|(level, message)| *level == Level::ERROR && message == "ERROR"));
        assert!(events.iter().all(|(level, _)| *level != Level::INFO));
    }

    #[test]
    fn test_chunk_artifacts_require_step_record() {
        let factory = ArtifactFactory::new(registry());
        let chunk = ChunkDefinition::new(
            ArtifactDeclaration::new("lines"),
            ArtifactDeclaration::new("lines"),
        );

        let job_only = InjectionContext::new(Arc::new(JobContext::new("job")));
        let error = factory.chunk_artifacts(&chunk, &job_only).unwrap_err();
        assert!(matches!(
            error,
            DispatchError::MissingStepRecord {
                operation: "chunk_artifacts"
            }
        ));

        let (_record, context) = step_context();
        let artifacts = factory.chunk_artifacts(&chunk, &context).unwrap();
        assert_eq!(artifacts.reader.kind(), CapabilityKind::ItemReader);
        assert_eq!(artifacts.writer.kind(), CapabilityKind::ItemWriter);
        assert!(artifacts.processor.is_none());
        assert!(artifacts.reader.is_attached());
    }
}
