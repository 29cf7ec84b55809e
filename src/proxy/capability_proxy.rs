//! The generic capability proxy and its two invocation paths.

use crate::capability::CapabilityKind;
use crate::context::ExecutionRecord;
use crate::error::{DispatchError, DispatchResult, HandlerResult, RuntimeFailure, SharedError};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Wraps one artifact instance for one capability.
///
/// `T` is the capability contract (`dyn ChunkListener`, `dyn ItemWriter`, ...).
/// The operations callers invoke live in per-capability `impl` blocks; each of
/// them routes through either [`invoke_wrapped`](Self::invoke_wrapped) or
/// [`invoke_transparent`](Self::invoke_transparent).
pub struct CapabilityProxy<T: ?Sized> {
    kind: CapabilityKind,
    artifact_id: String,
    delegate: Arc<T>,
    record: Option<Arc<dyn ExecutionRecord>>,
    trace_invocations: bool,
}

impl<T: ?Sized> CapabilityProxy<T> {
    pub fn new(kind: CapabilityKind, artifact_id: impl Into<String>, delegate: Arc<T>) -> Self {
        Self {
            kind,
            artifact_id: artifact_id.into(),
            delegate,
            record: None,
            trace_invocations: false,
        }
    }

    /// Emit a trace event for every successful invocation.
    #[must_use]
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace_invocations = enabled;
        self
    }

    /// Attach the record failures are captured onto.
    ///
    /// Must be called once before the first invocation. A second call replaces
    /// the record and is logged, since it usually means a proxy outlived the
    /// step that created it.
    pub fn attach_context(&mut self, record: Arc<dyn ExecutionRecord>) {
        if let Some(existing) = &self.record {
            warn!(
                capability = %self.kind,
                artifact_id = %self.artifact_id,
                previous = existing.name(),
                replacement = record.name(),
                "Execution record re-attached to capability proxy"
            );
        }
        self.record = Some(record);
    }

    /// Builder form of [`attach_context`](Self::attach_context).
    #[must_use]
    pub fn attached_to(mut self, record: Arc<dyn ExecutionRecord>) -> Self {
        self.attach_context(record);
        self
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn is_attached(&self) -> bool {
        self.record.is_some()
    }

    pub fn record(&self) -> Option<&Arc<dyn ExecutionRecord>> {
        self.record.as_ref()
    }

    /// Whether this proxy and `other` wrap the same artifact instance.
    pub fn shares_delegate_with(&self, other: &CapabilityProxy<T>) -> bool {
        Arc::ptr_eq(&self.delegate, &other.delegate)
    }

    fn attached_record(
        &self,
        operation: &'static str,
    ) -> DispatchResult<&Arc<dyn ExecutionRecord>> {
        self.record
            .as_ref()
            .ok_or(DispatchError::ContextNotAttached {
                capability: self.kind,
                operation,
            })
    }

    fn trace_success(&self, operation: &'static str) {
        if self.trace_invocations {
            let record = self.record.as_ref().map(|r| r.name());
            trace!(
                capability = %self.kind,
                artifact_id = %self.artifact_id,
                operation,
                record = ?record,
                "Capability invocation completed"
            );
        }
    }

    /// Lifecycle path: a handler failure is recorded on the attached record and
    /// surfaced as [`DispatchError::Runtime`].
    pub(crate) fn invoke_wrapped<R>(
        &self,
        operation: &'static str,
        call: impl FnOnce(&T) -> HandlerResult<R>,
    ) -> DispatchResult<R> {
        let record = self.attached_record(operation)?;

        match call(&*self.delegate) {
            Ok(value) => {
                self.trace_success(operation);
                Ok(value)
            }
            Err(error) => {
                let cause: SharedError = Arc::new(error);
                record.set_exception(Arc::clone(&cause));
                warn!(
                    capability = %self.kind,
                    artifact_id = %self.artifact_id,
                    operation,
                    record = record.name(),
                    error = %cause,
                    "Capability invocation failed"
                );
                let failure =
                    RuntimeFailure::new(self.kind, operation, self.artifact_id.clone(), cause);
                Err(failure.into())
            }
        }
    }

    /// Data path: the handler's own error is returned untouched and the
    /// record's error slot is left to the caller's skip/retry logic.
    pub(crate) fn invoke_transparent<R>(
        &self,
        operation: &'static str,
        call: impl FnOnce(&T) -> HandlerResult<R>,
    ) -> HandlerResult<R> {
        self.attached_record(operation)?;

        let result = call(&*self.delegate);
        if result.is_ok() {
            self.trace_success(operation);
        }
        result
    }
}

impl<T: ?Sized> fmt::Debug for CapabilityProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityProxy")
            .field("kind", &self.kind)
            .field("artifact_id", &self.artifact_id)
            .field("record", &self.record.as_ref().map(|r| r.name().to_string()))
            .field("trace_invocations", &self.trace_invocations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StepExecutionRecord;

    trait Sensor: Send + Sync + fmt::Debug {
        fn poke(&self, fail: bool) -> HandlerResult<u32>;
    }

    #[derive(Debug)]
    struct Thermometer;

    #[derive(Debug, thiserror::Error)]
    #[error("sensor failed")]
    struct SensorFailed;

    impl Sensor for Thermometer {
        fn poke(&self, fail: bool) -> HandlerResult<u32> {
            if fail {
                Err(SensorFailed.into())
            } else {
                Ok(7)
            }
        }
    }

    fn proxy() -> CapabilityProxy<dyn Sensor> {
        let delegate: Arc<dyn Sensor> = Arc::new(Thermometer);
        CapabilityProxy::new(CapabilityKind::Tasklet, "sensor", delegate)
    }

    #[test]
    fn test_unattached_proxy_fails_fast() {
        let proxy = proxy();
        let error = proxy.invoke_wrapped("poke", |p| p.poke(false)).unwrap_err();
        assert!(matches!(
            error,
            DispatchError::ContextNotAttached {
                operation: "poke",
                ..
            }
        ));

        let error = proxy.invoke_transparent("poke", |p| p.poke(false)).unwrap_err();
        assert!(error.downcast_ref::<DispatchError>().is_some());
    }

    #[test]
    fn test_wrapped_records_and_wraps() {
        let record = Arc::new(StepExecutionRecord::new("step"));
        let proxy = proxy().attached_to(record.clone());

        assert_eq!(proxy.invoke_wrapped("poke", |p| p.poke(false)).unwrap(), 7);
        assert!(record.exception().is_none());

        let error = proxy.invoke_wrapped("poke", |p| p.poke(true)).unwrap_err();
        let failure = error.as_runtime_failure().expect("runtime failure");
        assert!(failure.downcast_cause_ref::<SensorFailed>().is_some());

        let recorded = record.exception().expect("recorded");
        assert!(Arc::ptr_eq(&recorded, failure.cause()));
    }

    #[test]
    fn test_transparent_passes_error_through() {
        let record = Arc::new(StepExecutionRecord::new("step"));
        let proxy = proxy().with_tracing(true).attached_to(record.clone());

        let error = proxy.invoke_transparent("poke", |p| p.poke(true)).unwrap_err();
        assert!(error.downcast_ref::<SensorFailed>().is_some());
        assert!(record.exception().is_none());
    }

    #[test]
    fn test_reattach_replaces_record() {
        let first = Arc::new(StepExecutionRecord::new("first"));
        let second = Arc::new(StepExecutionRecord::new("second"));
        let mut proxy = proxy().attached_to(first);
        proxy.attach_context(second.clone());

        assert_eq!(proxy.record().unwrap().name(), "second");
        let _ = proxy.invoke_wrapped("poke", |p| p.poke(true));
        assert!(second.exception().is_some());
    }
}
