//! Listener proxies. Every listener callback is a lifecycle method: failures
//! are recorded and wrapped.

use super::CapabilityProxy;
use crate::capability::{
    ChunkListener, ItemProcessListener, ItemReadListener, ItemWriteListener, JobListener,
    RetryProcessListener, RetryReadListener, RetryWriteListener, SkipProcessListener,
    SkipReadListener, SkipWriteListener, StepListener,
};
use crate::error::{DispatchResult, HandlerError};
use crate::model::Item;

pub type JobListenerProxy = CapabilityProxy<dyn JobListener>;
pub type StepListenerProxy = CapabilityProxy<dyn StepListener>;
pub type ChunkListenerProxy = CapabilityProxy<dyn ChunkListener>;
pub type ItemReadListenerProxy = CapabilityProxy<dyn ItemReadListener>;
pub type ItemProcessListenerProxy = CapabilityProxy<dyn ItemProcessListener>;
pub type ItemWriteListenerProxy = CapabilityProxy<dyn ItemWriteListener>;
pub type SkipReadListenerProxy = CapabilityProxy<dyn SkipReadListener>;
pub type SkipProcessListenerProxy = CapabilityProxy<dyn SkipProcessListener>;
pub type SkipWriteListenerProxy = CapabilityProxy<dyn SkipWriteListener>;
pub type RetryReadListenerProxy = CapabilityProxy<dyn RetryReadListener>;
pub type RetryProcessListenerProxy = CapabilityProxy<dyn RetryProcessListener>;
pub type RetryWriteListenerProxy = CapabilityProxy<dyn RetryWriteListener>;

impl CapabilityProxy<dyn JobListener> {
    pub fn before_job(&self) -> DispatchResult<()> {
        self.invoke_wrapped("before_job", |l| l.before_job())
    }

    pub fn after_job(&self) -> DispatchResult<()> {
        self.invoke_wrapped("after_job", |l| l.after_job())
    }
}

impl CapabilityProxy<dyn StepListener> {
    pub fn before_step(&self) -> DispatchResult<()> {
        self.invoke_wrapped("before_step", |l| l.before_step())
    }

    pub fn after_step(&self) -> DispatchResult<()> {
        self.invoke_wrapped("after_step", |l| l.after_step())
    }
}

impl CapabilityProxy<dyn ChunkListener> {
    pub fn before_chunk(&self) -> DispatchResult<()> {
        self.invoke_wrapped("before_chunk", |l| l.before_chunk())
    }

    pub fn on_error(&self, error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_error", |l| l.on_error(error))
    }

    pub fn after_chunk(&self) -> DispatchResult<()> {
        self.invoke_wrapped("after_chunk", |l| l.after_chunk())
    }
}

impl CapabilityProxy<dyn ItemReadListener> {
    pub fn before_read(&self) -> DispatchResult<()> {
        self.invoke_wrapped("before_read", |l| l.before_read())
    }

    pub fn after_read(&self, item: &Item) -> DispatchResult<()> {
        self.invoke_wrapped("after_read", |l| l.after_read(item))
    }

    pub fn on_read_error(&self, error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_read_error", |l| l.on_read_error(error))
    }
}

impl CapabilityProxy<dyn ItemProcessListener> {
    pub fn before_process(&self, item: &Item) -> DispatchResult<()> {
        self.invoke_wrapped("before_process", |l| l.before_process(item))
    }

    pub fn after_process(&self, item: &Item, result: Option<&Item>) -> DispatchResult<()> {
        self.invoke_wrapped("after_process", |l| l.after_process(item, result))
    }

    pub fn on_process_error(&self, item: &Item, error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_process_error", |l| l.on_process_error(item, error))
    }
}

impl CapabilityProxy<dyn ItemWriteListener> {
    pub fn before_write(&self, items: &[Item]) -> DispatchResult<()> {
        self.invoke_wrapped("before_write", |l| l.before_write(items))
    }

    pub fn after_write(&self, items: &[Item]) -> DispatchResult<()> {
        self.invoke_wrapped("after_write", |l| l.after_write(items))
    }

    pub fn on_write_error(&self, items: &[Item], error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_write_error", |l| l.on_write_error(items, error))
    }
}

impl CapabilityProxy<dyn SkipReadListener> {
    pub fn on_skip_read_item(&self, error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_skip_read_item", |l| l.on_skip_read_item(error))
    }
}

impl CapabilityProxy<dyn SkipProcessListener> {
    pub fn on_skip_process_item(&self, item: &Item, error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_skip_process_item", |l| {
            l.on_skip_process_item(item, error)
        })
    }
}

impl CapabilityProxy<dyn SkipWriteListener> {
    pub fn on_skip_write_item(&self, items: &[Item], error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_skip_write_item", |l| l.on_skip_write_item(items, error))
    }
}

impl CapabilityProxy<dyn RetryReadListener> {
    pub fn on_retry_read_exception(&self, error: &HandlerError) -> DispatchResult<()> {
        self.invoke_wrapped("on_retry_read_exception", |l| {
            l.on_retry_read_exception(error)
        })
    }
}

impl CapabilityProxy<dyn RetryProcessListener> {
    pub fn on_retry_process_exception(
        &self,
        item: &Item,
        error: &HandlerError,
    ) -> DispatchResult<()> {
        self.invoke_wrapped("on_retry_process_exception", |l| {
            l.on_retry_process_exception(item, error)
        })
    }
}

impl CapabilityProxy<dyn RetryWriteListener> {
    pub fn on_retry_write_exception(
        &self,
        items: &[Item],
        error: &HandlerError,
    ) -> DispatchResult<()> {
        self.invoke_wrapped("on_retry_write_exception", |l| {
            l.on_retry_write_exception(items, error)
        })
    }
}
