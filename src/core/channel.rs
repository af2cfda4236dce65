//! Channel: a named driver with a minimum level and private context

use super::{
    driver::Driver, entry::Entry, error::Result, level::Level, metrics::ChannelMetrics,
    value::Context,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// A named binding of one driver, a minimum level and a private context.
///
/// Channels are built and cached by a [`Manager`](crate::Manager); the driver
/// is fixed for the channel's lifetime.
pub struct Channel {
    name: String,
    driver: Box<dyn Driver>,
    level: Level,
    context: RwLock<Context>,
    metrics: ChannelMetrics,
    closed: AtomicBool,
}

impl Channel {
    pub fn new(name: impl Into<String>, driver: Box<dyn Driver>, level: Level) -> Self {
        Self {
            name: name.into(),
            driver,
            level,
            context: RwLock::new(Context::new()),
            metrics: ChannelMetrics::new(),
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_context(self, context: Context) -> Self {
        *self.context.write() = context;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn driver_name(&self) -> &str {
        self.driver.name()
    }

    /// Whether entries at `level` reach the driver
    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Copy of the channel's private context
    pub fn context(&self) -> Context {
        self.context.read().clone()
    }

    /// Overlay fields onto the private context
    pub fn merge_context(&self, context: &Context) {
        self.context.write().merge(context);
    }

    pub fn metrics(&self) -> &ChannelMetrics {
        &self.metrics
    }

    /// Hand an entry to the driver, dropping it if it is below the channel level
    pub fn log(&self, entry: &Entry) -> Result<()> {
        if !self.is_enabled(entry.level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        match self.driver.log(entry) {
            Ok(()) => {
                self.metrics.record_delivered();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                Err(e)
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.driver.flush()
    }

    /// Close the driver. Only the first call reaches it.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.driver.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!(
                "[LOGGER ERROR] Failed to close channel [{}] on drop: {}",
                self.name, e
            );
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("driver", &self.driver.name())
            .field("level", &self.level)
            .field("context", &*self.context.read())
            .finish()
    }
}
