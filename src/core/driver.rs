//! Driver trait for log output destinations

use super::{entry::Entry, error::Result};

/// A destination that accepts entries.
///
/// Drivers are shared between threads behind an `Arc`, so every method takes
/// `&self` and implementations carry their own locking.
pub trait Driver: Send + Sync {
    /// Deliver one entry. Failures are returned, never panicked.
    fn log(&self, entry: &Entry) -> Result<()>;

    /// Release resources held by the driver
    fn close(&self) -> Result<()>;

    /// Stable identifier used in diagnostics
    fn name(&self) -> &str;

    /// Push buffered output to its destination
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn log(&self, entry: &Entry) -> Result<()> {
        (**self).log(entry)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
