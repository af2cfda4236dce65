//! In-memory driver
//!
//! Keeps every entry it receives in a shared buffer. Clones share the buffer,
//! so a test can register a clone with a [`Manager`](crate::Manager) and
//! inspect the original afterwards:
//!
//! ```
//! use rust_channel_logger::drivers::MemoryDriver;
//! use rust_channel_logger::{ChannelConfig, Config, Manager};
//!
//! let memory = MemoryDriver::new();
//! let manager = Manager::builder()
//!     .config(Config::new("test").with_channel("test", ChannelConfig::new("memory")))
//!     .driver("memory", memory.factory())
//!     .build();
//!
//! manager.default_logger().unwrap().info("hello");
//! assert_eq!(memory.messages(), vec!["hello"]);
//! ```

use crate::core::{ChannelConfig, Driver, Entry, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryDriver {
    entries: Arc<Mutex<Vec<Entry>>>,
    closed: Arc<AtomicBool>,
    close_calls: Arc<AtomicUsize>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry factory that hands out clones sharing this buffer
    pub fn factory(&self) -> impl Fn(&ChannelConfig) -> Result<Box<dyn Driver>> + Send + Sync + 'static {
        let driver = self.clone();
        move |_: &ChannelConfig| Ok(Box::new(driver.clone()) as Box<dyn Driver>)
    }

    /// Snapshot of the captured entries
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    /// Take the captured entries, leaving the buffer empty
    pub fn drain(&self) -> Vec<Entry> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Entry> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// How many times `close` was called on any clone
    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::Acquire)
    }
}

impl Driver for MemoryDriver {
    fn log(&self, entry: &Entry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.close_calls.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
