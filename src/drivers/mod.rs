//! Driver implementations

#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod memory;
pub mod stack;
pub mod webhook;

#[cfg(feature = "console")]
pub use console::ConsoleDriver;
pub use file::FileDriver;
pub use memory::MemoryDriver;
pub use stack::StackDriver;
pub use webhook::{Attachment, Field, WebhookDriver, WebhookMessage};

pub use crate::core::Driver;
