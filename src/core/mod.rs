//! Core logger types and traits

pub mod channel;
pub mod config;
pub mod driver;
pub mod entry;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod manager;
pub mod metrics;
pub mod registry;
pub mod timestamp;
pub mod value;

pub use channel::Channel;
pub use config::{ChannelConfig, Config, ConsoleConfig, FileConfig, StackConfig, WebhookConfig};
pub use driver::Driver;
pub use entry::{Entry, ExceptionInfo, MAX_TRACE_FRAMES};
pub use error::{LoggerError, Result};
pub use level::Level;
pub use logger::Logger;
pub use manager::{Manager, ManagerBuilder};
pub use metrics::ChannelMetrics;
pub use registry::{DriverFactory, DriverRegistry};
pub use timestamp::TimestampFormat;
pub use value::{Context, Value};
