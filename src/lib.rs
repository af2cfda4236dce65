//! # Rust Channel Logger
//!
//! A structured logging façade that routes leveled, context-enriched entries
//! to named channels, each backed by a pluggable driver.
//!
//! ## Features
//!
//! - **Channels**: named destinations with their own minimum level and context
//! - **Drivers**: file, Slack-compatible webhook, console, in-memory, and
//!   stacks that fan out over other channels
//! - **Context layers**: shared, channel, logger and call-site context, merged
//!   with later layers winning
//! - **Custom drivers**: register any [`Driver`] under a kind name
//! - **Thread Safe**: managers and loggers are shared freely between threads
//!
//! ## Example
//!
//! ```no_run
//! use rust_channel_logger::prelude::*;
//!
//! let config = Config::default()
//!     .with_channel("alerts", ChannelConfig::webhook("https://hooks.slack.com/services/T000/B000/XXXX"))
//!     .with_channel("everything", ChannelConfig::stack(["file", "alerts"]).with_ignore_failures(true));
//!
//! let manager = Manager::new(config);
//! let logger = manager.channel("everything")?.with("request_id", "abc-123");
//!
//! logger.info("Request accepted");
//! logger.critical_with_context("Payment gateway unreachable", &context! { "gateway" => "stripe" });
//!
//! manager.close()?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod drivers;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::context;
    pub use crate::core::{
        Channel, ChannelConfig, ChannelMetrics, Config, Context, Driver, DriverRegistry, Entry,
        ExceptionInfo, FileConfig, Level, Logger, LoggerError, Manager, ManagerBuilder, Result,
        StackConfig, Value, WebhookConfig,
    };
}

pub use crate::core::{
    Channel, ChannelConfig, ChannelMetrics, Config, ConsoleConfig, Context, Driver, DriverFactory,
    DriverRegistry, Entry, ExceptionInfo, FileConfig, Level, Logger, LoggerError, Manager,
    ManagerBuilder, Result, StackConfig, TimestampFormat, Value, WebhookConfig,
};
#[cfg(feature = "console")]
pub use drivers::ConsoleDriver;
pub use drivers::{FileDriver, MemoryDriver, StackDriver, WebhookDriver};
