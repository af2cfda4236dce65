//! Logging macros for ergonomic log message formatting.
//!
//! The level macros take a [`Logger`](crate::Logger) and a `format!`-style
//! message. [`context!`] builds a [`Context`](crate::Context) from
//! `key => value` pairs.
//!
//! # Examples
//!
//! ```
//! use rust_channel_logger::prelude::*;
//! use rust_channel_logger::drivers::MemoryDriver;
//! use rust_channel_logger::{info, warning};
//!
//! let memory = MemoryDriver::new();
//! let manager = Manager::builder()
//!     .channel("app", ChannelConfig::new("memory"))
//!     .default_channel("app")
//!     .driver("memory", memory.factory())
//!     .build();
//! let logger = manager.default_logger().unwrap();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! warning!(logger, "Retry attempt {} of {}", 3, 5);
//!
//! let request = logger.with_context(&context! { "request_id" => "abc-123", "attempt" => 3 });
//! request.notice("handled");
//!
//! assert_eq!(memory.len(), 3);
//! ```

/// Build a [`Context`](crate::Context) from `key => value` pairs.
///
/// Values go through `Into<Value>`, so strings, numbers, booleans, vectors
/// and nested contexts all work.
///
/// ```
/// use rust_channel_logger::{context, Value};
///
/// let ctx = context! { "user_id" => 42, "roles" => vec!["admin", "ops"] };
/// assert_eq!(ctx.get("user_id"), Some(&Value::Int(42)));
/// assert!(context! {}.is_empty());
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut context = $crate::Context::new();
        $(
            context.insert($key, $value);
        )+
        context
    }};
}

/// Log a message at the given level with automatic formatting.
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # use rust_channel_logger::drivers::MemoryDriver;
/// # let memory = MemoryDriver::new();
/// # let manager = Manager::builder()
/// #     .channel("app", ChannelConfig::new("memory"))
/// #     .default_channel("app")
/// #     .driver("memory", memory.factory())
/// #     .build();
/// # let logger = manager.default_logger().unwrap();
/// use rust_channel_logger::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// # assert_eq!(memory.messages(), vec!["Simple message", "Error code: 500"]);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # use rust_channel_logger::drivers::MemoryDriver;
/// # let memory = MemoryDriver::new();
/// # let manager = Manager::builder()
/// #     .channel("app", ChannelConfig::new("memory"))
/// #     .default_channel("app")
/// #     .driver("memory", memory.factory())
/// #     .build();
/// # let logger = manager.default_logger().unwrap();
/// use rust_channel_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert, $($arg)+)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Emergency, $($arg)+)
    };
}
