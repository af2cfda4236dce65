//! Logger: a cheap, immutable view onto one channel
//!
//! A `Logger` pairs a shared [`Channel`] with a context snapshot taken when the
//! logger was handed out. Context operations return new loggers and never
//! touch the original.

use super::{
    channel::Channel,
    entry::{Entry, ExceptionInfo},
    error::Result,
    level::Level,
    metrics::ChannelMetrics,
    value::{Context, Value},
};
use std::fmt;
use std::sync::Arc;

/// Generates the per-level emit methods
macro_rules! level_methods {
    ($($level:ident => $method:ident, $with_context:ident;)*) => {
        $(
            #[doc = concat!("Emit at `", stringify!($level), "` level")]
            #[inline]
            pub fn $method(&self, message: impl Into<String>) {
                self.log(Level::$level, message);
            }

            #[doc = concat!("Emit at `", stringify!($level), "` level with call-site context")]
            pub fn $with_context(&self, message: impl Into<String>, context: &Context) {
                self.log_with_context(Level::$level, message, context);
            }
        )*
    };
}

/// Generates the per-level emit methods that attach an error
macro_rules! exception_methods {
    ($($level:ident => $method:ident;)*) => {
        $(
            #[doc = concat!("Emit at `", stringify!($level), "` level with details captured from `error`")]
            #[track_caller]
            pub fn $method<E>(&self, message: impl Into<String>, error: &E)
            where
                E: std::error::Error + ?Sized,
            {
                self.log_with_exception(Level::$level, message, error, &[]);
            }
        )*
    };
}

#[derive(Clone)]
pub struct Logger {
    channel: Arc<Channel>,
    context: Arc<Context>,
}

impl Logger {
    /// View onto `channel` carrying `context`
    pub fn new(channel: Arc<Channel>, context: Context) -> Self {
        Self {
            channel,
            context: Arc::new(context),
        }
    }

    level_methods! {
        Debug => debug, debug_with_context;
        Info => info, info_with_context;
        Notice => notice, notice_with_context;
        Warning => warning, warning_with_context;
        Error => error, error_with_context;
        Critical => critical, critical_with_context;
        Alert => alert, alert_with_context;
        Emergency => emergency, emergency_with_context;
    }

    exception_methods! {
        Error => error_with_exception;
        Critical => critical_with_exception;
        Alert => alert_with_exception;
        Emergency => emergency_with_exception;
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.log_with_contexts(level, message, &[]);
    }

    pub fn log_with_context(&self, level: Level, message: impl Into<String>, context: &Context) {
        self.log_with_contexts(level, message, std::slice::from_ref(context));
    }

    /// Emit with any number of call-site contexts; later ones win on key
    /// collisions and all of them win over the logger's own context.
    ///
    /// Delivery failures are counted in the channel metrics and otherwise
    /// discarded; use [`Logger::try_log`] to observe them.
    pub fn log_with_contexts(&self, level: Level, message: impl Into<String>, contexts: &[Context]) {
        let _ = self.try_log(level, message, contexts);
    }

    /// Emit and report the driver's outcome
    pub fn try_log(
        &self,
        level: Level,
        message: impl Into<String>,
        contexts: &[Context],
    ) -> Result<()> {
        if !self.filter(level) {
            return Ok(());
        }
        let entry = self.build_entry(level, message, contexts);
        self.channel.log(&entry)
    }

    /// Emit with exception details captured from `error` and the caller's
    /// location.
    #[track_caller]
    pub fn log_with_exception<E>(
        &self,
        level: Level,
        message: impl Into<String>,
        error: &E,
        contexts: &[Context],
    ) where
        E: std::error::Error + ?Sized,
    {
        if !self.filter(level) {
            return;
        }
        let exception = ExceptionInfo::capture(error);
        let entry = self
            .build_entry(level, message, contexts)
            .with_exception(exception);
        let _ = self.channel.log(&entry);
    }

    /// Emit a prepared exception record, for example one whose class was
    /// set with [`ExceptionInfo::with_class`]
    pub fn log_exception_info(
        &self,
        level: Level,
        message: impl Into<String>,
        exception: ExceptionInfo,
    ) {
        if !self.filter(level) {
            return;
        }
        let entry = self.build_entry(level, message, &[]).with_exception(exception);
        let _ = self.channel.log(&entry);
    }

    /// New logger whose context is this one overlaid with `context`
    #[must_use]
    pub fn with_context(&self, context: &Context) -> Logger {
        Logger {
            channel: Arc::clone(&self.channel),
            context: Arc::new(self.context.merged(context)),
        }
    }

    /// New logger with one more context field
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Logger {
        self.with_context(&Context::new().with(key, value))
    }

    /// New logger without the named context keys
    #[must_use]
    pub fn without_context<I, K>(&self, keys: I) -> Logger
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Logger {
            channel: Arc::clone(&self.channel),
            context: Arc::new(self.context.without(keys)),
        }
    }

    /// Whether an entry at `level` would reach the driver
    pub fn is_enabled(&self, level: Level) -> bool {
        self.channel.is_enabled(level)
    }

    /// Whether both loggers write through the same channel instance
    pub fn shares_channel_with(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.channel, &other.channel)
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }

    pub fn level(&self) -> Level {
        self.channel.level()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn metrics(&self) -> &ChannelMetrics {
        self.channel.metrics()
    }

    pub fn flush(&self) -> Result<()> {
        self.channel.flush()
    }

    /// Level check done before any entry is built
    fn filter(&self, level: Level) -> bool {
        if self.channel.is_enabled(level) {
            return true;
        }
        self.channel.metrics().record_filtered();
        false
    }

    fn build_entry(&self, level: Level, message: impl Into<String>, contexts: &[Context]) -> Entry {
        let mut entry = Entry::new(level, message).with_channel(self.channel.name());
        entry.context = Context::clone(&self.context);
        for context in contexts {
            entry.context.merge(context);
        }
        entry
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("channel", &self.channel.name())
            .field("level", &self.channel.level())
            .field("context", &*self.context)
            .finish()
    }
}
