//! Log entry structure

use super::level::Level;
use super::value::{Context, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::Location;

/// Maximum number of frames kept in a captured trace
pub const MAX_TRACE_FRAMES: usize = 20;

/// Frame prefixes that belong to the runtime or to this crate's own
/// emit machinery rather than to the caller.
const INTERNAL_FRAME_PREFIXES: &[&str] = &[
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "__rust",
    "__libc",
    "_start",
    concat!(env!("CARGO_CRATE_NAME"), "::core::entry::"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::logger::"),
    concat!(env!("CARGO_CRATE_NAME"), "::global::"),
];

/// One log event. Built per call and never changed once handed to a driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub message: String,
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Context::is_empty")]
    pub context: Context,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
}

impl Entry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Utc::now(),
            context: Context::new(),
            exception: None,
            channel: String::new(),
        }
    }

    /// Overlay context fields onto the entry
    #[must_use]
    pub fn with_context(mut self, context: &Context) -> Self {
        self.context.merge(context);
        self
    }

    /// Add a single context field
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Attach exception details captured from an error value and the
    /// caller's location.
    #[must_use]
    #[track_caller]
    pub fn with_error<E>(self, error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let exception = ExceptionInfo::capture(error);
        self.with_exception(exception)
    }

    /// Pretty-printed JSON of the whole entry
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Pretty-printed JSON of the context, empty when there is none
    pub fn context_json(&self) -> String {
        if self.context.is_empty() {
            return String::new();
        }
        serde_json::to_string_pretty(&self.context).unwrap_or_else(|_| self.context.to_string())
    }

    /// Pretty-printed JSON of the exception, empty when there is none
    pub fn exception_json(&self) -> String {
        match &self.exception {
            Some(exception) => serde_json::to_string_pretty(exception)
                .unwrap_or_else(|_| format!("{:?}", exception)),
            None => String::new(),
        }
    }
}

/// Structured failure details attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    pub class: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Capture the error's type, message, the caller's location and the
    /// current call stack.
    ///
    /// The class is the static type name of `E`. A `&dyn Error` or
    /// `Box<dyn Error>` therefore records `dyn core::error::Error`; use
    /// [`ExceptionInfo::with_class`] to name the concrete type.
    #[track_caller]
    pub fn capture<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let location = Location::caller();
        Self::new(std::any::type_name::<E>(), error.to_string())
            .with_location(location.file(), location.line())
            .with_trace(capture_trace())
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Set the trace, keeping at most [`MAX_TRACE_FRAMES`] frames
    #[must_use]
    pub fn with_trace(mut self, mut trace: Vec<String>) -> Self {
        trace.truncate(MAX_TRACE_FRAMES);
        self.trace = trace;
        self
    }
}

fn is_internal_frame(symbol: &str) -> bool {
    let symbol = symbol.trim_start_matches('<');
    INTERNAL_FRAME_PREFIXES
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
}

/// Capture the current call stack as `file:line (symbol)` strings
pub(crate) fn capture_trace() -> Vec<String> {
    let backtrace = backtrace::Backtrace::new();
    let mut trace = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            let Some(name) = symbol.name() else {
                continue;
            };
            let name = format!("{:#}", name);
            if is_internal_frame(&name) {
                continue;
            }

            let location = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => format!("{}:{}", file.display(), line),
                _ => "<unknown>".to_string(),
            };
            trace.push(format!("{} ({})", location, name));

            if trace.len() >= MAX_TRACE_FRAMES {
                return trace;
            }
        }
    }

    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct DatabaseError;

    impl fmt::Display for DatabaseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl std::error::Error for DatabaseError {}

    #[test]
    fn test_new_entry() {
        let entry = Entry::new(Level::Info, "hello");
        assert_eq!(entry.message, "hello");
        assert_eq!(entry.level, Level::Info);
        assert!(entry.context.is_empty());
        assert!(entry.exception.is_none());
        assert!(entry.channel.is_empty());
    }

    #[test]
    fn test_with_context_overlays() {
        let entry = Entry::new(Level::Debug, "m")
            .with("a", 1)
            .with_context(&Context::new().with("a", 2).with("b", 3));

        assert_eq!(entry.context.get("a"), Some(&Value::Int(2)));
        assert_eq!(entry.context.len(), 2);
    }

    #[test]
    fn test_with_error_captures_details() {
        let entry = Entry::new(Level::Error, "query failed").with_error(&DatabaseError);
        let line = line!() - 1;

        let exception = entry.exception.expect("exception attached");
        assert!(exception.class.ends_with("DatabaseError"));
        assert_eq!(exception.message, "connection refused");
        assert_eq!(exception.file.as_deref(), Some(file!()));
        assert_eq!(exception.line, Some(line));
        assert!(exception.trace.len() <= MAX_TRACE_FRAMES);
    }

    #[test]
    fn test_capture_through_trait_object() {
        let error: Box<dyn std::error::Error> = Box::new(DatabaseError);
        let exception = ExceptionInfo::capture(error.as_ref());
        assert!(exception.class.contains("Error"));
        assert_eq!(exception.message, "connection refused");
    }

    #[test]
    fn test_trace_is_capped() {
        let trace: Vec<String> = (0..50).map(|i| format!("frame {}", i)).collect();
        let exception = ExceptionInfo::new("E", "m").with_trace(trace);
        assert_eq!(exception.trace.len(), MAX_TRACE_FRAMES);
        assert_eq!(exception.trace[0], "frame 0");
    }

    #[test]
    fn test_internal_frames_are_recognized() {
        assert!(is_internal_frame("std::rt::lang_start"));
        assert!(is_internal_frame(
            "<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once"
        ));
        assert!(is_internal_frame(concat!(
            env!("CARGO_CRATE_NAME"),
            "::core::entry::capture_trace"
        )));
        assert!(!is_internal_frame("my_app::handlers::checkout"));
    }

    #[test]
    fn test_exception_json_skips_empty_fields() {
        let entry = Entry::new(Level::Critical, "boom")
            .with_exception(ExceptionInfo::new("PaymentError", "declined").with_code(402));

        let json = entry.exception_json();
        assert!(json.contains("\"class\": \"PaymentError\""));
        assert!(json.contains("\"code\": 402"));
        assert!(!json.contains("trace"));
        assert!(!json.contains("file"));
    }

    #[test]
    fn test_context_json() {
        let entry = Entry::new(Level::Info, "m");
        assert_eq!(entry.context_json(), "");

        let entry = entry.with("user", "alice");
        assert!(entry.context_json().contains("\"user\": \"alice\""));
    }

    #[test]
    fn test_to_json() {
        let entry = Entry::new(Level::Warning, "disk almost full")
            .with_channel("ops")
            .with("free_mb", 120);

        let json = entry.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["message"], "disk almost full");
        assert_eq!(parsed["level"], "WARNING");
        assert_eq!(parsed["channel"], "ops");
        assert_eq!(parsed["context"]["free_mb"], 120);
        assert!(parsed.get("exception").is_none());
    }
}
