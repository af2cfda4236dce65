//! Text record layout shared by the file driver
//!
//! A record looks like:
//!
//! ```text
//! [2025-01-08 10:30:45] payments.ERROR: charge failed
//!   Order_Id: 1042
//!   Exception:
//!     Class: CardDeclined
//!     Message: insufficient funds
//!     Trace:
//!       #0 src/billing.rs:88 (shop::billing::charge)
//!
//! ```

use super::entry::{Entry, ExceptionInfo};
use super::timestamp::TimestampFormat;
use std::fmt::Write;

/// Number of trace frames printed before the remainder is summarized
pub const PRINTED_TRACE_FRAMES: usize = 11;

/// Channel label used when an entry carries no channel name
pub const LOCAL_CHANNEL: &str = "local";

/// Title-case a snake_case key, upper-casing the first letter of every
/// `_`-separated segment and keeping the underscores.
///
/// ```
/// use rust_channel_logger::core::format::field_title;
///
/// assert_eq!(field_title("user_id"), "User_Id");
/// assert_eq!(field_title("requestPath"), "RequestPath");
/// ```
pub fn field_title(key: &str) -> String {
    let mut title = String::with_capacity(key.len());
    let mut capitalize = true;

    for c in key.chars() {
        if c == '_' {
            title.push('_');
            capitalize = true;
            continue;
        }
        if capitalize {
            title.push(c.to_ascii_uppercase());
            capitalize = false;
        } else {
            title.push(c);
        }
    }

    title
}

/// Render one entry as a multi-line text record terminated by a blank line
pub fn text_record(entry: &Entry, timestamp_format: &TimestampFormat) -> String {
    let channel = if entry.channel.is_empty() {
        LOCAL_CHANNEL
    } else {
        &entry.channel
    };

    let mut out = format!(
        "[{}] {}.{}: {}\n",
        timestamp_format.format(&entry.timestamp),
        channel,
        entry.level.to_str(),
        entry.message
    );

    for (key, value) in entry.context.iter() {
        let _ = writeln!(out, "  {}: {}", field_title(key), value);
    }

    if let Some(ref exception) = entry.exception {
        write_exception(&mut out, exception);
    }

    out.push('\n');
    out
}

fn write_exception(out: &mut String, exception: &ExceptionInfo) {
    out.push_str("  Exception:\n");
    let _ = writeln!(out, "    Class: {}", exception.class);
    let _ = writeln!(out, "    Message: {}", exception.message);

    if let Some(code) = exception.code {
        let _ = writeln!(out, "    Code: {}", code);
    }
    if let Some(ref file) = exception.file {
        let _ = writeln!(out, "    File: {}:{}", file, exception.line.unwrap_or(0));
    }

    if exception.trace.is_empty() {
        return;
    }

    out.push_str("    Trace:\n");
    for (i, frame) in exception
        .trace
        .iter()
        .take(PRINTED_TRACE_FRAMES)
        .enumerate()
    {
        let _ = writeln!(out, "      #{} {}", i, frame);
    }
    if exception.trace.len() > PRINTED_TRACE_FRAMES {
        let _ = writeln!(
            out,
            "      ... and {} more",
            exception.trace.len() - PRINTED_TRACE_FRAMES
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Level, Value};
    use chrono::TimeZone;

    fn fixed_entry() -> Entry {
        let mut entry = Entry::new(Level::Info, "User logged in");
        entry.timestamp = chrono::Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 45)
            .single()
            .expect("valid datetime");
        entry
    }

    #[test]
    fn test_field_title() {
        let cases = [
            ("user_id", "User_Id"),
            ("ip", "Ip"),
            ("request_path_name", "Request_Path_Name"),
            ("_private", "_Private"),
            ("already_Upper", "Already_Upper"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(field_title(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_header_line() {
        let entry = fixed_entry().with_channel("production");
        let record = text_record(&entry, &TimestampFormat::Standard);
        assert_eq!(
            record,
            "[2024-01-15 10:30:45] production.INFO: User logged in\n\n"
        );
    }

    #[test]
    fn test_missing_channel_is_local() {
        let record = text_record(&fixed_entry(), &TimestampFormat::Standard);
        assert!(record.contains("] local.INFO: User logged in"));
    }

    #[test]
    fn test_context_lines_are_title_cased() {
        let entry = fixed_entry()
            .with_channel("app")
            .with("user_id", 42)
            .with("tags", vec!["a", "b"]);
        let record = text_record(&entry, &TimestampFormat::Standard);

        assert!(record.contains("\n  User_Id: 42\n"));
        assert!(record.contains("\n  Tags: [\"a\",\"b\"]\n"));
        assert!(record.ends_with("\n\n"));
    }

    #[test]
    fn test_exception_block() {
        let exception = ExceptionInfo::new("IoError", "disk full")
            .with_code(28)
            .with_location("src/store.rs", 17)
            .with_trace(vec!["src/main.rs:3 (app::main)".to_string()]);
        let entry = fixed_entry().with_exception(exception);
        let record = text_record(&entry, &TimestampFormat::Standard);

        assert!(record.contains("  Exception:\n"));
        assert!(record.contains("    Class: IoError\n"));
        assert!(record.contains("    Message: disk full\n"));
        assert!(record.contains("    Code: 28\n"));
        assert!(record.contains("    File: src/store.rs:17\n"));
        assert!(record.contains("    Trace:\n      #0 src/main.rs:3 (app::main)\n"));
        assert!(!record.contains("more"));
    }

    #[test]
    fn test_long_trace_is_summarized() {
        let trace: Vec<String> = (0..15).map(|i| format!("frame{}", i)).collect();
        let entry = fixed_entry().with_exception(ExceptionInfo::new("E", "m").with_trace(trace));
        let record = text_record(&entry, &TimestampFormat::Standard);

        assert!(record.contains("      #10 frame10\n"));
        assert!(!record.contains("#11"));
        assert!(record.contains("      ... and 4 more\n"));
    }

    #[test]
    fn test_exact_limit_has_no_summary() {
        let trace: Vec<String> = (0..PRINTED_TRACE_FRAMES)
            .map(|i| format!("frame{}", i))
            .collect();
        let entry = fixed_entry().with_exception(ExceptionInfo::new("E", "m").with_trace(trace));
        let record = text_record(&entry, &TimestampFormat::Standard);

        assert!(record.contains("#10 frame10"));
        assert!(!record.contains("more"));
    }

    #[test]
    fn test_custom_timestamp() {
        let entry = fixed_entry().with("note", Value::Null);
        let record = text_record(&entry, &TimestampFormat::Custom("%d/%m/%Y".to_string()));
        assert!(record.starts_with("[15/01/2024] local.INFO"));
        assert!(record.contains("  Note: null\n"));
    }
}
