//! Timestamp formatting utilities
//!
//! Provides the timestamp layouts used in text records. The file driver's
//! `date_format` option is resolved through [`TimestampFormat::from_pattern`].

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// strftime layout of the default record header: `2025-01-08 10:30:45`
pub const STANDARD_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options for text records
///
/// # Examples
///
/// ```
/// use rust_channel_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Standard.format(&at), "2025-01-08 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45`
    #[default]
    Standard,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Resolve a configured pattern.
    ///
    /// The names `iso8601`, `rfc3339`, `unix` and `unix_millis` select the
    /// matching variant; an empty string selects `Standard`; anything else is
    /// used as a strftime pattern.
    pub fn from_pattern(pattern: &str) -> Self {
        match pattern.trim() {
            "" | STANDARD_PATTERN => TimestampFormat::Standard,
            p if p.eq_ignore_ascii_case("iso8601") => TimestampFormat::Iso8601,
            p if p.eq_ignore_ascii_case("rfc3339") => TimestampFormat::Rfc3339,
            p if p.eq_ignore_ascii_case("unix") => TimestampFormat::Unix,
            p if p.eq_ignore_ascii_case("unix_millis") => TimestampFormat::UnixMillis,
            p => TimestampFormat::Custom(p.to_string()),
        }
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Standard => datetime.format(STANDARD_PATTERN).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    return datetime.format(STANDARD_PATTERN).to_string();
                }
                out
            }
        }
    }

    /// Whether every specifier in a custom pattern is understood by chrono.
    ///
    /// An invalid pattern renders as `Standard`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            TimestampFormat::Custom(format_str) => {
                !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_standard_format() {
        let result = TimestampFormat::Standard.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08 10:30:45");
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime());
        assert!(result.starts_with("2025-01-08T10:30:45"));
        assert!(result.contains("+00:00") || result.ends_with('Z'));
    }

    #[test]
    fn test_unix_formats() {
        let seconds: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(millis / 1000, seconds);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_from_pattern() {
        assert_eq!(TimestampFormat::from_pattern(""), TimestampFormat::Standard);
        assert_eq!(
            TimestampFormat::from_pattern("%Y-%m-%d %H:%M:%S"),
            TimestampFormat::Standard
        );
        assert_eq!(TimestampFormat::from_pattern("RFC3339"), TimestampFormat::Rfc3339);
        assert_eq!(TimestampFormat::from_pattern("unix"), TimestampFormat::Unix);
        assert_eq!(
            TimestampFormat::from_pattern("%d/%m/%Y"),
            TimestampFormat::Custom("%d/%m/%Y".to_string())
        );
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(TimestampFormat::Custom("%Y/%m/%d".to_string()).is_valid());
        assert!(TimestampFormat::Unix.is_valid());

        for pattern in ["%Y-%Q", "%"] {
            let format = TimestampFormat::Custom(pattern.to_string());
            assert!(!format.is_valid());
            assert_eq!(format.format(&fixed_datetime()), "2025-01-08 10:30:45");
        }
    }
}
