//! Log level definitions

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Eight-step severity scale, ascending from `Debug` to `Emergency`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    Notice = 2,
    Warning = 3,
    Error = 4,
    Critical = 5,
    Alert = 6,
    Emergency = 7,
}

impl Level {
    /// Every level in ascending order
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Alert => "ALERT",
            Level::Emergency => "EMERGENCY",
        }
    }

    /// Glyph used in webhook attachment titles
    pub fn emoji(&self) -> &'static str {
        match self {
            Level::Debug => "🔍",
            Level::Info => "ℹ️",
            Level::Notice => "📝",
            Level::Warning => "⚠️",
            Level::Error => "❌",
            Level::Critical => "🔥",
            Level::Alert => "🚨",
            Level::Emergency => "💀",
        }
    }

    /// Raw ANSI escape sequence for terminals
    pub fn ansi_color(&self) -> &'static str {
        match self {
            Level::Debug => "\x1b[36m",
            Level::Info => "\x1b[32m",
            Level::Notice => "\x1b[34m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
            Level::Critical => "\x1b[35m",
            Level::Alert => "\x1b[31;1m",
            Level::Emergency => "\x1b[37;41m",
        }
    }

    /// Hex color of the webhook attachment bar
    pub fn webhook_color(&self) -> &'static str {
        match self {
            Level::Debug => "#36a64f",
            Level::Info => "#2196F3",
            Level::Notice => "#9C27B0",
            Level::Warning => "#FF9800",
            Level::Error => "#f44336",
            Level::Critical => "#D32F2F",
            Level::Alert => "#B71C1C",
            Level::Emergency => "#000000",
        }
    }

    #[cfg(feature = "console")]
    pub fn color(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => Cyan,
            Level::Info => Green,
            Level::Notice => Blue,
            Level::Warning => Yellow,
            Level::Error => Red,
            Level::Critical => Magenta,
            Level::Alert => BrightRed,
            Level::Emergency => White,
        }
    }

    /// Parse a level name, falling back to `Info` for anything unrecognized.
    ///
    /// Matching trims surrounding whitespace, ignores case and accepts the
    /// short aliases `WARN`, `ERR`, `CRIT` and `EMERG`.
    ///
    /// ```
    /// use rust_channel_logger::Level;
    ///
    /// assert_eq!(Level::parse("warn"), Level::Warning);
    /// assert_eq!(Level::parse(" Critical "), Level::Critical);
    /// assert_eq!(Level::parse("verbose"), Level::Info);
    /// ```
    pub fn parse(s: &str) -> Level {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "NOTICE" => Level::Notice,
            "WARNING" | "WARN" => Level::Warning,
            "ERROR" | "ERR" => Level::Error,
            "CRITICAL" | "CRIT" => Level::Critical,
            "ALERT" => Level::Alert,
            "EMERGENCY" | "EMERG" => Level::Emergency,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::parse(s))
    }
}

impl From<&str> for Level {
    fn from(s: &str) -> Self {
        Level::parse(s)
    }
}
