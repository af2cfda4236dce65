//! Console driver implementation

use crate::core::{ChannelConfig, Driver, Entry, Level, Result, TimestampFormat};
use colored::Colorize;

/// Writes one line per entry to the terminal; `Error` and above go to stderr.
pub struct ConsoleDriver {
    use_colors: bool,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn from_config(config: &ChannelConfig) -> Self {
        let use_colors = config.console.as_ref().map_or(true, |c| c.colors);
        Self::with_colors(use_colors)
    }

    fn format_line(&self, entry: &Entry) -> String {
        let level = if self.use_colors {
            entry
                .level
                .to_str()
                .color(entry.level.color())
                .bold()
                .to_string()
        } else {
            entry.level.to_str().to_string()
        };

        let channel = if entry.channel.is_empty() {
            crate::core::format::LOCAL_CHANNEL
        } else {
            &entry.channel
        };

        let mut line = format!(
            "[{}] {}.{}: {}",
            TimestampFormat::Standard.format(&entry.timestamp),
            channel,
            level,
            entry.message
        );

        if !entry.context.is_empty() {
            line.push(' ');
            line.push_str(&entry.context.format_fields());
        }
        if let Some(ref exception) = entry.exception {
            line.push_str(&format!(" exception={}: {}", exception.class, exception.message));
        }

        line
    }
}

impl Default for ConsoleDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for ConsoleDriver {
    fn log(&self, entry: &Entry) -> Result<()> {
        let line = self.format_line(entry);
        if entry.level >= Level::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str {
        "console"
    }

    fn flush(&self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConsoleConfig;

    #[test]
    fn test_plain_line() {
        let driver = ConsoleDriver::with_colors(false);
        let entry = Entry::new(Level::Warning, "cache miss")
            .with_channel("web")
            .with("key", "user:1");

        let line = driver.format_line(&entry);
        assert!(line.ends_with("] web.WARNING: cache miss key=user:1"));
    }

    #[test]
    fn test_colored_line_keeps_text() {
        colored::control::set_override(true);
        let driver = ConsoleDriver::new();
        let line = driver.format_line(&Entry::new(Level::Error, "boom"));
        colored::control::unset_override();

        assert!(line.contains("ERROR"));
        assert!(line.contains("\x1b["));
        assert!(line.ends_with(": boom"));
    }

    #[test]
    fn test_from_config() {
        let mut config = ChannelConfig::console();
        config.console = Some(ConsoleConfig { colors: false });
        let driver = ConsoleDriver::from_config(&config);
        assert!(!driver.use_colors);

        assert!(ConsoleDriver::from_config(&ChannelConfig::new("console")).use_colors);
    }

    #[test]
    fn test_log_and_close() {
        let driver = ConsoleDriver::with_colors(false);
        assert!(driver.log(&Entry::new(Level::Debug, "to stdout")).is_ok());
        assert!(driver.log(&Entry::new(Level::Emergency, "to stderr")).is_ok());
        assert!(driver.close().is_ok());
        assert_eq!(driver.name(), "console");
    }
}
