//! Manager and channel configuration
//!
//! Configuration is plain serde data, normally loaded from JSON:
//!
//! ```json
//! {
//!   "default": "stack",
//!   "appName": "shop",
//!   "channels": {
//!     "daily":  { "driver": "file", "file": { "path": "logs/shop.log" } },
//!     "alerts": { "driver": "slack", "level": "critical",
//!                 "slack": { "webhook_url": "https://hooks.slack.com/services/..." } },
//!     "stack":  { "driver": "stack",
//!                 "stack": { "channels": ["daily", "alerts"], "ignore_exceptions": true } }
//!   }
//! }
//! ```

use super::error::{LoggerError, Result};
use super::level::Level;
use super::timestamp::STANDARD_PATTERN;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_APP_NAME: &str = "Logger";
pub const DEFAULT_CHANNEL: &str = "file";
pub const DEFAULT_LOG_PATH: &str = "logs/app.log";
pub const DEFAULT_ICON_EMOJI: &str = ":robot_face:";
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 10_000;

/// Driver kind that is always resolved by the manager itself
pub const STACK_DRIVER: &str = "stack";

/// Root configuration of a [`Manager`](crate::Manager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the channel used by `default_logger()`
    pub default: String,

    /// Application name, used as the webhook username when none is set
    #[serde(alias = "appName")]
    pub app_name: String,

    pub channels: HashMap<String, ChannelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL)
            .with_channel(DEFAULT_CHANNEL, ChannelConfig::file(DEFAULT_LOG_PATH))
    }
}

impl Config {
    /// Empty configuration with the given default channel name
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            channels: HashMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading configuration",
                format!("cannot read {}", path.display()),
                e,
            )
        })?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Add or replace a channel definition
    #[must_use]
    pub fn with_channel(mut self, name: impl Into<String>, channel: ChannelConfig) -> Self {
        self.channels.insert(name.into(), channel);
        self
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels.get(name)
    }
}

/// Definition of one named channel
///
/// Driver settings live in a section named after the driver rather than
/// beside `driver` and `level`:
///
/// ```json
/// { "driver": "file", "level": "notice", "file": { "path": "logs/app.log" } }
/// ```
///
/// The `slack`, `slack_channel` and `ignore_exceptions` aliases accept the
/// older key names inside those sections; flat channel objects with
/// `path` or `webhook_url` at the top level are not read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Driver kind: `file`, `webhook`/`slack`, `stack`, `console` or any
    /// registered custom kind
    pub driver: String,

    /// Minimum level name, parsed leniently
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,

    #[serde(alias = "slack", skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleConfig>,

    /// Free-form settings for custom driver kinds
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub options: serde_json::Value,
}

impl ChannelConfig {
    /// Channel of a custom driver kind
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Self::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(FileConfig::new(path)),
            ..Self::new("file")
        }
    }

    pub fn file_with(config: FileConfig) -> Self {
        Self {
            file: Some(config),
            ..Self::new("file")
        }
    }

    pub fn webhook(url: impl Into<String>) -> Self {
        Self::webhook_with(WebhookConfig::new(url))
    }

    pub fn webhook_with(config: WebhookConfig) -> Self {
        Self {
            webhook: Some(config),
            ..Self::new("webhook")
        }
    }

    /// Fan-out over the named channels
    pub fn stack<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stack: Some(StackConfig {
                channels: channels.into_iter().map(Into::into).collect(),
                ignore_failures: false,
            }),
            ..Self::new(STACK_DRIVER)
        }
    }

    pub fn console() -> Self {
        Self {
            console: Some(ConsoleConfig::default()),
            ..Self::new("console")
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level.to_str().to_string());
        self
    }

    /// Tolerate member failures; only meaningful for stack channels
    #[must_use]
    pub fn with_ignore_failures(mut self, ignore: bool) -> Self {
        self.stack.get_or_insert_with(StackConfig::default).ignore_failures = ignore;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = options;
        self
    }

    /// Whether this channel fans out over other channels
    pub fn is_stack(&self) -> bool {
        self.driver.eq_ignore_ascii_case(STACK_DRIVER)
    }

    /// Configured minimum level, or the driver kind's default when absent
    pub fn min_level(&self) -> Level {
        match self.level.as_deref() {
            Some(level) if !level.trim().is_empty() => Level::parse(level),
            _ => Self::default_level(&self.driver),
        }
    }

    fn default_level(driver: &str) -> Level {
        match driver.to_ascii_lowercase().as_str() {
            "file" | STACK_DRIVER => Level::Debug,
            "webhook" | "slack" => Level::Error,
            _ => Level::Info,
        }
    }
}

/// File driver settings
///
/// Rotation fields are carried for configuration compatibility; the file
/// driver appends to a single file and does not rotate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub path: PathBuf,

    /// Size cap in megabytes
    pub max_size: u64,

    pub max_backups: u32,

    /// Retention in days
    pub max_age: u32,

    pub compress: bool,

    /// Octal file mode such as `"0640"`, applied on Unix when the file is created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// strftime pattern or one of `iso8601`, `rfc3339`, `unix`, `unix_millis`
    pub date_format: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: 100,
            max_backups: 3,
            max_age: 28,
            compress: true,
            permission: None,
            date_format: STANDARD_PATTERN.to_string(),
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    #[must_use]
    pub fn with_permission(mut self, mode: impl Into<String>) -> Self {
        self.permission = Some(mode.into());
        self
    }

    /// Parse `permission` as an octal mode
    pub fn mode(&self) -> Result<Option<u32>> {
        let Some(ref permission) = self.permission else {
            return Ok(None);
        };
        let digits = permission.trim().trim_start_matches("0o");
        u32::from_str_radix(digits, 8).map(Some).map_err(|_| {
            LoggerError::config(
                "file driver",
                format!("invalid permission {:?}, expected an octal mode", permission),
            )
        })
    }
}

/// Webhook (Slack-compatible) driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub webhook_url: String,

    /// Bot name; falls back to the manager's `app_name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub icon_emoji: String,

    /// Icon image; when set it replaces `icon_emoji`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// Destination room overriding the webhook's own
    #[serde(alias = "slack_channel", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    pub timeout_ms: u64,

    /// Send on a detached thread and never report delivery failures
    #[serde(rename = "async")]
    pub async_send: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            webhook_url: url.into(),
            username: None,
            icon_emoji: DEFAULT_ICON_EMOJI.to_string(),
            icon_url: None,
            channel: None,
            timeout_ms: DEFAULT_WEBHOOK_TIMEOUT_MS,
            async_send: false,
            footer_icon: None,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.icon_emoji = emoji.into();
        self
    }

    #[must_use]
    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn with_async(mut self, async_send: bool) -> Self {
        self.async_send = async_send;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_footer_icon(mut self, url: impl Into<String>) -> Self {
        self.footer_icon = Some(url.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            Duration::from_millis(DEFAULT_WEBHOOK_TIMEOUT_MS)
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }
}

/// Stack (fan-out) settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Member channel names, in delivery order
    pub channels: Vec<String>,

    #[serde(alias = "ignore_exceptions")]
    pub ignore_failures: bool,
}

/// Console driver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub colors: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { colors: true }
    }
}
