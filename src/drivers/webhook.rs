//! Webhook driver implementation
//!
//! Posts entries to a Slack-compatible incoming webhook as a single colored
//! attachment.
//!
//! In asynchronous mode every `log` call spawns its own detached OS thread.
//! There is no limit on how many run at once, and `close` does not wait for
//! them, so posts still in flight at shutdown may be lost.

use crate::core::config::DEFAULT_APP_NAME;
use crate::core::format::field_title;
use crate::core::{ChannelConfig, Driver, Entry, LoggerError, Result, WebhookConfig};
use serde::Serialize;
use std::thread;

/// Values shorter than this many characters are laid out side by side
pub const SHORT_FIELD_LIMIT: usize = 40;

/// Footer label used when an entry carries no channel name
const FOOTER_DEFAULT_CHANNEL: &str = "default";

/// JSON body of one webhook post
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub fields: Vec<Field>,
    pub footer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub footer_icon: String,
    pub ts: i64,
    pub mrkdwn_in: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn new(title: impl Into<String>, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short,
        }
    }
}

pub struct WebhookDriver {
    url: String,
    username: String,
    icon_emoji: String,
    icon_url: Option<String>,
    channel: Option<String>,
    footer_icon: Option<String>,
    async_send: bool,
    client: reqwest::blocking::Client,
}

impl WebhookDriver {
    /// Build from a channel definition; the `webhook` (or `slack`) section
    /// with a non-empty URL is required.
    pub fn from_config(config: &ChannelConfig) -> Result<Self> {
        let settings = config.webhook.as_ref().ok_or_else(|| {
            LoggerError::config("webhook driver", "webhook configuration is required")
        })?;
        Self::new(settings)
    }

    pub fn new(config: &WebhookConfig) -> Result<Self> {
        if config.webhook_url.trim().is_empty() {
            return Err(LoggerError::config(
                "webhook driver",
                "webhook URL is required",
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            url: config.webhook_url.clone(),
            username: config
                .username
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            icon_emoji: config.icon_emoji.clone(),
            icon_url: config.icon_url.clone().filter(|url| !url.is_empty()),
            channel: config.channel.clone(),
            footer_icon: config.footer_icon.clone(),
            async_send: config.async_send,
            client,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_async(&self) -> bool {
        self.async_send
    }

    /// Build the payload that `log` would post for this entry
    pub fn build_message(&self, entry: &Entry) -> WebhookMessage {
        let mut fields = vec![
            Field::new("Message", entry.message.clone(), false),
            Field::new("Level", entry.level.to_str(), true),
        ];

        for (key, value) in entry.context.iter() {
            let rendered = value.to_markdown();
            let short = rendered.chars().count() < SHORT_FIELD_LIMIT;
            fields.push(Field::new(field_title(key), rendered, short));
        }

        if entry.exception.is_some() {
            fields.push(Field::new(
                "Exception",
                format!("```{}```", entry.exception_json()),
                false,
            ));
        }

        let channel = if entry.channel.is_empty() {
            FOOTER_DEFAULT_CHANNEL
        } else {
            &entry.channel
        };

        let attachment = Attachment {
            color: entry.level.webhook_color().to_string(),
            title: format!("{} {}", entry.level.emoji(), entry.level.to_str()),
            text: String::new(),
            fields,
            footer: format!("{} | {}", self.username, channel),
            footer_icon: self.footer_icon.clone().unwrap_or_default(),
            ts: entry.timestamp.timestamp(),
            mrkdwn_in: vec!["text".to_string(), "fields".to_string()],
        };

        let (icon_emoji, icon_url) = match self.icon_url {
            Some(ref url) => (String::new(), url.clone()),
            None => (self.icon_emoji.clone(), String::new()),
        };

        WebhookMessage {
            username: self.username.clone(),
            icon_emoji,
            icon_url,
            channel: self.channel.clone().unwrap_or_default(),
            text: String::new(),
            attachments: vec![attachment],
        }
    }
}

fn send(client: &reqwest::blocking::Client, url: &str, message: &WebhookMessage) -> Result<()> {
    let response = client.post(url).json(message).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoggerError::WebhookStatus {
            status: status.as_u16(),
        });
    }
    Ok(())
}

impl Driver for WebhookDriver {
    fn log(&self, entry: &Entry) -> Result<()> {
        let message = self.build_message(entry);

        if !self.async_send {
            return send(&self.client, &self.url, &message);
        }

        let client = self.client.clone();
        let url = self.url.clone();
        let spawned = thread::Builder::new()
            .name("webhook-send".to_string())
            .spawn(move || {
                if let Err(e) = send(&client, &url, &message) {
                    eprintln!("[LOGGER ERROR] Asynchronous webhook delivery failed: {}", e);
                }
            });

        if let Err(e) = spawned {
            eprintln!("[LOGGER ERROR] Failed to spawn webhook sender: {}", e);
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
