//! Webhook alert example
//!
//! Everything goes to a local file; errors go through an `incidents` stack
//! that writes to the file and posts to a Slack-compatible incoming webhook.
//! Set `SLACK_WEBHOOK_URL` to post for real; otherwise the webhook member
//! fails and the stack ignores it.
//!
//! Run with: SLACK_WEBHOOK_URL=https://hooks.slack.com/... cargo run --example webhook_alerts

use rust_channel_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Channel Logger - Webhook Alerts Example ===\n");

    let url = std::env::var("SLACK_WEBHOOK_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:9/unreachable".to_string());
    let log_path = std::env::temp_dir().join("rust_channel_logger_alerts.log");

    let webhook = WebhookConfig::new(url)
        .with_username("Ops Bot")
        .with_emoji(":rotating_light:")
        .with_timeout(Duration::from_secs(5));

    let config = Config::new("file")
        .with_app_name("alerts-demo")
        .with_channel("file", ChannelConfig::file(&log_path))
        .with_channel("slack", ChannelConfig::webhook_with(webhook).with_level(Level::Error))
        .with_channel(
            "incidents",
            ChannelConfig::stack(["file", "slack"])
                .with_level(Level::Error)
                .with_ignore_failures(true),
        );

    let manager = Manager::new(config);
    let logger = manager.default_logger()?;

    println!("1. Routine records go to the file channel:");
    logger.info("Nightly export finished");

    println!("\n2. The incidents stack drops anything below ERROR:");
    let incidents = manager.channel("incidents")?;
    incidents.warning("Disk at 80% (dropped)");
    incidents.error("Disk at 95%");

    println!("\n3. Posting an error straight to the webhook channel:");
    let slack = manager.channel("slack")?;
    match slack.try_log(
        Level::Critical,
        "Database connection pool exhausted",
        &[context! { "pool_size" => 50, "waiting" => 212, "host" => "db-primary" }],
    ) {
        Ok(()) => println!("   Delivered"),
        Err(e) => println!("   Delivery failed: {}", e),
    }

    println!("\n4. Exceptions are attached as a fenced JSON field:");
    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    slack.critical_with_exception("Checkout API degraded", &err);

    manager.close()?;
    println!("\nFile records in {}", log_path.display());
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
