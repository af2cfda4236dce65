//! Basic channel logger usage example
//!
//! Demonstrates a console channel, a file channel and a stack that writes to
//! both, with per-channel minimum levels.
//!
//! Run with: cargo run --example basic_usage

use rust_channel_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Channel Logger - Basic Usage Example ===\n");

    let log_path = std::env::temp_dir().join("rust_channel_logger_basic.log");

    let config = Config::new("both")
        .with_app_name("basic-demo")
        .with_channel("console", ChannelConfig::console().with_level(Level::Debug))
        .with_channel("file", ChannelConfig::file(&log_path).with_level(Level::Notice))
        .with_channel("both", ChannelConfig::stack(["console", "file"]));

    let manager = Manager::new(config);

    println!("1. Logging at every level on the stack channel:");
    let logger = manager.default_logger()?;
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.notice("This is a notice message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");
    logger.alert("This is an alert message");
    logger.emergency("This is an emergency message");

    println!("\n2. A file-only channel with NOTICE as its minimum level:");
    let file = manager.channel("file")?;
    file.info("Info message (dropped)");
    file.warning("Warning message (written)");
    println!("   Records written to {}", log_path.display());

    println!("\n3. Recording an error with its trace:");
    match std::fs::read_to_string("/nonexistent/settings.json") {
        Ok(_) => logger.info("settings loaded"),
        Err(e) => logger.error_with_exception("Could not load settings", &e),
    }

    manager.close()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
