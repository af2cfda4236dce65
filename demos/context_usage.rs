//! Context layering example
//!
//! Shows how shared, logger and call-site context combine on each entry.
//!
//! Run with: cargo run --example context_usage

use rust_channel_logger::prelude::*;
use rust_channel_logger::{info, MemoryDriver};

fn main() -> Result<()> {
    println!("=== Rust Channel Logger - Context Example ===\n");

    let memory = MemoryDriver::new();
    let manager = Manager::builder()
        .app_name("context-demo")
        .channel("console", ChannelConfig::console())
        .channel("capture", ChannelConfig::new("memory"))
        .channel("app", ChannelConfig::stack(["console", "capture"]))
        .default_channel("app")
        .driver("memory", memory.factory())
        .shared_context(context! { "service" => "checkout" })
        .build();

    println!("1. Shared context is applied to loggers handed out afterwards:");
    manager.share_context(&context! { "region" => "eu-west-1" });
    let logger = manager.default_logger()?;
    logger.info("service started");

    println!("\n2. Loggers derived with extra context leave the parent untouched:");
    let request = logger.with_context(&context! { "request_id" => "req-7f3a", "user_id" => 1042 });
    request.info("cart loaded");
    logger.info("parent logger has no request_id");

    println!("\n3. Call-site context wins over the logger's own:");
    request.warning_with_context(
        "payment retried",
        &context! { "user_id" => 2048, "attempt" => 2 },
    );

    println!("\n4. Removing keys and formatting with macros:");
    let anonymous = request.without_context(["user_id"]);
    info!(anonymous, "order {} confirmed", 551);

    println!("\nCaptured entries:");
    for entry in memory.entries() {
        println!("   {:<28} {}", entry.message, entry.context);
    }

    manager.close()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
