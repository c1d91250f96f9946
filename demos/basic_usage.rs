//! Basic funnel usage example
//!
//! Demonstrates wrapping a console sink, log levels and masking.
//!
//! Run with: cargo run --example basic_usage

use queued_logger::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Queued Logger - Basic Usage Example ===\n");

    // Start a funnel with the default queue of 2048 events
    let funnel = LogFunnel::new(QueueConfig::default())?;

    // Wrap a console sink that shows every level
    let logger = funnel.wrap_sink(ConsoleSink::new().with_min_level(LogLevel::Debug));

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");
    funnel.flush(Duration::from_secs(1));

    println!("\n2. Sinks decide which levels they accept:");
    let quiet = funnel.wrap_sink(ConsoleSink::new().with_min_level(LogLevel::Warn));
    quiet.debug("Debug message (hidden)");
    quiet.info("Info message (hidden)");
    quiet.warn("Warning message (visible)");
    funnel.flush(Duration::from_secs(1));

    println!("\n3. Masking sensitive values:");
    funnel.add_pattern_mask(r"password=(\S+)", "", 1)?;
    logger.info("login user=alice password=hunter2");

    let cause: Cause = Arc::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ));
    logger.error_with_cause("Database unavailable", cause);
    funnel.flush(Duration::from_secs(1));

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
