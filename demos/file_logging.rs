//! File logging example
//!
//! Demonstrates logging to both console and file sinks through one funnel.
//!
//! Run with: cargo run --example file_logging

use queued_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Queued Logger - File Logging Example ===\n");

    // Queue settings come from QUEUE_LOG_LIMIT and QUEUE_LOG_MAX_BLOCK
    let funnel = LogFunnel::from_env()?;
    funnel.add_pattern_mask(r"\b\d{4}-\d{4}-\d{4}-\d{4}\b", "", 0)?;

    let console = funnel.wrap_sink(ConsoleSink::new());
    let file = funnel.wrap_sink(FileSink::new("application.log")?.with_min_level(LogLevel::Debug));

    println!("1. Logging to both console and file:");

    for logger in [&console, &file] {
        logger.info("Application started");
        logger.debug("Loading configuration...");
        logger.warn("Using default settings for some options");
        logger.error("Failed to load optional plugin");
    }

    println!("\n2. Performing some operations:");

    for i in 1..=5 {
        file.info(format!("Processing item {}/5", i));
        if i == 3 {
            file.warn("Payment with card 4111-1111-1111-1111 took longer than expected");
        }
    }

    file.info("All operations completed");

    // Drain the queue, then stop the worker; FileSink flushes on drop
    funnel.shutdown(Duration::from_secs(5));

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
