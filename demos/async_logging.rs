//! Async logging example
//!
//! Demonstrates multi-threaded producers, backpressure and flush.
//!
//! Run with: cargo run --example async_logging

use queued_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Queued Logger - Async Logging Example ===\n");

    // A small queue so producers feel backpressure
    let funnel = LogFunnel::builder()
        .queue_limit(16)
        .max_block(Duration::from_secs(2))
        .wait_interval(Duration::from_millis(50))
        .on_diagnostic(Arc::new(|diagnostic| {
            eprintln!("ALERT: {}", diagnostic);
        }))
        .build()?;

    let sink = Arc::new(MemorySink::new());
    let logger = funnel.wrap(sink.clone());

    println!("1. Multi-threaded logging:");

    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = Arc::clone(&logger);
        let handle = thread::Builder::new()
            .name(format!("worker-{}", thread_id))
            .spawn(move || {
                for i in 0..200 {
                    logger.info(format!("Thread {} - Message {}", thread_id, i));
                }
            })?;
        handles.push(handle);
    }

    for handle in handles {
        handle.join().ok();
    }

    println!("   5 threads logged 200 messages each");

    println!("\n2. Flushing:");
    let drained = funnel.flush(Duration::from_secs(5));
    println!("   Drained: {}, captured: {}", drained, sink.len());

    if let Some(record) = sink.records().last() {
        println!("   Last record came from thread '{}'", record.thread_name);
    }

    let metrics = funnel.metrics();
    println!("\n3. Metrics:");
    println!("   Written: {}", metrics.written());
    println!("   Queue full events: {}", metrics.queue_full_events());
    println!("   Dropped: {}", metrics.dropped_count());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
