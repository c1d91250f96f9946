//! # Queued Logger
//!
//! An asynchronous log funnel. Producers on any thread hand log events to a
//! bounded queue and return immediately; one drain worker writes them to
//! their sinks in arrival order.
//!
//! ## Features
//!
//! - **Non-blocking producers**: events are queued and written off-thread
//! - **Bounded backpressure**: a full queue blocks producers for at most a
//!   configured time, after which the event is dropped and reported
//! - **Masking**: ordered regex rules redact text before it reaches a sink
//! - **Attribution**: sinks see the producer's thread name and timestamp
//!
//! ## Example
//!
//! ```
//! use queued_logger::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let funnel = LogFunnel::builder().queue_limit(64).build().unwrap();
//! funnel.add_pattern_mask(r"password=(\S+)", "", 1).unwrap();
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = funnel.wrap(sink.clone());
//! logger.info("login password=hunter2");
//!
//! assert!(funnel.flush(Duration::from_secs(1)));
//! assert_eq!(sink.texts(), vec!["login password=********"]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Cause, Diagnostic, DiagnosticCallback, FunnelMetrics, InterruptHandle, LogFunnel,
        LogFunnelBuilder, LogLevel, LoggerError, MaskRegistry, Message, QueueConfig,
        QueuedLogger, Result, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{CapturedRecord, MemorySink};
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
}

pub use crate::core::{
    global, interrupt, AttributionGuard, Cause, Delivery, Diagnostic, DiagnosticCallback,
    FunnelMetrics, InterruptHandle, LogEvent, LogFunnel, LogFunnelBuilder, LogLevel, LoggerError,
    MaskRegistry, MaskRule, Message, QueueConfig, QueuedLogger, Result, Sink,
    DEFAULT_REPLACEMENT, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::sinks::MemorySink;
#[cfg(feature = "console")]
pub use crate::sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use crate::sinks::FileSink;
