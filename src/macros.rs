//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The message is
//! only formatted when the wrapped sink has the level enabled.
//!
//! # Examples
//!
//! ```
//! use queued_logger::prelude::*;
//! use queued_logger::info;
//!
//! let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
//! let logger = funnel.wrap_sink(MemorySink::new());
//!
//! // Basic logging
//! info!(logger, "Request accepted");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Listening on port {}", port);
//!
//! // Complex formatting
//! let user_id = 42;
//! let action = "login";
//! info!(logger, "User {} did {}", user_id, action);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use queued_logger::prelude::*;
/// # let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
/// # let logger = funnel.wrap_sink(MemorySink::new());
/// use queued_logger::log;
/// log!(logger, LogLevel::Info, "Queue drained");
/// log!(logger, LogLevel::Error, "Sink rejected {} events", 3);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use queued_logger::prelude::*;
/// # let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
/// # let logger = funnel.wrap_sink(MemorySink::new());
/// use queued_logger::debug;
/// debug!(logger, "Mask rules loaded");
/// debug!(logger, "Pending events: {}", 4);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use queued_logger::prelude::*;
/// # let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
/// # let logger = funnel.wrap_sink(MemorySink::new());
/// use queued_logger::info;
/// info!(logger, "Funnel started");
/// info!(logger, "Queue capacity is {}", 2048);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use queued_logger::prelude::*;
/// # let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
/// # let logger = funnel.wrap_sink(MemorySink::new());
/// use queued_logger::warn;
/// warn!(logger, "Producer blocked on full queue");
/// warn!(logger, "Waited {} ms of {} ms", 1000, 60000);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use queued_logger::prelude::*;
/// # let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
/// # let logger = funnel.wrap_sink(MemorySink::new());
/// use queued_logger::error;
/// error!(logger, "Sink write failed");
/// error!(logger, "Write to {} failed: {}", "audit.log", "disk full");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use queued_logger::prelude::*;
/// # let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
/// # let logger = funnel.wrap_sink(MemorySink::new());
/// use queued_logger::fatal;
/// fatal!(logger, "Drain worker is gone");
/// fatal!(logger, "Cannot open {}", "/var/log/app.log");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
