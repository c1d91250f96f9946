//! Sink trait for the underlying log destination

use super::{error::Result, log_level::LogLevel};
use std::sync::Arc;

/// Opaque error attached to a log call
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The log destination a [`QueuedLogger`](crate::QueuedLogger) wraps
///
/// Implementors provide level gating and a single write routine; the
/// per-level predicates and write methods are derived from them and may be
/// overridden individually. Writes arriving through the queue are serialized
/// on the drain worker, so a sink only has to tolerate sequential calls on
/// the normal path.
///
/// # Example
///
/// ```
/// use queued_logger::{Cause, LogLevel, Result, Sink};
///
/// struct StderrSink;
///
/// impl Sink for StderrSink {
///     fn is_enabled(&self, level: LogLevel) -> bool {
///         level >= LogLevel::Warn
///     }
///
///     fn write(&self, level: LogLevel, text: &str, _cause: Option<&Cause>) -> Result<()> {
///         eprintln!("{} {}", level, text);
///         Ok(())
///     }
/// }
/// ```
pub trait Sink: Send + Sync {
    fn is_enabled(&self, level: LogLevel) -> bool;

    fn write(&self, level: LogLevel, text: &str, cause: Option<&Cause>) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "sink"
    }

    fn is_debug_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Debug)
    }

    fn is_info_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Info)
    }

    fn is_warn_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Warn)
    }

    fn is_error_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Error)
    }

    fn is_fatal_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Fatal)
    }

    fn debug(&self, text: &str, cause: Option<&Cause>) -> Result<()> {
        self.write(LogLevel::Debug, text, cause)
    }

    fn info(&self, text: &str, cause: Option<&Cause>) -> Result<()> {
        self.write(LogLevel::Info, text, cause)
    }

    fn warn(&self, text: &str, cause: Option<&Cause>) -> Result<()> {
        self.write(LogLevel::Warn, text, cause)
    }

    fn error(&self, text: &str, cause: Option<&Cause>) -> Result<()> {
        self.write(LogLevel::Error, text, cause)
    }

    fn fatal(&self, text: &str, cause: Option<&Cause>) -> Result<()> {
        self.write(LogLevel::Fatal, text, cause)
    }
}

/// Gate on the level-specific predicate of `sink`
pub(crate) fn level_enabled(sink: &dyn Sink, level: LogLevel) -> bool {
    match level {
        LogLevel::Debug => sink.is_debug_enabled(),
        LogLevel::Info => sink.is_info_enabled(),
        LogLevel::Warn => sink.is_warn_enabled(),
        LogLevel::Error => sink.is_error_enabled(),
        LogLevel::Fatal => sink.is_fatal_enabled(),
    }
}

/// Write through the level-specific method of `sink`
pub(crate) fn dispatch(
    sink: &dyn Sink,
    level: LogLevel,
    text: &str,
    cause: Option<&Cause>,
) -> Result<()> {
    match level {
        LogLevel::Debug => sink.debug(text, cause),
        LogLevel::Info => sink.info(text, cause),
        LogLevel::Warn => sink.warn(text, cause),
        LogLevel::Error => sink.error(text, cause),
        LogLevel::Fatal => sink.fatal(text, cause),
    }
}
