//! Internal diagnostics of the funnel
//!
//! The funnel cannot log through itself, so problems with delivery are
//! printed to stderr and optionally handed to a callback.

use super::log_level::LogLevel;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Something the funnel could not deliver or complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A blocked producer gave up on its event
    LostMessage {
        level: LogLevel,
        elapsed: Duration,
        text: String,
    },

    /// Flush timed out with events still pending
    FlushTimeout { remaining: usize },

    /// A sink returned an error from a write
    SinkFailure {
        sink: String,
        level: LogLevel,
        message: String,
    },

    /// A sink panicked during a write
    SinkPanic { sink: String, message: String },

    /// The drain worker did not stop within the shutdown timeout
    WorkerStopTimeout { timeout: Duration },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LostMessage {
                level,
                elapsed,
                text,
            } => write!(
                f,
                "[LOGGER WARNING] LOST MESSAGE after {:?} ({}): {}",
                elapsed, level, text
            ),
            Diagnostic::FlushTimeout { remaining } => write!(
                f,
                "[LOGGER WARNING] LOST {} MESSAGES: queue not drained before flush timeout",
                remaining
            ),
            Diagnostic::SinkFailure {
                sink,
                level,
                message,
            } => write!(
                f,
                "[LOGGER ERROR] Sink '{}' failed to write {} event: {}",
                sink, level, message
            ),
            Diagnostic::SinkPanic { sink, message } => write!(
                f,
                "[LOGGER CRITICAL] Sink '{}' panicked: {}. Drain worker continues.",
                sink, message
            ),
            Diagnostic::WorkerStopTimeout { timeout } => write!(
                f,
                "[LOGGER WARNING] Drain worker did not stop within {:?} timeout",
                timeout
            ),
        }
    }
}

/// Callback invoked with every diagnostic, after it was printed
pub type DiagnosticCallback = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct Reporter {
    callback: Option<DiagnosticCallback>,
}

impl Reporter {
    pub(crate) fn new(callback: Option<DiagnosticCallback>) -> Self {
        Self { callback }
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        eprintln!("{}", diagnostic);
        if let Some(ref callback) = self.callback {
            callback(&diagnostic);
        }
    }
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_lost_message_display_contains_text() {
        let diagnostic = Diagnostic::LostMessage {
            level: LogLevel::Warn,
            elapsed: Duration::from_millis(1500),
            text: "disk almost full".to_string(),
        };
        let line = diagnostic.to_string();
        assert!(line.contains("LOST MESSAGE after 1.5s"));
        assert!(line.ends_with("disk almost full"));
    }

    #[test]
    fn test_flush_timeout_display() {
        let line = Diagnostic::FlushTimeout { remaining: 3 }.to_string();
        assert!(line.contains("LOST 3 MESSAGES"));
    }

    #[test]
    fn test_reporter_invokes_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let reporter = Reporter::new(Some(Arc::new(move |d: &Diagnostic| {
            seen_clone.lock().push(d.clone());
        })));

        reporter.report(Diagnostic::FlushTimeout { remaining: 1 });
        assert_eq!(*seen.lock(), vec![Diagnostic::FlushTimeout { remaining: 1 }]);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload = std::panic::catch_unwind(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 7");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(42)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }
}
