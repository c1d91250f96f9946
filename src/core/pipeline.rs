//! State shared by producers and the drain worker

use super::{
    attribution::AttributionGuard,
    config::QueueConfig,
    diagnostic::{panic_message, Diagnostic, Reporter},
    log_event::LogEvent,
    mask::MaskRegistry,
    metrics::FunnelMetrics,
    queue::EventQueue,
    sink,
};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Terminal state of one log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The sink has the level disabled; nothing was built
    Filtered,
    /// Accepted by the queue; the drain worker will write it
    Queued,
    /// Written on the calling thread because queueing is disabled
    Written,
    /// Written on the calling thread because the drain worker is gone
    WrittenSyncFallback,
    /// Abandoned after the maximum block time
    DroppedTimeout,
    /// Abandoned because the calling thread was interrupted
    DroppedInterrupt,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Delivery::Filtered => "Filtered",
            Delivery::Queued => "Queued",
            Delivery::Written => "Written",
            Delivery::WrittenSyncFallback => "WrittenSyncFallback",
            Delivery::DroppedTimeout => "DroppedTimeout",
            Delivery::DroppedInterrupt => "DroppedInterrupt",
        };
        f.write_str(name)
    }
}

pub(crate) struct Pipeline {
    pub(crate) config: QueueConfig,
    pub(crate) queue: Option<EventQueue>,
    pub(crate) masks: MaskRegistry,
    pub(crate) metrics: FunnelMetrics,
    pub(crate) reporter: Reporter,
    worker_alive: AtomicBool,
    /// Events accepted by the queue and not yet written by the worker
    pending: AtomicUsize,
}

impl Pipeline {
    pub(crate) fn new(config: QueueConfig, queue: Option<EventQueue>, reporter: Reporter) -> Self {
        Self {
            config,
            queue,
            masks: MaskRegistry::new(),
            metrics: FunnelMetrics::new(),
            reporter,
            worker_alive: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        }
    }

    pub(crate) fn is_worker_alive(&self) -> bool {
        self.worker_alive.load(Ordering::Acquire)
    }

    pub(crate) fn set_worker_alive(&self, alive: bool) {
        self.worker_alive.store(alive, Ordering::Release);
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Count an event before offering it to the queue
    pub(crate) fn begin_pending(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Uncount an event that was written or abandoned
    pub(crate) fn finish_pending(&self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }

    /// Mask, attribute and write one event to its sink
    ///
    /// Sink errors and panics are reported and swallowed. Returns whether
    /// the sink accepted the event.
    pub(crate) fn write_event(&self, event: &LogEvent) -> bool {
        let text = self.masks.apply(event.text());
        let target = event.sink().as_ref();

        let result = {
            let _attribution = AttributionGuard::enter(event);
            catch_unwind(AssertUnwindSafe(|| {
                sink::dispatch(target, event.level(), &text, event.cause())
            }))
        };

        match result {
            Ok(Ok(())) => {
                self.metrics.record_written();
                true
            }
            Ok(Err(e)) => {
                self.metrics.record_write_failure();
                self.reporter.report(Diagnostic::SinkFailure {
                    sink: target.name().to_string(),
                    level: event.level(),
                    message: e.to_string(),
                });
                false
            }
            Err(payload) => {
                self.metrics.record_write_failure();
                self.reporter.report(Diagnostic::SinkPanic {
                    sink: target.name().to_string(),
                    message: panic_message(payload.as_ref()),
                });
                false
            }
        }
    }

    /// Write on the calling thread, bypassing the queue
    pub(crate) fn write_sync(&self, event: &LogEvent) {
        self.metrics.record_sync_write();
        self.write_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{LoggerError, Result};
    use crate::core::log_level::LogLevel;
    use crate::core::sink::{Cause, Sink};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recording {
        lines: Mutex<Vec<(String, String)>>,
    }

    impl Sink for Recording {
        fn is_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn write(&self, _level: LogLevel, text: &str, _cause: Option<&Cause>) -> Result<()> {
            if text == "fail" {
                return Err(LoggerError::writer("refused"));
            }
            if text == "panic" {
                panic!("sink blew up");
            }
            let thread = crate::core::attribution::current_thread_name();
            self.lines.lock().push((thread, text.to_string()));
            Ok(())
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(QueueConfig::default(), None, Reporter::default())
    }

    #[test]
    fn test_write_event_masks_and_attributes() {
        let pipeline = pipeline();
        pipeline.masks.add_pattern_mask(r"pin=(\d+)", "###", 1).unwrap();
        let sink = Arc::new(Recording::default());

        let event = std::thread::Builder::new()
            .name("producer-9".to_string())
            .spawn({
                let sink = Arc::clone(&sink);
                move || LogEvent::new(sink, LogLevel::Info, "pin=1234".to_string(), None)
            })
            .unwrap()
            .join()
            .unwrap();

        assert!(pipeline.write_event(&event));
        assert_eq!(
            *sink.lines.lock(),
            vec![("producer-9".to_string(), "pin=###".to_string())]
        );
        assert_eq!(pipeline.metrics.written(), 1);
    }

    #[test]
    fn test_write_event_isolates_failures() {
        let pipeline = pipeline();
        let sink: Arc<dyn Sink> = Arc::new(Recording::default());

        for text in ["fail", "panic"] {
            let event = LogEvent::new(Arc::clone(&sink), LogLevel::Error, text.to_string(), None);
            assert!(!pipeline.write_event(&event));
        }

        assert_eq!(pipeline.metrics.write_failures(), 2);
        assert!(!crate::core::attribution::is_attributed());
    }

    #[test]
    fn test_pending_counter() {
        let pipeline = pipeline();
        pipeline.begin_pending();
        pipeline.begin_pending();
        pipeline.finish_pending();
        assert_eq!(pipeline.pending(), 1);
    }

    #[test]
    fn test_delivery_display() {
        assert_eq!(Delivery::DroppedTimeout.to_string(), "DroppedTimeout");
        assert_eq!(Delivery::Queued.to_string(), "Queued");
    }
}
