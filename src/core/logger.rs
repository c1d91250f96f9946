//! Per-sink producer API
//!
//! A [`QueuedLogger`] turns each enabled log call into a [`LogEvent`] and
//! offers it to the shared queue. When the queue is full it applies
//! backpressure: bounded waits on the drained condition, accumulated against
//! the configured maximum block time, after which the event is dropped.

use super::{
    diagnostic::Diagnostic,
    interrupt,
    log_event::LogEvent,
    log_level::LogLevel,
    message::Message,
    pipeline::{Delivery, Pipeline},
    queue::EnqueueError,
    sink::{self, Cause, Sink},
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Logging front end for one sink
///
/// Obtained from [`LogFunnel::wrap`](crate::LogFunnel::wrap); wrapping the
/// same sink again returns the same instance. Every logging method is
/// fire-and-forget and never fails.
pub struct QueuedLogger {
    sink: Arc<dyn Sink>,
    pipeline: Arc<Pipeline>,
}

impl QueuedLogger {
    pub(crate) fn new(sink: Arc<dyn Sink>, pipeline: Arc<Pipeline>) -> Self {
        Self { sink, pipeline }
    }

    /// The wrapped sink
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        sink::level_enabled(self.sink.as_ref(), level)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.sink.is_debug_enabled()
    }

    pub fn is_info_enabled(&self) -> bool {
        self.sink.is_info_enabled()
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.sink.is_warn_enabled()
    }

    pub fn is_error_enabled(&self) -> bool {
        self.sink.is_error_enabled()
    }

    pub fn is_fatal_enabled(&self) -> bool {
        self.sink.is_fatal_enabled()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<Message>) {
        self.submit(level, message.into(), None);
    }

    pub fn log_with_cause(&self, level: LogLevel, message: impl Into<Message>, cause: Cause) {
        self.submit(level, message.into(), Some(cause));
    }

    #[inline]
    pub fn debug(&self, message: impl Into<Message>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<Message>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<Message>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<Message>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<Message>) {
        self.log(LogLevel::Fatal, message);
    }

    #[inline]
    pub fn debug_with_cause(&self, message: impl Into<Message>, cause: Cause) {
        self.log_with_cause(LogLevel::Debug, message, cause);
    }

    #[inline]
    pub fn info_with_cause(&self, message: impl Into<Message>, cause: Cause) {
        self.log_with_cause(LogLevel::Info, message, cause);
    }

    #[inline]
    pub fn warn_with_cause(&self, message: impl Into<Message>, cause: Cause) {
        self.log_with_cause(LogLevel::Warn, message, cause);
    }

    #[inline]
    pub fn error_with_cause(&self, message: impl Into<Message>, cause: Cause) {
        self.log_with_cause(LogLevel::Error, message, cause);
    }

    #[inline]
    pub fn fatal_with_cause(&self, message: impl Into<Message>, cause: Cause) {
        self.log_with_cause(LogLevel::Fatal, message, cause);
    }

    /// Gate, build and deliver one event
    pub(crate) fn submit(&self, level: LogLevel, message: Message, cause: Option<Cause>) -> Delivery {
        if !self.is_enabled(level) {
            return Delivery::Filtered;
        }

        let event = LogEvent::new(Arc::clone(&self.sink), level, message.into_text(), cause);
        self.enqueue(event)
    }

    fn enqueue(&self, event: LogEvent) -> Delivery {
        let pipeline = &self.pipeline;
        let Some(ref queue) = pipeline.queue else {
            pipeline.write_sync(&event);
            return Delivery::Written;
        };

        pipeline.begin_pending();
        match queue.try_enqueue(event) {
            Ok(()) => {
                pipeline.metrics.record_enqueued();
                Delivery::Queued
            }
            Err(EnqueueError::Full(event)) => {
                pipeline.metrics.record_queue_full();
                self.await_capacity(event)
            }
            Err(EnqueueError::Closed(event)) => self.fall_back(&event),
        }
    }

    /// Retry a rejected event until it is queued, written directly or dropped
    fn await_capacity(&self, mut event: LogEvent) -> Delivery {
        let pipeline = &self.pipeline;
        let Some(ref queue) = pipeline.queue else {
            return self.fall_back(&event);
        };
        let max_block = pipeline.config.max_block();
        let slice = pipeline.config.wait_interval();
        let started = Instant::now();
        let _wake = interrupt::wake_on_interrupt(queue.signal());

        loop {
            if !pipeline.is_worker_alive() {
                return self.fall_back(&event);
            }

            // The flag stays set for whatever the caller does next
            if interrupt::is_interrupted() {
                pipeline.finish_pending();
                pipeline.metrics.record_dropped_interrupt();
                return Delivery::DroppedInterrupt;
            }

            let elapsed = started.elapsed();
            if elapsed >= max_block {
                pipeline.finish_pending();
                pipeline.metrics.record_dropped_timeout();
                pipeline.reporter.report(Diagnostic::LostMessage {
                    level: event.level(),
                    elapsed,
                    text: event.text().to_string(),
                });
                return Delivery::DroppedTimeout;
            }

            pipeline.metrics.record_block();
            match queue.enqueue_or_wait(event, slice.min(max_block - elapsed)) {
                Ok(()) => {
                    pipeline.metrics.record_enqueued();
                    return Delivery::Queued;
                }
                Err(EnqueueError::Full(rejected)) => event = rejected,
                Err(EnqueueError::Closed(rejected)) => return self.fall_back(&rejected),
            }
        }
    }

    /// Write on the calling thread because the drain worker is gone
    ///
    /// If the worker is merely slow rather than dead, this write can overlap
    /// with one of its writes to the same sink.
    fn fall_back(&self, event: &LogEvent) -> Delivery {
        self.pipeline.finish_pending();
        self.pipeline.write_sync(event);
        Delivery::WrittenSyncFallback
    }
}

impl fmt::Debug for QueuedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedLogger")
            .field("sink", &self.sink.name())
            .field("async", &self.pipeline.queue.is_some())
            .finish()
    }
}
