//! The log funnel service
//!
//! A [`LogFunnel`] owns the bounded queue, its single drain worker, the
//! mask rules and the sink registry. Loggers obtained from it share all
//! of these.

use super::{
    config::QueueConfig,
    diagnostic::{Diagnostic, DiagnosticCallback, Reporter},
    error::Result,
    logger::QueuedLogger,
    metrics::FunnelMetrics,
    pipeline::Pipeline,
    queue::EventQueue,
    registry::SinkRegistry,
    sink::Sink,
    worker::{DrainWorker, DEFAULT_WORKER_NAME},
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for funnel cleanup (5 seconds)
///
/// This timeout is used when the funnel is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct LogFunnel {
    pipeline: Arc<Pipeline>,
    registry: SinkRegistry,
    worker: Mutex<Option<DrainWorker>>,
}

impl LogFunnel {
    /// Start a funnel with `config`
    ///
    /// With a queue limit of zero or less no worker is started and every
    /// log call writes on the calling thread.
    pub fn new(config: QueueConfig) -> Result<Self> {
        Self::start(config, DEFAULT_WORKER_NAME, None)
    }

    /// Start a funnel configured from `QUEUE_LOG_LIMIT` and `QUEUE_LOG_MAX_BLOCK`
    pub fn from_env() -> Result<Self> {
        Self::new(QueueConfig::from_env()?)
    }

    fn start(
        config: QueueConfig,
        worker_name: &str,
        on_diagnostic: Option<DiagnosticCallback>,
    ) -> Result<Self> {
        config.validate()?;
        let reporter = Reporter::new(on_diagnostic);

        let (pipeline, worker) = match config.capacity() {
            Some(capacity) => {
                let (queue, events) = EventQueue::new(capacity);
                let pipeline = Arc::new(Pipeline::new(config, Some(queue), reporter));
                let worker = DrainWorker::spawn(worker_name, Arc::clone(&pipeline), events)?;
                (pipeline, Some(worker))
            }
            None => (Arc::new(Pipeline::new(config, None, reporter)), None),
        };

        Ok(Self {
            pipeline,
            registry: SinkRegistry::new(),
            worker: Mutex::new(worker),
        })
    }

    /// A funnel that writes every event on the calling thread
    ///
    /// Starts no thread, so unlike [`LogFunnel::new`] it cannot fail.
    pub(crate) fn synchronous(config: QueueConfig) -> Self {
        let config = QueueConfig {
            queue_limit: 0,
            ..config
        };
        Self {
            pipeline: Arc::new(Pipeline::new(config, None, Reporter::default())),
            registry: SinkRegistry::new(),
            worker: Mutex::new(None),
        }
    }

    /// The logger for `sink`; the same sink always yields the same logger
    ///
    /// # Example
    ///
    /// ```
    /// use queued_logger::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
    /// let sink = Arc::new(MemorySink::new());
    ///
    /// let first = funnel.wrap(sink.clone());
    /// let second = funnel.wrap(sink.clone());
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    pub fn wrap(&self, sink: Arc<dyn Sink>) -> Arc<QueuedLogger> {
        self.registry.get_or_insert_with(sink, |sink| {
            QueuedLogger::new(sink, Arc::clone(&self.pipeline))
        })
    }

    /// Wrap a sink the caller does not need to keep a handle to
    pub fn wrap_sink<S: Sink + 'static>(&self, sink: S) -> Arc<QueuedLogger> {
        self.wrap(Arc::new(sink))
    }

    /// Number of distinct sinks wrapped so far
    pub fn wrapped_count(&self) -> usize {
        self.registry.len()
    }

    /// Register a mask rule; see [`MaskRegistry::add_pattern_mask`](crate::MaskRegistry::add_pattern_mask)
    pub fn add_pattern_mask(
        &self,
        pattern: &str,
        replacement: &str,
        capture_group: usize,
    ) -> Result<bool> {
        self.pipeline
            .masks
            .add_pattern_mask(pattern, replacement, capture_group)
    }

    pub fn mask_rule_count(&self) -> usize {
        self.pipeline.masks.rule_count()
    }

    /// Wait until every queued event has been written
    ///
    /// Polls in short increments for at most `timeout`. Returns `false`, after
    /// reporting how many events are still pending, if the queue did not
    /// drain in time.
    pub fn flush(&self, timeout: Duration) -> bool {
        if self.pipeline.queue.is_none() {
            return true;
        }

        let poll = self.pipeline.config.flush_poll();
        let start = Instant::now();
        loop {
            let remaining = self.pipeline.pending();
            if remaining == 0 {
                return true;
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                self.pipeline
                    .reporter
                    .report(Diagnostic::FlushTimeout { remaining });
                return false;
            }

            thread::sleep(poll.min(timeout - elapsed));
        }
    }

    /// Flush, then stop the drain worker, within `timeout` overall
    ///
    /// Loggers stay usable afterwards; they write on the calling thread.
    /// Returns `true` if everything was written and the worker exited.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let Some(mut worker) = self.worker.lock().take() else {
            return true;
        };

        let start = Instant::now();
        let drained = self.flush(timeout);
        let stopped = worker.stop(timeout.saturating_sub(start.elapsed()), &self.pipeline);
        drained && stopped
    }

    /// Whether log calls go through the queue
    pub fn is_async(&self) -> bool {
        self.pipeline.queue.is_some()
    }

    pub fn is_worker_alive(&self) -> bool {
        self.pipeline.is_worker_alive()
    }

    /// Events accepted by the queue and not yet written
    pub fn pending(&self) -> usize {
        self.pipeline.pending()
    }

    pub fn queue_len(&self) -> usize {
        self.pipeline.queue.as_ref().map_or(0, EventQueue::len)
    }

    pub fn config(&self) -> &QueueConfig {
        &self.pipeline.config
    }

    /// Get the funnel metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use queued_logger::{LogFunnel, QueueConfig};
    ///
    /// let funnel = LogFunnel::new(QueueConfig::default()).unwrap();
    ///
    /// // After logging operations...
    /// let metrics = funnel.metrics();
    /// println!("Written: {}", metrics.written());
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &FunnelMetrics {
        &self.pipeline.metrics
    }

    /// Create a builder for LogFunnel
    #[must_use]
    pub fn builder() -> LogFunnelBuilder {
        LogFunnelBuilder::new()
    }
}

impl fmt::Debug for LogFunnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFunnel")
            .field(
                "capacity",
                &self.pipeline.queue.as_ref().map(EventQueue::capacity),
            )
            .field("queue_len", &self.queue_len())
            .field("pending", &self.pending())
            .field("worker_alive", &self.is_worker_alive())
            .field("mask_rules", &self.mask_rule_count())
            .finish()
    }
}

impl Drop for LogFunnel {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.pipeline.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Log funnel shutting down with {} dropped events (drop rate: {:.2}%)",
                dropped,
                self.pipeline.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing a LogFunnel with a fluent API
///
/// # Example
/// ```
/// use queued_logger::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let funnel = LogFunnel::builder()
///     .queue_limit(512)
///     .max_block(Duration::from_secs(5))
///     .on_diagnostic(Arc::new(|diagnostic| {
///         eprintln!("ALERT: {}", diagnostic);
///     }))
///     .build()
///     .unwrap();
///
/// assert!(funnel.is_async());
/// ```
pub struct LogFunnelBuilder {
    config: QueueConfig,
    worker_name: String,
    on_diagnostic: Option<DiagnosticCallback>,
}

impl LogFunnelBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: QueueConfig::default(),
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            on_diagnostic: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the queue capacity; zero or less disables queueing
    #[must_use = "builder methods return a new value"]
    pub fn queue_limit(mut self, limit: i64) -> Self {
        self.config.queue_limit = limit;
        self
    }

    /// Set the maximum time a producer waits for space before dropping its event
    #[must_use = "builder methods return a new value"]
    pub fn max_block(mut self, max_block: Duration) -> Self {
        self.config.max_block_ms = millis(max_block);
        self
    }

    /// Set the longest single wait between enqueue retries
    #[must_use = "builder methods return a new value"]
    pub fn wait_interval(mut self, interval: Duration) -> Self {
        self.config.wait_interval_ms = millis(interval);
        self
    }

    /// Set the poll increment used by flush
    #[must_use = "builder methods return a new value"]
    pub fn flush_poll(mut self, poll: Duration) -> Self {
        self.config.flush_poll_ms = millis(poll);
        self
    }

    /// Name the drain worker thread
    #[must_use = "builder methods return a new value"]
    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    /// Set a callback invoked with every diagnostic
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, callback: DiagnosticCallback) -> Self {
        self.on_diagnostic = Some(callback);
        self
    }

    /// Build the LogFunnel, starting its drain worker
    pub fn build(self) -> Result<LogFunnel> {
        LogFunnel::start(self.config, &self.worker_name, self.on_diagnostic)
    }
}

impl Default for LogFunnelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
