//! Funnel metrics for observability
//!
//! Counters for every terminal state of a log event, plus the number of
//! times producers found the queue full.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for funnel observability
///
/// # Example
///
/// ```
/// use queued_logger::FunnelMetrics;
///
/// let metrics = FunnelMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written();
/// metrics.record_dropped_timeout();
///
/// assert_eq!(metrics.written(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct FunnelMetrics {
    /// Events accepted by the queue
    enqueued: AtomicU64,

    /// Events handed to a sink successfully, from any thread
    written: AtomicU64,

    /// Events written on the producer thread (queue disabled or worker gone)
    sync_writes: AtomicU64,

    /// Sink writes that returned an error or panicked
    write_failures: AtomicU64,

    /// Number of times a producer found the queue full
    queue_full_events: AtomicU64,

    /// Number of bounded waits producers performed on the drained condition
    block_events: AtomicU64,

    /// Events dropped after the maximum block time
    dropped_timeout: AtomicU64,

    /// Events dropped because the producer was interrupted
    dropped_interrupt: AtomicU64,
}

impl FunnelMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            sync_writes: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            dropped_timeout: AtomicU64::new(0),
            dropped_interrupt: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sync_writes(&self) -> u64 {
        self.sync_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_timeout(&self) -> u64 {
        self.dropped_timeout.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_interrupt(&self) -> u64 {
        self.dropped_interrupt.load(Ordering::Relaxed)
    }

    /// Events that never reached a sink
    pub fn dropped_count(&self) -> u64 {
        self.dropped_timeout() + self.dropped_interrupt()
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sync_write(&self) -> u64 {
        self.sync_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped_timeout(&self) -> u64 {
        self.dropped_timeout.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped_interrupt(&self) -> u64 {
        self.dropped_interrupt.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no events have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.written() as f64 + self.write_failures() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        for counter in [
            &self.enqueued,
            &self.written,
            &self.sync_writes,
            &self.write_failures,
            &self.queue_full_events,
            &self.block_events,
            &self.dropped_timeout,
            &self.dropped_interrupt,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for FunnelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FunnelMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            written: AtomicU64::new(self.written()),
            sync_writes: AtomicU64::new(self.sync_writes()),
            write_failures: AtomicU64::new(self.write_failures()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
            dropped_timeout: AtomicU64::new(self.dropped_timeout()),
            dropped_interrupt: AtomicU64::new(self.dropped_interrupt()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = FunnelMetrics::new();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.written(), 0);
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = FunnelMetrics::new();
        assert_eq!(metrics.record_dropped_timeout(), 0);
        assert_eq!(metrics.record_dropped_interrupt(), 0);
        assert_eq!(metrics.dropped_count(), 2);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = FunnelMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_dropped_timeout();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = FunnelMetrics::new();
        metrics.record_enqueued();
        metrics.record_queue_full();
        metrics.record_sync_write();

        metrics.reset();

        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.sync_writes(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = FunnelMetrics::new();
        metrics.record_written();

        let snapshot = metrics.clone();
        metrics.record_written();

        assert_eq!(snapshot.written(), 1);
        assert_eq!(metrics.written(), 2);
    }
}
