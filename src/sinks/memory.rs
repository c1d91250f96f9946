//! In-memory sink
//!
//! Keeps every record it receives, together with the producer thread it is
//! attributed to. Useful for tests and for inspecting what reached a sink.

use crate::core::{attribution, Cause, LogLevel, Result, Sink};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// One record received by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: LogLevel,
    pub text: String,
    pub cause: Option<String>,
    pub thread_name: String,
}

pub struct MemorySink {
    min_level: LogLevel,
    records: Mutex<Vec<CapturedRecord>>,
    arrived: Condvar,
}

impl MemorySink {
    /// A sink accepting every level
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Debug)
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            min_level,
            records: Mutex::new(Vec::new()),
            arrived: Condvar::new(),
        }
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Wait until at least `count` records arrived, for at most `timeout`
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut records = self.records.lock();
        while records.len() < count {
            if self.arrived.wait_until(&mut records, deadline).timed_out() {
                return records.len() >= count;
            }
        }
        true
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write(&self, level: LogLevel, text: &str, cause: Option<&Cause>) -> Result<()> {
        let record = CapturedRecord {
            level,
            text: text.to_string(),
            cause: cause.map(|c| c.to_string()),
            thread_name: attribution::current_thread_name(),
        };
        self.records.lock().push(record);
        self.arrived.notify_all();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
