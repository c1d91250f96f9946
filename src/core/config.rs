//! Queue configuration
//!
//! Values are read once, when a [`LogFunnel`](crate::LogFunnel) is built, and
//! never change for the lifetime of that funnel.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the queue capacity
pub const ENV_QUEUE_LIMIT: &str = "QUEUE_LOG_LIMIT";
/// Environment variable holding the maximum backpressure wait in milliseconds
pub const ENV_MAX_BLOCK: &str = "QUEUE_LOG_MAX_BLOCK";
/// Environment variable holding the wait slice in milliseconds
pub const ENV_WAIT_INTERVAL: &str = "QUEUE_LOG_WAIT_INTERVAL";

pub const DEFAULT_QUEUE_LIMIT: i64 = 2048;
pub const DEFAULT_MAX_BLOCK_MS: u64 = 60_000;
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_FLUSH_POLL_MS: u64 = 10;
/// Largest accepted queue capacity; the channel allocates it up front
pub const MAX_QUEUE_LIMIT: i64 = 1 << 20;

/// Capacity and timing of the log queue
///
/// # Example
///
/// ```
/// use queued_logger::QueueConfig;
///
/// let config = QueueConfig::from_lookup(|key| match key {
///     "QUEUE_LOG_LIMIT" => Some("0".to_string()),
///     _ => None,
/// })
/// .unwrap();
///
/// assert!(!config.is_async());
/// assert_eq!(config.max_block_ms, 60_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Queue capacity; zero or negative disables queueing entirely
    pub queue_limit: i64,
    /// Maximum cumulative wait of a blocked producer before its event is dropped
    pub max_block_ms: u64,
    /// Longest single wait of a blocked producer between retries
    pub wait_interval_ms: u64,
    /// Poll increment used by flush
    pub flush_poll_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_limit: DEFAULT_QUEUE_LIMIT,
            max_block_ms: DEFAULT_MAX_BLOCK_MS,
            wait_interval_ms: DEFAULT_WAIT_INTERVAL_MS,
            flush_poll_ms: DEFAULT_FLUSH_POLL_MS,
        }
    }
}

impl QueueConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    /// for absent or blank keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(limit) = read_value::<i64, _>(&lookup, ENV_QUEUE_LIMIT)? {
            config.queue_limit = limit;
        }
        if let Some(max_block) = read_value::<u64, _>(&lookup, ENV_MAX_BLOCK)? {
            config.max_block_ms = max_block;
        }
        if let Some(interval) = read_value::<u64, _>(&lookup, ENV_WAIT_INTERVAL)? {
            config.wait_interval_ms = interval;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the funnel cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.queue_limit > MAX_QUEUE_LIMIT {
            return Err(LoggerError::config(
                "queue_limit",
                format!("must not exceed {}", MAX_QUEUE_LIMIT),
            ));
        }
        if self.wait_interval_ms == 0 {
            return Err(LoggerError::config(
                "wait_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.flush_poll_ms == 0 {
            return Err(LoggerError::config(
                "flush_poll_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Whether log calls go through the queue
    pub fn is_async(&self) -> bool {
        self.queue_limit > 0
    }

    /// Queue capacity, or `None` when queueing is disabled
    pub fn capacity(&self) -> Option<usize> {
        if self.is_async() {
            Some(usize::try_from(self.queue_limit.min(MAX_QUEUE_LIMIT)).unwrap_or(usize::MAX))
        } else {
            None
        }
    }

    pub fn max_block(&self) -> Duration {
        Duration::from_millis(self.max_block_ms)
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_interval_ms)
    }

    pub fn flush_poll(&self) -> Duration {
        Duration::from_millis(self.flush_poll_ms)
    }
}

fn read_value<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| LoggerError::config(key, format!("cannot parse '{}': {}", raw, e)))
}
