//! Producer attribution for writes performed on another thread
//!
//! The drain worker writes on behalf of many producer threads. Rather than
//! renaming the worker's OS thread, it enters an [`AttributionGuard`] for the
//! duration of each write; sinks that print a thread name or timestamp read
//! them through [`current_thread_name`] and [`current_timestamp`].

use super::log_event::{own_thread_name, LogEvent};
use chrono::{DateTime, Utc};
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct Attribution {
    thread_name: String,
    logged_at: DateTime<Utc>,
}

thread_local! {
    static CURRENT: RefCell<Option<Attribution>> = const { RefCell::new(None) };
}

/// Scoped attribution of the current thread to a producer
///
/// Restores whatever attribution was active before, on drop, including
/// while unwinding out of a panicking sink.
#[must_use = "attribution ends when the guard is dropped"]
pub struct AttributionGuard {
    previous: Option<Attribution>,
}

impl AttributionGuard {
    /// Attribute the current thread to the producer of `event`
    pub fn enter(event: &LogEvent) -> Self {
        Self::enter_named(event.thread_name(), event.logged_at())
    }

    pub fn enter_named(thread_name: impl Into<String>, logged_at: DateTime<Utc>) -> Self {
        let attribution = Attribution {
            thread_name: thread_name.into(),
            logged_at,
        };
        let previous = CURRENT.with(|current| current.borrow_mut().replace(attribution));
        Self { previous }
    }
}

impl Drop for AttributionGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Thread name a sink should report for the write in progress
pub fn current_thread_name() -> String {
    CURRENT
        .with(|current| current.borrow().as_ref().map(|a| a.thread_name.clone()))
        .unwrap_or_else(own_thread_name)
}

/// Time of the log call for the write in progress, or now outside a write
pub fn current_timestamp() -> DateTime<Utc> {
    CURRENT
        .with(|current| current.borrow().as_ref().map(|a| a.logged_at))
        .unwrap_or_else(Utc::now)
}

/// Whether the current thread is writing on behalf of a producer
pub fn is_attributed() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_impersonates_and_restores() {
        let own = current_thread_name();
        {
            let _guard = AttributionGuard::enter_named("producer-1", Utc::now());
            assert_eq!(current_thread_name(), "producer-1");
            assert!(is_attributed());
        }
        assert_eq!(current_thread_name(), own);
        assert!(!is_attributed());
    }

    #[test]
    fn test_nested_guards_restore_in_order() {
        let _outer = AttributionGuard::enter_named("outer", Utc::now());
        {
            let _inner = AttributionGuard::enter_named("inner", Utc::now());
            assert_eq!(current_thread_name(), "inner");
        }
        assert_eq!(current_thread_name(), "outer");
    }

    #[test]
    fn test_guard_restores_after_panic() {
        let own = current_thread_name();
        let result = std::panic::catch_unwind(|| {
            let _guard = AttributionGuard::enter_named("doomed", Utc::now());
            panic!("sink exploded");
        });

        assert!(result.is_err());
        assert_eq!(current_thread_name(), own);
    }

    #[test]
    fn test_timestamp_is_attributed() {
        let logged_at = Utc::now() - chrono::Duration::seconds(30);
        let _guard = AttributionGuard::enter_named("p", logged_at);
        assert_eq!(current_timestamp(), logged_at);
    }
}
