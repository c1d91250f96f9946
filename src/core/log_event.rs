//! Log event structure

use super::log_level::LogLevel;
use super::sink::{Cause, Sink};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

// Thread-local cache for the thread name to avoid repeated allocations
thread_local! {
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the calling thread, computed and cached on first access
///
/// Unnamed threads are identified by their `ThreadId`.
pub(crate) fn own_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let current = std::thread::current();
                match current.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", current.id()),
                }
            })
            .clone()
    })
}

/// One log call, captured on the producing thread
///
/// Events are immutable once built and are consumed exactly once, either
/// by the drain worker or by a synchronous write on the producer.
#[derive(Clone)]
pub struct LogEvent {
    sink: Arc<dyn Sink>,
    thread_name: String,
    text: String,
    level: LogLevel,
    cause: Option<Cause>,
    logged_at: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(
        sink: Arc<dyn Sink>,
        level: LogLevel,
        text: String,
        cause: Option<Cause>,
    ) -> Self {
        Self {
            sink,
            thread_name: super::attribution::current_thread_name(),
            text,
            level,
            cause,
            logged_at: Utc::now(),
        }
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}

impl fmt::Debug for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("sink", &self.sink.name())
            .field("thread_name", &self.thread_name)
            .field("text", &self.text)
            .field("level", &self.level)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .field("logged_at", &self.logged_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;

    struct Discard;

    impl Sink for Discard {
        fn is_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn write(&self, _level: LogLevel, _text: &str, _cause: Option<&Cause>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_event_captures_producer_thread_name() {
        let handle = std::thread::Builder::new()
            .name("producer-3".to_string())
            .spawn(|| LogEvent::new(Arc::new(Discard), LogLevel::Info, "hi".into(), None))
            .unwrap();

        let event = handle.join().unwrap();
        assert_eq!(event.thread_name(), "producer-3");
        assert_eq!(event.text(), "hi");
        assert_eq!(event.level(), LogLevel::Info);
        assert!(event.cause().is_none());
    }

    #[test]
    fn test_unnamed_thread_uses_thread_id() {
        let name = std::thread::spawn(own_thread_name).join().unwrap();
        assert!(name.starts_with("ThreadId("), "got {}", name);
    }
}
