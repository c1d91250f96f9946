//! One logger per sink identity

use super::{logger::QueuedLogger, sink::Sink};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoizes the logger wrapping each sink, keyed by the sink's address
///
/// Each entry keeps the sink alive through its logger, so an address cannot
/// be reused by another sink while it is registered.
pub(crate) struct SinkRegistry {
    loggers: Mutex<HashMap<usize, Arc<QueuedLogger>>>,
}

impl SinkRegistry {
    pub(crate) fn new() -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
        }
    }

    fn identity(sink: &Arc<dyn Sink>) -> usize {
        Arc::as_ptr(sink) as *const () as usize
    }

    /// The registered logger for `sink`, created with `make` on first use
    pub(crate) fn get_or_insert_with<F>(&self, sink: Arc<dyn Sink>, make: F) -> Arc<QueuedLogger>
    where
        F: FnOnce(Arc<dyn Sink>) -> QueuedLogger,
    {
        let key = Self::identity(&sink);
        let mut loggers = self.loggers.lock();
        Arc::clone(
            loggers
                .entry(key)
                .or_insert_with(|| Arc::new(make(sink))),
        )
    }

    pub(crate) fn len(&self) -> usize {
        self.loggers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::QueueConfig;
    use crate::core::diagnostic::Reporter;
    use crate::core::error::Result;
    use crate::core::log_level::LogLevel;
    use crate::core::pipeline::Pipeline;
    use crate::core::sink::Cause;

    struct Discard;

    impl Sink for Discard {
        fn is_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn write(&self, _level: LogLevel, _text: &str, _cause: Option<&Cause>) -> Result<()> {
            Ok(())
        }
    }

    fn pipeline() -> Arc<Pipeline> {
        Arc::new(Pipeline::new(QueueConfig::default(), None, Reporter::default()))
    }

    #[test]
    fn test_same_sink_same_logger() {
        let registry = SinkRegistry::new();
        let pipeline = pipeline();
        let sink: Arc<dyn Sink> = Arc::new(Discard);

        let first = registry.get_or_insert_with(Arc::clone(&sink), |s| {
            QueuedLogger::new(s, Arc::clone(&pipeline))
        });
        let second = registry.get_or_insert_with(Arc::clone(&sink), |_| {
            panic!("must not build a second logger")
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_sinks_distinct_loggers() {
        let registry = SinkRegistry::new();
        let pipeline = pipeline();
        let make = |s| QueuedLogger::new(s, Arc::clone(&pipeline));

        let a = registry.get_or_insert_with(Arc::new(Discard), make);
        let b = registry.get_or_insert_with(Arc::new(Discard), make);

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }
}
