//! Process-wide funnel
//!
//! Applications that do not want to pass a [`LogFunnel`] around can use a
//! single funnel living for the rest of the process. It is configured from
//! the environment on first use unless [`init`] ran earlier, and it is never
//! dropped; its drain worker does not keep the process alive.

use super::{
    config::QueueConfig,
    error::{LoggerError, Result},
    funnel::LogFunnel,
    logger::QueuedLogger,
    sink::Sink,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

static GLOBAL: OnceCell<LogFunnel> = OnceCell::new();

/// Initialize the process-wide funnel with an explicit configuration
pub fn init(config: QueueConfig) -> Result<&'static LogFunnel> {
    let mut started = false;
    let funnel = GLOBAL.get_or_try_init(|| {
        let funnel = LogFunnel::new(config)?;
        started = true;
        Ok::<_, LoggerError>(funnel)
    })?;

    if !started {
        return Err(LoggerError::AlreadyInitialized);
    }
    Ok(funnel)
}

/// The process-wide funnel, initialized from the environment on first use
///
/// An unusable environment falls back to the default configuration.
pub fn funnel() -> &'static LogFunnel {
    GLOBAL.get_or_init(|| {
        let config = QueueConfig::from_env().unwrap_or_else(|e| {
            eprintln!("[LOGGER WARNING] {}; using default queue configuration", e);
            QueueConfig::default()
        });

        LogFunnel::new(config.clone()).unwrap_or_else(|e| {
            eprintln!("[LOGGER ERROR] {}; logging synchronously", e);
            LogFunnel::synchronous(config)
        })
    })
}

/// Wrap `sink` with the process-wide funnel
pub fn wrap(sink: Arc<dyn Sink>) -> Arc<QueuedLogger> {
    funnel().wrap(sink)
}

/// Whether the process-wide funnel exists yet
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}
