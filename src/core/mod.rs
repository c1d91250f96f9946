//! Core funnel types and traits

pub mod attribution;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod funnel;
pub mod global;
pub mod interrupt;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod mask;
pub mod message;
pub mod metrics;
pub(crate) mod pipeline;
pub(crate) mod queue;
pub(crate) mod registry;
pub mod sink;
pub(crate) mod worker;

pub use attribution::AttributionGuard;
pub use config::QueueConfig;
pub use diagnostic::{Diagnostic, DiagnosticCallback};
pub use error::{LoggerError, Result};
pub use funnel::{LogFunnel, LogFunnelBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use interrupt::InterruptHandle;
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::QueuedLogger;
pub use mask::{MaskRegistry, MaskRule, DEFAULT_REPLACEMENT};
pub use message::{Message, NULL_TEXT};
pub use metrics::FunnelMetrics;
pub use pipeline::Delivery;
pub use sink::{Cause, Sink};
pub use worker::DEFAULT_WORKER_NAME;
