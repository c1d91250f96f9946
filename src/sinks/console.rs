//! Console sink implementation

use crate::core::{attribution, Cause, LogLevel, Result, Sink};
use colored::Colorize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub struct ConsoleSink {
    min_level: LogLevel,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            use_colors: true,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the least severe level this sink accepts
    ///
    /// # Example
    ///
    /// ```
    /// use queued_logger::sinks::ConsoleSink;
    /// use queued_logger::{LogLevel, Sink};
    ///
    /// let sink = ConsoleSink::new().with_min_level(LogLevel::Debug);
    /// assert!(sink.is_debug_enabled());
    /// ```
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn format_line(&self, level: LogLevel, text: &str, cause: Option<&Cause>) -> String {
        let level_str = if self.use_colors {
            format!("{:5}", level.to_str())
                .color(level.color_code())
                .to_string()
        } else {
            format!("{:5}", level.to_str())
        };

        let mut line = format!(
            "[{}] [{}] {} - {}",
            attribution::current_timestamp().format(TIMESTAMP_FORMAT),
            level_str,
            attribution::current_thread_name(),
            text
        );
        if let Some(cause) = cause {
            line.push_str(": ");
            line.push_str(&cause.to_string());
        }
        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write(&self, level: LogLevel, text: &str, cause: Option<&Cause>) -> Result<()> {
        let line = self.format_line(level, text, cause);

        // Route Error and Fatal levels to stderr, others to stdout
        match level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
