//! Leveled output for handlers
//!
//! Handlers never call a global logger directly; they report through the
//! [`Logger`] held by the [`Context`](crate::context::Context). The binary
//! uses [`TracingLogger`], tests substitute a recording sink.

use tracing::Level;

/// Sink for handler log lines
pub trait Logger: Send + Sync {
    /// Record one message at the given level
    fn log(&self, level: Level, message: &str);

    /// Log at trace level
    fn trace(&self, message: &str) {
        self.log(Level::TRACE, message);
    }

    /// Log at debug level
    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    /// Log at info level
    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    /// Log at warn level
    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    /// Log at error level
    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::TRACE => tracing::trace!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            _ => tracing::error!("{message}"),
        }
    }
}
