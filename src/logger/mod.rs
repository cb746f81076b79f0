//! # Showcase logging.
//!
//! Two independent channels of output:
//! - [`Logger`]: the timestamped, thread-tagged lines every showcase action
//!   prints (`12:00:01.250 log: download done [dispatch-worker-3]`);
//! - `tracing` diagnostics for the runtime itself, installed by [`init_tracing`].
//!
//! ## Architecture
//! ```text
//! task ── Logger::log(msg) ──► LogEvent::capture() ──► LogSink::write(&LogEvent)
//!                              (time + thread name)          │
//!                                               ┌────────────┼────────────┐
//!                                               ▼            ▼            ▼
//!                                          ConsoleSink  TracingSink   MemorySink
//! ```

mod event;
mod sink;

use std::fmt::Display;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::RuntimeError;

pub use event::LogEvent;
pub use sink::{ConsoleSink, LogSink, MemorySink, TracingSink};

/// Cheap-to-clone handle that stamps and forwards showcase log lines.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Creates a logger writing to `sink`.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Creates a logger that prints to stdout.
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleSink))
    }

    /// Stamps `message` with the current time and thread, then writes it.
    pub fn log(&self, message: impl Display) {
        let event = LogEvent::capture(message.to_string());
        self.sink.write(&event);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::console()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Installs a global `tracing` subscriber filtered by `directives`
/// (e.g. `"tasklab=debug"`).
///
/// Returns [`RuntimeError::Logging`] when the directives do not parse or a
/// global subscriber is already installed.
pub fn init_tracing(directives: &str) -> Result<(), RuntimeError> {
    let filter = EnvFilter::try_new(directives).map_err(|e| RuntimeError::Logging {
        reason: e.to_string(),
    })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_thread_names(true).with_target(true))
        .try_init()
        .map_err(|e| RuntimeError::Logging {
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_writes_through_sink() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(sink.clone());

        logger.log("first");
        logger.log(format_args!("value {}", 2));

        assert_eq!(sink.messages(), vec!["first", "value 2"]);
    }

    #[test]
    fn invalid_directives_are_rejected() {
        let err = init_tracing("tasklab=loud").unwrap_err();
        assert_eq!(err.as_label(), "runtime_logging");
    }
}
