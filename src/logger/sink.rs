use std::sync::{Mutex, PoisonError};

use super::event::LogEvent;

/// Destination of showcase log lines.
///
/// `write` is called synchronously on the logging thread; keep it cheap.
pub trait LogSink: Send + Sync + 'static {
    /// Writes one event.
    fn write(&self, event: &LogEvent);
}

/// Prints every event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, event: &LogEvent) {
        println!("{event}");
    }
}

/// Forwards every event as a `tracing` INFO record with target `tasklab::log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, event: &LogEvent) {
        tracing::info!(target: "tasklab::log", thread = %event.thread, "{}", event.message);
    }
}

/// Keeps every event in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded messages, without timestamps or thread names.
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Returns the fully rendered lines.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Returns true if some recorded message equals `message`.
    pub fn contains(&self, message: &str) -> bool {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.message == message)
    }
}

impl LogSink for MemorySink {
    fn write(&self, event: &LogEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
