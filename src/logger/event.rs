use std::fmt;
use std::thread;

use chrono::{DateTime, Local};

/// One showcase log line: when, where and what.
///
/// Created on the logging thread and handed straight to a sink; never stored
/// by the [`Logger`](super::Logger) itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Wall-clock time of the call.
    pub at: DateTime<Local>,
    /// Name of the thread that called [`Logger::log`](super::Logger::log).
    pub thread: String,
    /// The message.
    pub message: String,
}

impl LogEvent {
    /// Captures the current time and thread name around `message`.
    pub fn capture(message: String) -> Self {
        Self {
            at: Local::now(),
            thread: current_thread_name(),
            message,
        }
    }
}

/// `HH:MM:SS.mmm log: <message> [<thread>]`
impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} log: {} [{}]",
            self.at.format("%H:%M:%S%.3f"),
            self.message,
            self.thread
        )
    }
}

fn current_thread_name() -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("thread-{:?}", current.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_timestamp_message_and_thread() {
        let at = Local
            .with_ymd_and_hms(2024, 5, 1, 9, 3, 7)
            .single()
            .expect("unambiguous local time")
            + chrono::Duration::milliseconds(42);
        let event = LogEvent {
            at,
            thread: "main".into(),
            message: "download done".into(),
        };
        assert_eq!(event.to_string(), "09:03:07.042 log: download done [main]");
    }

    #[test]
    fn capture_uses_current_thread_name() {
        let event = thread::Builder::new()
            .name("worker-7".into())
            .spawn(|| LogEvent::capture("hi".into()))
            .expect("spawn")
            .join()
            .expect("join");
        assert_eq!(event.thread, "worker-7");
        assert_eq!(event.message, "hi");
    }
}
