//! # Runtime events emitted by supervisors and their tasks.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Task events**: task lifecycle (spawned, completed, failed, canceled, failure handled)
//! - **Supervisor events**: cancellation, refused teardown, shutdown outcome
//! - **Subscriber events**: overflow and panic of event subscribers
//!
//! The [`Event`] struct carries the metadata: timestamp, supervisor and task
//! names and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use tasklab::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_supervisor("screen")
//!     .with_task("second")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("second"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task events ===
    /// Task was handed to the runtime.
    ///
    /// Sets: `supervisor`, `task`
    TaskSpawned,

    /// Task body returned `Ok`.
    ///
    /// Sets: `supervisor`, `task`
    TaskCompleted,

    /// Task body returned an error or panicked.
    ///
    /// Sets: `supervisor`, `task`, `reason`
    TaskFailed,

    /// Task was cancelled before or while running.
    ///
    /// Sets: `supervisor`, `task`
    TaskCanceled,

    /// A failure was delivered to the supervisor's failure handler.
    ///
    /// Sets: `supervisor`, `task`, `reason`
    FailureHandled,

    // === Supervisor events ===
    /// Supervisor was cancelled together with all descendant tasks.
    ///
    /// Sets: `supervisor`
    SupervisorCanceled,

    /// Cancellation was requested on a supervisor that is never torn down.
    ///
    /// Sets: `supervisor`
    TeardownRefused,

    /// Every task stopped within the shutdown grace period.
    ///
    /// Sets: `supervisor`
    AllStoppedWithin,

    /// Shutdown grace period exceeded.
    ///
    /// Sets: `supervisor`, `reason` (stuck task names)
    GraceExceeded,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason` (panic info)
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the supervisor, if applicable.
    pub supervisor: Option<Arc<str>>,
    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            supervisor: None,
            task: None,
            reason: None,
        }
    }

    /// Attaches a supervisor name.
    #[inline]
    pub fn with_supervisor(mut self, supervisor: impl Into<Arc<str>>) -> Self {
        self.supervisor = Some(supervisor.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
