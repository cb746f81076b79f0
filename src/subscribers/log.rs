//! # LogWriter: runtime events as `tracing` records
//!
//! A minimal subscriber that turns every incoming [`Event`] into a structured
//! `tracing` record under the `tasklab::events` target.
//!
//! ## Example output (fmt layer)
//! ```text
//! DEBUG tasklab::events: task spawned supervisor="global" task="launch"
//! WARN  tasklab::events: task failed supervisor="exceptions" task="second" reason="second failed"
//! WARN  tasklab::events: teardown refused supervisor="global"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let supervisor = e.supervisor.as_deref().unwrap_or("-");
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::TaskSpawned => {
                tracing::debug!(target: "tasklab::events", supervisor, task, "task spawned");
            }
            EventKind::TaskCompleted => {
                tracing::debug!(target: "tasklab::events", supervisor, task, "task completed");
            }
            EventKind::TaskCanceled => {
                tracing::debug!(target: "tasklab::events", supervisor, task, "task canceled");
            }
            EventKind::TaskFailed => {
                tracing::warn!(target: "tasklab::events", supervisor, task, reason, "task failed");
            }
            EventKind::FailureHandled => {
                tracing::debug!(target: "tasklab::events", supervisor, task, reason, "failure handled");
            }
            EventKind::SupervisorCanceled => {
                tracing::info!(target: "tasklab::events", supervisor, "supervisor canceled");
            }
            EventKind::TeardownRefused => {
                tracing::warn!(target: "tasklab::events", supervisor, "teardown refused");
            }
            EventKind::AllStoppedWithin => {
                tracing::info!(target: "tasklab::events", supervisor, "all tasks stopped within grace");
            }
            EventKind::GraceExceeded => {
                tracing::warn!(target: "tasklab::events", supervisor, stuck = reason, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "tasklab::events", subscriber = task, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "tasklab::events", subscriber = task, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
