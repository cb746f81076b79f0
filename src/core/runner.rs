//! # Drive one task to its end.
//!
//! Races the task body against its cancellation token, converts panics into
//! [`TaskError::Panicked`], publishes exactly one terminal event and, for
//! fire-and-forget tasks, hands uncaught failures to the failure handler.
//!
//! ## Event flow
//! ```text
//! Ok(v)              → TaskCompleted
//! token cancelled    → TaskCanceled   (body dropped at its suspension point)
//! Err(Canceled)      → TaskCanceled
//! Err(e) / panic     → TaskFailed
//!                      └─ routed? → FailureHandler(&Failure) → FailureHandled
//! ```
//!
//! ## Rules
//! - Cancellation is checked **before** the first poll (`biased`), so a task
//!   spawned under a cancelled supervisor never starts
//! - The handler runs at most once per task, on the task's own thread
//! - Deferred tasks are never routed: their failure belongs to the awaiter

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use super::panic_message;
use super::registry::LiveGuard;
use super::supervisor::{Failure, FailureHandler};
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};

/// Everything needed to run and report one task.
pub(crate) struct TaskRunner {
    pub(crate) supervisor: Arc<str>,
    pub(crate) name: Arc<str>,
    pub(crate) token: CancellationToken,
    pub(crate) bus: Bus,
    pub(crate) handler: Option<FailureHandler>,
    pub(crate) route_failures: bool,
    pub(crate) guard: LiveGuard,
}

impl TaskRunner {
    /// Runs `fut` until it finishes or the token is cancelled.
    pub(crate) async fn run<T, Fut>(self, fut: Fut) -> Result<T, TaskError>
    where
        Fut: Future<Output = Result<T, TaskError>>,
    {
        let res = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(TaskError::Canceled),
            out = AssertUnwindSafe(fut).catch_unwind() => match out {
                Ok(res) => res,
                Err(panic) => Err(TaskError::Panicked { info: panic_message(&*panic) }),
            },
        };

        match &res {
            Ok(_) => self.publish(EventKind::TaskCompleted, None),
            Err(TaskError::Canceled) => self.publish(EventKind::TaskCanceled, None),
            Err(e) => {
                self.publish(EventKind::TaskFailed, Some(e));
                if self.route_failures {
                    self.route(e);
                }
            }
        }
        drop(self.guard);
        res
    }

    fn route(&self, error: &TaskError) {
        match &self.handler {
            Some(handler) => {
                let failure = Failure {
                    supervisor: Arc::clone(&self.supervisor),
                    task: Arc::clone(&self.name),
                    error: error.clone(),
                };
                handler(&failure);
                self.publish(EventKind::FailureHandled, Some(error));
            }
            None => {
                tracing::warn!(
                    supervisor = %self.supervisor,
                    task = %self.name,
                    error = %error,
                    label = error.as_label(),
                    "uncaught task failure without handler"
                );
            }
        }
    }

    fn publish(&self, kind: EventKind, error: Option<&TaskError>) {
        let mut ev = Event::new(kind)
            .with_supervisor(Arc::clone(&self.supervisor))
            .with_task(Arc::clone(&self.name));
        if let Some(e) = error {
            ev = ev.with_reason(e.to_string());
        }
        self.bus.publish(ev);
    }
}
