use std::future::Future;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use super::deferred::Deferred;
use super::panic_message;
use super::supervisor::Supervisor;
use crate::error::TaskError;

/// How a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Body returned `Ok`.
    Completed,
    /// Body failed or panicked.
    Failed(TaskError),
    /// Task was cancelled (or its runtime went away) before finishing.
    Canceled,
}

impl TaskOutcome {
    pub(crate) fn from_result(res: Result<(), TaskError>) -> Self {
        match res {
            Ok(()) => TaskOutcome::Completed,
            Err(TaskError::Canceled) => TaskOutcome::Canceled,
            Err(e) => TaskOutcome::Failed(e),
        }
    }
}

/// Maps a join failure (runtime shutdown or escaped panic) onto a task error.
pub(crate) fn join_error(err: JoinError) -> TaskError {
    if err.is_panic() {
        TaskError::Panicked {
            info: panic_message(&*err.into_panic()),
        }
    } else {
        TaskError::Canceled
    }
}

/// Handle to a fire-and-forget task.
///
/// Dropping the handle detaches the task; it keeps running under its supervisor.
#[derive(Debug)]
pub struct TaskHandle {
    name: Arc<str>,
    token: CancellationToken,
    join: JoinHandle<Result<(), TaskError>>,
}

impl TaskHandle {
    pub(crate) fn new(
        name: Arc<str>,
        token: CancellationToken,
        join: JoinHandle<Result<(), TaskError>>,
    ) -> Self {
        Self { name, token, join }
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cancels this task and its children; siblings are unaffected.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the task has ended, for whatever reason.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the task to end.
    ///
    /// A failure observed here has already been delivered to the supervisor's
    /// failure handler.
    pub async fn join(self) -> TaskOutcome {
        match self.join.await {
            Ok(res) => TaskOutcome::from_result(res),
            Err(err) => TaskOutcome::from_result(Err(join_error(err))),
        }
    }
}

/// What a task body gets: its identity, its token and the means to spawn children.
///
/// Children spawned through the context are cancelled together with the task.
#[derive(Clone)]
pub struct TaskContext {
    name: Arc<str>,
    token: CancellationToken,
    supervisor: Supervisor,
}

impl TaskContext {
    pub(crate) fn new(name: Arc<str>, token: CancellationToken, supervisor: Supervisor) -> Self {
        Self {
            name,
            token,
            supervisor,
        }
    }

    /// Name of the running task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The task's cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once the task (or one of its owners) was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Supervisor that owns the task.
    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Spawns a child task under the same supervisor.
    pub fn spawn<F, Fut>(&self, name: impl Into<Arc<str>>, body: F) -> TaskHandle
    where
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.supervisor.spawn_under(&self.token, name.into(), body)
    }

    /// Spawns a child deferred computation under the same supervisor.
    pub fn spawn_async<T, F, Fut>(&self, name: impl Into<Arc<str>>, body: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.supervisor
            .spawn_async_under(&self.token, name.into(), body)
    }
}

impl std::fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskContext")
            .field("name", &self.name)
            .field("supervisor", &self.supervisor.name())
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
