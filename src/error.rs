//! Error types used by the tasklab runtime, its tasks and its channels.
//!
//! This module defines the following enums:
//!
//! - [`RuntimeError`]: errors raised by supervisors and runtime plumbing.
//! - [`TaskError`]: errors raised by (or delivered to) individual tasks.
//! - [`ChannelError`]: send/receive on a closed channel.
//! - [`PromiseError`]: misuse of a single-resolution [`Resolver`](crate::Resolver).
//!
//! All types provide `as_label` for logging, and [`TaskError`] converts from
//! the channel and promise errors so task bodies can use `?` directly.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the tasklab runtime.
///
/// These represent failures of the orchestration layer itself rather than of
/// the user code running inside tasks.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Cancellation was requested on a supervisor whose teardown policy forbids it.
    #[error("supervisor {supervisor:?} is never torn down")]
    TeardownForbidden {
        /// Name of the supervisor that refused.
        supervisor: String,
    },

    /// Shutdown grace period was exceeded; some tasks were still running.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the tasks that did not stop in time.
        stuck: Vec<String>,
    },

    /// The dedicated blocking dispatch pool could not be started.
    #[error("failed to start dispatch pool: {source}")]
    DispatchPool {
        /// Underlying runtime builder error.
        #[source]
        source: std::io::Error,
    },

    /// The diagnostics subscriber could not be installed.
    #[error("failed to initialise logging: {reason}")]
    Logging {
        /// What went wrong.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tasklab::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::TeardownForbidden { .. } => "runtime_teardown_forbidden",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::DispatchPool { .. } => "runtime_dispatch_pool",
            RuntimeError::Logging { .. } => "runtime_logging",
        }
    }
}

/// # Errors produced by task execution.
///
/// A task body returns `Result<_, TaskError>`. Under a supervisor, an `Err`
/// other than [`TaskError::Canceled`] is an uncaught failure and is routed to
/// the supervisor's failure handler. Under a [`Deferred`](crate::Deferred) it is
/// delivered to whoever awaits the result instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task was cancelled through its supervisor, its parent or its handle.
    #[error("task cancelled")]
    Canceled,

    /// Task body panicked.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },

    /// A channel operation failed inside the task.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// A suspended continuation could not be resumed.
    #[error(transparent)]
    Promise(#[from] PromiseError),
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tasklab::TaskError;
    ///
    /// assert_eq!(TaskError::fail("boom").as_label(), "task_failed");
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Channel(_) => "task_channel",
            TaskError::Promise(_) => "task_promise",
        }
    }

    /// True for cooperative cancellation, which is never reported as a failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

/// # Errors produced by channel operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// `send` on a channel that has been closed or cancelled.
    #[error("channel was closed")]
    ClosedForSend,

    /// `receive` on a channel that has been closed and fully drained.
    #[error("channel was closed and drained")]
    ClosedForReceive,
}

/// # Errors produced by single-resolution continuations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseError {
    /// The continuation was already resumed once.
    #[error("continuation already resumed")]
    AlreadyResolved,

    /// Every resolver was dropped without resuming the continuation.
    #[error("continuation abandoned without a value")]
    Abandoned,
}
