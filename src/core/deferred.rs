//! # Deferred: a task that answers.
//!
//! Returned by [`Supervisor::spawn_async`](crate::Supervisor::spawn_async).
//! Awaiting a [`Deferred`] suspends the caller until the task resolves, then
//! yields its value or its failure. Failures are **not** routed to the
//! supervisor's failure handler: whoever awaits owns them.
//!
//! ```text
//! caller ── spawn_async(body) ──► Deferred<T> ── .await ──► Ok(T) | Err(TaskError)
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::handle::join_error;
use crate::error::TaskError;

/// Single-resolution handle to a value produced by a task.
#[derive(Debug)]
pub struct Deferred<T> {
    name: Arc<str>,
    token: CancellationToken,
    join: JoinHandle<Result<T, TaskError>>,
}

impl<T> Deferred<T> {
    pub(crate) fn new(
        name: Arc<str>,
        token: CancellationToken,
        join: JoinHandle<Result<T, TaskError>>,
    ) -> Self {
        Self { name, token, join }
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cancels the computation; awaiting it then yields `Err(TaskError::Canceled)`.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the value (or failure) is available.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.join).poll(cx).map(|res| match res {
            Ok(out) => out,
            Err(err) => Err(join_error(err)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::{Supervisor, TaskError};

    #[tokio::test(start_paused = true)]
    async fn await_yields_value_after_delay() {
        let sup = Supervisor::builder("scope").build();
        let start = tokio::time::Instant::now();

        let deferred = sup.spawn_async("answer", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, TaskError>("async result")
        });

        assert_eq!(deferred.await, Ok("async result"));
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reaches_awaiter_not_handler() {
        let handled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&handled);
        let sup = Supervisor::builder("scope")
            .on_failure(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        let deferred = sup.spawn_async("broken", |_ctx| async {
            Err::<u32, _>(TaskError::fail("no answer"))
        });

        assert_eq!(deferred.await, Err(TaskError::fail("no answer")));
        assert_eq!(handled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_deferred_resolves_to_canceled() {
        let sup = Supervisor::builder("scope").build();
        let deferred = sup.spawn_async("slow", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, TaskError>(1)
        });

        deferred.cancel();
        assert_eq!(deferred.await, Err(TaskError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn child_deferred_from_task_context() {
        let sup = Supervisor::builder("scope").build();
        let sum = sup.spawn_async("parent", |ctx| async move {
            let a = ctx.spawn_async("a", |_ctx| async { Ok::<_, TaskError>(20) });
            let b = ctx.spawn_async("b", |_ctx| async { Ok::<_, TaskError>(10) });
            Ok::<_, TaskError>(a.await? + b.await?)
        });
        assert_eq!(sum.await, Ok(30));
    }
}
