//! # Supervisor: owns a group of tasks, cancels them together, isolates their failures.
//!
//! A [`Supervisor`] is the lifecycle owner of every task spawned through it.
//! Tasks under one supervisor are siblings: an uncaught failure in one is
//! delivered to the supervisor's [`FailureHandler`] and **never** cancels the
//! others.
//!
//! ## Architecture
//! ```text
//! Supervisor (token) ──► spawn(name, body) ──► runner::run(child token, body)
//!       │                                           ├─ Ok      → TaskCompleted
//!       │                                           ├─ Canceled → TaskCanceled
//!       │                                           └─ Err/panic → TaskFailed
//!       │                                                  └──► FailureHandler(&Failure)
//!       │
//!       ├──► child(name) ──► nested Supervisor (token = parent.child_token())
//!       └──► cancel() ──► token.cancel() ──► every descendant stops at its next suspension point
//! ```
//!
//! ## Teardown policies
//! - [`Teardown::Cancel`]: the normal, screen-scoped case.
//! - [`Teardown::Never`]: the process-wide supervisor. [`Supervisor::cancel`]
//!   refuses with [`RuntimeError::TeardownForbidden`]; its tasks outlive any
//!   screen. This is a deliberate, visible leak: use [`Supervisor::live_tasks`]
//!   to see what is still running under it.
//!
//! ## Example
//! ```rust
//! use tasklab::{Supervisor, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sup = Supervisor::builder("screen")
//!         .on_failure(|f| eprintln!("{} failed: {}", f.task, f.error))
//!         .build();
//!
//!     sup.spawn("ok", |_ctx| async { Ok(()) });
//!     sup.spawn("boom", |_ctx| async { Err(TaskError::fail("boom")) });
//!
//!     sup.idle().await;
//!     sup.cancel().expect("scoped supervisors can be cancelled");
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::builder::SupervisorBuilder;
use super::deferred::Deferred;
use super::handle::{TaskContext, TaskHandle};
use super::registry::Registry;
use super::runner::TaskRunner;
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};

/// What happens when somebody asks a supervisor to tear down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Teardown {
    /// Cancel every descendant task.
    #[default]
    Cancel,
    /// Refuse; tasks are never cancelled by their owner.
    Never,
}

/// An uncaught task failure, as delivered to a [`FailureHandler`].
#[derive(Debug, Clone)]
pub struct Failure {
    /// Supervisor the task belonged to.
    pub supervisor: Arc<str>,
    /// Name of the failed task.
    pub task: Arc<str>,
    /// What went wrong.
    pub error: TaskError,
}

/// Callback invoked once per failed task, on the thread that ran the task.
pub type FailureHandler = Arc<dyn Fn(&Failure) + Send + Sync>;

pub(crate) struct Inner {
    pub(crate) name: Arc<str>,
    pub(crate) token: CancellationToken,
    pub(crate) teardown: Teardown,
    pub(crate) handler: Option<FailureHandler>,
    pub(crate) bus: Bus,
    pub(crate) runtime: Option<Handle>,
    pub(crate) registry: Arc<Registry>,
}

/// Owner of a group of tasks. Cheap to clone; clones share the same group.
#[derive(Clone)]
pub struct Supervisor {
    pub(crate) inner: Arc<Inner>,
}

impl Supervisor {
    /// Starts building a scoped supervisor named `name`.
    pub fn builder(name: impl Into<Arc<str>>) -> SupervisorBuilder {
        SupervisorBuilder::new(name)
    }

    /// Builds the process-wide supervisor: no owner, never torn down.
    pub fn unscoped(name: impl Into<Arc<str>>, bus: Bus) -> Self {
        SupervisorBuilder::new(name)
            .bus(bus)
            .teardown(Teardown::Never)
            .build()
    }

    /// Starts building a nested supervisor that is cancelled together with `self`.
    ///
    /// The child inherits bus, failure handler and runtime handle unless the
    /// builder overrides them. Its teardown policy is always [`Teardown::Cancel`].
    pub fn child(&self, name: impl Into<Arc<str>>) -> SupervisorBuilder {
        SupervisorBuilder::child_of(self, name)
    }

    pub(crate) fn from_inner(inner: Inner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Supervisor name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Teardown policy.
    pub fn teardown_policy(&self) -> Teardown {
        self.inner.teardown
    }

    /// True once [`cancel`](Self::cancel) (or a parent's cancel) took effect.
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Event bus this supervisor publishes to.
    pub fn bus(&self) -> &Bus {
        &self.inner.bus
    }

    /// Spawns a fire-and-forget task.
    ///
    /// `body` is called immediately to build the task's future; the future
    /// itself only starts once the runtime polls it, and never starts if the
    /// supervisor is already cancelled.
    pub fn spawn<F, Fut>(&self, name: impl Into<Arc<str>>, body: F) -> TaskHandle
    where
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.spawn_under(&self.inner.token, name.into(), body)
    }

    /// Spawns a task whose result (or failure) is delivered to the awaiter.
    pub fn spawn_async<T, F, Fut>(&self, name: impl Into<Arc<str>>, body: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.spawn_async_under(&self.inner.token, name.into(), body)
    }

    pub(crate) fn spawn_under<F, Fut>(
        &self,
        parent: &CancellationToken,
        name: Arc<str>,
        body: F,
    ) -> TaskHandle
    where
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let (ctx, runner) = self.prepare(parent, name, true);
        let token = ctx.token().clone();
        let name = Arc::clone(&runner.name);
        let join = self.spawn_raw(runner.run(body(ctx)));
        TaskHandle::new(name, token, join)
    }

    pub(crate) fn spawn_async_under<T, F, Fut>(
        &self,
        parent: &CancellationToken,
        name: Arc<str>,
        body: F,
    ) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let (ctx, runner) = self.prepare(parent, name, false);
        let token = ctx.token().clone();
        let name = Arc::clone(&runner.name);
        let join = self.spawn_raw(runner.run(body(ctx)));
        Deferred::new(name, token, join)
    }

    fn prepare(
        &self,
        parent: &CancellationToken,
        name: Arc<str>,
        route_failures: bool,
    ) -> (TaskContext, TaskRunner) {
        let token = parent.child_token();
        let guard = self.inner.registry.enter(Arc::clone(&name));
        self.inner.bus.publish(
            Event::new(EventKind::TaskSpawned)
                .with_supervisor(Arc::clone(&self.inner.name))
                .with_task(Arc::clone(&name)),
        );

        let ctx = TaskContext::new(Arc::clone(&name), token.clone(), self.clone());
        let runner = TaskRunner {
            supervisor: Arc::clone(&self.inner.name),
            name,
            token,
            bus: self.inner.bus.clone(),
            handler: if route_failures {
                self.inner.handler.clone()
            } else {
                None
            },
            route_failures,
            guard,
        };
        (ctx, runner)
    }

    fn spawn_raw<T, Fut>(&self, fut: Fut) -> JoinHandle<T>
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        match &self.inner.runtime {
            Some(handle) => handle.spawn(fut),
            None => tokio::spawn(fut),
        }
    }

    /// Cancels every descendant task.
    ///
    /// Idempotent. Refused with [`RuntimeError::TeardownForbidden`] when the
    /// teardown policy is [`Teardown::Never`].
    pub fn cancel(&self) -> Result<(), RuntimeError> {
        match self.inner.teardown {
            Teardown::Never => {
                self.inner.bus.publish(
                    Event::new(EventKind::TeardownRefused)
                        .with_supervisor(Arc::clone(&self.inner.name)),
                );
                Err(RuntimeError::TeardownForbidden {
                    supervisor: self.inner.name.to_string(),
                })
            }
            Teardown::Cancel => {
                if !self.inner.token.is_cancelled() {
                    self.inner.token.cancel();
                    self.inner.bus.publish(
                        Event::new(EventKind::SupervisorCanceled)
                            .with_supervisor(Arc::clone(&self.inner.name)),
                    );
                }
                Ok(())
            }
        }
    }

    /// Cancels, then waits up to `grace` for every task to stop.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] and returns [`RuntimeError::GraceExceeded`]
    /// with the names of the stuck tasks.
    pub async fn shutdown(&self, grace: Duration) -> Result<(), RuntimeError> {
        self.cancel()?;

        match tokio::time::timeout(grace, self.inner.registry.wait_empty()).await {
            Ok(()) => {
                self.inner.bus.publish(
                    Event::new(EventKind::AllStoppedWithin)
                        .with_supervisor(Arc::clone(&self.inner.name)),
                );
                Ok(())
            }
            Err(_elapsed) => {
                let stuck = self.inner.registry.snapshot();
                self.inner.bus.publish(
                    Event::new(EventKind::GraceExceeded)
                        .with_supervisor(Arc::clone(&self.inner.name))
                        .with_reason(stuck.join(",")),
                );
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }

    /// Sorted names of the tasks still running under this supervisor
    /// (nested supervisors keep their own list).
    pub fn live_tasks(&self) -> Vec<String> {
        self.inner.registry.snapshot()
    }

    /// Resolves once no task of this supervisor is running.
    pub async fn idle(&self) {
        self.inner.registry.wait_empty().await;
    }
}

impl fmt::Display for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("name", &self.inner.name)
            .field("teardown", &self.inner.teardown)
            .field("cancelled", &self.inner.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskOutcome;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn recording() -> (Arc<Mutex<Vec<String>>>, impl Fn(&Failure) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |f: &Failure| {
            sink.lock().unwrap().push(format!("{}: {}", f.task, f.error));
        })
    }

    #[tokio::test(start_paused = true)]
    async fn failure_goes_to_handler_and_siblings_survive() {
        let (seen, handler) = recording();
        let sup = Supervisor::builder("scope").on_failure(handler).build();

        let steady = sup.spawn("steady", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        });
        let failing = sup.spawn("failing", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Err(TaskError::fail("boom"))
        });

        assert_eq!(failing.join().await, TaskOutcome::Failed(TaskError::fail("boom")));
        assert_eq!(steady.join().await, TaskOutcome::Completed);
        assert_eq!(*seen.lock().unwrap(), vec!["failing: boom"]);
        assert!(!sup.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn panics_are_routed_like_failures() {
        let (seen, handler) = recording();
        let sup = Supervisor::builder("scope").on_failure(handler).build();

        let outcome = sup
            .spawn("panicky", |_ctx| async { panic!("kaboom") })
            .join()
            .await;

        assert_eq!(
            outcome,
            TaskOutcome::Failed(TaskError::Panicked {
                info: "kaboom".into()
            })
        );
        assert_eq!(*seen.lock().unwrap(), vec!["panicky: task panicked: kaboom"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_tasks_and_their_children() {
        let sup = Supervisor::builder("scope").build();
        let finished = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&finished);
        let parent = sup.spawn("parent", move |ctx| async move {
            let child = ctx.spawn("child", move |_ctx| async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(())
            });
            child.join().await;
            Ok(())
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sup.live_tasks(), vec!["child", "parent"]);

        sup.cancel().expect("scoped");
        assert_eq!(parent.join().await, TaskOutcome::Canceled);
        sup.idle().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!finished.load(Ordering::SeqCst));
        assert!(sup.live_tasks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_after_cancel_never_runs() {
        let sup = Supervisor::builder("scope").build();
        sup.cancel().expect("scoped");

        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let outcome = sup
            .spawn("late", move |_ctx| async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .join()
            .await;

        assert_eq!(outcome, TaskOutcome::Canceled);
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn unscoped_supervisor_refuses_teardown() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let global = Supervisor::unscoped("global", bus);

        let err = global.cancel().unwrap_err();
        assert_eq!(err.as_label(), "runtime_teardown_forbidden");
        assert!(!global.is_cancelled());

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::TeardownRefused);

        let outcome = global
            .spawn("still-runs", |_ctx| async { Ok(()) })
            .join()
            .await;
        assert_eq!(outcome, TaskOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn child_supervisor_follows_parent_cancellation() {
        let parent = Supervisor::builder("parent").build();
        let child = parent.child("child").build();

        let task = child.spawn("sleeper", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

        parent.cancel().expect("scoped");
        assert!(child.is_cancelled());
        assert_eq!(task.join().await, TaskOutcome::Canceled);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_tasks_to_stop() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let sup = Supervisor::builder("scope").bus(bus).build();

        sup.spawn("sleeper", |_ctx| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        sup.shutdown(Duration::from_secs(1)).await.expect("stops in time");
        assert!(sup.live_tasks().is_empty());

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::TaskSpawned,
                EventKind::SupervisorCanceled,
                EventKind::TaskCanceled,
                EventKind::AllStoppedWithin,
            ]
        );
    }
}
