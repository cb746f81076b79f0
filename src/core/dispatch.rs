//! # Dedicated pool for blocking work.
//!
//! [`DispatchPool`] owns a separate multi-threaded tokio runtime with named
//! worker threads (`<prefix>-1`, `<prefix>-2`, ...). Supervisors built with
//! `.on(pool.handle().clone())` run their tasks there, so a task that blocks
//! its thread (synchronous sleep, CPU loop) only starves the pool, never the
//! main runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::RuntimeError;

/// Fixed-size pool of worker threads backed by its own runtime.
pub struct DispatchPool {
    runtime: Option<Runtime>,
    handle: Handle,
    threads: usize,
}

impl DispatchPool {
    /// Starts a pool of `threads` workers (at least one).
    pub fn new(threads: usize, prefix: &str) -> Result<Self, RuntimeError> {
        let threads = threads.max(1);
        let prefix: Arc<str> = Arc::from(prefix);
        let next = Arc::new(AtomicUsize::new(1));

        let runtime = Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name_fn(move || format!("{prefix}-{}", next.fetch_add(1, Ordering::Relaxed)))
            .enable_time()
            .build()
            .map_err(|source| RuntimeError::DispatchPool { source })?;
        let handle = runtime.handle().clone();

        Ok(Self {
            runtime: Some(runtime),
            handle,
            threads,
        })
    }

    /// Handle to spawn onto the pool.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl Drop for DispatchPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for DispatchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchPool")
            .field("threads", &self.threads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuntimeError, Supervisor, TaskError, TaskOutcome};
    use std::time::Duration;

    #[tokio::test]
    async fn tasks_run_on_named_pool_threads() {
        let pool = DispatchPool::new(2, "dispatch-test").expect("pool");
        let sup = Supervisor::builder("pool")
            .on(pool.handle().clone())
            .build();

        let thread = sup
            .spawn_async("where", |_ctx| async {
                Ok::<_, TaskError>(std::thread::current().name().map(str::to_owned))
            })
            .await
            .expect("value");

        let thread = thread.expect("named thread");
        assert!(thread.starts_with("dispatch-test-"), "ran on {thread}");
    }

    #[tokio::test]
    async fn blocked_workers_exceed_grace() {
        let pool = DispatchPool::new(1, "dispatch-block").expect("pool");
        let sup = Supervisor::builder("pool")
            .on(pool.handle().clone())
            .build();

        let handle = sup.spawn("blocker", |_ctx| async {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = sup.shutdown(Duration::from_millis(20)).await.unwrap_err();
        match err {
            RuntimeError::GraceExceeded { stuck, .. } => assert_eq!(stuck, vec!["blocker"]),
            other => panic!("unexpected error: {other}"),
        }
        // A blocked poll cannot observe cancellation; the body finishes normally.
        assert_eq!(handle.join().await, TaskOutcome::Completed);
    }
}
