//! # Live-task registry.
//!
//! Tracks which tasks of one supervisor are still running so that callers can
//! wait for idleness and shutdown can name the tasks that did not stop.
//!
//! ## Rules
//! - A task is registered before its future is spawned
//! - It is removed when its runner finishes **or** its future is dropped
//!   (runtime shutdown), via [`LiveGuard`]
//! - Waiters are woken every time the registry becomes empty

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

/// Set of running tasks of one supervisor.
#[derive(Default)]
pub(crate) struct Registry {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, Arc<str>>>,
    emptied: Notify,
}

impl Registry {
    /// Registers a task and returns a guard that deregisters it on drop.
    pub(crate) fn enter(self: &Arc<Self>, name: Arc<str>) -> LiveGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, name);
        LiveGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    fn leave(&self, id: u64) {
        let now_empty = {
            let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
            live.remove(&id);
            live.is_empty()
        };
        if now_empty {
            self.emptied.notify_waiters();
        }
    }

    /// Sorted names of the tasks still running.
    pub(crate) fn snapshot(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|n| n.to_string())
            .collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Resolves once no task is registered.
    pub(crate) async fn wait_empty(&self) {
        loop {
            let notified = self.emptied.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_empty() {
                return;
            }
            notified.await;
        }
    }
}

/// Deregisters its task when dropped.
pub(crate) struct LiveGuard {
    registry: Arc<Registry>,
    id: u64,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.registry.leave(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn snapshot_is_sorted_and_guards_deregister() {
        let registry = Arc::new(Registry::default());
        let b = registry.enter("beta".into());
        let a = registry.enter("alpha".into());
        assert_eq!(registry.snapshot(), vec!["alpha", "beta"]);

        drop(b);
        assert_eq!(registry.snapshot(), vec!["alpha"]);
        drop(a);
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_empty_wakes_when_last_task_leaves() {
        let registry = Arc::new(Registry::default());
        let guard = registry.enter("sleeper".into());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            drop(guard);
        });

        registry.wait_empty().await;
        assert!(registry.is_empty());
    }
}
