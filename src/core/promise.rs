//! # Single-resolution suspension.
//!
//! [`suspend_with`] parks the current task until some callback resumes it
//! through a [`Resolver`]. The resolver may be cloned and handed to several
//! callbacks, but only the first [`Resolver::resume`] wins; later calls are
//! rejected with [`PromiseError::AlreadyResolved`].
//!
//! ```text
//! suspend_with(|r| register(r)) ──► (task parked) ◄── r.resume(v) ──► Ok(v)
//!                                                 ◄── all r dropped ─► Err(Abandoned)
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::error::PromiseError;

/// Resumes a task parked in [`suspend_with`], exactly once.
pub struct Resolver<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Resolver<T> {
    /// Resumes the parked task with `value`.
    ///
    /// Returns [`PromiseError::AlreadyResolved`] if any clone already resumed.
    pub fn resume(&self, value: T) -> Result<(), PromiseError> {
        let tx = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(PromiseError::AlreadyResolved)?;
        // The waiter may already be gone (cancelled); nothing to resume then.
        let _ = tx.send(value);
        Ok(())
    }

    /// True once some clone has resumed.
    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl<T> std::fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Calls `register` with a fresh [`Resolver`] and suspends until it resumes.
///
/// `register` runs synchronously, before the first suspension.
pub async fn suspend_with<T, F>(register: F) -> Result<T, PromiseError>
where
    F: FnOnce(Resolver<T>),
{
    let (tx, rx) = oneshot::channel();
    register(Resolver {
        slot: Arc::new(Mutex::new(Some(tx))),
    });
    rx.await.map_err(|_| PromiseError::Abandoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn resumes_synchronously() {
        let value = suspend_with(|r| {
            r.resume(30).expect("first resume");
        })
        .await;
        assert_eq!(value, Ok(30));
    }

    #[tokio::test]
    async fn second_resume_is_rejected() {
        let mut kept = None;
        let value = suspend_with(|r: Resolver<i32>| {
            r.resume(1).expect("first resume");
            kept = Some(r);
        })
        .await;
        assert_eq!(value, Ok(1));

        let r = kept.expect("resolver kept");
        assert!(r.is_resolved());
        assert_eq!(r.clone().resume(2), Err(PromiseError::AlreadyResolved));
    }

    #[tokio::test(start_paused = true)]
    async fn resumes_from_another_task() {
        let value = suspend_with(|r| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let _ = r.resume("late");
            });
        })
        .await;
        assert_eq!(value, Ok("late"));
    }

    #[tokio::test]
    async fn dropped_resolver_abandons() {
        let value = suspend_with(|r: Resolver<u8>| drop(r)).await;
        assert_eq!(value, Err(PromiseError::Abandoned));
    }
}
