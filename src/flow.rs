//! # Cold reactive stream.
//!
//! A [`Flow`] is a recipe, not a running producer: nothing happens until
//! [`Flow::collect`] is awaited, and every `collect` runs the body again from
//! the start. The body runs inside the collecting task, interleaved with the
//! collector through a one-slot hand-off, so each `emit` suspends until the
//! previous value has been consumed.
//!
//! ```text
//! collect(cb) ──┬── body(Emitter) ── emit(v) ──► [slot: 1] ──┐
//!               └── loop { cb(v) } ◄─────────────────────────┘   (same task)
//! ```
//!
//! ## Example
//! ```rust
//! use tasklab::Flow;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let flow = Flow::new(|emitter| async move {
//!     for v in [20, 30, 40] {
//!         emitter.emit(v).await?;
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(flow.to_vec().await, Ok(vec![20, 30, 40]));
//! assert_eq!(flow.to_vec().await, Ok(vec![20, 30, 40]));
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::error::TaskError;

type Body<T> = Arc<dyn Fn(Emitter<T>) -> BoxFuture<'static, Result<(), TaskError>> + Send + Sync>;

/// Cold, cloneable stream of values.
pub struct Flow<T> {
    body: Body<T>,
}

impl<T> Clone for Flow<T> {
    fn clone(&self) -> Self {
        Self {
            body: Arc::clone(&self.body),
        }
    }
}

impl<T: Send + 'static> Flow<T> {
    /// Wraps a producer body; it runs once per [`collect`](Self::collect).
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: Fn(Emitter<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            body: Arc::new(move |emitter| Box::pin(body(emitter))),
        }
    }

    /// Runs the body, passing every emitted value to `f` in order.
    ///
    /// Returns once the body finishes, with the body's result.
    pub async fn collect<F>(&self, mut f: F) -> Result<(), TaskError>
    where
        F: FnMut(T),
    {
        let (tx, mut rx) = mpsc::channel(1);
        let producer = (self.body)(Emitter { tx });
        let consumer = async {
            while let Some(v) = rx.recv().await {
                f(v);
            }
        };

        let (res, ()) = tokio::join!(producer, consumer);
        res
    }

    /// Collects every value into a vector.
    pub async fn to_vec(&self) -> Result<Vec<T>, TaskError> {
        let mut out = Vec::new();
        self.collect(|v| out.push(v)).await?;
        Ok(out)
    }
}

impl<T> std::fmt::Debug for Flow<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow").finish_non_exhaustive()
    }
}

/// Handle a [`Flow`] body emits through.
pub struct Emitter<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Emitter<T> {
    /// Hands `value` to the collector, suspending until it has room.
    ///
    /// Fails with [`TaskError::Canceled`] once the collector is gone.
    pub async fn emit(&self, value: T) -> Result<(), TaskError> {
        self.tx.send(value).await.map_err(|_| TaskError::Canceled)
    }
}
