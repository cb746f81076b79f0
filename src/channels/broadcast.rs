//! # Broadcast channel with independent, non-retroactive subscriptions.
//!
//! Every [`Subscription`] owns its own bounded queue. [`BroadcastChannel::send`]
//! pushes a clone of the value into each open subscription in turn, suspending
//! while any of them is full, so slow subscribers apply backpressure instead of
//! losing values.
//!
//! ```text
//!                       ┌──► [queue 1] ──► Subscription 1
//! send(v) ── clone ─────┼──► [queue 2] ──► Subscription 2
//!                       └──► [queue N] ──► Subscription N
//! ```
//!
//! ## Rules
//! - A subscription sees only values sent **after** it was opened
//! - Each subscription sees values in send order
//! - `close()` ends every subscription once its queue is drained
//! - Dropping a subscription unsubscribes it; `send` never waits on it again

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::error::ChannelError;

struct State<T> {
    subscribers: Vec<mpsc::Sender<T>>,
    closed: bool,
}

/// Channel that delivers every value to every open subscription.
pub struct BroadcastChannel<T> {
    state: Arc<Mutex<State<T>>>,
    capacity: usize,
}

impl<T> Clone for BroadcastChannel<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            capacity: self.capacity,
        }
    }
}

impl<T: Clone + Send> BroadcastChannel<T> {
    /// Creates an open channel; each subscription buffers up to `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                subscribers: Vec::new(),
                closed: false,
            })),
            capacity: capacity.max(1),
        }
    }

    /// Opens a subscription that receives every value sent from now on.
    ///
    /// On a closed channel the subscription is already exhausted.
    pub fn open_subscription(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.closed {
            state.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Delivers `value` to every open subscription.
    ///
    /// Fails with [`ChannelError::ClosedForSend`] after [`close`](Self::close).
    pub async fn send(&self, value: T) -> Result<(), ChannelError> {
        let targets = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.closed {
                return Err(ChannelError::ClosedForSend);
            }
            state.subscribers.clone()
        };

        let mut gone = false;
        for target in &targets {
            gone |= target.send(value.clone()).await.is_err();
        }
        if gone {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .subscribers
                .retain(|s| !s.is_closed());
        }
        Ok(())
    }

    /// Stops accepting values; subscriptions end after draining.
    ///
    /// Returns `true` if this call closed the channel.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return false;
        }
        state.closed = true;
        state.subscribers.clear();
        true
    }

    /// Number of subscriptions still open.
    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .iter()
            .filter(|s| !s.is_closed())
            .count()
    }
}

/// One consumer's view of a [`BroadcastChannel`].
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> Subscription<T> {
    /// Next value, or `None` once the channel is closed and this queue drained.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Passes every value to `f` until the channel is closed and drained.
    pub async fn consume_each<F>(&mut self, mut f: F)
    where
        F: FnMut(T),
    {
        while let Some(v) = self.rx.recv().await {
            f(v);
        }
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
