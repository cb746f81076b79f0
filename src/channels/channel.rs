//! # Point-to-point channel with close-then-drain semantics.
//!
//! [`Channel`] is a shared handle: every clone can send, receive and close.
//! Internally it is a tokio `mpsc` queue whose only long-lived sender sits
//! behind a lock, so closing is just dropping that sender.
//!
//! ## Lifecycle
//! ```text
//!   open ── close() ──► closing (queued items still receivable) ── drained ──► closed
//!    │                      send → Err(ClosedForSend)                receive → Err(ClosedForReceive)
//!    └──── cancel() ─────────────────────────────────────────────► cancelled (pending sends fail too)
//! ```
//!
//! ## Rules
//! - `send` suspends while the buffer is full; `receive` suspends while empty
//! - Values are delivered in send order
//! - A send already suspended when `close()` runs still completes once space frees up
//! - With several receivers each value goes to exactly one of them

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::error::ChannelError;

/// Default buffer of [`Capacity::Buffered`].
pub const DEFAULT_BUFFER: usize = 64;

/// Buffer size of a [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most `n` queued values (clamped to at least 1).
    Bounded(usize),
    /// [`DEFAULT_BUFFER`] queued values.
    Buffered,
    /// No limit; `send` never suspends.
    Unlimited,
}

enum Tx<T> {
    Bounded(mpsc::Sender<T>),
    Unlimited(mpsc::UnboundedSender<T>),
}

impl<T> Clone for Tx<T> {
    fn clone(&self) -> Self {
        match self {
            Tx::Bounded(tx) => Tx::Bounded(tx.clone()),
            Tx::Unlimited(tx) => Tx::Unlimited(tx.clone()),
        }
    }
}

impl<T> Tx<T> {
    async fn send(&self, value: T) -> Result<(), ChannelError> {
        match self {
            Tx::Bounded(tx) => tx.send(value).await.map_err(|_| ChannelError::ClosedForSend),
            Tx::Unlimited(tx) => tx.send(value).map_err(|_| ChannelError::ClosedForSend),
        }
    }
}

enum Rx<T> {
    Bounded(mpsc::Receiver<T>),
    Unlimited(mpsc::UnboundedReceiver<T>),
}

impl<T> Rx<T> {
    async fn recv(&mut self) -> Option<T> {
        match self {
            Rx::Bounded(rx) => rx.recv().await,
            Rx::Unlimited(rx) => rx.recv().await,
        }
    }

}

struct Shared<T> {
    tx: Mutex<Option<Tx<T>>>,
    rx: AsyncMutex<Rx<T>>,
    cancelled: CancellationToken,
    capacity: Capacity,
}

/// Ordered, optionally bounded queue shared by its producers and consumers.
pub struct Channel<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send> Channel<T> {
    /// Creates an open channel.
    pub fn new(capacity: Capacity) -> Self {
        let (tx, rx) = match capacity {
            Capacity::Bounded(n) => {
                let (tx, rx) = mpsc::channel(n.max(1));
                (Tx::Bounded(tx), Rx::Bounded(rx))
            }
            Capacity::Buffered => {
                let (tx, rx) = mpsc::channel(DEFAULT_BUFFER);
                (Tx::Bounded(tx), Rx::Bounded(rx))
            }
            Capacity::Unlimited => {
                let (tx, rx) = mpsc::unbounded_channel();
                (Tx::Unlimited(tx), Rx::Unlimited(rx))
            }
        };
        Self {
            shared: Arc::new(Shared {
                tx: Mutex::new(Some(tx)),
                rx: AsyncMutex::new(rx),
                cancelled: CancellationToken::new(),
                capacity,
            }),
        }
    }

    /// Shorthand for `Channel::new(Capacity::Bounded(n))`.
    pub fn bounded(n: usize) -> Self {
        Self::new(Capacity::Bounded(n))
    }

    /// Capacity the channel was created with.
    pub fn capacity(&self) -> Capacity {
        self.shared.capacity
    }

    /// Sends `value`, suspending while the buffer is full.
    ///
    /// Fails with [`ChannelError::ClosedForSend`] once the channel is closed,
    /// or as soon as it is cancelled while this send is suspended.
    pub async fn send(&self, value: T) -> Result<(), ChannelError> {
        let tx = self
            .shared
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ChannelError::ClosedForSend)?;
        tokio::select! {
            biased;
            _ = self.shared.cancelled.cancelled() => Err(ChannelError::ClosedForSend),
            res = tx.send(value) => res,
        }
    }

    /// Receives the next value, suspending while the channel is empty.
    ///
    /// Fails with [`ChannelError::ClosedForReceive`] once the channel is
    /// closed and every queued value has been taken.
    pub async fn receive(&self) -> Result<T, ChannelError> {
        self.next().await.ok_or(ChannelError::ClosedForReceive)
    }

    /// Like [`receive`](Self::receive) but ends iteration with `None`.
    ///
    /// ```rust
    /// # async fn drain(ch: tasklab::Channel<i32>) {
    /// while let Some(v) = ch.next().await {
    ///     println!("{v}");
    /// }
    /// # }
    /// ```
    pub async fn next(&self) -> Option<T> {
        self.shared.rx.lock().await.recv().await
    }

    /// Passes every value to `f` until the channel is closed and drained.
    pub async fn consume_each<F>(&self, mut f: F)
    where
        F: FnMut(T),
    {
        while let Some(v) = self.next().await {
            f(v);
        }
    }

    /// Stops accepting values; queued ones stay receivable.
    ///
    /// Returns `true` if this call closed the channel, `false` if it already was.
    pub fn close(&self) -> bool {
        self.shared
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    /// Closes both ends: pending and future sends fail.
    ///
    /// Queued values remain receivable.
    pub fn cancel(&self) {
        self.close();
        self.shared.cancelled.cancel();
    }

    /// True once [`close`](Self::close) or [`cancel`](Self::cancel) ran.
    pub fn is_closed_for_send(&self) -> bool {
        self.shared
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Send-only view of this channel.
    pub fn sender(&self) -> SendChannel<T> {
        SendChannel {
            channel: self.clone(),
        }
    }

    /// Receive-only view of this channel.
    pub fn receiver(&self) -> ReceiveChannel<T> {
        ReceiveChannel {
            channel: self.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("capacity", &self.shared.capacity)
            .finish_non_exhaustive()
    }
}

/// Send half of a [`Channel`] (what an actor hands out).
pub struct SendChannel<T> {
    channel: Channel<T>,
}

impl<T> Clone for SendChannel<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T: Send> SendChannel<T> {
    /// See [`Channel::send`].
    pub async fn send(&self, value: T) -> Result<(), ChannelError> {
        self.channel.send(value).await
    }

    /// See [`Channel::close`].
    pub fn close(&self) -> bool {
        self.channel.close()
    }

    /// See [`Channel::is_closed_for_send`].
    pub fn is_closed_for_send(&self) -> bool {
        self.channel.is_closed_for_send()
    }
}

/// Receive half of a [`Channel`] (what a producer hands out).
pub struct ReceiveChannel<T> {
    channel: Channel<T>,
}

impl<T> Clone for ReceiveChannel<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T: Send> ReceiveChannel<T> {
    /// See [`Channel::receive`].
    pub async fn receive(&self) -> Result<T, ChannelError> {
        self.channel.receive().await
    }

    /// See [`Channel::next`].
    pub async fn next(&self) -> Option<T> {
        self.channel.next().await
    }

    /// See [`Channel::consume_each`].
    pub async fn consume_each<F>(&self, f: F)
    where
        F: FnMut(T),
    {
        self.channel.consume_each(f).await
    }

    /// Stops the producer: its next send fails.
    pub fn cancel(&self) {
        self.channel.cancel()
    }
}
