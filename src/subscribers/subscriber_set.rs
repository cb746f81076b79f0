//! # Non-blocking event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`]: distributes events to multiple subscribers
//! concurrently without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: slow/panicking subscriber doesn't affect others
//! - **Per-subscriber FIFO**: each subscriber sees events in order

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::core::panic_message;
use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        bus_for_worker
                            .publish(Event::subscriber_panicked(sub.name(), panic_message(&*panic)));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all subscribers without waiting for them.
    ///
    /// Overflow events are not re-published if they themselves overflow.
    pub fn emit(&self, event: Event) {
        let is_overflow_evt = event.is_subscriber_overflow();
        let event = Arc::new(event);

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_overflow_evt {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_overflow_evt {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Number of attached subscribers.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if no subscriber is attached.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Drops every queue and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Journal {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "journal"
        }
    }

    struct Exploding;

    #[async_trait]
    impl Subscribe for Exploding {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    #[tokio::test]
    async fn delivers_in_order_and_reports_panics() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let journal = Arc::new(Journal::default());
        let set = SubscriberSet::new(vec![journal.clone(), Arc::new(Exploding)], bus);
        assert_eq!(set.len(), 2);

        set.emit(Event::new(EventKind::TaskSpawned));
        set.emit(Event::new(EventKind::TaskCompleted));
        set.shutdown().await;

        assert_eq!(
            *journal.kinds.lock().unwrap(),
            vec![EventKind::TaskSpawned, EventKind::TaskCompleted]
        );

        let ev = rx.recv().await.expect("panic event");
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.task.as_deref(), Some("exploding"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
    }
}
