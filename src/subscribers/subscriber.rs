//! # Observers of supervisor lifecycle events.
//!
//! A [`Subscribe`] implementation sees every [`Event`] the bus carries: task
//! spawns and outcomes, failures swallowed by a scope's handler, teardown and
//! grace results. [`App::with_subscribers`](crate::App::with_subscribers)
//! attaches them; a [`SubscriberSet`](super::SubscriberSet) then feeds each one
//! from its own queue on its own task, so a panicking or slow observer never
//! reaches the supervisors it watches.
//!
//! Delivery is in publish order per subscriber. A full queue loses the event
//! for that subscriber alone and is reported as `SubscriberOverflow`.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use async_trait::async_trait;
//! use tasklab::{Event, EventKind, Subscribe};
//!
//! /// Failures a scope's handler logged and swallowed.
//! #[derive(Default)]
//! struct HandledFailures(AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for HandledFailures {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::FailureHandled {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "handled-failures"
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let counter = HandledFailures::default();
//! counter.on_event(&Event::new(EventKind::TaskFailed).with_task("second")).await;
//! counter.on_event(&Event::new(EventKind::FailureHandled).with_task("second")).await;
//! assert_eq!(counter.0.load(Ordering::Relaxed), 1);
//! # }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives supervisor events off the publishing path.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Runs on this subscriber's worker task.
    async fn on_event(&self, event: &Event);

    /// Label carried by this subscriber's overflow and panic events.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Events that may wait for this subscriber before new ones are lost.
    /// Values below 1 are raised to 1.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
