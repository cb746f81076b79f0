//! Channels: the only shared mutable structures between tasks.
//!
//! - [`Channel`] point-to-point queue (bounded, buffered or unlimited) with
//!   close-then-drain semantics, plus its [`SendChannel`] / [`ReceiveChannel`] views;
//! - [`BroadcastChannel`] one value to every [`Subscription`];
//! - [`produce`] generator task feeding a channel it closes when done;
//! - [`actor`] task draining its own mailbox.

mod actor;
mod broadcast;
mod channel;
mod produce;

pub use actor::actor;
pub use broadcast::{BroadcastChannel, Subscription};
pub use channel::{Capacity, Channel, DEFAULT_BUFFER, ReceiveChannel, SendChannel};
pub use produce::produce;
