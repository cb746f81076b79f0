//! # Event subscribers for the tasklab runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Runner ── publish(Event) ──► Bus ──► App listener ──► SubscriberSet::emit
//!                                                          │
//!                                                ┌─────────┼─────────┐
//!                                                ▼         ▼         ▼
//!                                            LogWriter   Custom     ...
//! ```

mod log;
mod subscriber;
mod subscriber_set;

pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
