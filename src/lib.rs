//! # tasklab
//!
//! **Tasklab** is a small structured-concurrency showcase built on tokio.
//!
//! A single "screen" exposes twelve actions. Each one schedules a toy
//! asynchronous workflow (fire-and-forget tasks, scoped tasks, deferred
//! results, a blocking dispatch pool, failure isolation, channels, broadcast,
//! producers, actors and cold flows) and logs timestamped, thread-tagged
//! lifecycle lines while it runs.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                       ┌───────────────────────────────┐
//!   Screen::press(a) ──►│  action handler (sync, only   │
//!                       │  schedules work)              │
//!                       └──────┬───────────────┬────────┘
//!                              ▼               ▼
//!              ┌────────────────────┐   ┌────────────────────┐
//!              │ main: Supervisor   │   │ global: Supervisor │
//!              │ (screen scoped,    │   │ (unscoped,         │
//!              │  failure handler)  │   │  Teardown::Never)  │
//!              └──┬─────────────────┘   └─────────┬──────────┘
//!                 │ child scopes                  │
//!                 ▼                               ▼
//!          TaskRunner::run(token, body) ── select!(cancelled, catch_unwind(body))
//!                 │
//!                 │ publishes TaskSpawned / TaskCompleted / TaskFailed / TaskCanceled ...
//!                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                    (capacity: Config::bus_capacity)               │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       App listener ──► SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ### Building blocks
//! ```text
//! Supervisor ─ spawn ──────► TaskHandle   (fire-and-forget, failure → handler)
//!            ─ spawn_async ► Deferred<T>  (failure → awaiter)
//!            ─ child ──────► Supervisor   (cancelled with its parent)
//!
//! Channel<T> / BroadcastChannel<T> / produce / actor / Flow<T>
//!     the only shared mutable structures between tasks
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits                         |
//! |-----------------|---------------------------------------------------------------|--------------------------------------------|
//! | Supervision     | Scoped and unscoped task groups, nested scopes, grace shutdown | [`Supervisor`], [`SupervisorBuilder`]      |
//! | Failure routing | Uncaught failures go to a handler; siblings keep running       | [`Failure`], [`TaskOutcome`]               |
//! | Deferred values | Request/response tasks whose errors go to the awaiter          | [`Deferred`]                               |
//! | Suspension      | Resume a parked task exactly once                              | [`suspend_with`], [`Resolver`]             |
//! | Channels        | Bounded/unlimited queues, broadcast, producers, actors         | [`Channel`], [`BroadcastChannel`], [`produce`], [`actor`] |
//! | Streams         | Cold flows collected in the calling task                       | [`Flow`], [`Emitter`]                      |
//! | Observability   | Lifecycle events, subscribers, thread-tagged log lines         | [`Event`], [`Subscribe`], [`Logger`]       |
//!
//! ## Example
//! ```rust
//! use tasklab::{Capacity, Supervisor, TaskError, produce};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), tasklab::RuntimeError> {
//!     let sup = Supervisor::builder("example")
//!         .on_failure(|f| eprintln!("{} failed: {}", f.task, f.error))
//!         .build();
//!
//!     let numbers = produce(&sup, "numbers", Capacity::Bounded(1), |tx| async move {
//!         for v in 1..=3 {
//!             tx.send(v).await?;
//!         }
//!         Ok(())
//!     });
//!
//!     sup.spawn("printer", move |_ctx| async move {
//!         numbers.consume_each(|v| println!("{v}")).await;
//!         Ok(())
//!     });
//!     sup.spawn("boom", |_ctx| async { Err(TaskError::fail("boom")) });
//!
//!     sup.idle().await;
//!     sup.cancel()
//! }
//! ```
mod channels;
mod config;
mod core;
mod download;
mod error;
mod events;
mod flow;
mod logger;
mod screen;
mod subscribers;

// ---- Public re-exports ----

pub use channels::{
    BroadcastChannel, Capacity, Channel, DEFAULT_BUFFER, ReceiveChannel, SendChannel,
    Subscription, actor, produce,
};
pub use config::{Config, ReceiveMode};
pub use core::{
    Deferred, DispatchPool, Failure, FailureHandler, Resolver, Supervisor, SupervisorBuilder,
    TaskContext, TaskHandle, TaskOutcome, Teardown, suspend_with,
};
pub use download::{DOWNLOAD_RESULT, StubDownload};
pub use error::{ChannelError, PromiseError, RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use flow::{Emitter, Flow};
pub use logger::{ConsoleSink, LogEvent, LogSink, Logger, MemorySink, TracingSink, init_tracing};
pub use screen::{Action, App, Screen};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
