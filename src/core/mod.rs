//! Runtime core: supervisors, tasks and their handles.
//!
//! The public API from this module is [`Supervisor`] and the types that flow
//! in and out of it. Internal modules:
//! - [`supervisor`]: owns a group of tasks, cancels them together, routes failures;
//! - [`builder`]: fluent construction of scoped, unscoped and child supervisors;
//! - [`runner`]: drives one task to completion/cancellation and publishes its events;
//! - [`registry`]: live-task bookkeeping used for idleness and stuck-task reports;
//! - [`handle`]: task handles, outcomes and the context handed to task bodies;
//! - [`deferred`]: request/response tasks whose failure goes to the awaiter;
//! - [`promise`]: single-resolution suspension of the current task;
//! - [`dispatch`]: dedicated pool for work that blocks its thread.

mod builder;
mod deferred;
mod dispatch;
mod handle;
mod promise;
mod registry;
mod runner;
mod supervisor;

use std::any::Any;

pub use builder::SupervisorBuilder;
pub use deferred::Deferred;
pub use dispatch::DispatchPool;
pub use handle::{TaskContext, TaskHandle, TaskOutcome};
pub use promise::{Resolver, suspend_with};
pub use supervisor::{Failure, FailureHandler, Supervisor, Teardown};

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
