use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::registry::Registry;
use super::supervisor::{Failure, FailureHandler, Inner, Supervisor, Teardown};
use crate::events::Bus;

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    name: Arc<str>,
    parent: Option<CancellationToken>,
    handler: Option<FailureHandler>,
    bus: Option<Bus>,
    runtime: Option<Handle>,
    teardown: Teardown,
}

impl SupervisorBuilder {
    /// Creates a builder for a root supervisor.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            handler: None,
            bus: None,
            runtime: None,
            teardown: Teardown::Cancel,
        }
    }

    pub(crate) fn child_of(parent: &Supervisor, name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.inner.token.clone()),
            handler: parent.inner.handler.clone(),
            bus: Some(parent.inner.bus.clone()),
            runtime: parent.inner.runtime.clone(),
            teardown: Teardown::Cancel,
        }
    }

    /// Installs the callback that receives every uncaught task failure.
    ///
    /// The handler only observes; returning from it swallows the failure.
    pub fn on_failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Failure) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Publishes lifecycle events to `bus` instead of a private one.
    pub fn bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Runs tasks on `runtime` instead of the ambient one.
    pub fn on(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Sets the teardown policy. Ignored for child supervisors, which always
    /// follow their parent.
    pub fn teardown(mut self, teardown: Teardown) -> Self {
        self.teardown = teardown;
        self
    }

    /// Builds the supervisor.
    pub fn build(self) -> Supervisor {
        let (token, teardown) = match self.parent {
            Some(parent) => (parent.child_token(), Teardown::Cancel),
            None => (CancellationToken::new(), self.teardown),
        };
        Supervisor::from_inner(Inner {
            name: self.name,
            token,
            teardown,
            handler: self.handler,
            bus: self.bus.unwrap_or_default(),
            runtime: self.runtime,
            registry: Arc::new(Registry::default()),
        })
    }
}
