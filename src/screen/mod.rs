//! # The showcase screen.
//!
//! One screen, twelve independent actions. Each action only *schedules*
//! work and returns; the scheduled tasks log their progress through the
//! shared [`Logger`].
//!
//! ## Ownership
//! ```text
//! App (process lifetime)
//!  ├─ Bus ──► optional SubscriberSet listener
//!  ├─ global: unscoped Supervisor (Teardown::Never) ── outlives every screen
//!  ├─ DispatchPool (dedicated worker threads)
//!  └─ StubDownload
//!
//! Screen (create → press* → destroy)
//!  └─ main: scoped Supervisor ── cancelled by destroy()
//!      └─ child scopes (Failures, BlockingDownload)
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use tasklab::{Action, App, Config, Logger, Screen};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tasklab::RuntimeError> {
//!     let app = App::new(Config::default(), Logger::console())?;
//!     let screen = Screen::create(&app);
//!
//!     screen.press(Action::Launch);
//!     screen.press(Action::Flow);
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(6)).await;
//!     screen.destroy()
//! }
//! ```

mod channels;
mod deferred;
mod dispatch;
mod failures;
mod flow;
mod launch;

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::core::{DispatchPool, Supervisor, Teardown};
use crate::download::StubDownload;
use crate::error::RuntimeError;
use crate::events::Bus;
use crate::logger::Logger;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Process-wide context shared by every screen. Cheap to clone.
#[derive(Clone)]
pub struct App {
    config: Arc<Config>,
    logger: Logger,
    bus: Bus,
    global: Supervisor,
    pool: Arc<DispatchPool>,
    download: StubDownload,
}

impl App {
    /// Creates the bus, the unscoped supervisor and the dispatch pool.
    ///
    /// Must be called inside a tokio runtime. Fails if the pool's threads
    /// cannot be started.
    pub fn new(config: Config, logger: Logger) -> Result<Self, RuntimeError> {
        let bus = Bus::new(config.bus_capacity());
        let pool = DispatchPool::new(config.dispatch_threads(), "dispatch-worker")?;

        let handler_logger = logger.clone();
        let global = Supervisor::builder("global")
            .bus(bus.clone())
            .teardown(Teardown::Never)
            .on_failure(move |failure| handler_logger.log(&failure.error))
            .build();

        let download = StubDownload::new(logger.clone(), config.download_delay);
        Ok(Self {
            config: Arc::new(config),
            logger,
            bus,
            global,
            pool: Arc::new(pool),
            download,
        })
    }

    /// Forwards every runtime event to `subs`.
    ///
    /// The listener lives as long as the runtime; lagged events are skipped.
    pub fn with_subscribers(self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        if subs.is_empty() {
            return self;
        }
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(subs, self.bus.clone());

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(ev),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(target: "tasklab::events", skipped, "event listener lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        });
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The unscoped supervisor; its tasks survive every screen teardown.
    pub fn global(&self) -> &Supervisor {
        &self.global
    }

    pub fn pool(&self) -> &DispatchPool {
        &self.pool
    }

    pub fn download(&self) -> &StubDownload {
        &self.download
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("global", &self.global)
            .field("pool_threads", &self.pool.threads())
            .finish_non_exhaustive()
    }
}

/// The twelve things a user can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Fire-and-forget download on the unscoped supervisor.
    Launch,
    /// One task on a throwaway scope cancelled at once, one on the unscoped supervisor.
    ScopedLaunch,
    /// Deferred computation awaited by another task.
    Deferred,
    /// Parent spawning a child download, optionally joining it.
    LaunchJoin,
    /// Many blocking jobs on the dispatch pool.
    DispatchPool,
    /// Sibling tasks where one fails without affecting the other.
    Failures,
    /// Point-to-point channel between a producer and a consumer.
    Channel,
    /// One sender, two subscriptions.
    Broadcast,
    /// Generator task feeding its own channel.
    Produce,
    /// Task draining its own mailbox.
    Actor,
    /// Cold stream collected by a task.
    Flow,
    /// Download that blocks its worker thread.
    BlockingDownload,
}

impl Action {
    /// Every action, in screen order.
    pub const ALL: [Action; 12] = [
        Action::Launch,
        Action::ScopedLaunch,
        Action::Deferred,
        Action::LaunchJoin,
        Action::DispatchPool,
        Action::Failures,
        Action::Channel,
        Action::Broadcast,
        Action::Produce,
        Action::Actor,
        Action::Flow,
        Action::BlockingDownload,
    ];

    /// Stable snake_case label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Launch => "launch",
            Action::ScopedLaunch => "scoped_launch",
            Action::Deferred => "deferred",
            Action::LaunchJoin => "launch_join",
            Action::DispatchPool => "dispatch_pool",
            Action::Failures => "failures",
            Action::Channel => "channel",
            Action::Broadcast => "broadcast",
            Action::Produce => "produce",
            Action::Actor => "actor",
            Action::Flow => "flow",
            Action::BlockingDownload => "blocking_download",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A live screen with its own scoped supervisor.
#[derive(Debug)]
pub struct Screen {
    app: App,
    main: Supervisor,
}

impl Screen {
    /// Opens a screen whose failure handler logs the failure message and
    /// swallows it.
    pub fn create(app: &App) -> Self {
        let logger = app.logger.clone();
        let main = Supervisor::builder("main")
            .bus(app.bus.clone())
            .on_failure(move |failure| logger.log(&failure.error))
            .build();
        Self {
            app: app.clone(),
            main,
        }
    }

    /// The screen-scoped supervisor.
    pub fn main_scope(&self) -> &Supervisor {
        &self.main
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Runs `action`'s handler, bracketed by click log lines.
    ///
    /// Returns as soon as the handler has scheduled its tasks.
    pub fn press(&self, action: Action) {
        tracing::debug!(target: "tasklab::screen", action = action.label(), "pressed");
        self.app.logger.log("onClick, start");
        match action {
            Action::Launch => launch::launch(self),
            Action::ScopedLaunch => launch::scoped_launch(self),
            Action::Deferred => deferred::deferred(self),
            Action::LaunchJoin => launch::launch_join(self),
            Action::DispatchPool => dispatch::dispatch_pool(self),
            Action::Failures => failures::failures(self),
            Action::Channel => channels::channel(self),
            Action::Broadcast => channels::broadcast(self),
            Action::Produce => channels::produce(self),
            Action::Actor => channels::actor(self),
            Action::Flow => flow::flow(self),
            Action::BlockingDownload => dispatch::blocking_download(self),
        }
        self.app.logger.log("onClick, end");
    }

    /// Tears the screen down: every task under `main` is cancelled.
    ///
    /// Tasks on the unscoped supervisor keep running.
    pub fn destroy(&self) -> Result<(), RuntimeError> {
        self.main.cancel()
    }

    /// Like [`destroy`](Self::destroy), then waits up to `config.grace` for
    /// the screen's tasks to stop.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.main.shutdown(self.app.config.grace).await
    }
}
