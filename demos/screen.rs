//! # Example: screen
//!
//! Opens the showcase screen, presses every action once, then destroys the
//! screen while the unscoped tasks keep logging.
//!
//! Shows how to:
//! - Build an [`App`] with a [`Config`] and a console [`Logger`]
//! - Attach the built-in [`LogWriter`] to watch runtime events via `tracing`
//! - Press [`Action`]s and observe the interleaved log lines
//! - Tear the screen down and see that only screen-scoped work stops
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► init_tracing("tasklab=info")
//!   ├─► App::new(cfg, Logger::console()).with_subscribers([LogWriter])
//!   ├─► Screen::create(&app)
//!   ├─► press(action) for every Action::ALL
//!   ├─► sleep 3 ticks
//!   ├─► Screen::shutdown()          (main scope cancelled)
//!   └─► sleep 4 ticks               (global tasks still log)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example screen
//! ```

use std::sync::Arc;
use std::time::Duration;

use tasklab::{Action, App, Config, LogWriter, Logger, Screen, Subscribe, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== screen example ===\n");

    // 1. Runtime diagnostics go through tracing; showcase lines go to stdout
    init_tracing("tasklab=info")?;

    // 2. Shorter delays than the defaults so the run fits in a few seconds
    let cfg = Config {
        tick: Duration::from_millis(500),
        download_delay: Duration::from_millis(2_500),
        dispatch_jobs: 16,
        ..Config::default()
    };
    let tick = cfg.tick;

    // 3. Process-wide context with an event subscriber
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let app = App::new(cfg, Logger::console())?.with_subscribers(subs);

    // 4. Open the screen and press everything
    let screen = Screen::create(&app);
    for action in Action::ALL {
        println!("--- {action} ---");
        screen.press(action);
    }

    // 5. Let the work run, then destroy the screen
    tokio::time::sleep(tick * 3).await;
    println!("\n--- destroying screen ---\n");
    if let Err(err) = screen.shutdown().await {
        println!("screen shutdown: {err}");
    }
    println!("still running under global: {:?}", app.global().live_tasks());

    // 6. Unscoped tasks keep logging after teardown
    tokio::time::sleep(tick * 4).await;

    println!("\n=== done ===");
    Ok(())
}
