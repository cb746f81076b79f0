//! # Example: cancel_scope
//!
//! Demonstrates scoped cancellation and failure isolation with the bare
//! [`Supervisor`] API, without the screen.
//!
//! Shows how to:
//! - Install a failure handler that logs and swallows task failures
//! - Nest a child supervisor and spawn tasks and deferreds under it
//! - Cancel the parent and watch every descendant stop at its next suspension point
//! - Observe lifecycle [`Event`]s from the bus
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Supervisor "screen" (on_failure → log)
//!   │     └─► child "work"
//!   │           ├─► ticker   (logs every 200ms until cancelled)
//!   │           ├─► flaky    (fails after 300ms → handler)
//!   │           └─► answer   (deferred, awaited → 42)
//!   ├─► sleep 1s
//!   ├─► screen.cancel(), then work.shutdown(grace)
//!   └─► print the events seen on the bus
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example cancel_scope
//! ```

use std::time::Duration;

use tasklab::{Logger, Supervisor, TaskError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== cancel_scope example ===\n");

    let logger = Logger::console();

    // 1. Scoped supervisor with a logging failure handler
    let handler_logger = logger.clone();
    let screen = Supervisor::builder("screen")
        .on_failure(move |f| handler_logger.log(format_args!("{} failed: {}", f.task, f.error)))
        .build();
    let mut events = screen.bus().subscribe();

    // 2. Nested scope that follows the screen's cancellation
    let work = screen.child("work").build();

    let ticker_logger = logger.clone();
    work.spawn("ticker", move |_ctx| async move {
        let mut n = 0u32;
        loop {
            n += 1;
            ticker_logger.log(format_args!("tick #{n}"));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    });

    work.spawn("flaky", |_ctx| async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Err(TaskError::fail("flaky gave up"))
    });

    // 3. Deferred result, failure would surface here instead of the handler
    let answer = work.spawn_async("answer", |_ctx| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(42)
    });
    logger.log(format_args!("answer = {}", answer.await?));

    // 4. Let the ticker run, then cancel everything under the screen
    tokio::time::sleep(Duration::from_secs(1)).await;
    screen.cancel()?;
    work.shutdown(Duration::from_secs(1)).await?;
    logger.log(format_args!("live after shutdown: {:?}", work.live_tasks()));

    // 5. Replay what the bus saw
    println!("\n--- events ---");
    while let Ok(ev) = events.try_recv() {
        println!(
            "#{:<3} {:?} supervisor={:?} task={:?} reason={:?}",
            ev.seq, ev.kind, ev.supervisor, ev.task, ev.reason
        );
    }

    println!("\n=== done ===");
    Ok(())
}
