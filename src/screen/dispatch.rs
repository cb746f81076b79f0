use crate::core::Supervisor;

use super::Screen;

/// Submits `dispatch_jobs` jobs to the blocking pool; each holds its worker
/// thread for one tick.
pub(super) fn dispatch_pool(screen: &Screen) {
    let scope = Supervisor::builder("dispatchers")
        .bus(screen.app.bus.clone())
        .on(screen.app.pool.handle().clone())
        .build();
    let tick = screen.app.config.tick;

    for i in 0..screen.app.config.dispatch_jobs {
        let logger = screen.app.logger.clone();
        scope.spawn(format!("dispatcher-{i}"), move |_ctx| async move {
            std::thread::sleep(tick);
            logger.log(format_args!("dispatcher {i}"));
            Ok(())
        });
    }
}

/// Runs the blocking download on the pool, under the screen scope.
pub(super) fn blocking_download(screen: &Screen) {
    let scope = screen
        .main
        .child("blocking")
        .on(screen.app.pool.handle().clone())
        .build();
    let logger = screen.app.logger.clone();
    let download = screen.app.download.clone();

    scope.spawn("downloadWithBlock", move |_ctx| async move {
        logger.log("downloadWithBlock start");
        let value = download.fetch_blocking().await?;
        logger.log(format_args!("downloadWithBlock end {value}"));
        Ok(())
    });
}
