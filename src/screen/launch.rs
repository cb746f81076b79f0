use crate::core::Supervisor;

use super::Screen;

/// Fire-and-forget on the unscoped supervisor: nothing ever cancels it.
pub(super) fn launch(screen: &Screen) {
    let logger = screen.app.logger.clone();
    let download = screen.app.download.clone();

    screen.app.global.spawn("launch", move |ctx| async move {
        logger.log(format_args!("launchExample start on scope {}", ctx.supervisor()));
        download.fetch().await?;
        logger.log("launchExample end");
        Ok(())
    });
}

/// The throwaway scope is cancelled before its task is first polled, so only
/// the unscoped task logs.
///
/// On a multi-threaded runtime a worker may still pick the scoped task up
/// before the cancel lands; it then stops at its first suspension point.
pub(super) fn scoped_launch(screen: &Screen) {
    let scope = Supervisor::builder("custom")
        .bus(screen.app.bus.clone())
        .build();

    let logger = screen.app.logger.clone();
    let download = screen.app.download.clone();
    scope.spawn("scopeLaunch-custom", move |ctx| async move {
        logger.log(format_args!("scopeLaunch custom start on scope {}", ctx.supervisor()));
        download.fetch().await?;
        logger.log("scopeLaunch custom end");
        Ok(())
    });

    let logger = screen.app.logger.clone();
    let download = screen.app.download.clone();
    screen.app.global.spawn("scopeLaunch-global", move |ctx| async move {
        logger.log(format_args!("scopeLaunch global start on scope {}", ctx.supervisor()));
        download.fetch().await?;
        logger.log("scopeLaunch global end");
        Ok(())
    });

    if let Err(err) = scope.cancel() {
        tracing::warn!(target: "tasklab::screen", error = %err, "custom scope refused teardown");
    }
}

/// Parent spawns a child download and joins it only when configured to.
pub(super) fn launch_join(screen: &Screen) {
    let logger = screen.app.logger.clone();
    let download = screen.app.download.clone();
    let join_child = screen.app.config.join_child;

    screen.app.global.spawn("launch-join", move |ctx| async move {
        logger.log("launch join start");
        let child = ctx.spawn("launch-join-child", move |_ctx| async move {
            download.fetch().await?;
            Ok(())
        });
        if join_child {
            child.join().await;
        }
        logger.log("launch join end");
        Ok(())
    });
}
