use crate::error::TaskError;

use super::Screen;

/// A deferred value computed by a child task and awaited by its parent.
pub(super) fn deferred(screen: &Screen) {
    let logger = screen.app.logger.clone();
    let delay = screen.app.config.ticks(5);

    screen.app.global.spawn("async", move |ctx| async move {
        let child_logger = logger.clone();
        let deferred = ctx.spawn_async("async-result", move |_ctx| async move {
            child_logger.log("async start");
            tokio::time::sleep(delay).await;
            child_logger.log("async end");
            Ok::<_, TaskError>("async result")
        });

        let result = deferred.await?;
        logger.log(format_args!("received {result}"));
        Ok(())
    });
}
