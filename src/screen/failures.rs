use crate::error::TaskError;

use super::Screen;

/// Two siblings under a child of the screen scope. The second fails; the
/// screen's handler logs it and the first still finishes.
pub(super) fn failures(screen: &Screen) {
    let scope = screen.main.child("exceptions").build();
    let tick = screen.app.config.tick;

    let logger = screen.app.logger.clone();
    scope.spawn("first", move |_ctx| async move {
        logger.log("first start");
        tokio::time::sleep(tick).await;
        logger.log("first finish");
        Ok(())
    });

    let logger = screen.app.logger.clone();
    scope.spawn("second", move |_ctx| async move {
        logger.log("second start");
        tokio::time::sleep(tick * 2).await;
        Err(TaskError::fail("second failed"))
    });
}
