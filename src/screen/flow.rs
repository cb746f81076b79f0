use crate::flow::Flow;

use super::Screen;

/// A cold flow of three values collected by an unscoped task.
pub(super) fn flow(screen: &Screen) {
    let flow = Flow::new(|emitter| async move {
        for v in [20, 30, 40] {
            emitter.emit(v).await?;
        }
        Ok(())
    });

    let logger = screen.app.logger.clone();
    screen.app.global.spawn("flow-collector", move |_ctx| async move {
        flow.collect(|v| logger.log(v)).await
    });
}
