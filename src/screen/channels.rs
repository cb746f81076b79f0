use crate::channels::{self, BroadcastChannel, Capacity, Channel};
use crate::config::ReceiveMode;

use super::Screen;

/// Producer sends 1, 2, 3 and closes; the consumer drains per `receive_mode`.
pub(super) fn channel(screen: &Screen) {
    let channel = Channel::bounded(screen.app.config.channel_capacity());
    let global = &screen.app.global;

    let tx = channel.sender();
    global.spawn("channel-producer", move |_ctx| async move {
        for v in 1..=3 {
            tx.send(v).await?;
        }
        tx.close();
        Ok(())
    });

    let rx = channel.receiver();
    let logger = screen.app.logger.clone();
    let mode = screen.app.config.receive_mode;
    global.spawn("channel-consumer", move |_ctx| async move {
        match mode {
            ReceiveMode::FixedCount => {
                for _ in 0..3 {
                    logger.log(rx.receive().await?);
                }
            }
            ReceiveMode::UntilClosed => {
                while let Some(v) = rx.next().await {
                    logger.log(v);
                }
            }
        }
        Ok(())
    });
}

/// Both subscriptions open before the sender starts, so each sees 1..=4.
pub(super) fn broadcast(screen: &Screen) {
    let channel = BroadcastChannel::new(screen.app.config.broadcast_capacity());
    let subscriptions = [channel.open_subscription(), channel.open_subscription()];
    let global = &screen.app.global;
    let tick = screen.app.config.tick;

    global.spawn("broadcast-sender", move |_ctx| async move {
        tokio::time::sleep(tick).await;
        for v in 1..=4 {
            channel.send(v).await?;
        }
        channel.close();
        Ok(())
    });

    for (n, mut subscription) in subscriptions.into_iter().enumerate() {
        let logger = screen.app.logger.clone();
        global.spawn(format!("broadcast-subscriber-{}", n + 1), move |_ctx| async move {
            subscription.consume_each(|v| logger.log(v)).await;
            Ok(())
        });
    }
}

/// Generator of 1..=4 drained with `consume_each`.
pub(super) fn produce(screen: &Screen) {
    let global = &screen.app.global;
    let numbers = channels::produce(global, "producer", Capacity::Bounded(1), |tx| async move {
        for v in 1..=4 {
            tx.send(v).await?;
        }
        Ok(())
    });

    let logger = screen.app.logger.clone();
    global.spawn("produce-consumer", move |_ctx| async move {
        numbers.consume_each(|v| logger.log(v)).await;
        Ok(())
    });
}

/// Actor logging every message; a task sends 1..=4 and closes the mailbox.
pub(super) fn actor(screen: &Screen) {
    let global = &screen.app.global;
    let logger = screen.app.logger.clone();
    let capacity = Capacity::Bounded(screen.app.config.mailbox_capacity());

    let mailbox = channels::actor(global, "actor", capacity, move |inbox| async move {
        inbox.consume_each(|v: i32| logger.log(v)).await;
        Ok(())
    });

    global.spawn("actor-sender", move |_ctx| async move {
        for v in 1..=4 {
            mailbox.send(v).await?;
        }
        mailbox.close();
        Ok(())
    });
}
