use std::future::Future;
use std::sync::Arc;

use super::channel::{Capacity, Channel, ReceiveChannel, SendChannel};
use crate::core::Supervisor;
use crate::error::TaskError;

/// Cancels the mailbox when the actor stops, so senders fail instead of hanging.
struct CancelOnDrop<T: Send>(Channel<T>);

impl<T: Send> Drop for CancelOnDrop<T> {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Starts an actor task and returns its mailbox.
///
/// `body` receives the inbox and typically drains it with
/// [`ReceiveChannel::consume_each`]. Closing the returned [`SendChannel`]
/// ends that loop after the queued messages; once the body ends for any
/// reason, further sends fail with
/// [`ChannelError::ClosedForSend`](crate::ChannelError::ClosedForSend).
pub fn actor<T, F, Fut>(
    supervisor: &Supervisor,
    name: impl Into<Arc<str>>,
    capacity: Capacity,
    body: F,
) -> SendChannel<T>
where
    T: Send + 'static,
    F: FnOnce(ReceiveChannel<T>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    let mailbox = Channel::new(capacity);
    let sender = mailbox.sender();

    // Owned by the future, so it also fires when the body is dropped unpolled.
    let guard = CancelOnDrop(mailbox);
    supervisor.spawn(name, move |_ctx| async move {
        let res = body(guard.0.receiver()).await;
        drop(guard);
        res
    });
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskOutcome;
    use crate::error::ChannelError;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn handles_messages_in_order_and_stops_on_close() {
        let sup = Supervisor::builder("actors").build();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let mailbox = actor(&sup, "printer", Capacity::Bounded(1), move |inbox| async move {
            inbox
                .consume_each(|v: i32| log.lock().unwrap().push(v))
                .await;
            Ok(())
        });

        for v in 1..=4 {
            mailbox.send(v).await.expect("actor alive");
        }
        mailbox.close();
        sup.idle().await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mailbox.send(5).await, Err(ChannelError::ClosedForSend));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_actor_rejects_blocked_sender() {
        let sup = Supervisor::builder("actors").build();
        let mailbox = actor(&sup, "one-shot", Capacity::Bounded(1), |inbox| async move {
            inbox.receive().await?;
            Ok(())
        });

        mailbox.send(1).await.expect("first");
        sup.idle().await;

        assert_eq!(mailbox.send(2).await, Err(ChannelError::ClosedForSend));
        let outcome = sup.spawn("noop", |_ctx| async { Ok(()) }).join().await;
        assert_eq!(outcome, TaskOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn actor_cancelled_before_first_poll_rejects_senders() {
        let sup = Supervisor::builder("actors").build();
        let mailbox = actor(&sup, "never-polled", Capacity::Bounded(1), |inbox| async move {
            inbox.consume_each(|_v: i32| {}).await;
            Ok(())
        });
        sup.cancel().expect("scoped");
        sup.idle().await;

        let res = tokio::time::timeout(Duration::from_secs(60), async {
            mailbox.send(1).await?;
            mailbox.send(2).await
        })
        .await
        .expect("sender must not hang");
        assert_eq!(res, Err(ChannelError::ClosedForSend));
    }
}
