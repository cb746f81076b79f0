use std::future::Future;
use std::sync::Arc;

use super::channel::{Capacity, Channel, ReceiveChannel, SendChannel};
use crate::core::Supervisor;
use crate::error::TaskError;

/// Closes the channel however the producer body ends (return, failure, cancellation).
struct CloseOnDrop<T: Send>(Channel<T>);

impl<T: Send> Drop for CloseOnDrop<T> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Starts a generator task and returns the channel it feeds.
///
/// `body` receives the send side; when it returns (or fails, or is cancelled)
/// the channel is closed, so consumers iterating with
/// [`ReceiveChannel::consume_each`] terminate after the last value.
///
/// ```rust
/// use tasklab::{Capacity, Supervisor, produce};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sup = Supervisor::builder("gen").build();
/// let numbers = produce(&sup, "numbers", Capacity::Buffered, |tx| async move {
///     for v in 1..=4 {
///         tx.send(v).await?;
///     }
///     Ok(())
/// });
///
/// let mut seen = Vec::new();
/// numbers.consume_each(|v| seen.push(v)).await;
/// assert_eq!(seen, vec![1, 2, 3, 4]);
/// # }
/// ```
pub fn produce<T, F, Fut>(
    supervisor: &Supervisor,
    name: impl Into<Arc<str>>,
    capacity: Capacity,
    body: F,
) -> ReceiveChannel<T>
where
    T: Send + 'static,
    F: FnOnce(SendChannel<T>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    let channel = Channel::new(capacity);
    let receiver = channel.receiver();

    // Owned by the future, so it also fires when the body is dropped unpolled.
    let guard = CloseOnDrop(channel);
    supervisor.spawn(name, move |_ctx| async move {
        let res = body(guard.0.sender()).await;
        drop(guard);
        res
    });
    receiver
}
