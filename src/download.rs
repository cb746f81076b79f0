//! Stub long-running operation.
//!
//! A "download" that waits a fixed delay and then resumes its caller through
//! [`suspend_with`], the way a callback-based API would. It never fails and
//! always yields [`DOWNLOAD_RESULT`].

use std::time::Duration;

use crate::core::suspend_with;
use crate::error::TaskError;
use crate::logger::Logger;

/// Value every download resolves to.
pub const DOWNLOAD_RESULT: i32 = 30;

/// Fixed-delay download stub.
#[derive(Debug, Clone)]
pub struct StubDownload {
    logger: Logger,
    delay: Duration,
}

impl StubDownload {
    pub fn new(logger: Logger, delay: Duration) -> Self {
        Self { logger, delay }
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspends for the delay, then resolves with [`DOWNLOAD_RESULT`].
    pub async fn fetch(&self) -> Result<i32, TaskError> {
        tokio::time::sleep(self.delay).await;
        self.resolve().await
    }

    /// Like [`fetch`](Self::fetch) but holds the executing worker thread
    /// for the whole delay.
    ///
    /// Yields once after the sleep, so a task cancelled meanwhile stops
    /// there instead of resolving.
    pub async fn fetch_blocking(&self) -> Result<i32, TaskError> {
        std::thread::sleep(self.delay);
        tokio::task::yield_now().await;
        self.resolve().await
    }

    async fn resolve(&self) -> Result<i32, TaskError> {
        let logger = self.logger.clone();
        let value = suspend_with(move |resolver| {
            logger.log("download done");
            // First and only resume; cannot be rejected.
            let _ = resolver.resume(DOWNLOAD_RESULT);
        })
        .await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemorySink;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn never_returns_before_delay() {
        let sink = Arc::new(MemorySink::new());
        let download = StubDownload::new(Logger::new(sink.clone()), Duration::from_secs(5));

        let started = Instant::now();
        let value = download.fetch().await.expect("stub never fails");

        assert_eq!(value, DOWNLOAD_RESULT);
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert_eq!(sink.messages(), vec!["download done".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_download_logs_nothing() {
        let sink = Arc::new(MemorySink::new());
        let download = StubDownload::new(Logger::new(sink.clone()), Duration::from_secs(5));

        let res = tokio::time::timeout(Duration::from_secs(1), download.fetch()).await;
        assert!(res.is_err());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn blocking_variant_resolves_the_same() {
        let sink = Arc::new(MemorySink::new());
        let download = StubDownload::new(Logger::new(sink.clone()), Duration::from_millis(20));

        let started = std::time::Instant::now();
        assert_eq!(download.fetch_blocking().await, Ok(DOWNLOAD_RESULT));
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(sink.contains("download done"));
    }
}
