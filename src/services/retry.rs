use backon::{ExponentialBuilder, Retryable};
use std::{fmt::Display, future::Future, time::Duration};

/// Bounded exponential backoff for calls to external services.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        // backon counts retries, not attempts.
        let max_retries = self.max_attempts.saturating_sub(1) as usize;

        ExponentialBuilder::default()
            .with_min_delay(self.initial_backoff)
            .with_max_delay(self.max_backoff)
            .with_max_times(max_retries)
    }

    /// Runs `operation` until it succeeds, fails with an error that
    /// `is_retryable` rejects, or `max_attempts` is used up. The last error is
    /// returned.
    pub async fn retry<T, E, F, Fut, R>(
        &self,
        operation: F,
        is_retryable: R,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: Display,
    {
        let mut retry = 0u32;

        operation
            .retry(self.backoff())
            .sleep(tokio::time::sleep)
            .when(is_retryable)
            .notify(move |e: &E, delay: Duration| {
                retry += 1;
                tracing::warn!(
                    retry,
                    delay = ?delay,
                    error = %e,
                    "attempt failed, retrying"
                );
            })
            .await
    }
}
