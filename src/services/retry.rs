use std::future::Future;
use std::time::Duration;

use crate::errors::AppError;

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_backoff: Duration::ZERO,
        }
    }

    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_millis(100),
        }
    }
}

/// Runs `op`, retrying only `StoreUnavailable` with exponential backoff.
/// Any other error, or the last unavailable one, is returned as is.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, op_name: &str, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(AppError::StoreUnavailable(reason)) if attempt < policy.max_retries => {
                let delay = policy.backoff_for(attempt);
                tracing::warn!(op = op_name, attempt = attempt + 1, ?delay, %reason, "store unavailable, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
