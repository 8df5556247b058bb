use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const BASE_BACKOFF: Duration = Duration::from_secs(1);
const MAXIMUM_BACKOFF: Duration = Duration::from_secs(60);

/// Retries a failing operation with exponential backoff and jitter.
///
/// The effector receives the retry count, `0` for the first attempt. Before
/// retry `n` the task sleeps `base + jitter`, where jitter is uniform in
/// `[0, 3 * backoff)` and backoff doubles from `base` per retry, capped at
/// the maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retry {
    retries: u32,
    base_backoff: Duration,
    maximum_backoff: Duration,
}

impl Retry {
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            base_backoff: BASE_BACKOFF,
            maximum_backoff: MAXIMUM_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, base_backoff: Duration, maximum_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self.maximum_backoff = maximum_backoff;
        self
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Capped backoff used before the given retry (1-based).
    pub fn backoff_for(&self, retry_count: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry_count.saturating_sub(1))
            .unwrap_or(u32::MAX);

        self.base_backoff
            .saturating_mul(factor)
            .min(self.maximum_backoff)
    }

    fn sleep_for(&self, backoff: Duration) -> Duration {
        let bound = u64::try_from(backoff.as_nanos())
            .unwrap_or(u64::MAX)
            .saturating_mul(3);
        let jitter = if bound == 0 {
            0
        } else {
            rand::rng().random_range(0..bound)
        };

        self.base_backoff + Duration::from_nanos(jitter)
    }

    pub async fn execute<T, E, F, Fut>(&self, mut effector: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut result = effector(0).await;
        let mut retry_count = 0;

        while retry_count < self.retries {
            let err = match &result {
                Ok(_) => break,
                Err(e) => e,
            };

            retry_count += 1;
            let sleep = self.sleep_for(self.backoff_for(retry_count));

            tracing::warn!(
                error = %err,
                retry_count = retry_count,
                sleep_ms = sleep.as_millis() as u64,
                "Operation failed, retrying"
            );

            tokio::time::sleep(sleep).await;
            result = effector(retry_count).await;
        }

        result
    }
}
