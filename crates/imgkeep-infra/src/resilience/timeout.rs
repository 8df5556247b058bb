use std::future::Future;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    #[error("operation timed out after {0:?}")]
    Elapsed(Duration),

    #[error("operation panicked: {0}")]
    Panicked(String),
}

/// Race an operation against a deadline.
///
/// The operation runs on its own task. When the deadline wins the task is
/// detached and keeps running, and its result is discarded.
pub async fn run_with_timeout<T, Fut>(limit: Duration, operation: Fut) -> Result<T, TimeoutError>
where
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => Err(TimeoutError::Panicked(join_error.to_string())),
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "Operation timed out");
            Err(TimeoutError::Elapsed(limit))
        }
    }
}
