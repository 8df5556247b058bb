use imgkeep_core::AppError;
use std::future::Future;
use tokio::task::JoinError;

fn task_result<T>(joined: Result<Result<T, AppError>, JoinError>) -> Result<T, AppError> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(AppError::Internal(format!("fan-out task failed: {}", e))),
    }
}

/// Run two fallible operations concurrently and wait for both.
///
/// The first error to arrive is returned right away. The other operation is
/// left running detached and its outcome is dropped.
pub async fn join_pair<A, B, FA, FB>(first: FA, second: FB) -> Result<(A, B), AppError>
where
    FA: Future<Output = Result<A, AppError>> + Send + 'static,
    FB: Future<Output = Result<B, AppError>> + Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
{
    let mut first = tokio::spawn(first);
    let mut second = tokio::spawn(second);

    let mut first_value = None;
    let mut second_value = None;

    while first_value.is_none() || second_value.is_none() {
        tokio::select! {
            joined = &mut first, if first_value.is_none() => {
                first_value = Some(task_result(joined)?);
            }
            joined = &mut second, if second_value.is_none() => {
                second_value = Some(task_result(joined)?);
            }
        }
    }

    match (first_value, second_value) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(AppError::Internal("fan-out finished without results".to_string())),
    }
}
