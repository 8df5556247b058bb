use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const DEBOUNCE_TICK: Duration = Duration::from_millis(100);

struct FirstState<T, E> {
    threshold: Option<Instant>,
    result: Option<Result<T, E>>,
}

/// Runs the first call of a burst and replays its result for the rest.
///
/// Every call pushes the window end to `now + window`, so a steady stream of
/// calls keeps returning the cached result until the stream pauses.
pub struct DebounceFirst<T, E> {
    window: Duration,
    state: Mutex<FirstState<T, E>>,
}

impl<T, E> DebounceFirst<T, E>
where
    T: Clone,
    E: Clone,
{
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: Mutex::new(FirstState {
                threshold: None,
                result: None,
            }),
        }
    }

    pub async fn run<F, Fut>(&self, circuit: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut state = self.state.lock().await;

        let within_window = state
            .threshold
            .is_some_and(|threshold| Instant::now() < threshold);

        let result = match (&state.result, within_window) {
            (Some(cached), true) => cached.clone(),
            _ => {
                let result = circuit().await;
                state.result = Some(result.clone());
                result
            }
        };

        state.threshold = Some(Instant::now() + self.window);
        result
    }
}

type Circuit<T, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, E>> + Send>;

struct LastState<T, E> {
    threshold: Instant,
    pending: Option<Circuit<T, E>>,
    result: Option<Result<T, E>>,
    ticking: bool,
}

/// Coalesces a burst of calls into one invocation of the most recent circuit.
///
/// Each call replaces the pending circuit and pushes the quiet deadline to
/// `now + quiet_period`. A background ticker checks every 100ms and runs the
/// pending circuit once the deadline has passed, then stops until the next
/// call. `run` returns the result of the last completed invocation, if any.
pub struct DebounceLast<T, E> {
    quiet_period: Duration,
    state: Arc<Mutex<LastState<T, E>>>,
}

impl<T, E> DebounceLast<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            state: Arc::new(Mutex::new(LastState {
                threshold: Instant::now(),
                pending: None,
                result: None,
                ticking: false,
            })),
        }
    }

    pub async fn run<F, Fut>(&self, circuit: F) -> Option<Result<T, E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut state = self.state.lock().await;

        state.threshold = Instant::now() + self.quiet_period;
        state.pending = Some(Box::new(move || -> BoxFuture<'static, Result<T, E>> {
            Box::pin(circuit())
        }));

        if !state.ticking {
            state.ticking = true;
            tokio::spawn(Self::tick(self.state.clone()));
        }

        state.result.clone()
    }

    pub async fn last_result(&self) -> Option<Result<T, E>> {
        self.state.lock().await.result.clone()
    }

    async fn tick(state: Arc<Mutex<LastState<T, E>>>) {
        let mut ticker = tokio::time::interval(DEBOUNCE_TICK);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let circuit = {
                let mut guard = state.lock().await;
                if Instant::now() < guard.threshold {
                    continue;
                }
                match guard.pending.take() {
                    Some(circuit) => circuit,
                    None => {
                        guard.ticking = false;
                        break;
                    }
                }
            };

            let result = circuit().await;

            let mut guard = state.lock().await;
            guard.result = Some(result);
            if guard.pending.is_none() {
                guard.ticking = false;
                break;
            }
        }

        tracing::trace!("Debounce ticker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_debounce_first_replays_within_window() {
        let debounce = DebounceFirst::<usize, String>::new(Duration::from_millis(500));
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let result = debounce
                .run(|| async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) })
                .await;
            assert_eq!(result, Ok(1));
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(600)).await;
        let calls_after = calls.clone();
        let result = debounce
            .run(|| async move { Ok(calls_after.fetch_add(1, Ordering::SeqCst) + 1) })
            .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_first_caches_errors() {
        let debounce = DebounceFirst::<(), String>::new(Duration::from_secs(1));
        assert_eq!(
            debounce.run(|| async { Err("down".to_string()) }).await,
            Err("down".to_string())
        );
        assert_eq!(
            debounce.run(|| async { Ok(()) }).await,
            Err("down".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_last_runs_only_latest() {
        let debounce = DebounceLast::<usize, String>::new(Duration::from_millis(150));
        let calls = Arc::new(AtomicUsize::new(0));

        for n in 1..=3 {
            let calls = calls.clone();
            let previous = debounce
                .run(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(n)
                })
                .await;
            assert!(previous.is_none());
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(debounce.last_result().await, Some(Ok(3)));

        let next = debounce.run(|| async { Ok(4) }).await;
        assert_eq!(next, Some(Ok(3)));
    }
}
