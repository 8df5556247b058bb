use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

const BASE_COOL_DOWN: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    #[error("service unreachable")]
    Open,

    #[error(transparent)]
    Inner(E),
}

impl<E> CircuitBreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, CircuitBreakerError::Open)
    }

    pub fn into_inner(self) -> Option<E> {
        match self {
            CircuitBreakerError::Open => None,
            CircuitBreakerError::Inner(e) => Some(e),
        }
    }
}

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    last_attempt: Option<Instant>,
}

/// Rejects calls after repeated consecutive failures.
///
/// Once the failure count reaches the threshold the breaker stays open for
/// `base_cool_down << (failures - threshold)` measured from the last attempt,
/// then lets a single trial call through. Any success closes it again.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    base_cool_down: Duration,
    state: RwLock<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32) -> Self {
        Self::with_cool_down(failure_threshold, BASE_COOL_DOWN)
    }

    /// A threshold of 0 is treated as 1.
    pub fn with_cool_down(failure_threshold: u32, base_cool_down: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            base_cool_down,
            state: RwLock::new(BreakerState::default()),
        }
    }

    pub async fn consecutive_failures(&self) -> u32 {
        self.state.read().await.consecutive_failures
    }

    pub async fn run<T, E, F, Fut>(&self, circuit: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.should_attempt().await {
            return Err(CircuitBreakerError::Open);
        }

        let result = circuit().await;

        let mut state = self.state.write().await;
        state.last_attempt = Some(Instant::now());
        match result {
            Ok(value) => {
                state.consecutive_failures = 0;
                Ok(value)
            }
            Err(e) => {
                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                if state.consecutive_failures == self.failure_threshold {
                    tracing::warn!(
                        consecutive_failures = state.consecutive_failures,
                        "Circuit breaker opened"
                    );
                }
                Err(CircuitBreakerError::Inner(e))
            }
        }
    }

    async fn should_attempt(&self) -> bool {
        let state = self.state.read().await;

        if state.consecutive_failures < self.failure_threshold {
            return true;
        }

        let Some(last_attempt) = state.last_attempt else {
            return true;
        };

        let diff = state.consecutive_failures - self.failure_threshold;
        let cool_down = self
            .base_cool_down
            .saturating_mul(1u32.checked_shl(diff).unwrap_or(u32::MAX));

        Instant::now() > last_attempt + cool_down
    }
}
