use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThrottleError {
    #[error("too many calls")]
    TooManyCalls,
}

/// Token bucket gate.
///
/// The bucket starts full with `max` tokens and gains `refill` tokens for
/// every elapsed `interval`, never exceeding `max`. Each admitted call spends
/// one token; calls on an empty bucket are rejected without running.
///
/// `execute` takes `&mut self` and the throttle does no internal locking.
/// Sharing one between tasks requires wrapping it in a mutex.
#[derive(Debug)]
pub struct Throttle {
    tokens: u32,
    max: u32,
    refill: u32,
    interval: Duration,
    last_refill: Instant,
}

impl Throttle {
    pub fn new(max: u32, refill: u32, interval: Duration) -> Self {
        Self {
            tokens: max,
            max,
            refill,
            interval,
            last_refill: Instant::now(),
        }
    }

    pub fn available_tokens(&mut self) -> u32 {
        self.refill_tokens();
        self.tokens
    }

    /// Run the effector if a token is available.
    ///
    /// Async work can be gated by returning the future from the effector and
    /// awaiting it after the call is admitted.
    pub fn execute<T, F>(&mut self, effector: F) -> Result<T, ThrottleError>
    where
        F: FnOnce() -> T,
    {
        self.refill_tokens();

        if self.tokens == 0 {
            tracing::debug!(max = self.max, "Throttle rejected call");
            return Err(ThrottleError::TooManyCalls);
        }

        self.tokens -= 1;
        Ok(effector())
    }

    fn refill_tokens(&mut self) {
        let now = Instant::now();

        if self.interval.is_zero() {
            self.tokens = self.max;
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill);
        let ticks = elapsed.as_nanos() / self.interval.as_nanos();
        if ticks == 0 {
            return;
        }

        let added = u64::try_from(ticks)
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(self.refill));
        let tokens = u64::from(self.tokens).saturating_add(added);
        self.tokens = u32::try_from(tokens.min(u64::from(self.max))).unwrap_or(self.max);

        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.last_refill += self.interval.saturating_mul(ticks);
    }
}
