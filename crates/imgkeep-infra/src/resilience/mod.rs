//! Resilience primitives
//!
//! Generic wrappers around fallible asynchronous operations. None of them are
//! applied to the image workflows automatically; callers opt in explicitly.

mod circuit_breaker;
mod debounce;
mod retry;
mod throttle;
mod timeout;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerError};
pub use debounce::{DebounceFirst, DebounceLast};
pub use retry::Retry;
pub use throttle::{Throttle, ThrottleError};
pub use timeout::{run_with_timeout, TimeoutError};
