//! imgkeep Infrastructure Library
//!
//! This crate provides shared infrastructure components used across imgkeep:
//! - Resilience primitives (retry, circuit breaker, debounce, throttle, timeout)
//! - Telemetry initialization
//! - Error response conversion

pub mod error;
pub mod resilience;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use resilience::{
    run_with_timeout, CircuitBreaker, CircuitBreakerError, DebounceFirst, DebounceLast, Retry,
    Throttle, ThrottleError, TimeoutError,
};
pub use telemetry::{init_telemetry, init_test_telemetry, shutdown_telemetry, LogFormat};
