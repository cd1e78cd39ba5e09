//! Resilience for upstream calls.
//!
//! Every external call goes through `retry::execute`, which layers a
//! per-attempt timeout, jittered exponential backoff retries, and a
//! per-service circuit breaker.

pub mod backoff;
pub mod circuit_breaker;
pub mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
pub use retry::RetryPolicy;
