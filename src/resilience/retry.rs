use crate::resilience::backoff::calculate_backoff;
use crate::resilience::circuit_breaker::CircuitBreaker;
use crate::utils::error::{ModerationError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Deadline for a single attempt, in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 500,
            max_retries: 2,
            retry_base_delay_ms: 50,
            retry_max_delay_ms: 1000,
        }
    }
}

/// Run `op` with a per-attempt timeout, retries with jittered backoff, and
/// circuit breaker accounting. Non-retryable errors and an open circuit
/// return immediately.
pub async fn execute<T, F, Fut>(
    service: &str,
    policy: &RetryPolicy,
    breaker: &CircuitBreaker,
    op: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let timeout = Duration::from_millis(policy.timeout_ms);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        breaker.try_acquire()?;

        let result = match tokio::time::timeout(timeout, op()).await {
            Ok(inner) => inner,
            Err(_) => Err(ModerationError::TimeoutError {
                service: service.to_string(),
                elapsed_ms: policy.timeout_ms,
            }),
        };

        match result {
            Ok(value) => {
                breaker.record_success();
                return Ok(value);
            }
            Err(e) => {
                breaker.record_failure();
                if attempt > policy.max_retries || !e.is_retryable() {
                    return Err(e);
                }
                let delay = calculate_backoff(attempt, policy.retry_base_delay_ms, policy.retry_max_delay_ms);
                tracing::debug!(
                    service = %service,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying after failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::circuit_breaker::CircuitBreakerConfig;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy {
            timeout_ms: 100,
            max_retries: 2,
            retry_base_delay_ms: 1,
            retry_max_delay_ms: 5,
        }
    }

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new("test", CircuitBreakerConfig::default())
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = execute("test", &policy(), &breaker(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ModerationError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = execute("test", &policy(), &breaker(), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(ModerationError::UpstreamStatusError {
                    service: "test".to_string(),
                    status: 500,
                })
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<u32> = execute("test", &policy(), &breaker(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ModerationError::UpstreamStatusError {
                service: "test".to_string(),
                status: 503,
            })
        })
        .await;
        assert!(result.is_err());
        // 1 initial attempt + 2 retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_retryable_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<u32> = execute("test", &policy(), &breaker(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ModerationError::InvalidScoreError {
                raw: "nan!".to_string(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn times_out_slow_attempts() {
        let result: Result<u32> = execute("test", &policy(), &breaker(), || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await;
        assert!(matches!(result, Err(ModerationError::TimeoutError { .. })));
    }

    #[tokio::test]
    async fn fails_fast_when_circuit_open() {
        let cb = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                request_volume_threshold: 2,
                failure_ratio: 0.5,
                open_ms: 60_000,
            },
        );
        cb.record_failure();
        cb.record_failure();
        assert!(cb.is_open());

        let calls = AtomicU32::new(0);
        let result: Result<u32> = execute("test", &policy(), &cb, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        })
        .await;
        assert!(matches!(
            result,
            Err(ModerationError::CircuitOpenError { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
