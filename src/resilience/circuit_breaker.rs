//! Circuit breaker for upstream service protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: upstream assumed down, calls fail fast
//! - Half-Open: testing if the upstream recovered with a single probe
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure ratio >= threshold over a full request window
//! Open → Half-Open: after the open delay
//! Half-Open → Closed: probe call succeeds
//! Half-Open → Open: probe call fails
//! ```

use crate::utils::error::{ModerationError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Minimum calls in a window before the ratio is evaluated.
    pub request_volume_threshold: u32,
    /// Failure ratio at or above which the circuit opens.
    pub failure_ratio: f64,
    /// How long the circuit stays open before probing.
    pub open_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            request_volume_threshold: 20,
            failure_ratio: 0.5,
            open_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: State,
    window_requests: u32,
    window_failures: u32,
    opened_at: Option<Instant>,
    probe_in_flight: bool,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    service: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(service: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            service: service.into(),
            config,
            inner: Mutex::new(Inner {
                state: State::Closed,
                window_requests: 0,
                window_failures: 0,
                opened_at: None,
                probe_in_flight: false,
            }),
        }
    }

    /// Admission check before an attempt. Fails fast while open.
    pub fn try_acquire(&self) -> Result<()> {
        let mut inner = self.inner.lock().expect("circuit breaker lock poisoned");
        match inner.state {
            State::Closed => Ok(()),
            State::Open => {
                let elapsed = inner
                    .opened_at
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= Duration::from_millis(self.config.open_ms) {
                    tracing::info!(service = %self.service, "Circuit breaker half-open, probing");
                    inner.state = State::HalfOpen;
                    inner.probe_in_flight = true;
                    Ok(())
                } else {
                    Err(ModerationError::CircuitOpenError {
                        service: self.service.clone(),
                    })
                }
            }
            State::HalfOpen => {
                if inner.probe_in_flight {
                    Err(ModerationError::CircuitOpenError {
                        service: self.service.clone(),
                    })
                } else {
                    inner.probe_in_flight = true;
                    Ok(())
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock().expect("circuit breaker lock poisoned");
        match inner.state {
            State::HalfOpen => {
                tracing::info!(service = %self.service, "Circuit breaker closed after successful probe");
                Self::reset(&mut inner);
            }
            State::Closed => {
                inner.window_requests += 1;
                self.evaluate_window(&mut inner);
            }
            State::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("circuit breaker lock poisoned");
        match inner.state {
            State::HalfOpen => {
                tracing::warn!(service = %self.service, "Probe failed, circuit breaker re-opened");
                Self::open(&mut inner);
            }
            State::Closed => {
                inner.window_requests += 1;
                inner.window_failures += 1;
                self.evaluate_window(&mut inner);
            }
            State::Open => {}
        }
    }

    pub fn is_open(&self) -> bool {
        let inner = self.inner.lock().expect("circuit breaker lock poisoned");
        inner.state == State::Open
    }

    fn evaluate_window(&self, inner: &mut Inner) {
        if inner.window_requests < self.config.request_volume_threshold {
            return;
        }
        let ratio = inner.window_failures as f64 / inner.window_requests as f64;
        if ratio >= self.config.failure_ratio {
            tracing::warn!(
                service = %self.service,
                failures = inner.window_failures,
                requests = inner.window_requests,
                "Failure ratio {:.2} exceeded, opening circuit",
                ratio
            );
            Self::open(inner);
        } else {
            inner.window_requests = 0;
            inner.window_failures = 0;
        }
    }

    fn open(inner: &mut Inner) {
        inner.state = State::Open;
        inner.opened_at = Some(Instant::now());
        inner.window_requests = 0;
        inner.window_failures = 0;
        inner.probe_in_flight = false;
    }

    fn reset(inner: &mut Inner) {
        inner.state = State::Closed;
        inner.opened_at = None;
        inner.window_requests = 0;
        inner.window_failures = 0;
        inner.probe_in_flight = false;
    }
}
