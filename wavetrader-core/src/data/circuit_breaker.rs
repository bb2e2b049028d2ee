//! Circuit breaker for the klines provider.
//!
//! Binance answers HTTP 429 when a client exceeds its request weight and
//! 418 (or 403 behind a WAF) once the IP is banned. Repeated 429s or any ban
//! response trip the breaker, which then refuses requests until the cooldown
//! has elapsed.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    Closed,
    Open { tripped_at: Instant },
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
}

/// Shared across threads; every method takes `&self`.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// Five-minute cooldown, trips after three consecutive failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(5 * 60), 3)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The guarded data stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a request may be sent now. Resets the breaker once the
    /// cooldown has expired.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open { tripped_at } if tripped_at.elapsed() >= self.cooldown => {
                inner.state = BreakerState::Closed;
                inner.consecutive_failures = 0;
                true
            }
            BreakerState::Open { .. } => false,
        }
    }

    pub fn record_success(&self) {
        self.lock().consecutive_failures = 0;
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold {
            inner.state = BreakerState::Open {
                tripped_at: Instant::now(),
            };
        }
    }

    /// Open immediately (IP ban).
    pub fn trip(&self) {
        self.lock().state = BreakerState::Open {
            tripped_at: Instant::now(),
        };
    }

    pub fn remaining_cooldown(&self) -> Duration {
        match self.lock().state {
            BreakerState::Closed => Duration::ZERO,
            BreakerState::Open { tripped_at } => {
                self.cooldown.saturating_sub(tripped_at.elapsed())
            }
        }
    }
}
