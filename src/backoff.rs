//! Failure backoff across poll runs.
//!
//! After a failed poll, subsequent runs are skipped until an exponentially
//! growing delay has elapsed since the last failure. The state is persisted
//! between runs by the caller; nothing here touches storage.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay after the first failure.
pub const BASE_DELAY: Duration = Duration::from_secs(60);

/// Upper bound on the pre-jitter delay.
pub const MAX_DELAY: Duration = Duration::from_secs(3600);

/// Fraction of the delay used as symmetric jitter.
pub const JITTER_FRACTION: f64 = 0.1;

// 60 * 2^6 already exceeds the cap; anything past this only risks overflow.
const MAX_EXPONENT: u32 = 16;

/// Consecutive-failure bookkeeping, persisted as a singleton row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffState {
    /// Number of consecutive failed polls.
    pub consecutive_failures: u32,
    /// When the most recent failure happened.
    pub last_failure_time: Option<DateTime<Utc>>,
}

impl BackoffState {
    /// Create a state with no recorded failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retry delay for the current failure count, with jitter applied.
    ///
    /// Jitter is applied after capping, so the result may exceed
    /// `MAX_DELAY` by up to `JITTER_FRACTION`.
    pub fn delay(&self) -> Duration {
        if self.consecutive_failures == 0 {
            return Duration::ZERO;
        }
        let unit: f64 = rand::rng().random_range(-1.0..=1.0);
        apply_jitter(capped_delay(self.consecutive_failures), unit)
    }

    /// Time left before a poll may proceed, or None if it may run now.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.consecutive_failures == 0 {
            return None;
        }
        let last_failure = self.last_failure_time?;
        let delay = self.delay();
        // A failure time in the future counts as zero elapsed.
        let elapsed = (now - last_failure).to_std().unwrap_or(Duration::ZERO);
        if elapsed < delay { Some(delay - elapsed) } else { None }
    }

    /// Reset after a successful poll.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.last_failure_time = None;
    }

    /// Record a failed poll at the current time.
    pub fn record_failure(&mut self) {
        self.record_failure_at(Utc::now());
    }

    /// Record a failed poll at the given time.
    pub fn record_failure_at(&mut self, now: DateTime<Utc>) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure_time = Some(now);
    }
}

/// `BASE_DELAY * 2^(failures - 1)`, capped at `MAX_DELAY`. Zero failures is zero.
pub fn capped_delay(failures: u32) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }
    let exponent = (failures - 1).min(MAX_EXPONENT);
    let delay = BASE_DELAY.saturating_mul(1u32 << exponent);
    delay.min(MAX_DELAY)
}

/// Scale `delay` by `1 + JITTER_FRACTION * unit`, where `unit` is in [-1, 1].
pub fn apply_jitter(delay: Duration, unit: f64) -> Duration {
    let unit = unit.clamp(-1.0, 1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + JITTER_FRACTION * unit))
}
