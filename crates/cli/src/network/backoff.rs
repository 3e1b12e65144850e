// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff schedule.

use std::time::Duration;

/// Delay schedule for a periodically retried operation.
///
/// While healthy the delay is `base`. The k-th consecutive failure yields
/// `min(base * 2^(k-1), max)`, so observed intervals run `base, 2·base,
/// 4·base, ...` up to `max`. One success resets to `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    failures: u32,
}

impl Backoff {
    /// Create a schedule. `max` is raised to `base` if smaller.
    pub fn new(base: Duration, max: Duration) -> Self {
        Backoff {
            base,
            max: max.max(base),
            failures: 0,
        }
    }

    /// Number of consecutive failures recorded.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Delay for the given failure exponent, capped at `max`.
    fn delay_for(&self, exponent: u32) -> Duration {
        2u32.checked_pow(exponent)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.max, |delay| delay.min(self.max))
    }

    /// Record a failure and return the delay before the next attempt.
    pub fn record_failure(&mut self) -> Duration {
        let delay = self.delay_for(self.failures);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    /// Record a success and return the delay before the next attempt.
    pub fn record_success(&mut self) -> Duration {
        self.failures = 0;
        self.base
    }
}
