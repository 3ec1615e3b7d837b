//! Inter-round wait controller
//!
//! ```text
//!   Idle ──begin_round──▶ RoundInFlight ──end_round──▶ Waiting(interval)
//!                              ▲                              │
//!                              └─────────begin_round──────────┘
//! ```
//!
//! The interval only moves at `end_round`: doubled when the round saw a rate
//! limit signal, otherwise raised by one floor step. Both are capped at the
//! ceiling.

use crate::attempt::AttemptOutcome;
use crate::error::{CoreError, Result};
use std::time::Duration;

/// Bounds for the inter-round wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Initial interval and additive step
    pub floor: Duration,
    pub ceiling: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            floor: Duration::from_secs(60),
            ceiling: Duration::from_secs(600),
        }
    }
}

impl BackoffConfig {
    pub fn new(floor: Duration, ceiling: Duration) -> Result<Self> {
        let config = Self { floor, ceiling };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.floor.is_zero() {
            return Err(CoreError::ZeroBackoffFloor);
        }
        if self.floor > self.ceiling {
            return Err(CoreError::BackoffFloorAboveCeiling {
                floor: self.floor,
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffPhase {
    Idle,
    RoundInFlight,
    Waiting(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffState {
    pub interval: Duration,
    pub floor: Duration,
    pub ceiling: Duration,
    /// A rate limit was observed in the current round
    pub rate_limited: bool,
}

#[derive(Debug, Clone)]
pub struct BackoffController {
    state: BackoffState,
    phase: BackoffPhase,
}

impl BackoffController {
    pub fn new(config: BackoffConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: BackoffState {
                interval: config.floor,
                floor: config.floor,
                ceiling: config.ceiling,
                rate_limited: false,
            },
            phase: BackoffPhase::Idle,
        })
    }

    pub fn phase(&self) -> BackoffPhase {
        self.phase
    }

    pub fn state(&self) -> &BackoffState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.state.interval
    }

    /// Back to the floor interval, as if freshly constructed
    pub fn reset(&mut self) {
        self.state.interval = self.state.floor;
        self.state.rate_limited = false;
        self.phase = BackoffPhase::Idle;
    }

    /// Enter a new round with the rate limit flag cleared
    pub fn begin_round(&mut self) {
        self.state.rate_limited = false;
        self.phase = BackoffPhase::RoundInFlight;
    }

    /// Feed one attempt outcome; only rate limiting is remembered
    pub fn observe(&mut self, outcome: &AttemptOutcome) {
        if matches!(outcome, AttemptOutcome::RateLimited { .. }) {
            self.state.rate_limited = true;
        }
    }

    /// Close a round without success and return the wait before the next one
    pub fn end_round(&mut self) -> Duration {
        let BackoffState {
            interval,
            floor,
            ceiling,
            rate_limited,
        } = self.state;

        let next = if rate_limited {
            interval.saturating_mul(2)
        } else {
            interval.saturating_add(floor)
        };
        self.state.interval = next.min(ceiling);
        self.phase = BackoffPhase::Waiting(self.state.interval);

        tracing::debug!(
            rate_limited,
            interval_secs = self.state.interval.as_secs(),
            "Round closed"
        );
        self.state.interval
    }
}
