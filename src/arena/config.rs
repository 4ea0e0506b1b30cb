//! Arena configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default wall-clock budget for one `decide` call.
pub const DEFAULT_TURN_BUDGET: Duration = Duration::from_secs(300);

/// Default number of faults before a seat is retired.
pub const DEFAULT_MAX_STRIKES: u32 = 3;

/// Per-match limits and reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Budget for each decision. A late answer counts as a fault.
    pub turn_budget: Duration,

    /// Faults that retire a seat.
    pub max_strikes: u32,

    /// Narrate every turn at `info` level instead of `debug`.
    pub verbose: bool,

    /// Pause after each narrated turn so a watcher can follow along.
    /// Only verbose matches pause.
    #[serde(default)]
    pub wait: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            turn_budget: DEFAULT_TURN_BUDGET,
            max_strikes: DEFAULT_MAX_STRIKES,
            verbose: false,
            wait: Duration::ZERO,
        }
    }
}

impl ArenaConfig {
    #[must_use]
    pub fn with_turn_budget(mut self, budget: Duration) -> Self {
        self.turn_budget = budget;
        self
    }

    #[must_use]
    pub fn with_max_strikes(mut self, strikes: u32) -> Self {
        self.max_strikes = strikes;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// How long a request may sit behind an abandoned decision before the
    /// seat is charged for it: one turn budget per allowed strike.
    #[must_use]
    pub fn start_limit(&self) -> Duration {
        self.turn_budget.saturating_mul(self.max_strikes)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_budget.is_zero() {
            return Err(ConfigError::ZeroTurnBudget);
        }
        if self.max_strikes == 0 {
            return Err(ConfigError::ZeroStrikes);
        }
        Ok(())
    }
}
