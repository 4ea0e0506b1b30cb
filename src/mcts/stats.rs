//! Counters for a single decision.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What one call to `MCTSSearch::search` did.
///
/// Every iteration ends in exactly one of three ways: a rollout from a new
/// node, a known terminal position, or the depth cap. The three counters
/// add up to `iterations`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,
    /// Nodes whose legal actions were computed.
    pub nodes_expanded: u32,
    pub simulations: u32,
    pub terminal_hits: u32,
    pub depth_cutoffs: u32,
    /// Deepest node created, in plies below the first root.
    pub max_depth: u16,
    /// The root already had visits from an earlier decision.
    pub reused_root: bool,
    pub time_us: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        match self.time_us {
            0 => 0.0,
            us => f64::from(self.iterations) * 1e6 / us as f64,
        }
    }

    /// Share of iterations that were scored by a rollout.
    #[must_use]
    pub fn rollout_ratio(&self) -> f64 {
        match self.iterations {
            0 => 0.0,
            n => f64::from(self.simulations) / f64::from(n),
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations in {:.1}ms: {} rollouts, {} terminal, {} cut off, depth {}",
            self.iterations,
            self.time_us as f64 / 1000.0,
            self.simulations,
            self.terminal_hits,
            self.depth_cutoffs,
            self.max_depth,
        )?;
        if self.reused_root {
            f.write_str(" (reused)")?;
        }
        Ok(())
    }
}
