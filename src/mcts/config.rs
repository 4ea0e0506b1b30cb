//! Search budget and tuning knobs.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// `c` in UCB1. Larger values spread visits more evenly.
    pub exploration_constant: f64,
    pub iterations: u32,
    /// Wall-clock cap per decision in milliseconds, 0 for none. The default
    /// stays well inside the arena's turn budget.
    pub time_limit_ms: u64,
    /// Plies below the root before a path is scored by prestige share,
    /// 0 for no cap.
    pub max_depth: u32,
    /// Moves per rollout before it is scored by prestige share.
    pub rollout_depth: u32,
    /// The tree is discarded once it holds this many nodes.
    pub max_nodes: usize,
    pub seed: u64,
    /// 0 plays the most visited action; above 0 samples by visit count.
    pub temperature: f64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            iterations: 400,
            time_limit_ms: 10_000,
            max_depth: 0,
            rollout_depth: 60,
            max_nodes: 200_000,
            seed: 42,
            temperature: 0.0,
        }
    }
}

impl MCTSConfig {
    /// A small budget with no clock, for tests and benches where the
    /// result must not depend on machine speed.
    #[must_use]
    pub fn fixed(iterations: u32, rollout_depth: u32) -> Self {
        Self {
            iterations,
            rollout_depth,
            time_limit_ms: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, plies: u32) -> Self {
        self.max_depth = plies;
        self
    }

    #[must_use]
    pub fn with_rollout_depth(mut self, moves: u32) -> Self {
        self.rollout_depth = moves;
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fit_a_turn_budget() {
        let config = MCTSConfig::default();
        assert_eq!(config.exploration_constant, std::f64::consts::SQRT_2);
        assert!(config.time_limit_ms > 0);
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_fixed_budget_has_no_clock() {
        let config = MCTSConfig::fixed(50, 10).with_seed(123).with_max_nodes(500);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.rollout_depth, 10);
        assert_eq!(config.time_limit_ms, 0);
        assert_eq!(config.max_nodes, 500);
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn test_json_round_trip() {
        let config = MCTSConfig::default().with_time_limit_ms(250).with_temperature(0.5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<MCTSConfig>(&json).unwrap(), config);
    }
}
