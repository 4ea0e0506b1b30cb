//! Monte Carlo Tree Search over Splendor positions.
//!
//! ## Overview
//!
//! - **Own-seat tree**: nodes for the searching seat are expanded with UCB1;
//!   other seats' moves are sampled from an opponent policy
//! - **Transpositions**: positions are keyed by the canonical state encoding,
//!   so different move orders share statistics
//! - **Tree reuse**: the root follows the real game between decisions
//! - **Bounded**: iteration count, wall-clock limit and node budget
//!
//! ## Usage
//!
//! ```rust
//! use splendor_arena::core::{GameConfig, PlayerId};
//! use splendor_arena::mcts::{MCTSConfig, MCTSSearch};
//! use splendor_arena::rules::{RulesEngine, SplendorRules};
//!
//! let mut rules = SplendorRules::with_seed(GameConfig::new(2).unwrap(), 7);
//! let state = rules.initial_state();
//!
//! let config = MCTSConfig::default().with_iterations(50);
//! let mut search = MCTSSearch::new(rules.clone(), config);
//!
//! let action = search.search(&state, PlayerId::new(0)).unwrap();
//! assert!(rules.legal_actions(&state, PlayerId::new(0)).contains(action));
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId, NodeKind};
pub use policy::{
    outcome_to_rewards, score_share, OpponentPolicy, RandomSimulation, SelectionPolicy,
    SimulationPolicy, UniformOpponent, UCB1,
};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, PositionKey, TreeStats};
