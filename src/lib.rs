//! # splendor-arena
//!
//! A Splendor rules engine and a fault-tolerant arena for pitting decision
//! agents against each other.
//!
//! ## Design Principles
//!
//! 1. **Dense, explicit state**: [`BoardState`] is a plain aggregate of
//!    fixed-size fields with a versioned byte encoding.
//!
//! 2. **One action space**: every move is an index in `0..80`. The rules
//!    engine owns the encoding and the legality mask.
//!
//! 3. **Untrusted agents**: each agent runs on its own worker thread under a
//!    wall-clock budget. Faults become passes and strikes, never crashes.
//!
//! 4. **Explicit randomness**: matches, facades and agents each own a
//!    [`GameRng`] stream forked from the trial seed.
//!
//! ## Modules
//!
//! - `core`: gems, cards, players, actions, board state, RNG, configuration
//! - `rules`: the `RulesEngine` trait and the Splendor implementation
//! - `facade`: read-only projections and lookahead for agents
//! - `mcts`: Monte Carlo tree search over action indices
//! - `agents`: the `Agent` interface and the bundled strategies
//! - `arena`: the match loop, seat workers and tournaments
//! - `error`: error types

pub mod agents;
pub mod arena;
pub mod core;
pub mod error;
pub mod facade;
pub mod mcts;
pub mod rules;

pub use crate::core::{
    Action, ActionIndex, ActionMask, BoardState, Card, Color, GameConfig, GameRng, Gems, Noble,
    PlayerId, PlayerMap, ACTION_SIZE, NOOP,
};

pub use crate::rules::{Outcome, RulesEngine, SplendorRules};

pub use crate::facade::GameFacade;

pub use crate::agents::{Agent, AgentContext, Entrant};

pub use crate::arena::{
    Arena, ArenaConfig, Competition, DisplayPolicy, MatchEnding, MatchReport, Tournament,
    TournamentConfig, TournamentReport,
};

pub use crate::mcts::{MCTSConfig, MCTSSearch, SearchStats};

pub use crate::error::{AgentError, CodecError, ConfigError, Error, Result};
