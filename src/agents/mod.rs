//! Decision agents.
//!
//! Every strategy implements [`Agent`]. The arena builds one instance per
//! seat and per trial from an [`AgentContext`], moves it onto that seat's
//! worker thread, and talks to it only through `decide` and
//! `on_action_applied`.
//!
//! ## Implementations
//!
//! - [`RandomAgent`]: uniformly random legal move
//! - [`GreedyAgent`]: one-ply lookahead on prestige
//! - [`HeuristicAgent`]: chases the card that is quickest to afford
//! - [`MctsAgent`]: Monte Carlo tree search with tree reuse
//! - [`HumanAgent`]: console input

pub mod greedy;
pub mod heuristic;
pub mod human;
pub mod mcts;
pub mod random;
pub mod registry;

pub use greedy::GreedyAgent;
pub use heuristic::HeuristicAgent;
pub use human::{HumanAgent, StdioHuman};
pub use mcts::MctsAgent;
pub use random::RandomAgent;
pub use registry::{by_name, is_human, registered_agents, AgentFactory, Entrant, MakeAgent};

use crate::core::{ActionIndex, BoardState, GameRng, PlayerId};
use crate::error::AgentError;
use crate::facade::GameFacade;

/// Everything an agent is constructed with.
#[derive(Clone, Debug)]
pub struct AgentContext {
    /// Facade with its own chance stream, for lookahead.
    pub facade: GameFacade,
    /// Seat this agent occupies for the current trial.
    pub player_id: PlayerId,
    /// Private stream for the agent's own choices.
    pub rng: GameRng,
}

/// A decision function seated at the table.
///
/// `decide` runs on a worker thread under the arena's turn budget. The
/// arena re-validates whatever it returns, so an out-of-range or illegal
/// index costs the agent its turn and nothing more.
pub trait Agent: Send {
    /// Choose an action index for the current state.
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError>;

    /// Called after every applied action, the agent's own included.
    /// `state` is the board after the action.
    fn on_action_applied(&mut self, _state: &BoardState, _player: PlayerId, _action: ActionIndex) {}
}
