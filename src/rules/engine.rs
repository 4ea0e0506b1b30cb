//! Rules engine trait and match outcomes.

use serde::{Deserialize, Serialize};

use crate::core::action::RETURN;
use crate::core::{ActionIndex, ActionMask, BoardState, GameConfig, PlayerId, PlayerMap, NOOP};

/// Per-seat result vector.
///
/// Positive means a win, negative a loss, [`Outcome::DRAW`] a shared
/// result, and zero everywhere means the game is still running.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome(pub PlayerMap<f32>);

impl Outcome {
    pub const WIN: f32 = 1.0;
    pub const LOSS: f32 = -1.0;
    pub const DRAW: f32 = 0.01;

    /// All zeros: the game continues.
    #[must_use]
    pub fn ongoing(num_players: usize) -> Self {
        Self(PlayerMap::with_value(num_players, 0.0))
    }

    /// Whether any seat has a non-zero value.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.0.iter().any(|(_, &v)| v != 0.0)
    }

    #[must_use]
    pub fn value(&self, player: PlayerId) -> f32 {
        self.0[player]
    }

    /// Seats with a strictly positive value.
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        self.0
            .iter()
            .filter(|(_, &v)| v > 0.0)
            .map(|(p, _)| p)
            .collect()
    }

    /// Whether the game ended with more than one seat sharing the result.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winners().len() > 1
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply` mutates the state in place and returns the seat that moves
///   next. That is the mover again while they must still discard.
/// - `deterministic = true` resolves chance without touching the engine's
///   random stream, for lookahead.
/// - `legal_actions` never returns an empty mask.
pub trait RulesEngine {
    /// Get the rules configuration.
    fn config(&self) -> &GameConfig;

    /// Deal a fresh board.
    fn initial_state(&mut self) -> BoardState;

    /// Legal actions for `player`.
    fn legal_actions(&self, state: &BoardState, player: PlayerId) -> ActionMask;

    /// Apply an action and return the next seat to move.
    fn apply(
        &mut self,
        state: &mut BoardState,
        player: PlayerId,
        action: ActionIndex,
        deterministic: bool,
    ) -> PlayerId;

    /// Prestige of `player`.
    fn score(&self, state: &BoardState, player: PlayerId) -> f32;

    /// Outcome vector; all zeros while the game continues.
    fn is_terminal(&self, state: &BoardState) -> Outcome;

    /// Permanently retire `player`.
    fn retire(&self, state: &mut BoardState, player: PlayerId);

    // === Convenience Methods ===

    /// The canonical no-op: the pass when legal, otherwise the lowest
    /// legal discard.
    fn forced_action(&self, state: &BoardState, player: PlayerId) -> ActionIndex {
        let mask = self.legal_actions(state, player);
        if mask.contains(NOOP) {
            return NOOP;
        }
        let discard = mask.iter().find(|a| RETURN.contains(a)).unwrap_or(NOOP);
        discard
    }

    /// Seat after `player` in turn order.
    fn next_player(&self, player: PlayerId) -> PlayerId {
        player.next(self.config().num_players)
    }
}
