//! One-ply greedy search on prestige.
//!
//! Every legal action is tried on a copy of the board with chance resolved
//! deterministically. The agent keeps the actions that leave it with the
//! highest score. When nothing gains prestige it falls back, in order, to
//! purchases, then gem takes, then anything legal.

use super::{Agent, AgentContext};
use crate::core::action::{BUY, TAKE};
use crate::core::{ActionIndex, BoardState, GameRng, PlayerId};
use crate::error::AgentError;
use crate::facade::GameFacade;

pub struct GreedyAgent {
    facade: GameFacade,
    player_id: PlayerId,
    rng: GameRng,
}

impl GreedyAgent {
    pub const NAME: &'static str = "greedy";

    pub fn new(ctx: AgentContext) -> Self {
        Self {
            facade: ctx.facade,
            player_id: ctx.player_id,
            rng: ctx.rng,
        }
    }

    /// Actions that share the best resulting score.
    fn best_actions(&mut self, state: &BoardState) -> Vec<ActionIndex> {
        let legal = self.facade.valid_moves(state, self.player_id);
        let current = self.facade.player_score(state, self.player_id);

        let scored: Vec<(f32, ActionIndex)> = legal
            .iter()
            .map(|action| {
                let (next, _) = self.facade.next_state_of(state, self.player_id, action, true);
                (self.facade.player_score(&next, self.player_id), action)
            })
            .collect();

        let best = scored.iter().map(|(s, _)| *s).fold(f32::NEG_INFINITY, f32::max);
        if best > current {
            return scored
                .into_iter()
                .filter(|(s, _)| *s == best)
                .map(|(_, a)| a)
                .collect();
        }

        let buys: Vec<ActionIndex> = legal.iter().filter(|a| BUY.contains(a)).collect();
        if !buys.is_empty() {
            return buys;
        }
        let takes: Vec<ActionIndex> = legal.iter().filter(|a| TAKE.contains(a)).collect();
        if !takes.is_empty() {
            return takes;
        }
        legal.to_vec()
    }
}

impl Agent for GreedyAgent {
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError> {
        let candidates = self.best_actions(state);
        self.rng
            .choose(&candidates)
            .copied()
            .ok_or_else(|| AgentError::Failed("no legal actions".into()))
    }
}
