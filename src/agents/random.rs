//! Uniformly random legal moves.

use super::{Agent, AgentContext};
use crate::core::{ActionIndex, BoardState, GameRng, PlayerId};
use crate::error::AgentError;
use crate::facade::GameFacade;

/// Picks uniformly among the legal actions.
pub struct RandomAgent {
    facade: GameFacade,
    player_id: PlayerId,
    rng: GameRng,
}

impl RandomAgent {
    pub const NAME: &'static str = "random";

    pub fn new(ctx: AgentContext) -> Self {
        Self {
            facade: ctx.facade,
            player_id: ctx.player_id,
            rng: ctx.rng,
        }
    }
}

impl Agent for RandomAgent {
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError> {
        let legal = self.facade.valid_moves(state, self.player_id).to_vec();
        self.rng
            .choose(&legal)
            .copied()
            .ok_or_else(|| AgentError::Failed("no legal actions".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_random_agent_picks_legal_moves() {
        let mut facade = GameFacade::new(GameConfig::new(3).unwrap(), GameRng::new(4));
        let state = facade.initial_state();
        let player_id = PlayerId::new(2);
        let mut agent = RandomAgent::new(AgentContext {
            facade: facade.clone(),
            player_id,
            rng: GameRng::new(8),
        });

        let legal = facade.valid_moves(&state, player_id);
        for _ in 0..20 {
            assert!(legal.contains(agent.decide(&state).unwrap()));
        }
    }
}
