//! Tree-search agent.
//!
//! Wraps [`MCTSSearch`] over the facade's rules. The search tree survives
//! between turns: every applied action moves its root, so the next search
//! starts from the statistics gathered below the position actually
//! reached.

use tracing::debug;

use super::{Agent, AgentContext};
use crate::core::{ActionIndex, BoardState, PlayerId};
use crate::error::AgentError;
use crate::facade::GameFacade;
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::rules::SplendorRules;

pub struct MctsAgent {
    facade: GameFacade,
    player_id: PlayerId,
    search: MCTSSearch<SplendorRules>,
}

impl MctsAgent {
    pub const NAME: &'static str = "mcts";

    /// Agent with the default search budget, seeded from the context.
    pub fn new(mut ctx: AgentContext) -> Self {
        let config = MCTSConfig::default().with_seed(ctx.rng.next_u64());
        Self::with_config(ctx, config)
    }

    pub fn with_config(ctx: AgentContext, config: MCTSConfig) -> Self {
        let search = MCTSSearch::new(ctx.facade.rules().clone(), config);
        Self {
            facade: ctx.facade,
            player_id: ctx.player_id,
            search,
        }
    }

    pub fn search(&self) -> &MCTSSearch<SplendorRules> {
        &self.search
    }

    /// Seat on turn after `player` moved into `state`.
    fn to_move_after(&self, state: &BoardState, player: PlayerId) -> PlayerId {
        if !state.player(player).retired && self.facade.must_discard(state, player) {
            player
        } else {
            self.facade.next_player_of(player)
        }
    }
}

impl Agent for MctsAgent {
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError> {
        let action = self
            .search
            .search(state, self.player_id)
            .ok_or_else(|| AgentError::Failed("search from a finished game".into()))?;
        debug!(
            player = %self.player_id,
            action = %self.facade.move_to_string(action),
            stats = %self.search.stats(),
            "mcts decision"
        );
        Ok(action)
    }

    fn on_action_applied(&mut self, state: &BoardState, player: PlayerId, _action: ActionIndex) {
        let to_move = self.to_move_after(state, player);
        self.search.advance(state, to_move);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameRng};

    fn agent(facade: &GameFacade, player: u8) -> MctsAgent {
        let ctx = AgentContext {
            facade: facade.clone(),
            player_id: PlayerId::new(player),
            rng: GameRng::new(3),
        };
        MctsAgent::with_config(ctx, MCTSConfig::fixed(40, 16))
    }

    #[test]
    fn test_mcts_agent_decides_legally() {
        let mut facade = GameFacade::new(GameConfig::new(2).unwrap(), GameRng::new(10));
        let state = facade.initial_state();
        let mut mcts = agent(&facade, 0);

        let action = mcts.decide(&state).unwrap();
        assert!(facade.valid_moves(&state, PlayerId::new(0)).contains(action));
    }

    #[test]
    fn test_tree_follows_the_match() {
        let mut facade = GameFacade::new(GameConfig::new(2).unwrap(), GameRng::new(11));
        let state = facade.initial_state();
        let mut mcts = agent(&facade, 0);
        let p0 = PlayerId::new(0);

        let action = mcts.decide(&state).unwrap();
        let (next, to_move) = facade.next_state_of(&state, p0, action, true);
        mcts.on_action_applied(&next, p0, action);

        assert_eq!(mcts.search().tree().root_node().to_move, to_move);
        assert!(mcts.search().tree().len() > 1);
    }
}
