//! "High roller": chase the card that is quickest to afford.
//!
//! Each visible or reserved card gets an estimate of the turns needed to
//! buy it, assuming three gems a turn taken from the largest remaining
//! shortfalls. The agent buys its target when it can and otherwise takes
//! the gems that cover most of what the target still needs.

use super::{Agent, AgentContext};
use crate::core::action::{RETURN, TAKE};
use crate::core::{
    Action, ActionIndex, ActionMask, BoardState, Card, Color, GameRng, PlayerId, GEM_COLORS,
    GEM_LIMIT, TIERS,
};
use crate::error::AgentError;
use crate::facade::GameFacade;

/// A card the agent could work towards.
#[derive(Clone, Copy, Debug)]
struct Target {
    card: Card,
    buy: ActionIndex,
    turns: u32,
}

pub struct HeuristicAgent {
    facade: GameFacade,
    player_id: PlayerId,
    rng: GameRng,
}

impl HeuristicAgent {
    pub const NAME: &'static str = "heuristic";

    pub fn new(ctx: AgentContext) -> Self {
        Self {
            facade: ctx.facade,
            player_id: ctx.player_id,
            rng: ctx.rng,
        }
    }

    /// Gems still missing for `card` after bonuses and held gems. Gold is
    /// left out; it only shortens the estimate.
    fn shortfall(&self, state: &BoardState, card: &Card) -> [u32; GEM_COLORS] {
        let board = state.player(self.player_id);
        let mut need = [0u32; GEM_COLORS];
        for c in Color::GEMS {
            let i = c.index();
            let have = u32::from(board.bonuses[i]) + u32::from(board.gems[c]);
            need[i] = u32::from(card.cost[i]).saturating_sub(have);
        }
        need
    }

    /// Turns until `card` can be bought, or `None` when the bank cannot
    /// cover it.
    fn turns_to_afford(&self, state: &BoardState, card: &Card) -> Option<u32> {
        let board = state.player(self.player_id);
        let bank = self.facade.bank(state);
        let gold = u32::from(board.gems[Color::Gold]);

        let mut need = self.shortfall(state, card);
        let missing: u32 = need.iter().sum();
        for c in Color::GEMS {
            if need[c.index()] > u32::from(bank[c]) + gold {
                return None;
            }
        }
        let effective: u32 = Color::GEMS
            .iter()
            .map(|c| u32::from(card.cost[c.index()]).saturating_sub(u32::from(board.bonuses[c.index()])))
            .sum();
        if effective > GEM_LIMIT {
            return None;
        }

        // Spend gold on the largest shortfalls first.
        let mut gold_left = gold.min(missing);
        while gold_left > 0 {
            if let Some(max) = need.iter_mut().max() {
                *max -= 1;
            }
            gold_left -= 1;
        }

        let mut turns = 1;
        loop {
            need.sort_unstable_by(|a, b| b.cmp(a));
            if need[0] == 0 {
                return Some(turns);
            }
            if need[1] == 0 {
                return Some(turns + need[0]);
            }
            turns += 1;
            for n in need.iter_mut().take(3) {
                *n = n.saturating_sub(1);
            }
        }
    }

    fn target(&self, state: &BoardState) -> Option<Target> {
        let mut candidates = Vec::new();
        for tier in 0..TIERS {
            for (slot, card) in self.facade.cards_in_tier(state, tier).iter().enumerate() {
                if let Some(card) = card {
                    candidates.push((*card, Action::Buy { tier, slot }.encode()));
                }
            }
        }
        for (slot, card) in self.facade.reserved_cards(state, self.player_id).iter().enumerate() {
            if let Some(card) = card {
                candidates.push((*card, Action::BuyReserved { slot }.encode()));
            }
        }

        candidates
            .into_iter()
            .filter_map(|(card, buy)| {
                self.turns_to_afford(state, &card)
                    .map(|turns| Target { card, buy, turns })
            })
            .min_by(|a, b| a.turns.cmp(&b.turns).then(b.card.points.cmp(&a.card.points)))
    }

    /// The legal take covering most of `need`; `None` when no take helps.
    fn best_take(&self, legal: ActionMask, need: &[u32; GEM_COLORS]) -> Option<ActionIndex> {
        legal
            .iter()
            .filter(|a| TAKE.contains(a))
            .filter_map(|a| Action::decode(a).map(|action| (a, action.gem_delta())))
            .map(|(a, delta)| {
                let covered: u32 = (0..GEM_COLORS)
                    .map(|i| u32::from(delta[i]).min(need[i]))
                    .sum();
                (a, covered)
            })
            .filter(|(_, covered)| *covered > 0)
            .max_by(|(a1, c1), (a2, c2)| c1.cmp(c2).then(a2.cmp(a1)))
            .map(|(a, _)| a)
    }

    /// The legal return that gives back the least-needed gems.
    fn best_return(&self, legal: ActionMask, need: &[u32; GEM_COLORS]) -> Option<ActionIndex> {
        legal
            .iter()
            .filter(|a| RETURN.contains(a))
            .filter_map(|a| Action::decode(a).map(|action| (a, action.gem_delta())))
            .map(|(a, delta)| {
                let lost: u32 = (0..GEM_COLORS).map(|i| u32::from(delta[i]) * need[i]).sum();
                let returned: u32 = delta.iter().map(|&d| u32::from(d)).sum();
                (a, lost, returned)
            })
            .min_by(|x, y| x.1.cmp(&y.1).then(y.2.cmp(&x.2)).then(x.0.cmp(&y.0)))
            .map(|(a, _, _)| a)
    }

    /// Most gems in one take, for when no card is reachable.
    fn largest_take(&mut self, legal: ActionMask) -> Option<ActionIndex> {
        let takes: Vec<(ActionIndex, u32)> = legal
            .iter()
            .filter(|a| TAKE.contains(a))
            .filter_map(|a| {
                Action::decode(a).map(|action| (a, action.gem_delta().iter().map(|&d| u32::from(d)).sum()))
            })
            .collect();
        let most = takes.iter().map(|(_, n)| *n).max()?;
        let best: Vec<ActionIndex> = takes.into_iter().filter(|(_, n)| *n == most).map(|(a, _)| a).collect();
        self.rng.choose(&best).copied()
    }
}

impl Agent for HeuristicAgent {
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError> {
        let legal = self.facade.valid_moves(state, self.player_id);
        let target = self.target(state);
        let need = target
            .map(|t| self.shortfall(state, &t.card))
            .unwrap_or([0; GEM_COLORS]);

        if self.facade.must_discard(state, self.player_id) {
            if let Some(action) = self.best_return(legal, &need) {
                return Ok(action);
            }
        }

        if let Some(target) = target {
            if legal.contains(target.buy) {
                return Ok(target.buy);
            }
            if let Some(take) = self.best_take(legal, &need) {
                return Ok(take);
            }
        } else if let Some(take) = self.largest_take(legal) {
            return Ok(take);
        }

        Ok(self.facade.forced_action(state, self.player_id))
    }
}
