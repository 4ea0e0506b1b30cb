//! The Splendor rules engine.
//!
//! ## Turn structure
//!
//! A turn is one of: buy a card (face-up or reserved), reserve a card
//! (face-up or blind from a deck), take gems, or pass. A move that leaves
//! the mover above the gem limit keeps the turn with them; their only legal
//! actions are then discards until they are back at the limit. `round`
//! counts turns that actually passed.
//!
//! ## End of game
//!
//! Checked only when every seat has had the same number of turns. The game
//! ends once someone holds the winning prestige, or when the round cap is
//! reached.

use tracing::warn;

use crate::core::action::{
    Action, PAIRS, RETURN_DOUBLE, RETURN_ONE, RETURN_TWO, TAKE_DOUBLE, TAKE_ONE, TAKE_THREE,
    TAKE_TWO, TRIPLES,
};
use crate::core::catalog::{self, TIERS};
use crate::core::{
    ActionIndex, ActionMask, BoardState, Card, Color, GameConfig, GameRng, Gems, NobleTile,
    PlayerId, PlayerMap, FACE_UP_SLOTS, GEM_COLORS, GEM_LIMIT, GOLD_SUPPLY, MAX_RESERVED, NOOP,
};

use super::engine::{Outcome, RulesEngine};

/// Splendor rules with a private chance stream.
#[derive(Clone, Debug)]
pub struct SplendorRules {
    config: GameConfig,
    rng: GameRng,
}

impl SplendorRules {
    /// Create rules whose chance draws come from `rng`.
    #[must_use]
    pub fn new(config: GameConfig, rng: GameRng) -> Self {
        Self { config, rng }
    }

    /// Convenience constructor from a seed.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, GameRng::new(seed))
    }

    /// A copy of these rules drawing from an independent forked stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            config: self.config.clone(),
            rng: self.rng.fork(),
        }
    }

    /// Maximum number of distinct colours a player may take this turn.
    #[must_use]
    pub fn can_take(state: &BoardState) -> usize {
        state.bank.colors_in_stock().min(3)
    }

    /// Whether `player` must discard before the turn can pass.
    #[must_use]
    pub fn must_discard(state: &BoardState, player: PlayerId) -> bool {
        state.gem_total(player) > GEM_LIMIT
    }

    /// Gold needed on top of coloured gems and bonuses to buy `card`.
    #[must_use]
    pub fn gold_shortfall(state: &BoardState, player: PlayerId, card: &Card) -> u32 {
        let board = state.player(player);
        Color::GEMS
            .iter()
            .map(|&c| {
                let need = card.cost[c.index()].saturating_sub(board.bonuses[c.index()]);
                u32::from(need.saturating_sub(board.gems[c]))
            })
            .sum()
    }

    /// Whether `player` can pay for `card` right now.
    #[must_use]
    pub fn can_afford(state: &BoardState, player: PlayerId, card: &Card) -> bool {
        Self::gold_shortfall(state, player, card) <= u32::from(state.player(player).gems[Color::Gold])
    }

    fn draw(&mut self, deck: &mut Vec<Card>, deterministic: bool) -> Option<Card> {
        if deck.is_empty() {
            None
        } else if deterministic {
            Some(deck.remove(0))
        } else {
            let index = self.rng.below(deck.len());
            Some(deck.remove(index))
        }
    }

    fn discard_mask(state: &BoardState, player: PlayerId) -> ActionMask {
        let gems = state.player(player).gems;
        let excess = state.gem_total(player).saturating_sub(GEM_LIMIT);
        let mut mask = ActionMask::EMPTY;
        for (i, c) in Color::GEMS.iter().enumerate() {
            if gems[*c] >= 1 {
                mask.insert(RETURN_ONE.start + i);
            }
            if excess >= 2 && gems[*c] >= 2 {
                mask.insert(RETURN_DOUBLE.start + i);
            }
        }
        if excess >= 2 {
            for (i, [a, b]) in PAIRS.iter().enumerate() {
                if gems.0[*a] >= 1 && gems.0[*b] >= 1 {
                    mask.insert(RETURN_TWO.start + i);
                }
            }
        }
        if mask.is_empty() {
            mask.insert(NOOP);
        }
        mask
    }

    fn take_mask(state: &BoardState) -> ActionMask {
        let bank = state.bank.0;
        let mut mask = ActionMask::EMPTY;
        match Self::can_take(state) {
            1 => {
                for c in 0..GEM_COLORS {
                    if bank[c] > 0 {
                        mask.insert(TAKE_ONE.start + c);
                    }
                }
            }
            2 => {
                for (i, [a, b]) in PAIRS.iter().enumerate() {
                    if bank[*a] > 0 && bank[*b] > 0 {
                        mask.insert(TAKE_TWO.start + i);
                    }
                }
            }
            3 => {
                for (i, [a, b, c]) in TRIPLES.iter().enumerate() {
                    if bank[*a] > 0 && bank[*b] > 0 && bank[*c] > 0 {
                        mask.insert(TAKE_THREE.start + i);
                    }
                }
            }
            _ => {}
        }
        for c in 0..GEM_COLORS {
            if bank[c] >= 4 {
                mask.insert(TAKE_DOUBLE.start + c);
            }
        }
        mask
    }

    fn pay(state: &mut BoardState, player: PlayerId, card: &Card) {
        let board = &mut state.players[player.index()];
        let mut gold = 0u8;
        for c in Color::GEMS {
            let need = card.cost[c.index()].saturating_sub(board.bonuses[c.index()]);
            let paid = need.min(board.gems[c]);
            board.gems[c] -= paid;
            state.bank[c] += paid;
            gold += need - paid;
        }
        let gold = gold.min(board.gems[Color::Gold]);
        board.gems[Color::Gold] -= gold;
        state.bank[Color::Gold] += gold;
    }

    fn acquire(state: &mut BoardState, player: PlayerId, card: Card) {
        let board = state.player_mut(player);
        board.bonuses[card.bonus.index()] += 1;
        board.card_points += u32::from(card.points);
        board.cards_owned += 1;

        let bonuses = board.bonuses;
        for tile in state.nobles.iter_mut() {
            if tile.owner.is_none() && tile.noble.is_met_by(&bonuses) {
                tile.owner = Some(player);
            }
        }
    }

    fn reserve(state: &mut BoardState, player: PlayerId, card: Card) {
        let gold_available = state.bank[Color::Gold] > 0;
        let board = &mut state.players[player.index()];
        if let Some(slot) = board.reserved.iter_mut().find(|s| s.is_none()) {
            *slot = Some(card);
        }
        if gold_available {
            board.gems[Color::Gold] += 1;
            state.bank[Color::Gold] -= 1;
        }
    }

    fn refill(&mut self, state: &mut BoardState, tier: usize, slot: usize, deterministic: bool) {
        let mut deck = std::mem::take(&mut state.tiers[tier].deck);
        state.tiers[tier].face_up[slot] = self.draw(&mut deck, deterministic);
        state.tiers[tier].deck = deck;
    }

    fn resolve(&mut self, state: &mut BoardState, player: PlayerId, action: Action, deterministic: bool) {
        match action {
            Action::Buy { tier, slot } => {
                if let Some(card) = state.tiers[tier].face_up[slot].take() {
                    Self::pay(state, player, &card);
                    Self::acquire(state, player, card);
                    self.refill(state, tier, slot, deterministic);
                }
            }
            Action::Reserve { tier, slot } => {
                if let Some(card) = state.tiers[tier].face_up[slot].take() {
                    Self::reserve(state, player, card);
                    self.refill(state, tier, slot, deterministic);
                }
            }
            Action::ReserveBlind { tier } => {
                let mut deck = std::mem::take(&mut state.tiers[tier].deck);
                let drawn = self.draw(&mut deck, deterministic);
                state.tiers[tier].deck = deck;
                if let Some(card) = drawn {
                    Self::reserve(state, player, card);
                }
            }
            Action::BuyReserved { slot } => {
                if let Some(card) = state.player_mut(player).reserved[slot].take() {
                    Self::pay(state, player, &card);
                    Self::acquire(state, player, card);
                }
            }
            Action::TakeOne(..) | Action::TakeTwo(..) | Action::TakeThree(..) | Action::TakeDouble(..) => {
                let delta = action.gem_delta();
                state.bank.remove_colors(&delta);
                state.player_mut(player).gems.add_colors(&delta);
            }
            Action::ReturnOne(..) | Action::ReturnTwo(..) | Action::ReturnDouble(..) => {
                let delta = action.gem_delta();
                state.player_mut(player).gems.remove_colors(&delta);
                state.bank.add_colors(&delta);
            }
        }
    }

    /// Winning seats by score, then fewest cards bought.
    fn leaders(state: &BoardState) -> Vec<PlayerId> {
        let active: Vec<PlayerId> = state.active_players().collect();
        let Some(best) = active.iter().map(|&p| state.points(p)).max() else {
            return Vec::new();
        };
        let top: Vec<PlayerId> = active
            .into_iter()
            .filter(|&p| state.points(p) == best)
            .collect();
        let fewest = top
            .iter()
            .map(|&p| state.player(p).cards_owned)
            .min()
            .unwrap_or(0);
        top.into_iter()
            .filter(|&p| state.player(p).cards_owned == fewest)
            .collect()
    }
}

impl RulesEngine for SplendorRules {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn initial_state(&mut self) -> BoardState {
        let num_players = self.config.num_players;
        let mut state = BoardState::empty(num_players);
        state.bank = Gems::new([self.config.color_supply(); GEM_COLORS], GOLD_SUPPLY);

        for tier in 0..TIERS {
            let mut deck = catalog::tier_cards(tier);
            for slot in 0..FACE_UP_SLOTS {
                state.tiers[tier].face_up[slot] = self.draw(&mut deck, false);
            }
            state.tiers[tier].deck = deck;
        }

        let nobles = catalog::nobles();
        state.nobles = self
            .rng
            .sample_indices(nobles.len(), num_players + 1)
            .into_iter()
            .map(|i| NobleTile::unclaimed(nobles[i]))
            .collect();

        state
    }

    fn legal_actions(&self, state: &BoardState, player: PlayerId) -> ActionMask {
        let board = state.player(player);
        if board.retired {
            return ActionMask::only(NOOP);
        }
        if Self::must_discard(state, player) {
            return Self::discard_mask(state, player);
        }

        let mut mask = Self::take_mask(state);
        mask.insert(NOOP);

        let can_reserve = board.reserved_count() < MAX_RESERVED;
        for (tier, row) in state.tiers.iter().enumerate() {
            for (slot, card) in row.face_up.iter().enumerate() {
                let Some(card) = card else { continue };
                if Self::can_afford(state, player, card) {
                    mask.insert(Action::Buy { tier, slot }.encode());
                }
                if can_reserve {
                    mask.insert(Action::Reserve { tier, slot }.encode());
                }
            }
            if can_reserve && !row.deck.is_empty() {
                mask.insert(Action::ReserveBlind { tier }.encode());
            }
        }
        for (slot, card) in board.reserved.iter().enumerate() {
            if let Some(card) = card {
                if Self::can_afford(state, player, card) {
                    mask.insert(Action::BuyReserved { slot }.encode());
                }
            }
        }
        mask
    }

    fn apply(
        &mut self,
        state: &mut BoardState,
        player: PlayerId,
        action: ActionIndex,
        deterministic: bool,
    ) -> PlayerId {
        let mask = self.legal_actions(state, player);
        let action = if mask.contains(action) {
            action
        } else {
            let forced = self.forced_action(state, player);
            warn!(%player, action, forced, "illegal action submitted to the rules engine");
            forced
        };

        let is_pass = action == NOOP && !Self::must_discard(state, player);
        if !is_pass && !state.player(player).retired {
            if let Some(decoded) = Action::decode(action) {
                self.resolve(state, player, decoded, deterministic);
            }
        }

        if !state.player(player).retired && Self::must_discard(state, player) {
            return player;
        }
        state.round += 1;
        self.next_player(player)
    }

    fn score(&self, state: &BoardState, player: PlayerId) -> f32 {
        state.points(player) as f32
    }

    fn is_terminal(&self, state: &BoardState) -> Outcome {
        let num_players = state.num_players();
        let full_round = state.round > 0 && state.round % num_players as u32 == 0;
        if !full_round {
            return Outcome::ongoing(num_players);
        }

        let reached = state
            .active_players()
            .any(|p| state.points(p) >= self.config.winning_points);
        let capped = state.round / num_players as u32 >= self.config.max_rounds;
        if !reached && !capped {
            return Outcome::ongoing(num_players);
        }

        let leaders = Self::leaders(state);
        let reward = if leaders.len() == 1 { Outcome::WIN } else { Outcome::DRAW };
        Outcome(PlayerMap::new(num_players, |p| {
            if leaders.contains(&p) {
                reward
            } else {
                Outcome::LOSS
            }
        }))
    }

    fn retire(&self, state: &mut BoardState, player: PlayerId) {
        let mut returned = Gems::EMPTY;
        let board = state.player_mut(player);
        board.retired = true;
        while board.gems.total() > GEM_LIMIT {
            let Some(color) = board.gems.largest_pile() else { break };
            board.gems[color] -= 1;
            returned[color] += 1;
        }
        for color in Color::ALL {
            state.bank[color] += returned[color];
        }
    }
}
