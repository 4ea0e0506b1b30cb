//! Query and command facade over the rules.
//!
//! Agents and the arena talk to the game through [`GameFacade`]. Every
//! query takes a state and returns an owned copy, so nothing handed out can
//! alias engine internals.
//!
//! Each facade owns its own [`SplendorRules`] whose chance stream is forked
//! from the match stream. Lookahead through [`GameFacade::next_state_of`]
//! therefore never changes what the live match draws, whatever the value of
//! `deterministic`.
//!
//! ```
//! use splendor_arena::{GameFacade, core::{GameConfig, GameRng, PlayerId}};
//!
//! let mut facade = GameFacade::new(GameConfig::new(2).unwrap(), GameRng::new(7));
//! let state = facade.initial_state();
//! let moves = facade.valid_moves(&state, PlayerId::new(0));
//! assert!(moves.contains(facade.forced_action(&state, PlayerId::new(0))));
//! ```

use crate::core::{
    move_to_string, ActionIndex, ActionMask, BoardState, Card, GameConfig, GameRng, Gems, Noble,
    PlayerId, ACTION_SIZE, FACE_UP_SLOTS, MAX_RESERVED,
};
use crate::error::CodecError;
use crate::rules::{Outcome, RulesEngine, SplendorRules};

/// Read-only projections and lookahead over a board.
#[derive(Clone, Debug)]
pub struct GameFacade {
    rules: SplendorRules,
}

impl GameFacade {
    /// A facade whose rules draw chance from `rng`.
    #[must_use]
    pub fn new(config: GameConfig, rng: GameRng) -> Self {
        Self {
            rules: SplendorRules::new(config, rng),
        }
    }

    /// A facade with an independent stream forked from this one.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            rules: self.rules.fork(),
        }
    }

    /// Underlying rules, for search code generic over [`RulesEngine`].
    #[must_use]
    pub fn rules(&self) -> &SplendorRules {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.rules.config()
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.rules.config().num_players
    }

    /// Deal a fresh board.
    pub fn initial_state(&mut self) -> BoardState {
        self.rules.initial_state()
    }

    #[must_use]
    pub fn next_player_of(&self, player: PlayerId) -> PlayerId {
        self.rules.next_player(player)
    }

    /// Apply `action` to a copy of `state`; returns the new board and the
    /// seat that moves next.
    pub fn next_state_of(
        &mut self,
        state: &BoardState,
        player: PlayerId,
        action: ActionIndex,
        deterministic: bool,
    ) -> (BoardState, PlayerId) {
        let mut next = state.clone();
        let next_player = self.rules.apply(&mut next, player, action, deterministic);
        (next, next_player)
    }

    /// Tokens held, gold included.
    #[must_use]
    pub fn player_gems(&self, state: &BoardState, player: PlayerId) -> Gems {
        state.player(player).gems
    }

    /// Total prestige, nobles included.
    #[must_use]
    pub fn player_points(&self, state: &BoardState, player: PlayerId) -> u32 {
        state.points(player)
    }

    #[must_use]
    pub fn player_noble_count(&self, state: &BoardState, player: PlayerId) -> usize {
        state.noble_count(player)
    }

    /// Bonus counts per colour, an unused slot, then card prestige.
    #[must_use]
    pub fn player_cards(&self, state: &BoardState, player: PlayerId) -> [u8; 7] {
        let board = state.player(player);
        let mut cards = [0u8; 7];
        cards[..5].copy_from_slice(&board.bonuses);
        cards[6] = u8::try_from(board.card_points).unwrap_or(u8::MAX);
        cards
    }

    #[must_use]
    pub fn player_score(&self, state: &BoardState, player: PlayerId) -> f32 {
        self.rules.score(state, player)
    }

    #[must_use]
    pub fn bank(&self, state: &BoardState) -> Gems {
        state.bank
    }

    /// Face-up cards of a tier by slot; `None` where the slot is empty.
    #[must_use]
    pub fn cards_in_tier(&self, state: &BoardState, tier: usize) -> [Option<Card>; FACE_UP_SLOTS] {
        state.tiers[tier].face_up
    }

    /// Reserved cards by slot.
    #[must_use]
    pub fn reserved_cards(&self, state: &BoardState, player: PlayerId) -> [Option<Card>; MAX_RESERVED] {
        state.player(player).reserved
    }

    /// Nobles nobody has claimed yet.
    #[must_use]
    pub fn nobles_remaining(&self, state: &BoardState) -> Vec<Noble> {
        state
            .nobles
            .iter()
            .filter(|t| t.owner.is_none())
            .map(|t| t.noble)
            .collect()
    }

    #[must_use]
    pub fn valid_moves(&self, state: &BoardState, player: PlayerId) -> ActionMask {
        self.rules.legal_actions(state, player)
    }

    /// Outcome vector; all zeros while the game continues.
    #[must_use]
    pub fn game_ended(&self, state: &BoardState) -> Outcome {
        self.rules.is_terminal(state)
    }

    /// Full rounds completed.
    #[must_use]
    pub fn rounds_played(&self, state: &BoardState) -> u32 {
        state.round / self.num_players() as u32
    }

    /// Turns completed.
    #[must_use]
    pub fn turns_played(&self, state: &BoardState) -> u32 {
        state.round
    }

    #[must_use]
    pub fn total_actions(&self) -> usize {
        ACTION_SIZE
    }

    #[must_use]
    pub fn move_to_string(&self, action: ActionIndex) -> String {
        move_to_string(action)
    }

    /// Canonical byte key of a state, for transposition tables.
    pub fn state_key(&self, state: &BoardState) -> Result<Vec<u8>, CodecError> {
        state.encode()
    }

    /// Most distinct colours a single take may include right now (0–3).
    #[must_use]
    pub fn can_take(&self, state: &BoardState) -> usize {
        SplendorRules::can_take(state)
    }

    /// Whether `player` is above the gem limit.
    #[must_use]
    pub fn must_discard(&self, state: &BoardState, player: PlayerId) -> bool {
        SplendorRules::must_discard(state, player)
    }

    /// The no-op the arena substitutes for faults and illegal moves.
    #[must_use]
    pub fn forced_action(&self, state: &BoardState, player: PlayerId) -> ActionIndex {
        self.rules.forced_action(state, player)
    }

    /// Retire a seat. Reserved for the arena.
    pub fn retire_player(&self, state: &mut BoardState, player: PlayerId) {
        self.rules.retire(state, player);
    }
}
