//! Board state: the single mutable value a match is played on.
//!
//! `BoardState` is a plain aggregate. It has no rules logic; every mutation
//! goes through [`crate::rules::SplendorRules`]. The turn owner is not stored
//! here; the orchestrator tracks it from the `next_player` returned by
//! `apply`.
//!
//! ## Encoding
//!
//! [`BoardState::encode`] produces a versioned byte string: one format byte
//! followed by the bincode payload. Decks are kept in catalogue order, so
//! equal states always encode identically and the bytes double as a
//! transposition key.

use serde::{Deserialize, Serialize};

use super::card::{Card, NobleTile, NOBLE_POINTS};
use super::catalog::TIERS;
use super::config::{FACE_UP_SLOTS, MAX_PLAYERS, MAX_RESERVED, MIN_PLAYERS};
use super::gems::{Color, Gems, GEM_COLORS, TOKEN_KINDS};
use super::player::PlayerId;
use crate::error::CodecError;

/// Current state encoding version.
pub const STATE_FORMAT_VERSION: u8 = 1;

/// One player's holdings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerBoard {
    pub gems: Gems,
    /// Owned-card count per colour (the permanent discounts).
    pub bonuses: [u8; GEM_COLORS],
    /// Prestige from development cards (nobles are counted separately).
    pub card_points: u32,
    /// Development cards bought.
    pub cards_owned: u32,
    /// Reserved cards by slot; a bought slot becomes free again.
    pub reserved: [Option<Card>; MAX_RESERVED],
    pub retired: bool,
}

impl PlayerBoard {
    /// Number of reserved cards.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.reserved.iter().flatten().count()
    }
}

/// One tier: the face-up row and the remaining deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierRow {
    pub face_up: [Option<Card>; FACE_UP_SLOTS],
    /// Undealt cards, in catalogue order.
    pub deck: Vec<Card>,
}

/// Complete board state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub bank: Gems,
    pub players: Vec<PlayerBoard>,
    pub tiers: [TierRow; TIERS],
    /// The `num_players + 1` nobles drawn for this game.
    pub nobles: Vec<NobleTile>,
    /// Completed turns. Over-limit discards do not count.
    pub round: u32,
}

impl BoardState {
    /// An empty board for `num_players` players.
    #[must_use]
    pub fn empty(num_players: usize) -> Self {
        Self {
            bank: Gems::EMPTY,
            players: vec![PlayerBoard::default(); num_players],
            tiers: Default::default(),
            nobles: Vec::new(),
            round: 0,
        }
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerBoard {
        &self.players[player.index()]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerBoard {
        &mut self.players[player.index()]
    }

    /// Nobles claimed by `player`.
    #[must_use]
    pub fn noble_count(&self, player: PlayerId) -> usize {
        self.nobles.iter().filter(|n| n.owner == Some(player)).count()
    }

    /// Total prestige: cards plus nobles.
    #[must_use]
    pub fn points(&self, player: PlayerId) -> u32 {
        self.player(player).card_points + NOBLE_POINTS * self.noble_count(player) as u32
    }

    /// Tokens held by `player`, gold included.
    #[must_use]
    pub fn gem_total(&self, player: PlayerId) -> u32 {
        self.player(player).gems.total()
    }

    /// Per-kind token totals across the bank and every player.
    #[must_use]
    pub fn token_totals(&self) -> [u32; TOKEN_KINDS] {
        let mut totals = [0u32; TOKEN_KINDS];
        for color in Color::ALL {
            totals[color.index()] = u32::from(self.bank[color])
                + self
                    .players
                    .iter()
                    .map(|p| u32::from(p.gems[color]))
                    .sum::<u32>();
        }
        totals
    }

    /// Seats that have not retired.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.retired)
            .map(|(i, _)| PlayerId::new(i as u8))
    }

    /// Serialize with a leading format byte.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut bytes = vec![STATE_FORMAT_VERSION];
        bincode::serialize_into(&mut bytes, self)
            .map_err(|e| CodecError::Malformed(e.to_string()))?;
        Ok(bytes)
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let (&version, payload) = bytes.split_first().ok_or(CodecError::Empty)?;
        if version != STATE_FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let state: BoardState =
            bincode::deserialize(payload).map_err(|e| CodecError::Malformed(e.to_string()))?;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&state.num_players()) {
            return Err(CodecError::PlayerCount(state.num_players() as u8));
        }
        Ok(state)
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "round {}  bank: {}", self.round, self.bank)?;
        for (tier, row) in self.tiers.iter().enumerate().rev() {
            write!(f, "tier {} ({:2} left):", tier + 1, row.deck.len())?;
            for (slot, card) in row.face_up.iter().enumerate() {
                match card {
                    Some(card) => write!(f, "  {}:{}", slot + 1, card)?,
                    None => write!(f, "  {}:--", slot + 1)?,
                }
            }
            writeln!(f)?;
        }
        f.write_str("nobles:")?;
        for tile in &self.nobles {
            let need: Vec<String> = Color::GEMS
                .iter()
                .filter(|c| tile.noble.requirement[c.index()] > 0)
                .map(|c| format!("{}{}", tile.noble.requirement[c.index()], c.letter()))
                .collect();
            match tile.owner {
                Some(owner) => write!(f, "  [{}]->{}", need.join(" "), owner)?,
                None => write!(f, "  [{}]", need.join(" "))?,
            }
        }
        writeln!(f)?;
        for (i, player) in self.players.iter().enumerate() {
            let id = PlayerId::new(i as u8);
            let bonuses: Vec<String> = Color::GEMS
                .iter()
                .map(|c| format!("{}{}", player.bonuses[c.index()], c.letter()))
                .collect();
            write!(
                f,
                "{}: {:2}pt  gems: {}  cards: {}",
                id,
                self.points(id),
                player.gems,
                bonuses.join(" ")
            )?;
            for (slot, card) in player.reserved.iter().enumerate() {
                if let Some(card) = card {
                    write!(f, "  r{}:{}", slot + 1, card)?;
                }
            }
            if player.retired {
                f.write_str("  (retired)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Noble;

    fn sample_state() -> BoardState {
        let mut state = BoardState::empty(2);
        state.bank = Gems::new([4, 4, 3, 4, 4], 5);
        state.players[0].gems[Color::Green] = 1;
        state.players[1].card_points = 2;
        state.tiers[0].face_up[0] = Some(Card {
            tier: 0,
            cost: [0, 1, 1, 1, 1],
            bonus: Color::White,
            points: 0,
        });
        state.nobles.push(NobleTile {
            noble: Noble { requirement: [3, 3, 3, 0, 0] },
            owner: Some(PlayerId::new(1)),
        });
        state.round = 7;
        state
    }

    #[test]
    fn test_points_include_nobles() {
        let state = sample_state();
        assert_eq!(state.points(PlayerId::new(1)), 5);
        assert_eq!(state.points(PlayerId::new(0)), 0);
        assert_eq!(state.noble_count(PlayerId::new(1)), 1);
    }

    #[test]
    fn test_token_totals() {
        let state = sample_state();
        assert_eq!(state.token_totals(), [4, 4, 4, 4, 4, 5]);
    }

    #[test]
    fn test_encode_decode() {
        let state = sample_state();
        let bytes = state.encode().unwrap();
        assert_eq!(bytes[0], STATE_FORMAT_VERSION);
        assert_eq!(BoardState::decode(&bytes).unwrap(), state);
        assert_eq!(state.clone().encode().unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(BoardState::decode(&[]), Err(CodecError::Empty));
        assert_eq!(BoardState::decode(&[9, 0]), Err(CodecError::UnsupportedVersion(9)));
        assert!(matches!(
            BoardState::decode(&[STATE_FORMAT_VERSION, 1, 2]),
            Err(CodecError::Malformed(_))
        ));

        let bytes = BoardState::empty(5).encode().unwrap();
        assert_eq!(BoardState::decode(&bytes), Err(CodecError::PlayerCount(5)));
    }

    #[test]
    fn test_display_mentions_players() {
        let text = sample_state().to_string();
        assert!(text.contains("round 7"));
        assert!(text.contains("P1:"));
    }
}
