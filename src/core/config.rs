//! Game configuration.
//!
//! Splendor has a single rule set; the only free parameter is the number
//! of players, which also scales the bank. The winning threshold and the
//! round cap are carried here so tests can shorten games.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 4;

/// Gold tokens in the bank at the start of every game.
pub const GOLD_SUPPLY: u8 = 5;

/// Maximum tokens a player may hold once a turn resolves.
pub const GEM_LIMIT: u32 = 10;

/// Maximum number of reserved cards per player.
pub const MAX_RESERVED: usize = 3;

/// Face-up slots per tier.
pub const FACE_UP_SLOTS: usize = 4;

/// Starting bank count for each regular colour.
#[must_use]
pub const fn gems_per_color(num_players: usize) -> u8 {
    match num_players {
        2 => 4,
        3 => 5,
        _ => 7,
    }
}

/// Rules parameters for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    /// Prestige that ends the game at the next full-round boundary.
    pub winning_points: u32,
    /// Full rounds after which the game is stopped regardless of score.
    pub max_rounds: u32,
}

impl GameConfig {
    /// Standard rules for `num_players` players.
    pub fn new(num_players: usize) -> Result<Self, ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(ConfigError::PlayerCount(num_players));
        }
        Ok(Self {
            num_players,
            winning_points: 15,
            max_rounds: 100,
        })
    }

    /// Override the winning threshold.
    #[must_use]
    pub fn with_winning_points(mut self, points: u32) -> Self {
        self.winning_points = points;
        self
    }

    /// Override the round cap.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Starting bank count for each regular colour at this table size.
    #[must_use]
    pub fn color_supply(&self) -> u8 {
        gems_per_color(self.num_players)
    }
}
