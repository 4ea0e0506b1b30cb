//! Core types: gems, cards, players, board state, actions, RNG, configuration.
//!
//! Everything here is plain data. The rules that move a `BoardState` from
//! one position to the next live in [`crate::rules`].

pub mod gems;
pub mod card;
pub mod catalog;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use gems::{Color, Gems, GEM_COLORS, TOKEN_KINDS};
pub use card::{Card, Noble, NobleTile, NOBLE_POINTS};
pub use catalog::TIERS;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{GameConfig, GEM_LIMIT, GOLD_SUPPLY, MAX_RESERVED, FACE_UP_SLOTS};
pub use action::{move_to_string, Action, ActionIndex, ActionMask, ActionRecord, ACTION_SIZE, NOOP};
pub use state::{BoardState, PlayerBoard, TierRow, STATE_FORMAT_VERSION};
