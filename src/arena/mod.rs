//! Match orchestration.
//!
//! - [`Arena`]: plays matches between a fixed set of entrants
//! - [`SeatWorker`]: runs one agent on a supervised thread with a turn budget
//! - [`Tournament`]: schedules match-ups and aggregates win rates

pub mod config;
pub mod runner;
pub mod seat;
pub mod tournament;

pub use config::{ArenaConfig, DEFAULT_MAX_STRIKES, DEFAULT_TURN_BUDGET};
pub use runner::{Arena, MatchEnding, MatchReport};
pub use seat::SeatWorker;
pub use tournament::{
    schedule, Competition, DisplayPolicy, FinalResults, MatchUpResult, Tournament,
    TournamentConfig, TournamentReport, DEFAULT_TRIALS,
};
