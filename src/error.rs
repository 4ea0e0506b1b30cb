//! Error types.
//!
//! - [`ConfigError`]: rejected setup (player counts, agent names, match-ups).
//!   Always raised before any match starts.
//! - [`CodecError`]: a state byte string that cannot be decoded.
//! - [`AgentError`]: a failed `decide` call. The arena recovers from these
//!   locally; they never abort a match.

use std::time::Duration;

/// Invalid setup, surfaced before play begins.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("player count must be between 2 and 4, got {0}")]
    PlayerCount(usize),
    #[error("unknown agent '{0}'")]
    UnknownAgent(String),
    #[error("competition '{competition}' needs at least {needed} entrants, got {got}")]
    TooFewEntrants {
        competition: String,
        needed: usize,
        got: usize,
    },
    #[error("entrant '{0}' appears more than once in a match-up")]
    DuplicateEntrant(String),
    #[error("trial count must be at least 1")]
    ZeroTrials,
    #[error("turn budget must be non-zero")]
    ZeroTurnBudget,
    #[error("max strikes must be at least 1")]
    ZeroStrikes,
}

/// Failure to decode a serialized board state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    #[error("empty state encoding")]
    Empty,
    #[error("unsupported state format version {0}")]
    UnsupportedVersion(u8),
    #[error("malformed state payload: {0}")]
    Malformed(String),
    #[error("decoded state has {0} players")]
    PlayerCount(u8),
}

/// A fault raised while asking an agent for a decision.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    /// No answer within the turn budget.
    #[error("decision timed out after {0:?}")]
    Timeout(Duration),
    /// The worker was still inside an earlier, abandoned decision and never
    /// got to this one.
    #[error("agent still busy with an abandoned decision after {0:?}")]
    Stalled(Duration),
    /// `decide` panicked.
    #[error("agent panicked: {0}")]
    Panicked(String),
    /// The agent's worker is gone.
    #[error("agent worker is no longer running")]
    Crashed,
    /// The agent reported its own failure.
    #[error("agent failed: {0}")]
    Failed(String),
    /// Reading or writing the agent's console failed.
    #[error("agent i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::Io(err.to_string())
    }
}

/// Crate-level error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub type Result<T> = std::result::Result<T, Error>;
