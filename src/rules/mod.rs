//! Splendor rules.
//!
//! [`RulesEngine`] is the contract the arena and search agents drive:
//! legal-action masks, state transitions, scores and outcomes.
//! [`SplendorRules`] is the implementation.

pub mod engine;
pub mod splendor;

pub use engine::{Outcome, RulesEngine};
pub use splendor::SplendorRules;
