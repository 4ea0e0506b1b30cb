//! Pluggable pieces of the search.
//!
//! The tree policy picks among tried edges at the searching seat's nodes,
//! the rollout policy scores a freshly added node, and the opponent policy
//! samples what the other seats do while descending.

use std::cmp::Ordering;

use crate::core::{ActionIndex, BoardState, GameRng, PlayerId, PlayerMap, NOOP};
use crate::rules::{Outcome, RulesEngine};

use super::config::MCTSConfig;
use super::node::MCTSNode;

/// Chooses the edge to follow out of a node with nothing left untried.
pub trait SelectionPolicy: Send + Sync {
    fn select(&self, node: &MCTSNode, seat: PlayerId, config: &MCTSConfig) -> usize;
}

/// Upper confidence bound: mean reward for `seat` plus
/// `c * sqrt(ln N / n)`. Unvisited edges go first.
#[derive(Clone, Copy, Debug, Default)]
pub struct UCB1;

impl UCB1 {
    fn bound(parent_visits: u32, edge_visits: u32, q: f64, c: f64) -> f64 {
        if edge_visits == 0 {
            return f64::INFINITY;
        }
        let ln_n = f64::from(parent_visits.max(1)).ln();
        q + c * (ln_n / f64::from(edge_visits)).sqrt()
    }
}

impl SelectionPolicy for UCB1 {
    fn select(&self, node: &MCTSNode, seat: PlayerId, config: &MCTSConfig) -> usize {
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, edge) in node.edges.iter().enumerate() {
            let value = Self::bound(
                node.visits,
                edge.visits,
                edge.q(seat),
                config.exploration_constant,
            );
            if value.partial_cmp(&best_value) == Some(Ordering::Greater) {
                best = i;
                best_value = value;
            }
        }
        best
    }
}

/// Plays a position out and reports per-seat rewards in `[0, 1]`.
pub trait SimulationPolicy<E: RulesEngine>: Send + Sync {
    fn simulate(
        &self,
        engine: &mut E,
        state: &mut BoardState,
        to_move: PlayerId,
        rng: &mut GameRng,
        max_moves: u32,
    ) -> PlayerMap<f64>;
}

/// Uniformly random legal moves until the game ends or the move cap is
/// hit, then [`score_share`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSimulation;

impl<E: RulesEngine> SimulationPolicy<E> for RandomSimulation {
    fn simulate(
        &self,
        engine: &mut E,
        state: &mut BoardState,
        to_move: PlayerId,
        rng: &mut GameRng,
        max_moves: u32,
    ) -> PlayerMap<f64> {
        let mut seat = to_move;
        for _ in 0..max_moves {
            let outcome = engine.is_terminal(state);
            if outcome.is_over() {
                return outcome_to_rewards(&outcome);
            }
            let legal = engine.legal_actions(state, seat).to_vec();
            let action = rng.choose(&legal).copied().unwrap_or(NOOP);
            seat = engine.apply(state, seat, action, true);
        }

        let outcome = engine.is_terminal(state);
        if outcome.is_over() {
            outcome_to_rewards(&outcome)
        } else {
            score_share(engine, state)
        }
    }
}

/// Samples another seat's move during descent.
pub trait OpponentPolicy<E: RulesEngine>: Send + Sync {
    fn choose_action(
        &self,
        engine: &E,
        state: &BoardState,
        opponent: PlayerId,
        rng: &mut GameRng,
    ) -> ActionIndex;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UniformOpponent;

impl<E: RulesEngine> OpponentPolicy<E> for UniformOpponent {
    fn choose_action(
        &self,
        engine: &E,
        state: &BoardState,
        opponent: PlayerId,
        rng: &mut GameRng,
    ) -> ActionIndex {
        let legal = engine.legal_actions(state, opponent).to_vec();
        rng.choose(&legal).copied().unwrap_or(NOOP)
    }
}

/// Win 1, shared win or draw 0.5, loss 0.
pub fn outcome_to_rewards(outcome: &Outcome) -> PlayerMap<f64> {
    let values = &outcome.0;
    PlayerMap::new(values.player_count(), |seat| match values[seat] {
        v if v >= Outcome::WIN => 1.0,
        v if v > 0.0 => 0.5,
        _ => 0.0,
    })
}

/// Each seat's share of the prestige on the table, or an even split
/// while nobody has any.
pub fn score_share<E: RulesEngine>(engine: &E, state: &BoardState) -> PlayerMap<f64> {
    let seats = state.num_players();
    let scores = PlayerMap::new(seats, |seat| f64::from(engine.score(state, seat)));
    let total: f64 = scores.as_slice().iter().sum();
    if total <= 0.0 {
        return PlayerMap::with_value(seats, 1.0 / seats as f64);
    }
    PlayerMap::new(seats, |seat| scores[seat] / total)
}
