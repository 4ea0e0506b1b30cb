//! The search loop.
//!
//! Only the searching seat's decisions are selected with the tree policy.
//! Other seats' moves are sampled from the opponent policy and recorded as
//! edges, so repeated samples share statistics. Lookahead always resolves
//! chance deterministically.
//!
//! The tree outlives a single decision: [`MCTSSearch::advance`] re-roots it
//! at the position the match actually reached, and the next search starts
//! from whatever was already learned there.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::core::{ActionIndex, BoardState, GameRng, PlayerId, PlayerMap, NOOP};
use crate::rules::RulesEngine;

use super::config::MCTSConfig;
use super::node::{MCTSNode, NodeId, NodeKind};
use super::policy::{
    outcome_to_rewards, score_share, OpponentPolicy, RandomSimulation, SelectionPolicy,
    SimulationPolicy, UniformOpponent, UCB1,
};
use super::stats::SearchStats;
use super::tree::{MCTSTree, PositionKey};

/// One step of an iteration's path: a node and the edge taken out of it.
type Step = (NodeId, usize);

/// Monte Carlo tree search over any [`RulesEngine`].
pub struct MCTSSearch<E: RulesEngine> {
    engine: E,
    config: MCTSConfig,
    tree: MCTSTree,
    rng: GameRng,
    selection: Box<dyn SelectionPolicy>,
    simulation: Box<dyn SimulationPolicy<E>>,
    opponent: Box<dyn OpponentPolicy<E>>,
    stats: SearchStats,
}

impl<E: RulesEngine + Clone> MCTSSearch<E> {
    /// Search with UCB1, random rollouts and uniform opponents.
    pub fn new(engine: E, config: MCTSConfig) -> Self {
        let seats = engine.config().num_players;
        Self {
            tree: MCTSTree::new(PlayerId::new(0), seats),
            rng: GameRng::new(config.seed),
            engine,
            config,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomSimulation),
            opponent: Box::new(UniformOpponent),
            stats: SearchStats::default(),
        }
    }

    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    pub fn with_simulation<S: SimulationPolicy<E> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    pub fn with_opponent<O: OpponentPolicy<E> + 'static>(mut self, opponent: O) -> Self {
        self.opponent = Box::new(opponent);
        self
    }

    /// Best action for `seat` in `state`, or `None` if the game is over.
    pub fn search(&mut self, state: &BoardState, seat: PlayerId) -> Option<ActionIndex> {
        let started = Instant::now();
        let deadline = (self.config.time_limit_ms > 0)
            .then(|| started + Duration::from_millis(self.config.time_limit_ms));
        self.stats.reset();

        self.advance(state, seat);
        if self.tree.len() >= self.config.max_nodes {
            self.rebuild(state, seat);
        }
        self.stats.reused_root = self.tree.root_node().visits > 0;

        let root = self.tree.root();
        if self.tree[root].is_leaf() {
            self.open(root, state);
        }
        let root_node = &self.tree[root];
        if root_node.terminal_rewards().is_some() {
            return None;
        }
        if root_node.legal_count() == 1 {
            return root_node
                .edges
                .first()
                .map(|e| e.action)
                .or_else(|| root_node.untried.first());
        }

        while self.stats.iterations < self.config.iterations {
            let mut scratch = state.clone();
            self.iterate(&mut scratch, seat);
            self.stats.iterations += 1;

            if self.tree.len() >= self.config.max_nodes
                || deadline.map_or(false, |d| Instant::now() >= d)
            {
                break;
            }
        }

        self.stats.time_us = started.elapsed().as_micros() as u64;
        trace!(stats = %self.stats, "search finished");
        self.choose()
    }

    /// Re-root at `state` with `to_move` on turn, or start a fresh tree
    /// there if the position was never reached.
    pub fn advance(&mut self, state: &BoardState, to_move: PlayerId) {
        match Self::key(state, to_move).and_then(|k| self.tree.find(&k)) {
            Some(node) => self.tree.reroot(node),
            None => self.rebuild(state, to_move),
        }
    }

    fn rebuild(&mut self, state: &BoardState, to_move: PlayerId) {
        self.tree.clear(to_move);
        if let Some(key) = Self::key(state, to_move) {
            let root = self.tree.root();
            self.tree.remember(key, root);
        }
    }

    fn key(state: &BoardState, to_move: PlayerId) -> Option<PositionKey> {
        state.encode().ok().map(|bytes| (to_move, bytes))
    }

    /// Descend from the root, grow the tree by one node, score it and
    /// propagate the result.
    fn iterate(&mut self, state: &mut BoardState, seat: PlayerId) {
        let mut path: Vec<Step> = Vec::new();
        let mut node = self.tree.root();

        loop {
            if let NodeKind::Terminal(rewards) = &self.tree[node].kind {
                let rewards = rewards.clone();
                self.stats.terminal_hits += 1;
                self.propagate(&path, &rewards);
                return;
            }
            if self.config.max_depth > 0 && path.len() as u32 >= self.config.max_depth {
                let rewards = score_share(&self.engine, state);
                self.stats.depth_cutoffs += 1;
                self.propagate(&path, &rewards);
                return;
            }

            let to_move = self.tree[node].to_move;
            if to_move != seat {
                let action = self
                    .opponent
                    .choose_action(&self.engine, state, to_move, &mut self.rng);
                let seats = self.tree.seats();
                let edge = self.tree[node].ensure_edge(action, seats);
                path.push((node, edge));
                let next = self.engine.apply(state, to_move, action, true);
                node = self.child(node, edge, state, next);
                continue;
            }

            if self.tree[node].has_untried() {
                let edge = self.try_new_action(node);
                path.push((node, edge));
                let action = self.tree[node].edges[edge].action;
                let next = self.engine.apply(state, to_move, action, true);
                self.child(node, edge, state, next);

                let rewards = self.rollout(state, next);
                self.propagate(&path, &rewards);
                return;
            }

            let edge = self.selection.select(&self.tree[node], seat, &self.config);
            path.push((node, edge));
            let action = self.tree[node].edges[edge].action;
            let next = self.engine.apply(state, to_move, action, true);
            node = self.child(node, edge, state, next);
        }
    }

    /// Attach the legal actions, or close the node if the game is over.
    fn open(&mut self, id: NodeId, state: &BoardState) {
        let outcome = self.engine.is_terminal(state);
        if outcome.is_over() {
            self.tree[id].close(outcome_to_rewards(&outcome));
            return;
        }
        let to_move = self.tree[id].to_move;
        let legal = self.engine.legal_actions(state, to_move);
        self.tree[id].open(legal);
        self.stats.nodes_expanded += 1;
    }

    /// Pick an untried action at random and give it an edge.
    fn try_new_action(&mut self, id: NodeId) -> usize {
        let untried = self.tree[id].untried.to_vec();
        let action = self.rng.choose(&untried).copied().unwrap_or(NOOP);
        let seats = self.tree.seats();
        self.tree[id].ensure_edge(action, seats)
    }

    /// Node behind an edge, created (or found through the position map) on
    /// first use. `state` is the position after the edge's action.
    fn child(&mut self, parent: NodeId, edge: usize, state: &BoardState, to_move: PlayerId) -> NodeId {
        if let Some(child) = self.tree[parent].edges[edge].child {
            return child;
        }

        let key = Self::key(state, to_move);
        let child = match key.as_ref().and_then(|k| self.tree.find(k)) {
            Some(known) => known,
            None => {
                let depth = self.tree[parent].depth.saturating_add(1);
                self.stats.max_depth = self.stats.max_depth.max(depth);
                let id = self.tree.push(MCTSNode::new(to_move, depth));
                if let Some(key) = key {
                    self.tree.remember(key, id);
                }
                self.open(id, state);
                id
            }
        };
        self.tree[parent].edges[edge].child = Some(child);
        child
    }

    fn rollout(&mut self, state: &mut BoardState, to_move: PlayerId) -> PlayerMap<f64> {
        self.stats.simulations += 1;
        let mut rng = self.rng.fork();
        let mut engine = self.engine.clone();
        self.simulation
            .simulate(&mut engine, state, to_move, &mut rng, self.config.rollout_depth)
    }

    fn propagate(&mut self, path: &[Step], rewards: &PlayerMap<f64>) {
        for &(node, edge) in path.iter().rev() {
            let node = &mut self.tree[node];
            node.visits += 1;
            node.edges[edge].record(rewards);
        }
    }

    /// Final choice at the root: most visited, or sampled by visit count
    /// when a temperature is set.
    fn choose(&mut self) -> Option<ActionIndex> {
        let root = self.tree.root_node();
        if root.edges.is_empty() {
            return root.untried.first();
        }
        if self.config.temperature <= 0.0 {
            return root.most_visited().map(|e| e.action);
        }

        let peak = f64::from(root.edges.iter().map(|e| e.visits).max().unwrap_or(0));
        let weights: Vec<f32> = root
            .edges
            .iter()
            .map(|e| ((f64::from(e.visits) - peak) / self.config.temperature).exp() as f32)
            .collect();
        let actions: Vec<ActionIndex> = root.edges.iter().map(|e| e.action).collect();
        self.rng.choose_weighted(&weights).map(|i| actions[i])
    }

    /// Counters from the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Visits per tried action at the root.
    pub fn action_visits(&self) -> Vec<(ActionIndex, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action, e.visits))
            .collect()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}
