//! Search-tree nodes.
//!
//! A node is one position with a seat to move. Its edges are the actions
//! tried from it so far, and `untried` holds the legal actions still
//! without an edge. Positions reached by different move orders share one
//! node, so the tree is really a DAG: rewards flow back along the path an
//! iteration took, never through parent links.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActionIndex, ActionMask, PlayerId, PlayerMap};

/// Slot of a node in its [`MCTSTree`](super::MCTSTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How far a node has been opened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Legal actions not computed yet.
    Leaf,
    /// Legal actions known.
    Open,
    /// The game is over here. Rewards in `[0, 1]` per seat.
    Terminal(PlayerMap<f64>),
}

/// Statistics for one action taken out of a node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub action: ActionIndex,
    pub child: Option<NodeId>,
    pub visits: u32,
    /// Summed rewards per seat.
    pub reward: PlayerMap<f64>,
}

impl Edge {
    pub fn new(action: ActionIndex, seats: usize) -> Self {
        Self {
            action,
            child: None,
            visits: 0,
            reward: PlayerMap::with_value(seats, 0.0),
        }
    }

    /// Mean reward for `seat`; zero before the first visit.
    #[must_use]
    pub fn q(&self, seat: PlayerId) -> f64 {
        match self.visits {
            0 => 0.0,
            n => self.reward[seat] / f64::from(n),
        }
    }

    /// Count one more pass through this edge.
    pub fn record(&mut self, rewards: &PlayerMap<f64>) {
        self.visits += 1;
        for (seat, r) in rewards.iter() {
            self.reward[seat] += *r;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    pub to_move: PlayerId,
    /// Plies below the position the tree was built on.
    pub depth: u16,
    pub visits: u32,
    pub kind: NodeKind,
    /// Legal actions without an edge yet.
    pub untried: ActionMask,
    pub edges: SmallVec<[Edge; 8]>,
}

impl MCTSNode {
    pub fn new(to_move: PlayerId, depth: u16) -> Self {
        Self {
            to_move,
            depth,
            visits: 0,
            kind: NodeKind::Leaf,
            untried: ActionMask::EMPTY,
            edges: SmallVec::new(),
        }
    }

    /// Record the legal actions. Actions that already have an edge stay
    /// tried.
    pub fn open(&mut self, legal: ActionMask) {
        let mut untried = legal;
        for edge in &self.edges {
            untried.remove(edge.action);
        }
        self.untried = untried;
        self.kind = NodeKind::Open;
    }

    /// Mark the position as finished.
    pub fn close(&mut self, rewards: PlayerMap<f64>) {
        self.untried = ActionMask::EMPTY;
        self.kind = NodeKind::Terminal(rewards);
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    #[must_use]
    pub fn terminal_rewards(&self) -> Option<&PlayerMap<f64>> {
        match &self.kind {
            NodeKind::Terminal(rewards) => Some(rewards),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_untried(&self) -> bool {
        !self.untried.is_empty()
    }

    /// Legal actions known at this node, tried or not.
    #[must_use]
    pub fn legal_count(&self) -> usize {
        self.edges.len() + self.untried.count()
    }

    #[must_use]
    pub fn edge_for(&self, action: ActionIndex) -> Option<usize> {
        self.edges.iter().position(|e| e.action == action)
    }

    /// Index of the edge for `action`, adding it when missing.
    pub fn ensure_edge(&mut self, action: ActionIndex, seats: usize) -> usize {
        if let Some(i) = self.edge_for(action) {
            return i;
        }
        self.untried.remove(action);
        self.edges.push(Edge::new(action, seats));
        self.edges.len() - 1
    }

    #[must_use]
    pub fn most_visited(&self) -> Option<&Edge> {
        self.edges.iter().max_by_key(|e| e.visits)
    }
}
