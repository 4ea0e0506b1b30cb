//! Node storage with a position map.
//!
//! Nodes live in a flat vector and are addressed by [`NodeId`]. Every
//! node is registered under its [`PositionKey`], so a position reached by a
//! different move order, or by the real match, finds the same node again.

use std::ops::{Index, IndexMut};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId, NodeKind};
use crate::core::PlayerId;

/// Seat to move plus the canonical board encoding.
pub type PositionKey = (PlayerId, Vec<u8>);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    root: NodeId,
    seats: usize,
    #[serde(skip)]
    positions: FxHashMap<PositionKey, NodeId>,
}

impl MCTSTree {
    /// A tree holding only a root for `to_move`.
    pub fn new(to_move: PlayerId, seats: usize) -> Self {
        Self {
            nodes: vec![MCTSNode::new(to_move, 0)],
            root: NodeId::from_index(0),
            seats,
            positions: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        &self[self.root]
    }

    /// Make an existing node the root. Nodes above it stay allocated until
    /// the next [`clear`](Self::clear).
    pub fn reroot(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Forget everything and start again from a fresh root.
    pub fn clear(&mut self, to_move: PlayerId) {
        self.nodes.clear();
        self.positions.clear();
        self.nodes.push(MCTSNode::new(to_move, 0));
        self.root = NodeId::from_index(0);
    }

    pub fn push(&mut self, node: MCTSNode) -> NodeId {
        self.nodes.push(node);
        NodeId::from_index(self.nodes.len() - 1)
    }

    #[must_use]
    pub fn find(&self, key: &PositionKey) -> Option<NodeId> {
        self.positions.get(key).copied()
    }

    pub fn remember(&mut self, key: PositionKey, id: NodeId) {
        self.positions.insert(key, id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn seats(&self) -> usize {
        self.seats
    }

    /// Positions with a registered node.
    #[must_use]
    pub fn positions_known(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        self.nodes.iter().fold(
            TreeStats {
                node_count: self.nodes.len(),
                ..TreeStats::default()
            },
            |mut acc, node| {
                acc.max_depth = acc.max_depth.max(node.depth);
                acc.total_edges += node.edges.len();
                acc.untried_actions += node.untried.count();
                if matches!(node.kind, NodeKind::Terminal(_)) {
                    acc.terminal_count += 1;
                }
                acc
            },
        )
    }
}

impl Index<NodeId> for MCTSTree {
    type Output = MCTSNode;

    fn index(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for MCTSTree {
    fn index_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }
}

/// Shape of the tree, for logging and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    pub total_edges: usize,
    /// Legal actions not tried anywhere in the tree yet.
    pub untried_actions: usize,
}

impl TreeStats {
    /// Average edges per node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        match self.node_count {
            0 => 0.0,
            n => self.total_edges as f64 / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActionMask, PlayerMap};

    #[test]
    fn test_new_tree_has_a_root() {
        let tree = MCTSTree::new(PlayerId::new(1), 3);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.seats(), 3);
        assert_eq!(tree.root_node().to_move, PlayerId::new(1));
        assert!(tree.root_node().is_leaf());
    }

    #[test]
    fn test_positions_and_reroot() {
        let mut tree = MCTSTree::new(PlayerId::new(0), 2);
        let key = (PlayerId::new(1), vec![1, 2, 3]);
        assert_eq!(tree.find(&key), None);

        let id = tree.push(MCTSNode::new(PlayerId::new(1), 1));
        tree.remember(key.clone(), id);
        assert_eq!(tree.find(&key), Some(id));
        // Same board, other seat to move: a different position.
        assert_eq!(tree.find(&(PlayerId::new(0), vec![1, 2, 3])), None);

        tree.reroot(id);
        assert_eq!(tree.root(), id);
        assert_eq!(tree.len(), 2);

        tree.clear(PlayerId::new(0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.positions_known(), 0);
    }

    #[test]
    fn test_stats() {
        let mut tree = MCTSTree::new(PlayerId::new(0), 2);
        let root = tree.root();
        tree[root].open([30, 31, 32].into_iter().collect::<ActionMask>());
        let e = tree[root].ensure_edge(30, 2);

        let child = tree.push(MCTSNode::new(PlayerId::new(1), 1));
        tree[root].edges[e].child = Some(child);
        tree[child].close(PlayerMap::with_value(2, 0.5));

        let stats = tree.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.total_edges, 1);
        assert_eq!(stats.untried_actions, 2);
        assert_eq!(stats.branching_factor(), 0.5);
    }

    #[test]
    fn test_serialization_drops_positions() {
        let mut tree = MCTSTree::new(PlayerId::new(0), 2);
        let root = tree.root();
        tree[root].visits = 50;
        tree.remember((PlayerId::new(0), vec![9]), root);

        let json = serde_json::to_string(&tree).unwrap();
        let back: MCTSTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.root_node().visits, 50);
        assert_eq!(back.positions_known(), 0);
    }
}
