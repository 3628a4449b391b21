//! Arena node types shared by both search variants.
//!
//! Nodes never own each other. A node points back at its parent through a
//! `NodeId` into the owning arena, and forward through the `child` slot of
//! each of its edges.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::policy::mean;

/// Position of a node in its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// No node: the parent of a root, the child of an untried edge.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// The id of arena slot `index`.
    ///
    /// # Panics
    ///
    /// If `index` does not fit below `NONE`.
    #[must_use]
    pub fn at(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(slot) if slot != Self::NONE.0 => Self(slot),
            _ => panic!("node arena is full: no id for slot {index}"),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("#-")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// One legal action out of a closed-loop node, with the statistics of the
/// playouts that took it.
#[derive(Clone, Debug)]
pub struct Edge<A> {
    pub action: A,

    /// `NodeId::NONE` until the action is tried.
    pub child: NodeId,

    pub visits: u32,

    /// Summed playout scores for the root player.
    pub value_sum: f64,
}

impl<A> Edge<A> {
    pub fn untried(action: A) -> Self {
        Self {
            action,
            child: NodeId::NONE,
            visits: 0,
            value_sum: 0.0,
        }
    }

    #[must_use]
    pub fn is_tried(&self) -> bool {
        !self.child.is_none()
    }

    #[must_use]
    pub fn mean_value(&self) -> f64 {
        mean(self.value_sum, self.visits)
    }
}

/// Most edges a closed-loop node can hold; children record their edge as `u16`.
pub const MAX_EDGES: usize = 1 << 16;

/// A closed-loop node: the state one sampled path of actions led to.
#[derive(Clone, Debug)]
pub struct Node<S, A> {
    pub state: S,

    pub parent: NodeId,

    /// Which of the parent's edges leads here.
    pub parent_edge: u16,

    pub depth: u16,

    pub visits: u32,

    pub value_sum: f64,

    pub is_terminal: bool,

    /// One edge per legal action, in legal-action order.
    pub edges: SmallVec<[Edge<A>; 8]>,
}

impl<S, A> Node<S, A> {
    /// # Panics
    ///
    /// If there are more than [`MAX_EDGES`] actions.
    pub fn new(
        state: S,
        parent: NodeId,
        parent_edge: u16,
        depth: u16,
        is_terminal: bool,
        actions: Vec<A>,
    ) -> Self {
        assert!(
            actions.len() <= MAX_EDGES,
            "{} legal actions exceed the {MAX_EDGES} edges a node can hold",
            actions.len()
        );
        Self {
            state,
            parent,
            parent_edge,
            depth,
            visits: 0,
            value_sum: 0.0,
            is_terminal,
            edges: actions.into_iter().map(Edge::untried).collect(),
        }
    }

    pub fn root(state: S, is_terminal: bool, actions: Vec<A>) -> Self {
        Self::new(state, NodeId::NONE, 0, 0, is_terminal, actions)
    }

    /// Is some legal action still without a child?
    #[must_use]
    pub fn has_untried(&self) -> bool {
        self.edges.iter().any(|e| !e.is_tried())
    }

    /// Indices of the edges still without a child.
    pub fn untried_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| (!e.is_tried()).then_some(i))
    }

    #[must_use]
    pub fn mean_value(&self) -> f64 {
        mean(self.value_sum, self.visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll_or_stop() -> Node<u8, &'static str> {
        Node::root(0, false, vec!["roll", "stop", "bust"])
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(5).to_string(), "#5");
        assert_eq!(NodeId::NONE.to_string(), "#-");
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::new(0).is_none());
    }

    #[test]
    fn test_node_id_at_slot() {
        assert_eq!(NodeId::at(5), NodeId::new(5));
        assert_eq!(NodeId::at(5).index(), 5);
    }

    #[test]
    #[should_panic(expected = "node arena is full")]
    fn test_node_id_at_rejects_none_slot() {
        let _ = NodeId::at(u32::MAX as usize);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "node arena is full")]
    fn test_node_id_at_rejects_wide_slot() {
        let _ = NodeId::at(u32::MAX as usize + 7);
    }

    #[test]
    fn test_edge_limit_is_inclusive() {
        let node: Node<u8, u32> = Node::root(0, false, (0..MAX_EDGES as u32).collect());
        assert_eq!(node.edges.len(), MAX_EDGES);
        assert_eq!(node.edges[MAX_EDGES - 1].action, u32::from(u16::MAX));
    }

    #[test]
    #[should_panic(expected = "exceed the 65536 edges")]
    fn test_too_many_actions_rejected() {
        let _: Node<u8, u32> = Node::root(0, false, (0..=MAX_EDGES as u32).collect());
    }

    #[test]
    fn test_edges_start_untried() {
        let node = roll_or_stop();

        assert!(node.parent.is_none());
        assert_eq!(node.edges.len(), 3);
        assert_eq!(node.edges[1].action, "stop");
        assert!(node.edges.iter().all(|e| !e.is_tried() && e.visits == 0));
        assert_eq!(node.edges[0].mean_value(), 0.0);
    }

    #[test]
    fn test_untried_edges_shrink_as_children_appear() {
        let mut node = roll_or_stop();
        node.edges[1].child = NodeId::new(10);

        assert_eq!(node.untried_edges().collect::<Vec<_>>(), vec![0, 2]);
        assert!(node.has_untried());

        node.edges[0].child = NodeId::new(11);
        node.edges[2].child = NodeId::new(12);
        assert!(!node.has_untried());
    }

    #[test]
    fn test_mean_value() {
        let mut node = roll_or_stop();
        node.visits = 4;
        node.value_sum = -2.0;
        node.edges[0].visits = 2;
        node.edges[0].value_sum = 1.0;

        assert_eq!(node.mean_value(), -0.5);
        assert_eq!(node.edges[0].mean_value(), 0.5);
    }

    #[test]
    fn test_terminal_node_has_nothing_to_try() {
        let node: Node<u8, &str> = Node::root(0, true, Vec::new());
        assert!(!node.has_untried());
    }
}
