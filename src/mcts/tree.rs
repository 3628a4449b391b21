//! The closed-loop search tree: a flat arena of `Node`s with the root in
//! slot 0.

use std::fmt::{self, Display, Write};

use super::node::{Node, NodeId};

const ROOT: NodeId = NodeId::new(0);

/// Arena of closed-loop nodes.
#[derive(Clone, Debug)]
pub struct SearchTree<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A> SearchTree<S, A> {
    pub fn new(root: Node<S, A>) -> Self {
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(root);
        Self { nodes }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    #[must_use]
    pub fn root_node(&self) -> &Node<S, A> {
        &self.nodes[ROOT.index()]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S, A> {
        &mut self.nodes[id.index()]
    }

    /// Store `node` and link it under its parent's edge.
    pub fn attach(&mut self, node: Node<S, A>) -> NodeId {
        let id = NodeId::at(self.nodes.len());
        let (parent, edge) = (node.parent, usize::from(node.parent_edge));
        self.nodes.push(node);
        if !parent.is_none() {
            self.nodes[parent.index()].edges[edge].child = id;
        }
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: a tree always has its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node and start again from `root`.
    pub fn reset(&mut self, root: Node<S, A>) {
        self.nodes.clear();
        self.nodes.push(root);
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal).count(),
            untried_edges: self.nodes.iter().map(|n| n.untried_edges().count()).sum(),
        }
    }

    /// Credit `value` to `leaf`, every ancestor, and each edge on the way.
    pub fn backpropagate(&mut self, leaf: NodeId, value: f64) {
        let mut id = leaf;
        while !id.is_none() {
            let node = &mut self.nodes[id.index()];
            node.visits += 1;
            node.value_sum += value;
            let (parent, edge) = (node.parent, usize::from(node.parent_edge));
            if !parent.is_none() {
                let edge = &mut self.nodes[parent.index()].edges[edge];
                edge.visits += 1;
                edge.value_sum += value;
            }
            id = parent;
        }
    }
}

impl<S, A: Display> SearchTree<S, A> {
    /// Write an indented outline of the tried part of the tree.
    pub fn dump_tree(&self, out: &mut impl Write) -> fmt::Result {
        let root = self.root_node();
        writeln!(out, "root visits={} value={:.3}", root.visits, root.value_sum)?;
        self.dump_below(out, ROOT, 1)
    }

    fn dump_below(&self, out: &mut impl Write, id: NodeId, indent: usize) -> fmt::Result {
        for edge in self.get(id).edges.iter().filter(|e| e.is_tried()) {
            writeln!(
                out,
                "{:width$}{} visits={} value={:.3}",
                "",
                edge.action,
                edge.visits,
                edge.value_sum,
                width = indent * 2
            )?;
            self.dump_below(out, edge.child, indent + 1)?;
        }
        Ok(())
    }
}

/// Shape of a closed-loop tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    /// Legal actions not yet given a child, over all nodes.
    pub untried_edges: usize,
}
