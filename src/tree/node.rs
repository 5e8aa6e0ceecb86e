//! Ternary tree node
//!
//! Node = index + parent link + three typed child links (X, Y, Z).
//! Links are indices into the owning tree's node storage, never owners.

use std::fmt;

/// Label of an outgoing tree edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// First child slot
    X,
    /// Second child slot
    Y,
    /// Third child slot
    Z,
}

impl Edge {
    /// Slots in description order
    pub const ALL: [Edge; 3] = [Edge::X, Edge::Y, Edge::Z];

    /// Position of the slot in a `[X, Y, Z]` array
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Edge::X => 0,
            Edge::Y => 1,
            Edge::Z => 2,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Edge::X => 'X',
            Edge::Y => 'Y',
            Edge::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

/// Single tree vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    index: usize,
    parent: Option<usize>,
    children: [Option<usize>; 3],
}

impl Node {
    /// Unlinked node carrying `index`
    pub fn new(index: usize) -> Self {
        Self {
            index,
            parent: None,
            children: [None; 3],
        }
    }

    /// Identity of the node (its qubit index)
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the parent, `None` for the root or a detached node
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Index of the child on `edge`
    #[inline]
    pub fn child(&self, edge: Edge) -> Option<usize> {
        self.children[edge.slot()]
    }

    /// X child index
    pub fn x_child(&self) -> Option<usize> {
        self.child(Edge::X)
    }

    /// Y child index
    pub fn y_child(&self) -> Option<usize> {
        self.child(Edge::Y)
    }

    /// Z child index
    pub fn z_child(&self) -> Option<usize> {
        self.child(Edge::Z)
    }

    /// `[X, Y, Z]` child indices
    pub fn children(&self) -> [Option<usize>; 3] {
        self.children
    }

    /// Which slot of this node holds `child`, if any
    pub fn edge_to(&self, child: usize) -> Option<Edge> {
        Edge::ALL
            .into_iter()
            .find(|&edge| self.child(edge) == Some(child))
    }

    /// No children on any slot
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(crate) fn set_parent(&mut self, parent: usize) {
        self.parent = Some(parent);
    }

    pub(crate) fn set_child(&mut self, edge: Edge, child: usize) {
        self.children[edge.slot()] = Some(child);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unlinked() {
        let node = Node::new(4);
        assert_eq!(node.index(), 4);
        assert_eq!(node.parent(), None);
        assert_eq!(node.children(), [None, None, None]);
        assert!(node.is_leaf());
    }

    #[test]
    fn test_edge_to_classifies_slot() {
        let mut node = Node::new(0);
        node.set_child(Edge::Y, 2);
        node.set_child(Edge::Z, 5);
        assert_eq!(node.edge_to(2), Some(Edge::Y));
        assert_eq!(node.edge_to(5), Some(Edge::Z));
        assert_eq!(node.edge_to(1), None);
        assert_eq!(node.x_child(), None);
        assert!(!node.is_leaf());
    }
}
