//! Ternary tree of qubit nodes
//!
//! The tree owns one contiguous node array; parent and child links are
//! indices into it. Built once by [`TreeBuilder`], then only read, so a
//! shared reference can be handed to any number of transforms.

mod builder;
mod description;
mod mode_map;
mod node;
mod traversal;

pub use builder::TreeBuilder;
pub use description::{DescriptionErrorKind, DescriptionParseError, TreeDescription};
pub use mode_map::ModeMap;
pub use node::{Edge, Node};
pub use traversal::{Ascent, AscentStep, Ancestors, ZChain};

use thiserror::Error;

/// Errors from tree validation and lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Description names a node the tree cannot hold
    #[error("description index {index} out of range for {n_qubits} qubits")]
    DescriptionIndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of tree nodes
        n_qubits: usize,
    },

    /// Index referenced more than once
    #[error("index {0} appears more than once")]
    DuplicateIndex(usize),

    /// Index in `0..n_qubits` never referenced
    #[error("index {0} is missing from the description")]
    MissingIndex(usize),

    /// Permutation sends a mode outside the tree
    #[error("permutation maps mode {mode} to {target}, out of range for {n_qubits} qubits")]
    PermutationOutOfRange {
        /// Mode being mapped
        mode: usize,
        /// Node it maps to
        target: usize,
        /// Number of tree nodes
        n_qubits: usize,
    },

    /// Lookup of a node the tree does not hold
    #[error("node {index} out of range (tree has {n_nodes} nodes)")]
    NodeOutOfRange {
        /// Requested index
        index: usize,
        /// Number of tree nodes
        n_nodes: usize,
    },
}

/// Immutable, fully wired ternary tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TernaryTree {
    nodes: Vec<Node>,
    root: Option<usize>,
    mode_map: ModeMap,
}

impl TernaryTree {
    /// Build with the identity mode map and no validation
    pub fn new(n_qubits: usize, description: Option<&TreeDescription>) -> Self {
        TreeBuilder::new(n_qubits).build(description)
    }

    /// Number of nodes (qubits)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node, absent for an empty tree
    pub fn root(&self) -> Option<&Node> {
        self.root.and_then(|index| self.nodes.get(index))
    }

    /// Mode to node mapping carried with the tree
    pub fn mode_map(&self) -> &ModeMap {
        &self.mode_map
    }

    /// All nodes in index order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node with `index`, if in range
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Node with `index`
    pub fn get_node(&self, index: usize) -> Result<&Node, TreeError> {
        self.nodes.get(index).ok_or(TreeError::NodeOutOfRange {
            index,
            n_nodes: self.nodes.len(),
        })
    }

    /// Node index for a fermionic mode, after the mode map
    pub fn node_index_for_mode(&self, mode: usize) -> Option<usize> {
        self.mode_map.resolve(mode)
    }

    /// Node a fermionic mode lives on
    pub fn node_for_mode(&self, mode: usize) -> Option<&Node> {
        self.node_index_for_mode(mode)
            .and_then(|index| self.nodes.get(index))
    }

    /// `[X, Y, Z]` children of node `index`
    pub fn children_set(&self, index: usize) -> Result<[Option<&Node>; 3], TreeError> {
        let node = self.get_node(index)?;
        Ok(node.children().map(|child| child.and_then(|c| self.nodes.get(c))))
    }

    /// Parents of node `index`, nearest first, root last
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors::new(&self.nodes, index)
    }

    /// Number of edges between node `index` and the root
    pub fn depth(&self, index: usize) -> usize {
        self.ancestors(index).count()
    }

    /// `start` followed by repeated Z children
    pub fn z_chain(&self, start: Option<usize>) -> ZChain<'_> {
        ZChain::new(&self.nodes, start)
    }

    /// Edge-classified walk from node `index` to the root
    pub fn ascent(&self, index: usize) -> Ascent<'_> {
        Ascent::new(&self.nodes, index)
    }

    /// Greatest depth over all nodes
    pub fn height(&self) -> usize {
        (0..self.nodes.len())
            .map(|index| self.depth(index))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -X-> 1, 0 -Z-> 2, 2 -Y-> 3
    fn sample_tree() -> TernaryTree {
        let desc: TreeDescription = "0(1,-,2(-,3,-))".parse().unwrap();
        TernaryTree::new(4, Some(&desc))
    }

    #[test]
    fn test_single_root() {
        let tree = sample_tree();
        let roots: Vec<usize> = tree
            .nodes()
            .iter()
            .filter(|node| node.parent().is_none())
            .map(Node::index)
            .collect();
        assert_eq!(roots, vec![0]);
        assert_eq!(tree.root().map(Node::index), Some(0));
    }

    #[test]
    fn test_ancestors_and_depth() {
        let tree = sample_tree();
        let chain: Vec<usize> = tree.ancestors(3).map(Node::index).collect();
        assert_eq!(chain, vec![2, 0]);
        assert_eq!(tree.depth(3), 2);
        assert_eq!(tree.depth(0), 0);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_children_set() {
        let tree = sample_tree();
        let [x, y, z] = tree.children_set(0).unwrap();
        assert_eq!(x.map(Node::index), Some(1));
        assert!(y.is_none());
        assert_eq!(z.map(Node::index), Some(2));
        assert_eq!(
            tree.children_set(9).unwrap_err(),
            TreeError::NodeOutOfRange { index: 9, n_nodes: 4 }
        );
    }

    #[test]
    fn test_mode_lookup_through_permutation() {
        let desc: TreeDescription = "0(1,-,-)".parse().unwrap();
        let tree = TreeBuilder::new(2)
            .with_permutation(vec![1, 0])
            .build(Some(&desc));
        assert_eq!(tree.node_index_for_mode(0), Some(1));
        assert_eq!(tree.node_index_for_mode(2), None);
        assert_eq!(tree.node_for_mode(1).map(Node::index), Some(0));
    }
}
