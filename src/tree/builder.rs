//! Tree construction from a branch description
//!
//! Nodes are allocated up front with indices `0..n_qubits`, then links
//! are wired top-down in pre-order (node, X subtree, Y subtree, Z
//! subtree). An explicit worklist replaces recursion so chain-shaped
//! trees of any depth are safe.

use tracing::{debug, warn};

use super::description::TreeDescription;
use super::mode_map::ModeMap;
use super::node::{Edge, Node};
use super::{TernaryTree, TreeError};

/// Builds a [`TernaryTree`] over a fixed number of qubits
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    n_qubits: usize,
    mode_map: ModeMap,
}

impl TreeBuilder {
    /// Builder for `n_qubits` nodes with the identity mode map
    pub fn new(n_qubits: usize) -> Self {
        Self {
            n_qubits,
            mode_map: ModeMap::Identity,
        }
    }

    /// Place mode `m` on node `permutation[m]`
    pub fn with_permutation(self, permutation: Vec<usize>) -> Self {
        self.with_mode_map(ModeMap::Permutation(permutation))
    }

    /// Set the mode map directly
    pub fn with_mode_map(mut self, mode_map: ModeMap) -> Self {
        self.mode_map = mode_map;
        self
    }

    /// Number of nodes the built tree will hold
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Wire the tree without validating the description.
    ///
    /// Duplicate indices overwrite earlier links and unmentioned nodes stay
    /// detached. Indices outside `0..n_qubits` cannot be stored; they are
    /// skipped together with everything below them.
    pub fn build(&self, description: Option<&TreeDescription>) -> TernaryTree {
        let mut nodes: Vec<Node> = (0..self.n_qubits).map(Node::new).collect();
        let mut root = None;

        match description.filter(|_| self.n_qubits > 0) {
            None if self.n_qubits > 0 => warn!(
                n_qubits = self.n_qubits,
                "no description given, every node left detached"
            ),
            None => {}
            Some(description) if description.index() < self.n_qubits => {
                root = Some(description.index());
                link_branches(&mut nodes, description);
            }
            Some(description) => warn!(
                index = description.index(),
                n_qubits = self.n_qubits,
                "root index out of range, tree left without root"
            ),
        }

        debug!(
            n_qubits = self.n_qubits,
            root = ?root,
            permuted = !self.mode_map.is_identity(),
            "built ternary tree"
        );

        TernaryTree {
            nodes,
            root,
            mode_map: self.mode_map.clone(),
        }
    }

    /// Validate the description and mode map, then build
    pub fn build_checked(
        &self,
        description: Option<&TreeDescription>,
    ) -> Result<TernaryTree, TreeError> {
        match description {
            Some(description) => description.validate(self.n_qubits)?,
            None if self.n_qubits > 0 => return Err(TreeError::MissingIndex(0)),
            None => {}
        }
        self.mode_map.validate(self.n_qubits)?;
        Ok(self.build(description))
    }
}

/// Pre-order wiring below `root`, which must already be in range
fn link_branches(nodes: &mut [Node], root: &TreeDescription) {
    let n_qubits = nodes.len();
    let mut worklist: Vec<(&TreeDescription, Option<(usize, Edge)>)> = vec![(root, None)];

    while let Some((description, link)) = worklist.pop() {
        let index = description.index();
        if let Some((parent, edge)) = link {
            nodes[parent].set_child(edge, index);
            nodes[index].set_parent(parent);
        }
        // Reversed so the X branch is popped, and linked, first.
        for edge in Edge::ALL.into_iter().rev() {
            let Some(branch) = description.branch(edge) else {
                continue;
            };
            if branch.index() >= n_qubits {
                warn!(
                    index = branch.index(),
                    parent = index,
                    edge = %edge,
                    n_qubits,
                    "description index out of range, branch skipped"
                );
                continue;
            }
            worklist.push((branch, Some((index, edge))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(text: &str) -> TreeDescription {
        text.parse().expect("valid description")
    }

    #[test]
    fn test_links_are_bidirectional() {
        let tree = TreeBuilder::new(4).build(Some(&desc("0(1,2,3)")));
        assert_eq!(tree.root().map(Node::index), Some(0));
        let root = tree.get_node(0).unwrap();
        assert_eq!(root.children(), [Some(1), Some(2), Some(3)]);
        for child in 1..4 {
            assert_eq!(tree.get_node(child).unwrap().parent(), Some(0));
        }
    }

    #[test]
    fn test_zero_qubits_gives_empty_tree() {
        let tree = TreeBuilder::new(0).build(Some(&desc("0")));
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_unmentioned_nodes_stay_detached() {
        let tree = TreeBuilder::new(3).build(Some(&desc("0(-,-,1)")));
        let isolated = tree.get_node(2).unwrap();
        assert_eq!(isolated.parent(), None);
        assert!(isolated.is_leaf());
    }

    #[test]
    fn test_missing_description_leaves_nodes_detached() {
        let tree = TreeBuilder::new(2).build(None);
        assert_eq!(tree.len(), 2);
        assert!(tree.root().is_none());
        assert!(tree.nodes().iter().all(|node| node.parent().is_none() && node.is_leaf()));
    }

    #[test]
    fn test_out_of_range_branch_is_skipped() {
        let tree = TreeBuilder::new(2).build(Some(&desc("0(1,5(-,-,1),-)")));
        let root = tree.get_node(0).unwrap();
        assert_eq!(root.children(), [Some(1), None, None]);
    }

    #[test]
    fn test_build_checked_rejects_malformed() {
        let builder = TreeBuilder::new(3);
        assert_eq!(
            builder.build_checked(Some(&desc("0(1,1,-)"))).unwrap_err(),
            TreeError::DuplicateIndex(1)
        );
        assert_eq!(builder.build_checked(None).unwrap_err(), TreeError::MissingIndex(0));
        assert!(builder.build_checked(Some(&desc("2(0,-,1)"))).is_ok());
        assert!(TreeBuilder::new(0).build_checked(None).is_ok());
    }

    #[test]
    fn test_build_checked_rejects_bad_permutation() {
        let builder = TreeBuilder::new(2).with_permutation(vec![0, 2]);
        assert_eq!(
            builder.build_checked(Some(&desc("0(1,-,-)"))).unwrap_err(),
            TreeError::PermutationOutOfRange { mode: 1, target: 2, n_qubits: 2 }
        );
    }
}
