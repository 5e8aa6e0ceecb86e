//! Fermion-to-qubit transformation over a ternary tree
//!
//! Two layers:
//! 1. [`LadderTransformer`]: one ladder operator → two weighted Pauli strings
//! 2. [`TermAggregator`]: ordered products per term, sums over terms

mod aggregator;
mod ladder;

pub use aggregator::TermAggregator;
pub use ladder::{d_coefficient, LadderTransformer, MajoranaOperands, MajoranaPair, C_COEFFICIENT};

use thiserror::Error;

/// Errors raised while transforming ladder operators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Mode not covered by the tree's permutation
    #[error("mode {mode} not covered by permutation of length {len}")]
    ModeOutOfRange {
        /// Requested mode
        mode: usize,
        /// Permutation length
        len: usize,
    },

    /// Mode resolves to a node the tree does not hold
    #[error("node {index} out of range (tree has {n_nodes} nodes)")]
    NodeOutOfRange {
        /// Resolved node index
        index: usize,
        /// Number of tree nodes
        n_nodes: usize,
    },
}
