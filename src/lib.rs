//! # Ternary Tree Fermion-to-Qubit Encoding
//!
//! Rewrites fermionic operators (sums of products of creation and
//! annihilation operators) as sums of weighted Pauli strings, using a
//! caller-supplied ternary tree whose edges are labelled X, Y and Z.
//!
//! ## Core Algorithm
//!
//! 1. **Tree construction**: wire `n_qubits` nodes from a recursive
//!    `(index, [X, Y, Z])` branch description
//! 2. **Majorana split**: each ladder operator becomes `c/2 ± i d/2`
//! 3. **Path reading**: `c` and `d` strings are read off the tree, a Z-chain
//!    descent below the node plus the branch labels on the way to the root
//! 4. **Aggregation**: ordered products per term, sums over terms
//!
//! String weight is bounded by tree depth plus one Z-chain, not by the
//! number of qubits.
//!
//! ## Usage Example
//!
//! ```
//! use num_complex::Complex64;
//! use ternary_majorana::{ternary_tree_transform, FermionOperator, TreeDescription};
//!
//! let tree: TreeDescription = "0(1,-,-)".parse()?;
//! let mut hopping = FermionOperator::zero();
//! hopping.add_term("0^ 1".parse()?, Complex64::new(1.0, 0.0));
//! hopping.add_term("1^ 0".parse()?, Complex64::new(1.0, 0.0));
//!
//! let qubit_op = ternary_tree_transform(&hopping, Some(&tree), None, None)?;
//! assert!(qubit_op.approx_eq(&qubit_op.hermitian_conjugate(), 1e-12));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod algebra; // Pauli strings, qubit and fermion operators
pub mod transform; // Ladder transforms and term aggregation
pub mod tree; // Ternary tree, description, traversal
/// Python bindings exposing the encoder to external runtimes.
#[cfg(feature = "python-bindings")]
pub mod python_bindings;

// Re-exports for convenience
pub use algebra::{
    FermionOperator, FermionTerm, LadderOperator, Pauli, PauliString, QubitOperator, EQ_TOLERANCE,
};
pub use transform::{LadderTransformer, TermAggregator, TransformError};
pub use tree::{Edge, ModeMap, Node, TernaryTree, TreeBuilder, TreeDescription, TreeError};

use num_complex::Complex64;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Fewer qubits requested than the operator's modes need
    #[error("Invalid number of qubits specified: {requested} < {required} required by the operator")]
    InvalidQubitCount {
        /// Qubit count supplied by the caller
        requested: usize,
        /// Highest mode index + 1
        required: usize,
    },

    /// Tree description or permutation rejected
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Ladder operator could not be placed on the tree
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Configuration parameters for encoding
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Number of qubits; defaults to the operator's highest mode + 1
    pub n_qubits: Option<usize>,

    /// Validate the tree description and permutation before building
    pub validate_tree: bool,

    /// Spread terms over worker threads (needs the `parallel` feature)
    pub parallel: bool,

    /// Terms with coefficient magnitude at or below this are dropped
    pub tolerance: f64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            n_qubits: None,
            validate_tree: false,
            parallel: false,
            tolerance: EQ_TOLERANCE,
        }
    }
}

impl EncoderConfig {
    /// Permissive defaults: no validation, sequential, `EQ_TOLERANCE`
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the number of qubits
    pub fn with_n_qubits(mut self, n_qubits: usize) -> Self {
        self.n_qubits = Some(n_qubits);
        self
    }

    /// Enable description and permutation validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_tree = enabled;
        self
    }

    /// Enable parallel term reduction
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Set the compression tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }
}

/// Built tree plus configuration, reusable across many operators
#[derive(Debug, Clone)]
pub struct TernaryTreeEncoder {
    tree: TernaryTree,
    config: EncoderConfig,
}

impl TernaryTreeEncoder {
    /// Build the tree for `n_qubits` nodes, validating first if configured
    pub fn new(
        n_qubits: usize,
        description: Option<&TreeDescription>,
        mode_map: ModeMap,
        config: EncoderConfig,
    ) -> Result<Self, EncodingError> {
        let builder = TreeBuilder::new(n_qubits).with_mode_map(mode_map);
        let tree = if config.validate_tree {
            builder.build_checked(description)?
        } else {
            builder.build(description)
        };
        Ok(Self { tree, config })
    }

    /// Wrap an already built tree
    pub fn from_tree(tree: TernaryTree, config: EncoderConfig) -> Self {
        Self { tree, config }
    }

    /// Tree used for every transform
    pub fn tree(&self) -> &TernaryTree {
        &self.tree
    }

    /// Active configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Transform a single ladder operator
    pub fn transform_ladder(&self, ladder: LadderOperator) -> Result<QubitOperator, EncodingError> {
        Ok(LadderTransformer::new(&self.tree).transform(ladder)?)
    }

    /// Transform `coefficient * term`
    pub fn transform_term(
        &self,
        term: &FermionTerm,
        coefficient: Complex64,
    ) -> Result<QubitOperator, EncodingError> {
        let mut result = TermAggregator::new(&self.tree).transform_term(term, coefficient)?;
        result.compress(self.config.tolerance);
        Ok(result)
    }

    /// Transform a whole fermionic operator
    pub fn transform(&self, operator: &FermionOperator) -> Result<QubitOperator, EncodingError> {
        let required = operator.count_qubits();
        if self.tree.len() < required {
            return Err(EncodingError::InvalidQubitCount {
                requested: self.tree.len(),
                required,
            });
        }

        let aggregator = TermAggregator::new(&self.tree);
        let mut result = self.reduce(&aggregator, operator)?;
        result.compress(self.config.tolerance);
        Ok(result)
    }

    #[cfg(feature = "parallel")]
    fn reduce(
        &self,
        aggregator: &TermAggregator<'_>,
        operator: &FermionOperator,
    ) -> Result<QubitOperator, TransformError> {
        if self.config.parallel {
            aggregator.transform_operator_parallel(operator)
        } else {
            aggregator.transform_operator(operator)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn reduce(
        &self,
        aggregator: &TermAggregator<'_>,
        operator: &FermionOperator,
    ) -> Result<QubitOperator, TransformError> {
        if self.config.parallel {
            debug!("parallel reduction requested without the `parallel` feature");
        }
        aggregator.transform_operator(operator)
    }
}

/// Transform `operator` over the tree given by `description`.
///
/// `n_qubits` defaults to the operator's highest mode + 1; a smaller
/// value is rejected before the tree is built. `permutation`, when
/// given, places mode `m` on node `permutation[m]`.
pub fn ternary_tree_transform(
    operator: &FermionOperator,
    description: Option<&TreeDescription>,
    permutation: Option<Vec<usize>>,
    n_qubits: Option<usize>,
) -> Result<QubitOperator, EncodingError> {
    let config = EncoderConfig {
        n_qubits,
        ..EncoderConfig::default()
    };
    ternary_tree_transform_with(operator, description, ModeMap::from_option(permutation), config)
}

/// [`ternary_tree_transform`] with an explicit mode map and configuration
pub fn ternary_tree_transform_with(
    operator: &FermionOperator,
    description: Option<&TreeDescription>,
    mode_map: ModeMap,
    config: EncoderConfig,
) -> Result<QubitOperator, EncodingError> {
    let required = operator.count_qubits();
    let n_qubits = config.n_qubits.unwrap_or(required);
    if n_qubits < required {
        return Err(EncodingError::InvalidQubitCount {
            requested: n_qubits,
            required,
        });
    }

    debug!(n_qubits, terms = operator.len(), "encoding fermion operator");
    let encoder = TernaryTreeEncoder::new(n_qubits, description, mode_map, config)?;
    encoder.transform(operator)
}
