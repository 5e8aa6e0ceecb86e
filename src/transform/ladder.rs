//! Ladder operator to Pauli strings
//!
//! a  = (c + i d) / 2 form used here, per ladder operator on node k:
//!   c: X on k, Z down the X child's Z-chain, branch labels up to the root
//!   d: Y on k, Z down the Y child's Z-chain, branch labels up to the root
//!   coefficient of c is 1/2; coefficient of d is -i/2 (lowering)
//!   or +i/2 (raising)

use num_complex::Complex64;
use tracing::{trace, warn};

use super::TransformError;
use crate::algebra::{LadderOperator, Pauli, QubitOperator};
use crate::tree::{Edge, Node, TernaryTree};

/// Coefficient of the c majorana string
pub const C_COEFFICIENT: Complex64 = Complex64::new(0.5, 0.0);

/// Coefficient of the d majorana string for a lowering or raising operator
#[inline]
pub fn d_coefficient(is_raising: bool) -> Complex64 {
    if is_raising {
        Complex64::new(0.0, 0.5)
    } else {
        Complex64::new(0.0, -0.5)
    }
}

/// Qubit indices carrying X, Y and Z in one majorana string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MajoranaOperands {
    /// Indices tagged X, in insertion order
    pub x: Vec<usize>,
    /// Indices tagged Y, in insertion order
    pub y: Vec<usize>,
    /// Indices tagged Z, in insertion order
    pub z: Vec<usize>,
}

impl MajoranaOperands {
    fn push(&mut self, edge: Edge, index: usize) {
        match edge {
            Edge::X => self.x.push(index),
            Edge::Y => self.y.push(index),
            Edge::Z => self.z.push(index),
        }
    }

    /// `(index, label)` factors: all X operands, then Y, then Z
    pub fn factors(&self) -> impl Iterator<Item = (usize, Pauli)> + '_ {
        tagged(&self.x, Pauli::X)
            .chain(tagged(&self.y, Pauli::Y))
            .chain(tagged(&self.z, Pauli::Z))
    }

    /// Total number of operands
    pub fn len(&self) -> usize {
        self.x.len() + self.y.len() + self.z.len()
    }

    /// Whether no operand was collected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weighted Pauli string for these operands
    pub fn to_operator(&self, coefficient: Complex64) -> QubitOperator {
        QubitOperator::from_term(self.factors(), coefficient)
    }
}

fn tagged(indices: &[usize], pauli: Pauli) -> impl Iterator<Item = (usize, Pauli)> + '_ {
    indices.iter().map(move |&index| (index, pauli))
}

/// Operand sets of both majorana components of one ladder operator
#[derive(Debug, Clone, PartialEq)]
pub struct MajoranaPair {
    /// Tree node the ladder operator acts on
    pub index: usize,
    /// c component operands
    pub c: MajoranaOperands,
    /// d component operands
    pub d: MajoranaOperands,
    /// Coefficient applied to the d component
    pub d_coefficient: Complex64,
}

impl MajoranaPair {
    /// `0.5 * c + d_coefficient * d`
    pub fn to_operator(&self) -> QubitOperator {
        self.c.to_operator(C_COEFFICIENT) + self.d.to_operator(self.d_coefficient)
    }
}

/// Transforms single ladder operators against a shared tree
#[derive(Debug, Clone, Copy)]
pub struct LadderTransformer<'t> {
    tree: &'t TernaryTree,
}

impl<'t> LadderTransformer<'t> {
    /// Transformer reading `tree`
    pub fn new(tree: &'t TernaryTree) -> Self {
        Self { tree }
    }

    /// Tree this transformer reads
    pub fn tree(&self) -> &'t TernaryTree {
        self.tree
    }

    /// Resolve the node a ladder operator acts on
    fn resolve(&self, mode: usize) -> Result<&'t Node, TransformError> {
        let index = self
            .tree
            .node_index_for_mode(mode)
            .ok_or(TransformError::ModeOutOfRange {
                mode,
                len: self.tree.mode_map().len().unwrap_or(0),
            })?;
        self.tree
            .node(index)
            .ok_or(TransformError::NodeOutOfRange {
                index,
                n_nodes: self.tree.len(),
            })
    }

    /// Collect the operand sets of both majorana components
    pub fn majorana_operands(
        &self,
        ladder: LadderOperator,
    ) -> Result<MajoranaPair, TransformError> {
        let node = self.resolve(ladder.mode)?;
        let index = node.index();

        let mut c = MajoranaOperands {
            x: vec![index],
            ..Default::default()
        };
        let mut d = MajoranaOperands {
            y: vec![index],
            ..Default::default()
        };

        // Descents: Z on every node of the child's Z-chain, parent to deepest.
        c.z.extend(self.tree.z_chain(node.x_child()).map(Node::index));
        d.z.extend(self.tree.z_chain(node.y_child()).map(Node::index));

        // Ascent: both components pick up the branch label at every level.
        for step in self.tree.ascent(index) {
            match step.edge {
                Some(edge) => {
                    c.push(edge, step.parent);
                    d.push(edge, step.parent);
                }
                None => warn!(
                    parent = step.parent,
                    node = index,
                    "parent does not list child, level skipped"
                ),
            }
        }

        trace!(
            mode = ladder.mode,
            raising = ladder.is_raising,
            node = index,
            c = ?c,
            d = ?d,
            "majorana operands"
        );

        Ok(MajoranaPair {
            index,
            c,
            d,
            d_coefficient: d_coefficient(ladder.is_raising),
        })
    }

    /// Two-term qubit operator equal to the ladder operator
    pub fn transform(&self, ladder: LadderOperator) -> Result<QubitOperator, TransformError> {
        self.majorana_operands(ladder).map(|pair| pair.to_operator())
    }
}
