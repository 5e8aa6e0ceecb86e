//! Folding ladder transforms into terms and terms into operators
//!
//! term     = coefficient * T(l_1) * T(l_2) * ... * T(l_k)   (order kept)
//! operator = sum over terms                                  (any order)

use num_complex::Complex64;
use tracing::debug;

use super::ladder::LadderTransformer;
use super::TransformError;
use crate::algebra::{FermionOperator, FermionTerm, QubitOperator};
use crate::tree::TernaryTree;

/// Combines per-ladder transforms over one shared tree
#[derive(Debug, Clone, Copy)]
pub struct TermAggregator<'t> {
    transformer: LadderTransformer<'t>,
}

impl<'t> TermAggregator<'t> {
    /// Aggregator reading `tree`
    pub fn new(tree: &'t TernaryTree) -> Self {
        Self {
            transformer: LadderTransformer::new(tree),
        }
    }

    /// Underlying single-operator transformer
    pub fn transformer(&self) -> &LadderTransformer<'t> {
        &self.transformer
    }

    /// Left fold of the term's ladder transforms, seeded with `coefficient`.
    ///
    /// The product is taken in the term's own order and never reordered.
    pub fn transform_term(
        &self,
        term: &FermionTerm,
        coefficient: Complex64,
    ) -> Result<QubitOperator, TransformError> {
        let mut product = QubitOperator::scalar(coefficient);
        for &ladder in term.operators() {
            product *= self.transformer.transform(ladder)?;
        }
        Ok(product)
    }

    /// Sum of transformed terms
    pub fn transform_operator(
        &self,
        operator: &FermionOperator,
    ) -> Result<QubitOperator, TransformError> {
        let mut total = QubitOperator::zero();
        for (term, &coefficient) in operator.iter() {
            total += self.transform_term(term, coefficient)?;
        }
        debug!(
            fermion_terms = operator.len(),
            qubit_terms = total.len(),
            "transformed operator"
        );
        Ok(total)
    }

    /// Sum of transformed terms, with terms spread across the rayon pool.
    ///
    /// Each worker builds partial sums that are merged pairwise; the result
    /// matches [`transform_operator`](Self::transform_operator) up to
    /// floating-point summation order.
    #[cfg(feature = "parallel")]
    pub fn transform_operator_parallel(
        &self,
        operator: &FermionOperator,
    ) -> Result<QubitOperator, TransformError> {
        use rayon::prelude::*;

        let terms: Vec<(&FermionTerm, &Complex64)> = operator.iter().collect();
        let total = terms
            .par_iter()
            .map(|&(term, &coefficient)| self.transform_term(term, coefficient))
            .try_reduce(QubitOperator::zero, |lhs, rhs| Ok(lhs + rhs))?;
        debug!(
            fermion_terms = operator.len(),
            qubit_terms = total.len(),
            "transformed operator in parallel"
        );
        Ok(total)
    }
}
