//! Weighted sums of Pauli strings
//!
//! Addition is commutative and merges equal strings; multiplication is
//! the non-commutative Pauli product with phases folded into the
//! coefficients.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

use num_complex::Complex64;

use super::pauli::Pauli;
use super::pauli_string::PauliString;

/// Merged coefficients below this magnitude are dropped when terms combine
pub const EQ_TOLERANCE: f64 = 1e-8;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Sum of Pauli strings with complex coefficients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QubitOperator {
    terms: BTreeMap<PauliString, Complex64>,
}

impl QubitOperator {
    /// Additive identity (no terms)
    pub fn zero() -> Self {
        Self::default()
    }

    /// Multiplicative identity
    pub fn identity() -> Self {
        Self::scalar(Complex64::new(1.0, 0.0))
    }

    /// Identity string scaled by `coefficient`
    pub fn scalar(coefficient: Complex64) -> Self {
        let mut op = Self::zero();
        op.add_term(PauliString::identity(), coefficient);
        op
    }

    /// Single weighted string from `(index, label)` factors.
    ///
    /// Factors are multiplied left to right; any phase from repeated
    /// indices is folded into the coefficient.
    pub fn from_term<I>(ops: I, coefficient: Complex64) -> Self
    where
        I: IntoIterator<Item = (usize, Pauli)>,
    {
        let (phase, string) = PauliString::from_ops(ops);
        let mut op = Self::zero();
        op.add_term(string, coefficient * phase.to_complex());
        op
    }

    /// Add `coefficient * string`.
    ///
    /// A new string is stored as given, however small. Merging into an
    /// existing string drops it once the sum falls below `EQ_TOLERANCE`.
    pub fn add_term(&mut self, string: PauliString, coefficient: Complex64) {
        match self.terms.entry(string) {
            Entry::Occupied(mut occupied) => {
                let sum = *occupied.get() + coefficient;
                if sum.norm() < EQ_TOLERANCE {
                    occupied.remove();
                } else {
                    *occupied.get_mut() = sum;
                }
            }
            Entry::Vacant(vacant) => {
                if coefficient != ZERO {
                    vacant.insert(coefficient);
                }
            }
        }
    }

    /// Coefficient of `string`, if present
    pub fn coefficient(&self, string: &PauliString) -> Option<Complex64> {
        self.terms.get(string).copied()
    }

    /// Iterate `(string, coefficient)` pairs in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (&PauliString, &Complex64)> {
        self.terms.iter()
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the operator has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Drop terms with coefficient magnitude at or below `tolerance`
    ///
    /// Real or imaginary parts below `tolerance` are also zeroed.
    pub fn compress(&mut self, tolerance: f64) {
        self.terms.retain(|_, c| c.norm() > tolerance);
        for c in self.terms.values_mut() {
            if c.re.abs() <= tolerance {
                c.re = 0.0;
            }
            if c.im.abs() <= tolerance {
                c.im = 0.0;
            }
        }
    }

    /// Term-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &QubitOperator, tolerance: f64) -> bool {
        self.terms
            .keys()
            .chain(other.terms.keys())
            .all(|string| {
                let lhs = self.terms.get(string).copied().unwrap_or(ZERO);
                let rhs = other.terms.get(string).copied().unwrap_or(ZERO);
                (lhs - rhs).norm() <= tolerance
            })
    }

    /// Adjoint: Pauli strings are Hermitian, so only coefficients conjugate
    pub fn hermitian_conjugate(&self) -> QubitOperator {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(string, c)| (string.clone(), c.conj()))
                .collect(),
        }
    }

    /// Largest string weight among the terms
    pub fn many_body_order(&self) -> usize {
        self.terms.keys().map(PauliString::weight).max().unwrap_or(0)
    }

    fn scale(&mut self, factor: Complex64) {
        for c in self.terms.values_mut() {
            *c *= factor;
        }
        self.terms.retain(|_, c| *c != ZERO);
    }

    /// Raw products accumulated per string; only exact cancellations vanish
    fn product(&self, rhs: &QubitOperator) -> QubitOperator {
        let mut terms: BTreeMap<PauliString, Complex64> = BTreeMap::new();
        for (lhs_string, lhs_coeff) in &self.terms {
            for (rhs_string, rhs_coeff) in &rhs.terms {
                let (phase, string) = lhs_string.product(rhs_string);
                *terms.entry(string).or_insert(ZERO) += lhs_coeff * rhs_coeff * phase.to_complex();
            }
        }
        terms.retain(|_, c| *c != ZERO);
        QubitOperator { terms }
    }
}

impl AddAssign<&QubitOperator> for QubitOperator {
    fn add_assign(&mut self, rhs: &QubitOperator) {
        for (string, coefficient) in &rhs.terms {
            self.add_term(string.clone(), *coefficient);
        }
    }
}

impl AddAssign for QubitOperator {
    fn add_assign(&mut self, rhs: QubitOperator) {
        for (string, coefficient) in rhs.terms {
            self.add_term(string, coefficient);
        }
    }
}

impl Add for QubitOperator {
    type Output = QubitOperator;

    fn add(mut self, rhs: QubitOperator) -> QubitOperator {
        self += rhs;
        self
    }
}

impl Add<&QubitOperator> for &QubitOperator {
    type Output = QubitOperator;

    fn add(self, rhs: &QubitOperator) -> QubitOperator {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl Neg for QubitOperator {
    type Output = QubitOperator;

    fn neg(mut self) -> QubitOperator {
        for c in self.terms.values_mut() {
            *c = -*c;
        }
        self
    }
}

impl Sub for QubitOperator {
    type Output = QubitOperator;

    fn sub(self, rhs: QubitOperator) -> QubitOperator {
        self + (-rhs)
    }
}

impl MulAssign<&QubitOperator> for QubitOperator {
    fn mul_assign(&mut self, rhs: &QubitOperator) {
        *self = self.product(rhs);
    }
}

impl MulAssign for QubitOperator {
    fn mul_assign(&mut self, rhs: QubitOperator) {
        *self = self.product(&rhs);
    }
}

impl Mul for QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: QubitOperator) -> QubitOperator {
        self.product(&rhs)
    }
}

impl Mul<&QubitOperator> for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: &QubitOperator) -> QubitOperator {
        self.product(rhs)
    }
}

impl Mul<Complex64> for QubitOperator {
    type Output = QubitOperator;

    fn mul(mut self, rhs: Complex64) -> QubitOperator {
        self.scale(rhs);
        self
    }
}

impl Mul<f64> for QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: f64) -> QubitOperator {
        self * Complex64::new(rhs, 0.0)
    }
}

impl Sum for QubitOperator {
    fn sum<I: Iterator<Item = QubitOperator>>(iter: I) -> Self {
        iter.fold(QubitOperator::zero(), |acc, op| acc + op)
    }
}

/// Left fold in iteration order; the product is non-commutative
impl Product for QubitOperator {
    fn product<I: Iterator<Item = QubitOperator>>(iter: I) -> Self {
        iter.fold(QubitOperator::identity(), |acc, op| acc * op)
    }
}

impl fmt::Display for QubitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for (string, c) in &self.terms {
            if !first {
                writeln!(f, " +")?;
            }
            write!(f, "({:+} {:+}i) [{}]", c.re, c.im, string)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_addition_merges_and_cancels() {
        let a = QubitOperator::from_term([(0, Pauli::X)], c(0.5, 0.0));
        let b = QubitOperator::from_term([(0, Pauli::X)], c(-0.5, 0.0));
        let sum = a.clone() + a.clone();
        assert_eq!(sum.coefficient(&PauliString::from_ops([(0, Pauli::X)]).1), Some(c(1.0, 0.0)));
        assert!((a + b).is_empty());
    }

    #[test]
    fn test_zero_is_additive_identity() {
        let a = QubitOperator::from_term([(1, Pauli::Y), (0, Pauli::Z)], c(0.0, 0.25));
        assert_eq!(QubitOperator::zero() + a.clone(), a);
    }

    #[test]
    fn test_identity_is_multiplicative_identity() {
        let a = QubitOperator::from_term([(2, Pauli::Y)], c(1.5, -1.0));
        assert_eq!(QubitOperator::identity() * a.clone(), a);
        assert_eq!(a.clone() * QubitOperator::identity(), a);
    }

    #[test]
    fn test_product_is_non_commutative() {
        let x = QubitOperator::from_term([(0, Pauli::X)], c(1.0, 0.0));
        let y = QubitOperator::from_term([(0, Pauli::Y)], c(1.0, 0.0));
        let xy = &x * &y;
        let yx = &y * &x;
        let z = PauliString::from_ops([(0, Pauli::Z)]).1;
        assert_eq!(xy.coefficient(&z), Some(c(0.0, 1.0)));
        assert_eq!(yx.coefficient(&z), Some(c(0.0, -1.0)));
        assert_ne!(xy, yx);
    }

    #[test]
    fn test_from_term_folds_repeated_index_phase() {
        let op = QubitOperator::from_term([(0, Pauli::Z), (0, Pauli::X)], c(1.0, 0.0));
        let y = PauliString::from_ops([(0, Pauli::Y)]).1;
        assert_eq!(op.coefficient(&y), Some(c(0.0, 1.0)));
    }

    #[test]
    fn test_scaling_and_negation() {
        let a = QubitOperator::from_term([(0, Pauli::X)], c(1.0, 0.0));
        let scaled = a.clone() * c(0.0, 2.0);
        assert_eq!(scaled.coefficient(&PauliString::from_ops([(0, Pauli::X)]).1), Some(c(0.0, 2.0)));
        assert!((a.clone() - a.clone()).is_empty());
        assert!((a * 0.0).is_empty());
    }

    #[test]
    fn test_hermitian_conjugate() {
        let a = QubitOperator::from_term([(0, Pauli::X)], c(0.5, 0.5));
        let dagger = a.hermitian_conjugate();
        assert_eq!(dagger.coefficient(&PauliString::from_ops([(0, Pauli::X)]).1), Some(c(0.5, -0.5)));
    }

    #[test]
    fn test_compress_and_approx_eq() {
        let mut a = QubitOperator::from_term([(0, Pauli::X)], c(1.0, 1e-12));
        a += QubitOperator::from_term([(1, Pauli::Z)], c(1e-6, 0.0));
        a.compress(1e-5);
        assert_eq!(a.len(), 1);
        let expected = QubitOperator::from_term([(0, Pauli::X)], c(1.0, 0.0));
        assert_eq!(a, expected);
        assert!(a.approx_eq(&(expected + QubitOperator::from_term([(3, Pauli::Y)], c(1e-9, 0.0))), 1e-6));
    }

    #[test]
    fn test_small_pieces_merge_before_cutoff() {
        let x0 = PauliString::from_ops([(0, Pauli::X)]).1;
        let piece = QubitOperator::from_term([(0, Pauli::X)], c(6e-9, 0.0));
        assert_eq!(piece.coefficient(&x0), Some(c(6e-9, 0.0)));

        let merged = piece.clone() + piece;
        assert_eq!(merged.coefficient(&x0), Some(c(1.2e-8, 0.0)));

        let mut nearly_cancelled = QubitOperator::from_term([(0, Pauli::X)], c(1.0, 0.0));
        nearly_cancelled.add_term(x0.clone(), c(-1.0 + 5e-9, 0.0));
        assert!(nearly_cancelled.is_empty());
    }

    #[test]
    fn test_product_and_scale_keep_small_terms() {
        let x = QubitOperator::from_term([(0, Pauli::X)], c(1e-5, 0.0));
        let y = QubitOperator::from_term([(0, Pauli::Y)], c(1e-5, 0.0));
        let z0 = PauliString::from_ops([(0, Pauli::Z)]).1;
        let product = &x * &y;
        assert_eq!(product.len(), 1);
        let coefficient = product.coefficient(&z0).unwrap();
        assert!((coefficient - c(0.0, 1e-10)).norm() < 1e-24);

        let scaled = x * 1e-9;
        assert_eq!(scaled.len(), 1);
        let mut compressed = scaled.clone();
        compressed.compress(EQ_TOLERANCE);
        assert!(compressed.is_empty());
        assert_eq!(scaled.hermitian_conjugate().len(), 1);
    }

    #[test]
    fn test_sum_and_product_folds() {
        let ops = vec![
            QubitOperator::from_term([(0, Pauli::X)], c(1.0, 0.0)),
            QubitOperator::from_term([(0, Pauli::Y)], c(1.0, 0.0)),
        ];
        let total: QubitOperator = ops.clone().into_iter().sum();
        assert_eq!(total.len(), 2);
        let prod: QubitOperator = ops.into_iter().product();
        assert_eq!(prod, QubitOperator::from_term([(0, Pauli::Z)], c(0.0, 1.0)));
    }

    #[test]
    fn test_many_body_order() {
        let mut a = QubitOperator::from_term([(0, Pauli::X), (4, Pauli::Z)], c(1.0, 0.0));
        a += QubitOperator::scalar(c(2.0, 0.0));
        assert_eq!(a.many_body_order(), 2);
        assert_eq!(QubitOperator::zero().many_body_order(), 0);
    }
}
