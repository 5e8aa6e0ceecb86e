//! Fermionic ladder operators and operators built from them
//!
//! A term is an ordered product of ladder operators; an operator maps
//! terms to complex coefficients. Order inside a term is significant.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use thiserror::Error;

/// Creation (`is_raising`) or annihilation operator on one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LadderOperator {
    /// Fermionic mode index
    pub mode: usize,
    /// `true` for creation, `false` for annihilation
    pub is_raising: bool,
}

impl LadderOperator {
    /// Construct a ladder operator
    pub fn new(mode: usize, is_raising: bool) -> Self {
        Self { mode, is_raising }
    }

    /// Creation operator on `mode`
    pub fn raising(mode: usize) -> Self {
        Self::new(mode, true)
    }

    /// Annihilation operator on `mode`
    pub fn lowering(mode: usize) -> Self {
        Self::new(mode, false)
    }

    /// Adjoint operator on the same mode
    pub fn adjoint(self) -> Self {
        Self::new(self.mode, !self.is_raising)
    }
}

impl From<(usize, bool)> for LadderOperator {
    fn from((mode, is_raising): (usize, bool)) -> Self {
        Self::new(mode, is_raising)
    }
}

impl fmt::Display for LadderOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_raising {
            write!(f, "{}^", self.mode)
        } else {
            write!(f, "{}", self.mode)
        }
    }
}

/// Errors from parsing ladder-operator text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FermionParseError {
    /// Token is not `<mode>` or `<mode>^`
    #[error("invalid ladder operator '{0}'")]
    InvalidLadder(String),

    /// Coefficient prefix could not be read
    #[error("invalid coefficient '{0}'")]
    InvalidCoefficient(String),
}

impl FromStr for LadderOperator {
    type Err = FermionParseError;

    /// Parse `"3^"` (creation) or `"3"` (annihilation)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (digits, is_raising) = match token.strip_suffix('^') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        digits
            .parse::<usize>()
            .map(|mode| Self::new(mode, is_raising))
            .map_err(|_| FermionParseError::InvalidLadder(token.to_string()))
    }
}

/// Ordered product of ladder operators
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FermionTerm(Vec<LadderOperator>);

impl FermionTerm {
    /// Term from ladder operators in product order
    pub fn new(ops: Vec<LadderOperator>) -> Self {
        Self(ops)
    }

    /// Empty product (identity)
    pub fn identity() -> Self {
        Self(Vec::new())
    }

    /// Ladder operators in product order
    pub fn operators(&self) -> &[LadderOperator] {
        &self.0
    }

    /// Number of ladder operators
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the identity term
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest mode index in the term
    pub fn max_mode(&self) -> Option<usize> {
        self.0.iter().map(|op| op.mode).max()
    }

    /// Adjoint: reversed order, each operator flipped
    pub fn adjoint(&self) -> Self {
        Self(self.0.iter().rev().map(|op| op.adjoint()).collect())
    }
}

impl<T: Into<LadderOperator>> FromIterator<T> for FermionTerm {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl FromStr for FermionTerm {
    type Err = FermionParseError;

    /// Parse whitespace-separated ladder operators, e.g. `"0^ 1"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(LadderOperator::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for FermionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", tokens.join(" "))
    }
}

/// Sum of fermionic terms with complex coefficients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FermionOperator {
    terms: BTreeMap<FermionTerm, Complex64>,
}

impl FermionOperator {
    /// Operator with no terms
    pub fn zero() -> Self {
        Self::default()
    }

    /// Single term with a coefficient
    pub fn from_term(term: FermionTerm, coefficient: Complex64) -> Self {
        let mut op = Self::zero();
        op.add_term(term, coefficient);
        op
    }

    /// Add `coefficient * term`, summing with an existing equal term
    pub fn add_term(&mut self, term: FermionTerm, coefficient: Complex64) {
        *self
            .terms
            .entry(term)
            .or_insert_with(|| Complex64::new(0.0, 0.0)) += coefficient;
    }

    /// Iterate `(term, coefficient)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&FermionTerm, &Complex64)> {
        self.terms.iter()
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Minimum number of qubits needed: highest mode + 1
    pub fn count_qubits(&self) -> usize {
        self.terms
            .keys()
            .filter_map(FermionTerm::max_mode)
            .max()
            .map_or(0, |mode| mode + 1)
    }

    /// Adjoint operator
    pub fn hermitian_conjugate(&self) -> Self {
        let mut result = Self::zero();
        for (term, c) in &self.terms {
            result.add_term(term.adjoint(), c.conj());
        }
        result
    }
}

impl FromIterator<(FermionTerm, Complex64)> for FermionOperator {
    fn from_iter<I: IntoIterator<Item = (FermionTerm, Complex64)>>(iter: I) -> Self {
        let mut op = Self::zero();
        for (term, c) in iter {
            op.add_term(term, c);
        }
        op
    }
}

/// Parse `"<re>[,<im>]:<ladder ops>"`; the coefficient defaults to 1
pub fn parse_weighted_term(s: &str) -> Result<(FermionTerm, Complex64), FermionParseError> {
    let (coefficient, ladder) = match s.split_once(':') {
        Some((coeff, ladder)) => (parse_coefficient(coeff)?, ladder),
        None => (Complex64::new(1.0, 0.0), s),
    };
    Ok((ladder.parse()?, coefficient))
}

fn parse_coefficient(s: &str) -> Result<Complex64, FermionParseError> {
    let invalid = || FermionParseError::InvalidCoefficient(s.trim().to_string());
    let mut parts = s.split(',');
    let re = parts
        .next()
        .ok_or_else(invalid)?
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid())?;
    let im = match parts.next() {
        Some(part) => part.trim().parse::<f64>().map_err(|_| invalid())?,
        None => 0.0,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Complex64::new(re, im))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ladder() {
        assert_eq!("3^".parse::<LadderOperator>(), Ok(LadderOperator::raising(3)));
        assert_eq!(" 0 ".parse::<LadderOperator>(), Ok(LadderOperator::lowering(0)));
        assert!("a^".parse::<LadderOperator>().is_err());
    }

    #[test]
    fn test_parse_term_preserves_order() {
        let term: FermionTerm = "1^ 0".parse().unwrap();
        assert_eq!(
            term.operators(),
            &[LadderOperator::raising(1), LadderOperator::lowering(0)]
        );
        assert_eq!(term.to_string(), "1^ 0");
    }

    #[test]
    fn test_parse_weighted_term() {
        let (term, c) = parse_weighted_term("0.5,-1:2^ 2").unwrap();
        assert_eq!(term.len(), 2);
        assert_eq!(c, Complex64::new(0.5, -1.0));

        let (_, c) = parse_weighted_term("0^").unwrap();
        assert_eq!(c, Complex64::new(1.0, 0.0));

        assert!(parse_weighted_term("x:0").is_err());
    }

    #[test]
    fn test_count_qubits() {
        let mut op = FermionOperator::zero();
        assert_eq!(op.count_qubits(), 0);
        op.add_term(FermionTerm::identity(), Complex64::new(1.0, 0.0));
        assert_eq!(op.count_qubits(), 0);
        op.add_term("4^ 1".parse().unwrap(), Complex64::new(1.0, 0.0));
        assert_eq!(op.count_qubits(), 5);
    }

    #[test]
    fn test_hermitian_conjugate() {
        let op = FermionOperator::from_term("2^ 0".parse().unwrap(), Complex64::new(0.0, 1.0));
        let dagger = op.hermitian_conjugate();
        let (term, c) = dagger.iter().next().unwrap();
        assert_eq!(term.to_string(), "0^ 2");
        assert_eq!(*c, Complex64::new(0.0, -1.0));
    }
}
