//! Sparse Pauli strings
//!
//! A string is a tensor product of single-qubit Paulis, stored as an
//! ordered map from qubit index to label. Unlisted qubits carry identity.

use std::collections::BTreeMap;
use std::fmt;

use super::pauli::{Pauli, Phase};

/// Tensor product of Pauli operators keyed by qubit index
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PauliString {
    sites: BTreeMap<usize, Pauli>,
}

impl PauliString {
    /// Identity string (empty support)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a string by multiplying `(index, label)` factors left to right.
    ///
    /// Repeated indices are multiplied together in the order given, so the
    /// returned phase is exact even for overlapping factors.
    pub fn from_ops<I>(ops: I) -> (Phase, Self)
    where
        I: IntoIterator<Item = (usize, Pauli)>,
    {
        let mut phase = Phase::ONE;
        let mut string = Self::identity();
        for (index, pauli) in ops {
            phase *= string.apply_right(index, pauli);
        }
        (phase, string)
    }

    /// Right-multiply a single-site factor, returning the phase produced.
    fn apply_right(&mut self, index: usize, pauli: Pauli) -> Phase {
        match self.sites.get(&index).copied() {
            None => {
                self.sites.insert(index, pauli);
                Phase::ONE
            }
            Some(existing) => {
                let (phase, result) = existing.product(pauli);
                match result {
                    Some(label) => {
                        self.sites.insert(index, label);
                    }
                    None => {
                        self.sites.remove(&index);
                    }
                }
                phase
            }
        }
    }

    /// Product `self * other` as a phase and a string
    pub fn product(&self, other: &PauliString) -> (Phase, PauliString) {
        let mut result = self.clone();
        let mut phase = Phase::ONE;
        for (&index, &pauli) in &other.sites {
            phase *= result.apply_right(index, pauli);
        }
        (phase, result)
    }

    /// Whether two strings commute
    ///
    /// Strings commute iff they anticommute on an even number of sites.
    pub fn commutes_with(&self, other: &PauliString) -> bool {
        let anticommuting = self
            .sites
            .iter()
            .filter(|&(index, pauli)| {
                other
                    .sites
                    .get(index)
                    .is_some_and(|rhs| !pauli.commutes_with(*rhs))
            })
            .count();
        anticommuting % 2 == 0
    }

    /// Label on `index`, `None` for identity
    pub fn get(&self, index: usize) -> Option<Pauli> {
        self.sites.get(&index).copied()
    }

    /// Number of non-identity sites
    pub fn weight(&self) -> usize {
        self.sites.len()
    }

    /// Whether this is the identity string
    pub fn is_identity(&self) -> bool {
        self.sites.is_empty()
    }

    /// Qubit indices with a non-identity label, ascending
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.sites.keys().copied()
    }

    /// `(index, label)` pairs in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Pauli)> + '_ {
        self.sites.iter().map(|(&index, &pauli)| (index, pauli))
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sites.is_empty() {
            return write!(f, "I");
        }
        let mut first = true;
        for (index, pauli) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{pauli}{index}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ops_sorted_and_phase_free() {
        let (phase, s) = PauliString::from_ops([(2, Pauli::Z), (0, Pauli::X), (1, Pauli::Y)]);
        assert_eq!(phase, Phase::ONE);
        assert_eq!(s.to_string(), "X0 Y1 Z2");
        assert_eq!(s.weight(), 3);
    }

    #[test]
    fn test_from_ops_repeated_index() {
        let (phase, s) = PauliString::from_ops([(0, Pauli::X), (0, Pauli::Y)]);
        assert_eq!(phase, Phase::I);
        assert_eq!(s.get(0), Some(Pauli::Z));

        let (phase, s) = PauliString::from_ops([(3, Pauli::Z), (3, Pauli::Z)]);
        assert_eq!(phase, Phase::ONE);
        assert!(s.is_identity());
    }

    #[test]
    fn test_product_phase() {
        let (_, x0) = PauliString::from_ops([(0, Pauli::X)]);
        let (_, y0z1) = PauliString::from_ops([(0, Pauli::Y), (1, Pauli::Z)]);
        let (phase, s) = x0.product(&y0z1);
        assert_eq!(phase, Phase::I);
        assert_eq!(s.to_string(), "Z0 Z1");

        let (phase, _) = y0z1.product(&x0);
        assert_eq!(phase, Phase::MINUS_I);
    }

    #[test]
    fn test_commutation() {
        let (_, x0x1) = PauliString::from_ops([(0, Pauli::X), (1, Pauli::X)]);
        let (_, z0z1) = PauliString::from_ops([(0, Pauli::Z), (1, Pauli::Z)]);
        let (_, z0) = PauliString::from_ops([(0, Pauli::Z)]);
        assert!(x0x1.commutes_with(&z0z1));
        assert!(!x0x1.commutes_with(&z0));
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(PauliString::identity().to_string(), "I");
    }
}
