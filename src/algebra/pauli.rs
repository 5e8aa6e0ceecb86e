//! Single-qubit Pauli labels
//!
//! Product table on one site:
//!   XY = iZ, YZ = iX, ZX = iY
//!   reversed order picks up -i, equal labels give identity

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;

/// Non-identity single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pauli {
    /// Pauli X
    X,
    /// Pauli Y
    Y,
    /// Pauli Z
    Z,
}

/// Phase picked up by a product of two Pauli operators on one site.
///
/// Stored as a power of `i` so products stay exact until they are
/// folded into a complex coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Phase(u8);

impl Phase {
    /// Phase `1`
    pub const ONE: Phase = Phase(0);
    /// Phase `i`
    pub const I: Phase = Phase(1);
    /// Phase `-1`
    pub const MINUS_ONE: Phase = Phase(2);
    /// Phase `-i`
    pub const MINUS_I: Phase = Phase(3);

    /// Exponent `k` in `i^k`, reduced mod 4
    pub fn exponent(self) -> u8 {
        self.0
    }

    /// Complex value of the phase
    pub fn to_complex(self) -> Complex64 {
        match self.0 {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        }
    }
}

impl std::ops::Mul for Phase {
    type Output = Phase;

    fn mul(self, rhs: Phase) -> Phase {
        Phase((self.0 + rhs.0) % 4)
    }
}

impl std::ops::MulAssign for Phase {
    fn mul_assign(&mut self, rhs: Phase) {
        *self = *self * rhs;
    }
}

impl Pauli {
    /// All three labels in X, Y, Z order
    pub const ALL: [Pauli; 3] = [Pauli::X, Pauli::Y, Pauli::Z];

    /// Multiply `self * rhs` on a single site.
    ///
    /// Returns the phase and the resulting label, `None` meaning identity.
    pub fn product(self, rhs: Pauli) -> (Phase, Option<Pauli>) {
        use Pauli::*;
        match (self, rhs) {
            (X, X) | (Y, Y) | (Z, Z) => (Phase::ONE, None),
            (X, Y) => (Phase::I, Some(Z)),
            (Y, X) => (Phase::MINUS_I, Some(Z)),
            (Y, Z) => (Phase::I, Some(X)),
            (Z, Y) => (Phase::MINUS_I, Some(X)),
            (Z, X) => (Phase::I, Some(Y)),
            (X, Z) => (Phase::MINUS_I, Some(Y)),
        }
    }

    /// Whether two labels commute on the same site
    pub fn commutes_with(self, rhs: Pauli) -> bool {
        self == rhs
    }

    /// Character used in text output
    pub fn as_char(self) -> char {
        match self {
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// Tree edges carry the Pauli label they contribute to a string
impl TryFrom<char> for Pauli {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'X' | 'x' => Ok(Pauli::X),
            'Y' | 'y' => Ok(Pauli::Y),
            'Z' | 'z' => Ok(Pauli::Z),
            other => Err(other),
        }
    }
}

impl FromStr for Pauli {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Pauli::try_from(c).map_err(|c| format!("unknown Pauli label '{c}'")),
            _ => Err(format!("expected a single Pauli label, got '{s}'")),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_products() {
        assert_eq!(Pauli::X.product(Pauli::Y), (Phase::I, Some(Pauli::Z)));
        assert_eq!(Pauli::Y.product(Pauli::Z), (Phase::I, Some(Pauli::X)));
        assert_eq!(Pauli::Z.product(Pauli::X), (Phase::I, Some(Pauli::Y)));
    }

    #[test]
    fn test_anticyclic_products() {
        assert_eq!(Pauli::Y.product(Pauli::X), (Phase::MINUS_I, Some(Pauli::Z)));
        assert_eq!(Pauli::Z.product(Pauli::Y), (Phase::MINUS_I, Some(Pauli::X)));
        assert_eq!(Pauli::X.product(Pauli::Z), (Phase::MINUS_I, Some(Pauli::Y)));
    }

    #[test]
    fn test_squares_are_identity() {
        for p in Pauli::ALL {
            assert_eq!(p.product(p), (Phase::ONE, None));
        }
    }

    #[test]
    fn test_phase_arithmetic() {
        assert_eq!(Phase::I * Phase::I, Phase::MINUS_ONE);
        assert_eq!(Phase::I * Phase::MINUS_I, Phase::ONE);
        assert_eq!(Phase::MINUS_I.to_complex(), Complex64::new(0.0, -1.0));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("x".parse::<Pauli>(), Ok(Pauli::X));
        assert_eq!(Pauli::try_from('Z'), Ok(Pauli::Z));
        assert!("W".parse::<Pauli>().is_err());
        assert!("XY".parse::<Pauli>().is_err());
    }
}
