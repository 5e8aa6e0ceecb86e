//! Operator algebra
//!
//! The symbolic collaborator the encoder produces values in:
//! - Single-qubit Pauli labels with an exact phase table
//! - Sparse Pauli strings
//! - Complex-weighted sums of strings with non-commutative products
//! - Fermionic ladder operators, terms and operators as input

mod fermion;
mod pauli;
mod pauli_string;
mod qubit_operator;

pub use fermion::{
    parse_weighted_term, FermionOperator, FermionParseError, FermionTerm, LadderOperator,
};
pub use pauli::{Pauli, Phase};
pub use pauli_string::PauliString;
pub use qubit_operator::{QubitOperator, EQ_TOLERANCE};
