//! Python bindings that expose the ternary tree encoder via PyO3.
use num_complex::Complex64;
use pyo3::{
    exceptions::{PyIndexError, PyValueError},
    prelude::*,
    types::PyModule,
};

use crate::{
    EncoderConfig, EncodingError, FermionOperator, FermionTerm, LadderOperator, ModeMap,
    QubitOperator, TernaryTreeEncoder, TreeDescription,
};

/// Terms as exchanged with Python: `([(mode, is_raising), ...], coefficient)`.
type PyFermionTerms = Vec<(Vec<(usize, bool)>, Complex64)>;
/// Terms as returned to Python: `([(qubit, "X"|"Y"|"Z"), ...], coefficient)`.
type PyQubitTerms = Vec<(Vec<(usize, String)>, Complex64)>;

/// Python-facing encoder holding one built tree.
#[pyclass(frozen)]
#[derive(Debug)]
pub struct PyTernaryTreeEncoder {
    encoder: TernaryTreeEncoder,
}

#[pymethods]
impl PyTernaryTreeEncoder {
    #[new]
    #[pyo3(signature = (tree, n_qubits, permutation=None, validate=false))]
    /// Build the tree from its text description, e.g. `"0(1,-,2)"`.
    pub fn new(
        tree: &str,
        n_qubits: usize,
        permutation: Option<Vec<usize>>,
        validate: bool,
    ) -> PyResult<Self> {
        let description = parse_description(tree)?;
        let config = EncoderConfig::new()
            .with_n_qubits(n_qubits)
            .with_validation(validate);
        let encoder = TernaryTreeEncoder::new(
            n_qubits,
            Some(&description),
            ModeMap::from_option(permutation),
            config,
        )
        .map_err(to_py_err)?;
        Ok(Self { encoder })
    }

    /// Number of qubits in the tree.
    pub fn n_qubits(&self) -> usize {
        self.encoder.tree().len()
    }

    /// Ancestors of node `index`, nearest first.
    pub fn ancestors(&self, index: usize) -> PyResult<Vec<usize>> {
        let tree = self.encoder.tree();
        tree.get_node(index)
            .map_err(|err| PyIndexError::new_err(err.to_string()))?;
        Ok(tree.ancestors(index).map(|node| node.index()).collect())
    }

    /// Encode a list of weighted ladder terms.
    pub fn transform(&self, terms: PyFermionTerms) -> PyResult<PyQubitTerms> {
        let operator = to_fermion_operator(terms);
        let result = self.encoder.transform(&operator).map_err(to_py_err)?;
        Ok(to_py_terms(&result))
    }
}

/// Encode `terms` over the tree given by its text description.
///
/// Args:
///     terms: List of `([(mode, is_raising), ...], coefficient)` tuples.
///     tree: Tree description such as `"0(1,-,2)"`.
///     permutation: Optional mode to node mapping.
///     n_qubits: Qubit count; defaults to the highest mode + 1.
///
/// Returns:
///     List of `([(qubit, label), ...], coefficient)` tuples.
#[pyfunction]
#[pyo3(signature = (terms, tree, permutation=None, n_qubits=None))]
pub fn ternary_tree_transform(
    terms: PyFermionTerms,
    tree: &str,
    permutation: Option<Vec<usize>>,
    n_qubits: Option<usize>,
) -> PyResult<PyQubitTerms> {
    let description = parse_description(tree)?;
    let operator = to_fermion_operator(terms);
    let result = crate::ternary_tree_transform(&operator, Some(&description), permutation, n_qubits)
        .map_err(to_py_err)?;
    Ok(to_py_terms(&result))
}

fn parse_description(text: &str) -> PyResult<TreeDescription> {
    text.parse()
        .map_err(|err| PyValueError::new_err(format!("invalid tree description: {}", err)))
}

fn to_fermion_operator(terms: PyFermionTerms) -> FermionOperator {
    terms
        .into_iter()
        .map(|(ops, coefficient)| {
            let term: FermionTerm = ops.into_iter().map(LadderOperator::from).collect();
            (term, coefficient)
        })
        .collect()
}

fn to_py_terms(operator: &QubitOperator) -> PyQubitTerms {
    operator
        .iter()
        .map(|(string, &coefficient)| {
            let sites = string
                .iter()
                .map(|(index, pauli)| (index, pauli.as_char().to_string()))
                .collect();
            (sites, coefficient)
        })
        .collect()
}

fn to_py_err(err: EncodingError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Create Python module.
#[pymodule]
pub fn ternary_majorana_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTernaryTreeEncoder>()?;
    m.add_function(wrap_pyfunction!(ternary_tree_transform, m)?)?;
    Ok(())
}
