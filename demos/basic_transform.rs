//! Encode a two-mode hopping term over a few tree layouts and print the
//! resulting qubit operators.
//!
//! Run with: cargo run --example basic_transform

use anyhow::{Context, Result};
use num_complex::Complex64;
use ternary_majorana::{ternary_tree_transform, FermionOperator, TreeDescription};

fn main() -> Result<()> {
    let mut hopping = FermionOperator::zero();
    hopping.add_term("0^ 2".parse()?, Complex64::new(0.5, 0.0));
    hopping.add_term("2^ 0".parse()?, Complex64::new(0.5, 0.0));

    let n_qubits = 4;
    let custom: TreeDescription = "1(0,-,2(3,-,-))".parse().context("custom layout")?;
    let layouts = [
        ("jordan-wigner", TreeDescription::jordan_wigner(n_qubits)),
        ("parity", TreeDescription::parity(n_qubits)),
        ("balanced", TreeDescription::balanced(n_qubits)),
        ("custom", Some(custom)),
    ];

    for (name, desc) in layouts {
        let encoded = ternary_tree_transform(&hopping, desc.as_ref(), None, Some(n_qubits))
            .with_context(|| format!("encoding over the {} layout", name))?;
        println!(
            "{} ({}), weight {}:\n{}\n",
            name,
            desc.map(|d| d.to_string()).unwrap_or_default(),
            encoded.many_body_order(),
            encoded
        );
    }

    Ok(())
}
