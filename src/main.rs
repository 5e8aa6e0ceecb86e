use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ternary_majorana::algebra::parse_weighted_term;
use ternary_majorana::tree::TreeBuilder;
use ternary_majorana::{
    ternary_tree_transform_with, EncoderConfig, FermionOperator, ModeMap, Node, TreeDescription,
};

#[derive(Parser, Debug)]
#[command(
    name = "ternary-majorana",
    about = "Fermion-to-qubit encoding over ternary trees"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a fermionic operator and print the qubit operator.
    Transform {
        /// Tree description, e.g. `0(1,-,2)`.
        #[arg(long)]
        tree: String,
        /// Number of qubits (default: highest mode + 1).
        #[arg(long)]
        n_qubits: Option<usize>,
        /// Comma-separated mode to node permutation.
        #[arg(long, value_delimiter = ',')]
        permutation: Option<Vec<usize>>,
        /// Reject malformed descriptions and permutations.
        #[arg(long)]
        validate: bool,
        /// Weighted term `<re>[,<im>]:<ladder ops>`, e.g. `0.5:0^ 1`. Repeatable.
        #[arg(long = "term", required = true, allow_hyphen_values = true)]
        terms: Vec<String>,
    },
    /// Print a standard tree layout as a description.
    Layout {
        /// Layout family.
        #[arg(value_enum)]
        kind: LayoutKind,
        /// Number of qubits.
        n_qubits: usize,
    },
    /// Print the ancestors of a node, nearest first.
    Ancestors {
        /// Tree description.
        #[arg(long)]
        tree: String,
        /// Number of qubits.
        #[arg(long)]
        n_qubits: usize,
        /// Node index.
        index: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutKind {
    JordanWigner,
    Parity,
    Balanced,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Transform {
            tree,
            n_qubits,
            permutation,
            validate,
            terms,
        } => run_transform(&tree, n_qubits, permutation, validate, &terms)?,
        Commands::Layout { kind, n_qubits } => run_layout(kind, n_qubits)?,
        Commands::Ancestors {
            tree,
            n_qubits,
            index,
        } => run_ancestors(&tree, n_qubits, index)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_tree(text: &str) -> Result<TreeDescription> {
    text.parse()
        .with_context(|| format!("invalid tree description '{}'", text))
}

fn run_transform(
    tree: &str,
    n_qubits: Option<usize>,
    permutation: Option<Vec<usize>>,
    validate: bool,
    terms: &[String],
) -> Result<()> {
    let description = parse_tree(tree)?;

    let mut operator = FermionOperator::zero();
    for (idx, text) in terms.iter().enumerate() {
        let (term, coefficient) = parse_weighted_term(text)
            .with_context(|| format!("invalid term {} '{}'", idx + 1, text))?;
        operator.add_term(term, coefficient);
    }

    let mut config = EncoderConfig::new().with_validation(validate);
    config.n_qubits = n_qubits;
    let result = ternary_tree_transform_with(
        &operator,
        Some(&description),
        ModeMap::from_option(permutation),
        config,
    )
    .context("encoding failed")?;

    println!("{}", result);
    Ok(())
}

fn run_layout(kind: LayoutKind, n_qubits: usize) -> Result<()> {
    let description = match kind {
        LayoutKind::JordanWigner => TreeDescription::jordan_wigner(n_qubits),
        LayoutKind::Parity => TreeDescription::parity(n_qubits),
        LayoutKind::Balanced => TreeDescription::balanced(n_qubits),
    };
    match description {
        Some(description) => println!("{}", description),
        None => bail!("a layout needs at least one qubit"),
    }
    Ok(())
}

fn run_ancestors(tree: &str, n_qubits: usize, index: usize) -> Result<()> {
    let description = parse_tree(tree)?;
    let tree = TreeBuilder::new(n_qubits).build(Some(&description));
    tree.get_node(index)
        .with_context(|| format!("cannot look up node {}", index))?;

    let chain: Vec<String> = tree
        .ancestors(index)
        .map(Node::index)
        .map(|i| i.to_string())
        .collect();
    println!("node {}\tdepth={}\tancestors=[{}]", index, chain.len(), chain.join(", "));
    Ok(())
}
