//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use ternary_majorana::*;

fn hopping_operator(n_modes: usize) -> FermionOperator {
    let mut op = FermionOperator::zero();
    for p in 0..n_modes {
        for q in 0..n_modes {
            op.add_term(
                [(p, true), (q, false)].into_iter().collect(),
                Complex64::new(1.0, 0.0),
            );
        }
    }
    op
}

fn benchmark_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("ladder_transform");
    for n in [16usize, 128, 1024] {
        let layouts = [
            ("jordan_wigner", TreeDescription::jordan_wigner(n)),
            ("balanced", TreeDescription::balanced(n)),
        ];
        for (name, desc) in layouts {
            let tree = TernaryTree::new(n, desc.as_ref());
            let transformer = LadderTransformer::new(&tree);
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                b.iter(|| transformer.transform(black_box(LadderOperator::lowering(n - 1))));
            });
        }
    }
    group.finish();
}

fn benchmark_operator(c: &mut Criterion) {
    let n = 12;
    let op = hopping_operator(n);
    let desc = TreeDescription::balanced(n);
    let encoder = TernaryTreeEncoder::new(n, desc.as_ref(), ModeMap::Identity, EncoderConfig::new())
        .expect("balanced layout builds");

    c.bench_function("transform_hopping_n=12", |b| {
        b.iter(|| encoder.transform(black_box(&op)));
    });
}

criterion_group!(benches, benchmark_ladder, benchmark_operator);
criterion_main!(benches);
