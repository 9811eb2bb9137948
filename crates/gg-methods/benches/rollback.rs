use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gg_methods::{symmetric_grid, FastScheme, GaussRollback, DEFAULT_EXPLICIT_P};

fn bench_schemes(c: &mut Criterion) {
    let (n, h, v) = (512, 0.005, 0.04 / 5.0);
    let payoff: Vec<f64> = symmetric_grid(n, h)
        .iter()
        .map(|x| (x.exp() - 1.0).max(0.0))
        .collect();

    let schemes = [
        ("explicit", GaussRollback::explicit(DEFAULT_EXPLICIT_P).unwrap()),
        ("crank_nicolson", GaussRollback::crank_nicolson(1.0).unwrap()),
        ("fft2", GaussRollback::fft2()),
        ("fft", GaussRollback::fft()),
        ("chain_cn", GaussRollback::default_chain(FastScheme::CrankNicolson)),
        ("chain_fft2", GaussRollback::default_chain(FastScheme::Fft2)),
    ];
    for (name, scheme) in schemes {
        let bound = scheme.bind(n, h, v).unwrap();
        c.bench_function(&format!("rollback_{name}_{n}"), |b| {
            b.iter(|| {
                let mut values = payoff.clone();
                bound.rollback(black_box(&mut values)).unwrap();
                values
            })
        });
    }
}

criterion_group!(benches, bench_schemes);
criterion_main!(benches);
