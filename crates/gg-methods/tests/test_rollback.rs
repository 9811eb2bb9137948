//! Accuracy of the rollback schemes against closed-form Gaussian integrals.

use approx::assert_abs_diff_eq;
use gg_core::Real;
use gg_math::normal_cdf;
use gg_methods::{
    symmetric_grid, Courant, FastScheme, GaussRollback, Indicator, DEFAULT_EXPLICIT_P,
};
use proptest::prelude::*;

const N: usize = 1024;
const H: Real = 0.01;

/// `exp(-x² / 2s²)` rolled back by `v` is `s / √(s²+v) · exp(-x² / 2(s²+v))`.
fn bump(x: Real, s2: Real) -> Real {
    (-0.5 * x * x / s2).exp()
}

fn rolled_bump(x: Real, s2: Real, v: Real) -> Real {
    (s2 / (s2 + v)).sqrt() * bump(x, s2 + v)
}

fn finite_difference_schemes() -> Vec<(&'static str, GaussRollback)> {
    vec![
        ("explicit", GaussRollback::explicit(DEFAULT_EXPLICIT_P).unwrap()),
        ("implicit", GaussRollback::implicit()),
        ("crank_nicolson", GaussRollback::crank_nicolson(1.0).unwrap()),
        ("chain_cn", GaussRollback::default_chain(FastScheme::CrankNicolson)),
    ]
}

fn spectral_schemes() -> Vec<(&'static str, GaussRollback)> {
    vec![
        ("fft2", GaussRollback::fft2()),
        ("fft", GaussRollback::fft()),
    ]
}

#[test]
fn schemes_match_the_gaussian_convolution() {
    let (s2, v) = (0.25, 0.25);
    let x = symmetric_grid(N, H);
    let exact: Vec<Real> = x.iter().map(|&x| rolled_bump(x, s2, v)).collect();

    for (name, scheme, tol) in finite_difference_schemes()
        .into_iter()
        .map(|(n, s)| (n, s, 1e-3))
        .chain(spectral_schemes().into_iter().map(|(n, s)| (n, s, 1e-10)))
    {
        let mut values: Vec<Real> = x.iter().map(|&x| bump(x, s2)).collect();
        scheme.bind(N, H, v).unwrap().rollback(&mut values).unwrap();
        let err = values
            .iter()
            .zip(&exact)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, Real::max);
        assert!(err < tol, "{name}: max error {err:e}");
    }
}

#[test]
fn finite_difference_error_shrinks_with_the_step() {
    let (s2, v) = (0.25, 0.1);
    for (name, scheme) in finite_difference_schemes() {
        let mut errors = Vec::new();
        for (n, h) in [(256, 0.04), (512, 0.02)] {
            let x = symmetric_grid(n, h);
            let mut values: Vec<Real> = x.iter().map(|&x| bump(x, s2)).collect();
            scheme.bind(n, h, v).unwrap().rollback(&mut values).unwrap();
            let mid = n / 2;
            errors.push((values[mid] - rolled_bump(x[mid], s2, v)).abs());
        }
        assert!(errors[1] < errors[0], "{name}: {errors:?}");
    }
}

#[test]
fn variance_is_additive() {
    let (s2, v1, v2) = (0.2, 0.1, 0.15);
    let n = 512;
    let h = 0.02;
    let x = symmetric_grid(n, h);
    let schemes = finite_difference_schemes()
        .into_iter()
        .map(|(n, s)| (n, s, 1e-3))
        .chain(spectral_schemes().into_iter().map(|(n, s)| (n, s, 1e-12)))
        .chain(std::iter::once((
            "chain_fft2",
            GaussRollback::default_chain(FastScheme::Fft2),
            1e-3,
        )));
    for (name, scheme, tol) in schemes {
        let mut twice: Vec<Real> = x.iter().map(|&x| bump(x, s2)).collect();
        let mut once = twice.clone();
        scheme.bind(n, h, v1).unwrap().rollback(&mut twice).unwrap();
        scheme.bind(n, h, v2).unwrap().rollback(&mut twice).unwrap();
        scheme.bind(n, h, v1 + v2).unwrap().rollback(&mut once).unwrap();
        for (a, b) in twice.iter().zip(&once) {
            assert!((a - b).abs() < tol, "{name}: {a} vs {b}");
        }
    }
}

#[test]
fn delta_and_gamma_match_finite_differences() {
    let (s2, v) = (0.3, 0.2);
    let n = 512;
    let h = 0.02;
    let x = symmetric_grid(n, h);
    for scheme in [GaussRollback::fft2(), GaussRollback::default()] {
        let bound = scheme.bind(n, h, v).unwrap();
        let mut values: Vec<Real> = x.iter().map(|&x| bump(x - 0.1, s2)).collect();
        let (delta, gamma) = bound.rollback_with_gamma(&mut values).unwrap();
        for i in (n / 4..3 * n / 4).step_by(7) {
            let fd1 = (values[i + 1] - values[i - 1]) / (2.0 * h);
            let fd2 = (values[i + 1] - 2.0 * values[i] + values[i - 1]) / (h * h);
            assert_abs_diff_eq!(delta[i], fd1, epsilon = 2e-3);
            assert_abs_diff_eq!(gamma[i], fd2, epsilon = 2e-2);
        }

        let mut again: Vec<Real> = x.iter().map(|&x| bump(x - 0.1, s2)).collect();
        let delta_only = bound.rollback_with_delta(&mut again).unwrap();
        for i in 0..n {
            assert_abs_diff_eq!(delta_only[i], delta[i], epsilon = 1e-12);
            assert_abs_diff_eq!(again[i], values[i], epsilon = 1e-12);
        }
    }
}

/// Error of `P(x + Z >= b)` at the node just right of the center.  The
/// barrier sits `0.3` to the right, shifted into its grid cell by `frac`
/// of a step; the grid always spans `[-2.56, 2.56]`.
fn indicator_error(ind: Indicator, n: usize, frac: Real) -> Real {
    let h = 5.12 / n as Real;
    let v = 0.16;
    let x = symmetric_grid(n, h);
    let i = n / 2;
    let k = i + (0.3 / h).round() as usize;
    let barrier = x[k] + frac * h;
    let mut values = x.clone();
    ind.apply(&mut values, barrier);
    GaussRollback::fft2()
        .bind(n, h, v)
        .unwrap()
        .rollback(&mut values)
        .unwrap();
    (values[i] - normal_cdf((x[i] - barrier) / v.sqrt())).abs()
}

const RESOLUTIONS: [usize; 3] = [256, 512, 1024];
const FRACTIONS: [Real; 4] = [0.2, 0.35, 0.5, 0.75];

#[test]
fn smoothed_indicators_converge() {
    for frac in FRACTIONS {
        for ind in [Indicator::Naive, Indicator::Linear, Indicator::Quadratic] {
            let e0 = indicator_error(ind, 256, frac);
            let e1 = indicator_error(ind, 512, frac);
            assert!(e1 < e0, "{ind} at {frac}: {e0:e} -> {e1:e}");
        }
    }
    let naive = indicator_error(Indicator::Naive, 256, 0.3);
    let linear = indicator_error(Indicator::Linear, 256, 0.3);
    let quadratic = indicator_error(Indicator::Quadratic, 256, 0.3);
    assert!(linear < 0.1 * naive, "linear {linear:e} vs naive {naive:e}");
    assert!(quadratic < 0.1 * naive, "quadratic {quadratic:e} vs naive {naive:e}");
}

#[test]
fn quadratic_indicator_beats_linear() {
    for n in RESOLUTIONS {
        for frac in FRACTIONS {
            let linear = indicator_error(Indicator::Linear, n, frac);
            let quadratic = indicator_error(Indicator::Quadratic, n, frac);
            assert!(
                quadratic < 0.75 * linear,
                "n = {n}, frac = {frac}: quadratic {quadratic:e} vs linear {linear:e}"
            );
        }
    }
}

#[test]
fn smoothed_indicators_are_second_order() {
    for ind in [Indicator::Linear, Indicator::Quadratic] {
        for frac in FRACTIONS {
            let errors: Vec<Real> = RESOLUTIONS
                .iter()
                .map(|&n| indicator_error(ind, n, frac))
                .collect();
            for w in errors.windows(2) {
                // halving the step should cut the error by about four
                assert!(w[1] < 0.35 * w[0], "{ind} at {frac}: {errors:?}");
            }
        }
    }
}

#[test]
fn custom_courant_rule_is_used() {
    let scheme = GaussRollback::theta(
        1.0,
        Courant::Custom(std::sync::Arc::new(|h: Real| 0.05 / h)),
    )
    .unwrap();
    let x = symmetric_grid(256, 0.02);
    let mut values: Vec<Real> = x.iter().map(|&x| bump(x, 0.2)).collect();
    scheme.bind(256, 0.02, 0.1).unwrap().rollback(&mut values).unwrap();
    assert_abs_diff_eq!(values[128], rolled_bump(x[128], 0.2, 0.1), epsilon = 5e-3);
}

proptest! {
    #[test]
    fn constants_survive_any_rollback(
        exponent in 2u32..9,
        extra in 0usize..5,
        step in 0.02f64..0.2,
        variance in 1e-4f64..0.05,
        level in -10.0f64..10.0,
    ) {
        let n2 = 1usize << exponent;
        let n = n2 + extra;
        let mut schemes = vec![
            (n, GaussRollback::explicit(DEFAULT_EXPLICIT_P).unwrap()),
            (n, GaussRollback::implicit()),
            (n, GaussRollback::crank_nicolson(1.0).unwrap()),
            (n, GaussRollback::fft()),
            (n2, GaussRollback::fft2()),
            (n2, GaussRollback::default()),
        ];
        for (size, scheme) in schemes.drain(..) {
            let mut values = vec![level; size];
            scheme.bind(size, step, variance).unwrap().rollback(&mut values).unwrap();
            for v in values {
                prop_assert!((v - level).abs() < 1e-9 * (1.0 + level.abs()));
            }
        }
    }

    #[test]
    fn implicit_scheme_preserves_positivity(
        seed in proptest::collection::vec(0.0f64..1.0, 16..64),
        variance in 1e-3f64..0.05,
    ) {
        let n = seed.len();
        let mut values = seed.clone();
        GaussRollback::implicit()
            .bind(n, 0.05, variance)
            .unwrap()
            .rollback(&mut values)
            .unwrap();
        prop_assert!(values.iter().all(|&v| v >= -1e-14));
    }
}
