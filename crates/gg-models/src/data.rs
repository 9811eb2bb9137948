//! Curves used to parametrize the Gaussian models.
//!
//! All curves start at an initial time `t0` and are evaluated at absolute
//! times `t >= t0`; `τ = t - t0` below.

use gg_core::{Real, Time, EPS, OMEGA};
use gg_math::Function;

/// Discount curve of a constant yield: `e^{-y τ}`.
pub fn discount(yield_rate: Real, t0: Time) -> Function {
    Function::new(move |t| (-yield_rate * (t - t0)).exp(), t0, OMEGA)
}

/// Discount curve of a term structure of yields: `e^{-y(t) τ}`.
pub fn discount_from_curve(yield_curve: &Function, t0: Time) -> Function {
    let y = yield_curve.clone();
    Function::new(move |t| (-y.value(t) * (t - t0)).exp(), t0, OMEGA)
}

/// Forward prices of an asset with a constant cost of carry `c`:
/// `S e^{c τ}`.
pub fn forward_from_carry(spot: Real, cost_of_carry: Real, t0: Time) -> Function {
    Function::new(move |t| spot * (cost_of_carry * (t - t0)).exp(), t0, OMEGA)
}

/// Forward prices of an asset with a term structure of carry rates:
/// `S e^{c(t) τ}`.
pub fn forward_from_carry_curve(spot: Real, cost_of_carry: &Function, t0: Time) -> Function {
    let c = cost_of_carry.clone();
    Function::new(move |t| spot * (c.value(t) * (t - t0)).exp(), t0, OMEGA)
}

/// Forward prices of a stock paying a continuous dividend yield `q`:
/// `S e^{-q τ} / D(t)`.
pub fn forward_from_dividend(
    spot: Real,
    dividend_yield: Real,
    discount: &Function,
    t0: Time,
) -> Function {
    let d = discount.clone();
    Function::new(
        move |t| spot * (-dividend_yield * (t - t0)).exp() / d.value(t),
        t0,
        OMEGA,
    )
}

/// Average volatility of `∫ σ e^{λ s} dW_s`, normalised per unit of time:
/// `σ sqrt((e^{2λτ} - 1) / (2λτ))`.
pub fn volatility(sigma: Real, lambda: Real, t0: Time) -> Function {
    Function::new(
        move |t| {
            let x = 2.0 * lambda * (t - t0);
            if x.abs() < EPS {
                sigma
            } else {
                sigma * (x.exp_m1() / x).sqrt()
            }
        },
        t0,
        OMEGA,
    )
}

/// Forward shape of a mean-reverting factor: `e^{-λτ}`.
pub fn shape(lambda: Real, t0: Time) -> Function {
    discount(lambda, t0)
}

/// Bond shape of a mean-reverting factor: `(1 - e^{-λτ}) / λ`, and `τ` for
/// `λ = 0`.
pub fn bond_shape(lambda: Real, t0: Time) -> Function {
    Function::new(
        move |t| {
            let tau = t - t0;
            if lambda.abs() <= EPS {
                tau
            } else {
                -(-lambda * tau).exp_m1() / lambda
            }
        },
        t0,
        OMEGA,
    )
}

/// The constant curve `c` from `t0` on.
pub fn constant(c: Real, t0: Time) -> Function {
    Function::constant(c, t0)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn discount_and_forward() {
        let d = discount(0.05, 1.0);
        assert_abs_diff_eq!(d.value(1.0), 1.0);
        assert_relative_eq!(d.value(3.0), (-0.1_f64).exp(), epsilon = 1e-15);
        assert_eq!(d.lower(), 1.0);

        let f = forward_from_dividend(100.0, 0.02, &d, 1.0);
        assert_relative_eq!(f.value(3.0), 100.0 * (0.06_f64).exp(), epsilon = 1e-12);
        let g = forward_from_carry(100.0, 0.03, 1.0);
        assert_relative_eq!(f.value(2.5), g.value(2.5), epsilon = 1e-12);
    }

    #[test]
    fn curve_variants_match_constants() {
        let y = constant(0.04, 0.0);
        let d = discount_from_curve(&y, 0.0);
        assert_relative_eq!(d.value(2.0), discount(0.04, 0.0).value(2.0), epsilon = 1e-15);
        let f = forward_from_carry_curve(50.0, &y, 0.0);
        assert_relative_eq!(f.value(2.0), forward_from_carry(50.0, 0.04, 0.0).value(2.0));
    }

    #[test]
    fn volatility_limits() {
        let v = volatility(0.2, 0.0, 0.0);
        assert_abs_diff_eq!(v.value(5.0), 0.2);
        let v = volatility(0.01, 0.02, 0.0);
        assert_abs_diff_eq!(v.value(0.0), 0.01);
        // variance of the integral: σ² (e^{2λt} - 1) / (2λ)
        let t: Real = 3.0;
        let var = 0.01_f64.powi(2) * ((0.04 * t).exp() - 1.0) / 0.04;
        assert_relative_eq!(v.value(t).powi(2) * t, var, epsilon = 1e-14);
    }

    #[test]
    fn shapes() {
        let s = shape(0.1, 1.0);
        assert_abs_diff_eq!(s.value(1.0), 1.0);
        let b = bond_shape(0.1, 1.0);
        assert_abs_diff_eq!(b.value(1.0), 0.0);
        assert_relative_eq!(b.value(3.0), (1.0 - (-0.2_f64).exp()) / 0.1, epsilon = 1e-14);
        assert_abs_diff_eq!(bond_shape(0.0, 1.0).value(3.0), 2.0);
    }
}
