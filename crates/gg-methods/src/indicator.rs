//! Smoothed indicator functions on a grid.
//!
//! Replacing grid samples `v` by `1{v >= b}` node by node places the
//! discontinuity at the nearest node, an `O(h)` error once the result is
//! integrated against the Gaussian kernel.  The smoothed variants look at
//! where the zero of `v - b` falls between two neighbouring nodes and give
//! each node its share of the positive part:
//!
//! * [`Indicator::Linear`]: a node receives the average of the positive
//!   fractions of its two adjacent intervals;
//! * [`Indicator::Quadratic`]: a node receives the integral of its hat
//!   function over the positive part of the linear interpolant.
//!
//! The first and last node have a single neighbouring interval; the
//! missing half is taken from the plain threshold at the node itself.

use std::fmt;
use std::str::FromStr;

use gg_core::{Error, Real};

/// Indicator smoothing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Indicator {
    /// Plain threshold.
    Naive,
    /// Interval fractions, consistent with the trapezoid rule.
    #[default]
    Linear,
    /// Hat-function weights, second order in the grid step.
    Quadratic,
}

impl Indicator {
    /// Overwrite `values` by the smoothed `1{values >= barrier}`.
    pub fn apply(self, values: &mut [Real], barrier: Real) {
        for v in values.iter_mut() {
            *v -= barrier;
        }
        match self {
            Indicator::Naive => naive(values),
            Indicator::Linear => linear(values),
            Indicator::Quadratic => quadratic(values),
        }
    }
}

#[inline]
fn step(x: Real) -> Real {
    if x >= 0.0 {
        1.0
    } else {
        0.0
    }
}

fn naive(v: &mut [Real]) {
    for x in v.iter_mut() {
        *x = step(*x);
    }
}

/// Fraction of `[left, right]` where the linear interpolant is `>= 0`.
fn positive_fraction(left: Real, right: Real) -> Real {
    if left == right {
        step(left)
    } else {
        ((left.max(0.0) - right.max(0.0)) / (left - right)).abs()
    }
}

fn linear(v: &mut [Real]) {
    let n = v.len();
    if n < 2 {
        return naive(v);
    }
    let fractions: Vec<Real> = v.windows(2).map(|w| positive_fraction(w[0], w[1])).collect();
    let (first, last) = (step(v[0]), step(v[n - 1]));
    v[0] = 0.5 * (first + fractions[0]);
    for i in 1..n - 1 {
        v[i] = 0.5 * (fractions[i - 1] + fractions[i]);
    }
    v[n - 1] = 0.5 * (fractions[n - 2] + last);
}

/// Hat-function weights of `[left, right]` given to its left and right node,
/// normalized so that a fully positive interval gives `(1, 1)`.
fn hat_weights(left: Real, right: Real) -> (Real, Real) {
    match (left >= 0.0, right >= 0.0) {
        (true, true) => (1.0, 1.0),
        (false, false) => (0.0, 0.0),
        (false, true) => {
            let r = right / (right - left);
            let l = left / (left - right);
            (r * r, 1.0 - l * l)
        }
        (true, false) => {
            let r = right / (right - left);
            let l = left / (left - right);
            (1.0 - r * r, l * l)
        }
    }
}

fn quadratic(v: &mut [Real]) {
    let n = v.len();
    if n < 2 {
        return naive(v);
    }
    let weights: Vec<(Real, Real)> = v.windows(2).map(|w| hat_weights(w[0], w[1])).collect();
    let (first, last) = (step(v[0]), step(v[n - 1]));
    v[0] = 0.5 * (first + weights[0].0);
    for i in 1..n - 1 {
        v[i] = 0.5 * (weights[i - 1].1 + weights[i].0);
    }
    v[n - 1] = 0.5 * (weights[n - 2].1 + last);
}

impl FromStr for Indicator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "naive" => Ok(Indicator::Naive),
            "linear" => Ok(Indicator::Linear),
            "quadratic" => Ok(Indicator::Quadratic),
            other => Err(Error::InvalidArgument(format!("unknown indicator '{other}'"))),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Indicator::Naive => "naive",
            Indicator::Linear => "linear",
            Indicator::Quadratic => "quadratic",
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
