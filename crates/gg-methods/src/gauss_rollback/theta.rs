//! θ-scheme finite differences: fully implicit (θ = 1) and Crank-Nicolson
//! (θ = ½) are the members used in practice.

use std::fmt;
use std::sync::Arc;

use gg_core::{ensure_range, errors::Result, Real, Size};
use tracing::trace;

use super::{check_inputs, micro_steps, BoundRollback, Identity, RollbackScheme};
use crate::finite_differences::{second_difference, TridiagonalOperator, TridiagonalSolver};

/// Courant factor `p` as a function of the grid step `h`.
#[derive(Clone)]
pub enum Courant {
    /// `p(h) = p`.
    Constant(Real),
    /// `p(h) = r / (2h)`: the variance per micro-step is `r h`.
    InverseStep(Real),
    /// Any positive function of `h`.
    Custom(Arc<dyn Fn(Real) -> Real + Send + Sync>),
}

impl Courant {
    /// Evaluate at grid step `h`.
    pub fn at(&self, h: Real) -> Real {
        match self {
            Courant::Constant(p) => *p,
            Courant::InverseStep(r) => r / (2.0 * h),
            Courant::Custom(f) => f(h),
        }
    }
}

impl fmt::Debug for Courant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Courant::Constant(p) => f.debug_tuple("Constant").field(p).finish(),
            Courant::InverseStep(r) => f.debug_tuple("InverseStep").field(r).finish(),
            Courant::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// θ-scheme.
///
/// Per micro-step, with `q = p(h)` capped as in the explicit scheme:
/// an explicit step of factor `q (1 - θ)` (skipped when θ = 1), then the
/// solve of `(I - q θ Δ²) u = rhs` whose first and last rows are identity
/// rows holding the boundary nodes.
#[derive(Debug, Clone)]
pub struct Theta {
    theta: Real,
    p: Courant,
}

impl Theta {
    /// General constructor, `θ ∈ [0, 1]`.
    ///
    /// A constant Courant factor must be positive.  Custom rules are checked
    /// when the scheme is bound.
    pub fn new(theta: Real, p: Courant) -> Result<Self> {
        ensure_range!((0.0..=1.0).contains(&theta), "θ must lie in [0, 1], got {theta}");
        match p {
            Courant::Constant(c) | Courant::InverseStep(c) => {
                ensure_range!(c > 0.0, "Courant parameter must be positive, got {c}")
            }
            Courant::Custom(_) => {}
        }
        Ok(Self { theta, p })
    }

    /// Fully implicit with constant Courant factor 1.
    pub fn implicit() -> Self {
        Self {
            theta: 1.0,
            p: Courant::Constant(1.0),
        }
    }

    /// Crank-Nicolson with `p(h) = r / (2h)`.
    pub fn crank_nicolson(r: Real) -> Result<Self> {
        Self::new(0.5, Courant::InverseStep(r))
    }

    /// Crank-Nicolson with `r = 1`.
    pub(crate) fn crank_nicolson_unit() -> Self {
        Self {
            theta: 0.5,
            p: Courant::InverseStep(1.0),
        }
    }
}

impl RollbackScheme for Theta {
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>> {
        check_inputs(size, step, variance)?;
        if size < 2 {
            return Ok(Box::new(Identity(size)));
        }
        let p = self.p.at(step);
        ensure_range!(p > 0.0 && p.is_finite(), "Courant factor p({step}) = {p} is not positive");
        let steps = micro_steps(variance, step, p);
        let q = p.min(variance / (2.0 * step * step * steps as Real));
        trace!(size, step, variance, steps, q, theta = self.theta, "theta rollback");

        let implicit = if self.theta > 0.0 {
            Some(TridiagonalOperator::implicit_heat(size, q * self.theta).factorize()?)
        } else {
            None
        };
        let explicit_q = if size >= 3 && self.theta < 1.0 {
            q * (1.0 - self.theta)
        } else {
            0.0
        };
        Ok(Box::new(ThetaBound {
            size,
            steps,
            explicit_q,
            implicit,
        }))
    }
}

#[derive(Debug)]
struct ThetaBound {
    size: Size,
    steps: Size,
    explicit_q: Real,
    implicit: Option<TridiagonalSolver>,
}

impl BoundRollback for ThetaBound {
    fn size(&self) -> Size {
        self.size
    }

    fn apply(&self, values: &mut [Real]) -> Result<()> {
        let mut diff = vec![0.0; self.size];
        for _ in 0..self.steps {
            if self.explicit_q > 0.0 {
                second_difference(values, &mut diff);
                for (v, d) in values.iter_mut().zip(&diff) {
                    *v += self.explicit_q * d;
                }
            }
            if let Some(solver) = &self.implicit {
                solver.solve_in_place(values)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_checks() {
        assert!(Theta::new(1.5, Courant::Constant(1.0)).is_err());
        assert!(Theta::new(0.5, Courant::Constant(-1.0)).is_err());
        assert!(Theta::crank_nicolson(0.0).is_err());
        let neg = Theta::new(1.0, Courant::Custom(Arc::new(|_| -1.0))).unwrap();
        assert!(neg.instantiate(10, 0.1, 0.1).is_err());
    }

    #[test]
    fn crank_nicolson_courant_follows_the_step() {
        assert!((Courant::InverseStep(1.0).at(0.01) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn implicit_step_is_a_contraction() {
        let bound = Theta::implicit().instantiate(9, 0.1, 0.05).unwrap();
        let mut v = vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        bound.apply(&mut v).unwrap();
        assert!(v[4] < 1.0 && v[4] > 0.0);
        assert!(v.iter().all(|&x| x >= 0.0));
        assert!((v[3] - v[5]).abs() < 1e-14);
        // boundary rows are identity rows
        assert_eq!(v[0], 0.0);
    }
}
