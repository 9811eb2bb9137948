//! Explicit finite differences.

use gg_core::{ensure_range, errors::Result, Real, Size};
use tracing::trace;

use super::{check_inputs, micro_steps, BoundRollback, Identity, RollbackScheme, MAX_EXPLICIT_P};
use crate::finite_differences::second_difference;

/// Explicit scheme with Courant factor at most `p`.
///
/// Each micro-step adds `q (v[i-1] - 2 v[i] + v[i+1])` with `q <= p`, and
/// integrates a variance of `2 h² q`.  The number of micro-steps is the
/// smallest keeping `q <= p`; the variance is split evenly among them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explicit {
    p: Real,
}

impl Explicit {
    /// `p` must lie in `(0, 0.5]`, the stability region.
    pub fn new(p: Real) -> Result<Self> {
        ensure_range!(
            p > 0.0 && p <= MAX_EXPLICIT_P,
            "explicit Courant factor must lie in (0, {MAX_EXPLICIT_P}], got {p}"
        );
        Ok(Self { p })
    }

    /// Courant factor bound.
    pub fn p(&self) -> Real {
        self.p
    }
}

impl RollbackScheme for Explicit {
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>> {
        check_inputs(size, step, variance)?;
        if size < 3 {
            return Ok(Box::new(Identity(size)));
        }
        let steps = micro_steps(variance, step, self.p);
        let q = (variance / (2.0 * step * step * steps as Real)).min(self.p);
        trace!(size, step, variance, steps, q, "explicit rollback");
        Ok(Box::new(ExplicitBound { size, steps, q }))
    }
}

#[derive(Debug)]
struct ExplicitBound {
    size: Size,
    steps: Size,
    q: Real,
}

impl BoundRollback for ExplicitBound {
    fn size(&self) -> Size {
        self.size
    }

    fn apply(&self, values: &mut [Real]) -> Result<()> {
        let mut diff = vec![0.0; self.size];
        for _ in 0..self.steps {
            second_difference(values, &mut diff);
            for (v, d) in values.iter_mut().zip(&diff) {
                *v += self.q * d;
            }
        }
        Ok(())
    }
}
