//! Curves as shared closures.
//!
//! A [`Function`] is a real-valued function of one real argument together
//! with the closed interval on which it is meaningful.  Discount factors,
//! forwards, volatilities, shapes and interpolated payoffs are all passed
//! around as `Function`s; cloning one only bumps a reference count.

use std::fmt;
use std::sync::Arc;

use gg_core::{Real, OMEGA};

use crate::interpolations::Interpolation1D;

/// A real function of one real variable with domain `[lower, upper]`.
#[derive(Clone)]
pub struct Function {
    f: Arc<dyn Fn(Real) -> Real + Send + Sync>,
    lower: Real,
    upper: Real,
}

impl Function {
    /// Wrap `f`, meaningful on `[lower, upper]`.
    pub fn new<F>(f: F, lower: Real, upper: Real) -> Self
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        debug_assert!(lower <= upper, "empty domain [{lower}, {upper}]");
        Self {
            f: Arc::new(f),
            lower,
            upper,
        }
    }

    /// Wrap `f`, defined on the whole real line.
    pub fn everywhere<F>(f: F) -> Self
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        Self::new(f, -OMEGA, OMEGA)
    }

    /// The constant function `c`, defined for arguments `>= lower`.
    pub fn constant(c: Real, lower: Real) -> Self {
        Self::new(move |_| c, lower, OMEGA)
    }

    /// Lift a fitted interpolant to a curve over its own range.
    pub fn from_interpolation(interp: Arc<dyn Interpolation1D>) -> Self {
        let (lower, upper) = (interp.x_min(), interp.x_max());
        Self::new(move |x| interp.value(x), lower, upper)
    }

    /// Evaluate the curve.  Arguments outside the domain are not checked.
    #[inline]
    pub fn value(&self, x: Real) -> Real {
        (self.f)(x)
    }

    /// `true` if `x` lies in the domain.
    #[inline]
    pub fn belongs(&self, x: Real) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Lower end of the domain.
    pub fn lower(&self) -> Real {
        self.lower
    }

    /// Upper end of the domain.
    pub fn upper(&self) -> Real {
        self.upper
    }

    /// Pointwise image under `g`, keeping the domain.
    pub fn map<G>(&self, g: G) -> Self
    where
        G: Fn(Real) -> Real + Send + Sync + 'static,
    {
        let f = Arc::clone(&self.f);
        Self {
            f: Arc::new(move |x| g(f(x))),
            lower: self.lower,
            upper: self.upper,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_and_domain() {
        let c = Function::constant(0.25, 1.0);
        assert_eq!(c.value(3.0), 0.25);
        assert!(c.belongs(1.0));
        assert!(!c.belongs(0.5));
        assert_eq!(c.lower(), 1.0);
    }

    #[test]
    fn map_composes() {
        let f = Function::new(|t| 0.05 * t, 0.0, 10.0);
        let g = f.map(|y| (-y).exp());
        assert!((g.value(2.0) - (-0.1_f64).exp()).abs() < 1e-15);
        assert_eq!(g.upper(), 10.0);
    }

    #[test]
    fn clones_share_the_closure() {
        let f = Function::everywhere(|x| x * x);
        let g = f.clone();
        assert_eq!(f.value(3.0), g.value(3.0));
        assert!(g.belongs(-1e6));
    }
}
