//! Layered rollback: explicit, then fast, then implicit.
//!
//! A few explicit steps first smooth discontinuous payoffs, which the
//! spectral and Crank-Nicolson kernels handle poorly.  The fast scheme then
//! integrates the bulk of the variance, and a few implicit steps at the end
//! damp whatever high-frequency noise it left behind.

use gg_core::{ensure_range, errors::Result, Real, Size, VAR_EPS};
use tracing::debug;

use super::explicit::Explicit;
use super::theta::{Courant, Theta};
use super::{
    check_inputs, BoundRollback, FastScheme, GaussRollback, RollbackScheme, DEFAULT_EXPLICIT_P,
};

/// Explicit / fast / implicit chain with fixed step counts.
#[derive(Debug, Clone)]
pub struct Chain {
    explicit_steps: Size,
    fast: GaussRollback,
    implicit_steps: Size,
    explicit: Explicit,
    implicit: Theta,
    implicit_p: Real,
}

impl Chain {
    /// `explicit_steps` steps of Courant factor `explicit_p`, then `fast`,
    /// then `implicit_steps` implicit steps of Courant factor `implicit_p`.
    pub fn new(
        explicit_steps: Size,
        fast: GaussRollback,
        implicit_steps: Size,
        explicit_p: Real,
        implicit_p: Real,
    ) -> Result<Self> {
        ensure_range!(implicit_p > 0.0, "implicit Courant factor must be positive");
        Ok(Self {
            explicit_steps,
            fast,
            implicit_steps,
            explicit: Explicit::new(explicit_p)?,
            implicit: Theta::new(1.0, Courant::Constant(implicit_p))?,
            implicit_p,
        })
    }
}

impl RollbackScheme for Chain {
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>> {
        check_inputs(size, step, variance)?;
        let h2 = step * step;
        let explicit_var = 2.0 * h2 * self.explicit.p() * self.explicit_steps as Real;
        let implicit_var = 2.0 * h2 * self.implicit_p * self.implicit_steps as Real;
        let fast_var = variance - (explicit_var + implicit_var);

        if fast_var <= VAR_EPS {
            debug!(
                size,
                variance,
                explicit_var,
                implicit_var,
                "variance too small for the chain, rolling back explicitly"
            );
            return self.explicit.instantiate(size, step, variance);
        }

        let mut layers = Vec::with_capacity(3);
        if self.explicit_steps > 0 {
            layers.push(self.explicit.instantiate(size, step, explicit_var)?);
        }
        layers.push(self.fast.instantiate(size, step, fast_var)?);
        if self.implicit_steps > 0 {
            layers.push(self.implicit.instantiate(size, step, implicit_var)?);
        }
        Ok(Box::new(ChainBound { size, layers }))
    }

    fn supports_size(&self, size: Size) -> bool {
        self.fast.supports_size(size)
    }
}

#[derive(Debug)]
struct ChainBound {
    size: Size,
    layers: Vec<Box<dyn BoundRollback>>,
}

impl BoundRollback for ChainBound {
    fn size(&self) -> Size {
        self.size
    }

    fn apply(&self, values: &mut [Real]) -> Result<()> {
        for layer in &self.layers {
            layer.apply(values)?;
        }
        Ok(())
    }
}

/// Chain whose explicit and implicit step counts depend on the grid.
///
/// For Crank-Nicolson the explicit count is `2 (⌈V/h⌉ + 1)`; for the
/// spectral schemes it is `2 ⌈log₂ n⌉ + 10`, roughly the relative cost of
/// one transform.  The implicit count is half the explicit one.  Courant
/// factors are `1/3` and `1`.
#[derive(Debug, Clone)]
pub struct DefaultChain {
    fast: FastScheme,
    scheme: GaussRollback,
}

impl DefaultChain {
    /// Default chain around `fast`.
    pub fn new(fast: FastScheme) -> Self {
        Self {
            fast,
            scheme: fast.scheme(),
        }
    }

    /// Explicit and implicit step counts for a grid.
    pub fn step_counts(&self, size: Size, step: Real, variance: Real) -> (Size, Size) {
        let explicit = match self.fast {
            FastScheme::CrankNicolson => 2 * ((variance / step).ceil() as Size + 1),
            FastScheme::Fft2 | FastScheme::Fft => {
                2 * (size.max(1) as Real).log2().ceil() as Size + 10
            }
        };
        (explicit, explicit / 2)
    }
}

impl RollbackScheme for DefaultChain {
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>> {
        check_inputs(size, step, variance)?;
        let (explicit_steps, implicit_steps) = self.step_counts(size, step, variance);
        Chain::new(
            explicit_steps,
            self.scheme.clone(),
            implicit_steps,
            DEFAULT_EXPLICIT_P,
            1.0,
        )?
        .instantiate(size, step, variance)
    }

    fn supports_size(&self, size: Size) -> bool {
        self.scheme.supports_size(size)
    }
}
