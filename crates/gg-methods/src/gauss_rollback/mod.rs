//! Gaussian rollback schemes.
//!
//! A rollback scheme replaces values sampled on a symmetric grid
//! (`n` points, step `h`, centered at 0) by their conditional expectation
//! after a centered Gaussian increment of variance `V`, that is it solves
//! the heat equation `∂u/∂V = ½ ∂²u/∂x²` over a "time" `V`.  Values beyond
//! the grid are taken to continue flat.
//!
//! Construction is two-phase.  A [`RollbackScheme`] is an immutable recipe;
//! [`RollbackScheme::instantiate`] binds it to `(n, h, V)` and returns a
//! [`BoundRollback`] that can be applied to any number of value buffers.
//! [`GaussRollback`] is the cheaply clonable handle used everywhere else and
//! hosts the catalog of recipes:
//!
//! | constructor | scheme |
//! |---|---|
//! | [`GaussRollback::explicit`] | explicit finite differences |
//! | [`GaussRollback::implicit`] | fully implicit finite differences |
//! | [`GaussRollback::crank_nicolson`] | Crank-Nicolson |
//! | [`GaussRollback::theta`] | general θ-scheme |
//! | [`GaussRollback::fft2`] | spectral, radix-2 |
//! | [`GaussRollback::fft`] | spectral, mixed radix |
//! | [`GaussRollback::chain`] | explicit, then fast, then implicit |
//! | [`GaussRollback::default_chain`] | chain with step counts chosen per grid |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use gg_core::{
    ensure_range, ensure_size, errors::Result, Error, Real, Size, STEP_COUNT_EPS, VAR_EPS,
};

use crate::grid::symmetric_grid;

mod chain;
mod explicit;
mod fft;
mod theta;

pub use chain::{Chain, DefaultChain};
pub use explicit::Explicit;
pub use fft::{Fft, FftKind};
pub use theta::{Courant, Theta};

/// Default Courant factor of the explicit scheme.
pub const DEFAULT_EXPLICIT_P: Real = 1.0 / 3.0;

/// Hard stability bound of the explicit scheme.
pub const MAX_EXPLICIT_P: Real = 0.5;

/// An unbound rollback recipe.
pub trait RollbackScheme: fmt::Debug + Send + Sync {
    /// Bind the recipe to a grid of `size` points with step `step` and to an
    /// increment of variance `variance`.
    ///
    /// # Errors
    /// `Range` if `variance <= VAR_EPS` or `step <= 0`, `Size` if `size`
    /// violates a structural requirement of the scheme.
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>>;

    /// `false` if the recipe can never be bound to a grid of `size` points,
    /// whatever the step and variance.
    fn supports_size(&self, _size: Size) -> bool {
        true
    }
}

/// A rollback operator bound to one grid and one variance.
pub trait BoundRollback: fmt::Debug + Send + Sync {
    /// Number of grid points.
    fn size(&self) -> Size;

    /// Apply the operator to `values` in place.
    ///
    /// Implementations may assume `values.len() == self.size()`; callers go
    /// through [`BoundGaussRollback`], which checks it.
    fn apply(&self, values: &mut [Real]) -> Result<()>;
}

/// Validation shared by every recipe.
pub(crate) fn check_inputs(size: Size, step: Real, variance: Real) -> Result<()> {
    ensure_size!(size >= 1, "rollback grid must have at least one point");
    ensure_range!(step > 0.0, "grid step must be positive, got {step}");
    ensure_range!(
        variance > VAR_EPS,
        "rollback variance {variance:e} is below the numerical floor {VAR_EPS:e}"
    );
    Ok(())
}

/// Number of micro-steps of Courant factor at most `p` covering `variance`.
pub(crate) fn micro_steps(variance: Real, step: Real, p: Real) -> Size {
    let exact = variance / (2.0 * step * step * p);
    // integral step counts requested by the chain must not round up
    ((exact - STEP_COUNT_EPS).ceil() as Size).max(1)
}

/// Applies nothing; used for grids too small to carry a stencil.
#[derive(Debug)]
pub(crate) struct Identity(pub Size);

impl BoundRollback for Identity {
    fn size(&self) -> Size {
        self.0
    }

    fn apply(&self, _values: &mut [Real]) -> Result<()> {
        Ok(())
    }
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// Shared handle to a rollback recipe.
#[derive(Debug, Clone)]
pub struct GaussRollback(Arc<dyn RollbackScheme>);

impl GaussRollback {
    /// Wrap an arbitrary recipe.
    pub fn new(scheme: impl RollbackScheme + 'static) -> Self {
        Self(Arc::new(scheme))
    }

    /// Explicit finite differences with Courant factor `p ∈ (0, 0.5]`.
    pub fn explicit(p: Real) -> Result<Self> {
        Ok(Self::new(Explicit::new(p)?))
    }

    /// Fully implicit finite differences with Courant factor 1.
    pub fn implicit() -> Self {
        Self::new(Theta::implicit())
    }

    /// Fully implicit finite differences with Courant factor `p > 0`.
    pub fn implicit_with(p: Real) -> Result<Self> {
        Ok(Self::new(Theta::new(1.0, Courant::Constant(p))?))
    }

    /// Crank-Nicolson with `p(h) = r / (2h)`.
    pub fn crank_nicolson(r: Real) -> Result<Self> {
        Ok(Self::new(Theta::crank_nicolson(r)?))
    }

    /// θ-scheme, `θ ∈ [0, 1]`, with Courant factor rule `p`.
    pub fn theta(theta: Real, p: Courant) -> Result<Self> {
        Ok(Self::new(Theta::new(theta, p)?))
    }

    /// Spectral scheme on a power-of-two grid.
    pub fn fft2() -> Self {
        Self::new(Fft::new(FftKind::Radix2))
    }

    /// Spectral scheme on a grid of any size.
    pub fn fft() -> Self {
        Self::new(Fft::new(FftKind::MixedRadix))
    }

    /// `explicit_steps` explicit steps of factor `explicit_p`, then `fast`,
    /// then `implicit_steps` implicit steps of factor `implicit_p`.
    pub fn chain(
        explicit_steps: Size,
        fast: GaussRollback,
        implicit_steps: Size,
        explicit_p: Real,
        implicit_p: Real,
    ) -> Result<Self> {
        Ok(Self::new(Chain::new(
            explicit_steps,
            fast,
            implicit_steps,
            explicit_p,
            implicit_p,
        )?))
    }

    /// Chain around `fast` with step counts picked from the grid size.
    pub fn default_chain(fast: FastScheme) -> Self {
        Self::new(DefaultChain::new(fast))
    }

    /// Bind to a grid and a variance.
    pub fn bind(&self, size: Size, step: Real, variance: Real) -> Result<BoundGaussRollback> {
        Ok(BoundGaussRollback {
            inner: self.0.instantiate(size, step, variance)?,
            size,
            step,
            variance,
        })
    }
}

impl Default for GaussRollback {
    fn default() -> Self {
        Self::default_chain(FastScheme::default())
    }
}

impl RollbackScheme for GaussRollback {
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>> {
        self.0.instantiate(size, step, variance)
    }

    fn supports_size(&self, size: Size) -> bool {
        self.0.supports_size(size)
    }
}

// ── Bound handle ──────────────────────────────────────────────────────────────

/// A recipe bound to `(size, step, variance)`, with derivative helpers.
#[derive(Debug)]
pub struct BoundGaussRollback {
    inner: Box<dyn BoundRollback>,
    size: Size,
    step: Real,
    variance: Real,
}

impl BoundGaussRollback {
    /// Number of grid points.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Grid step.
    pub fn step(&self) -> Real {
        self.step
    }

    /// Variance integrated by one call.
    pub fn variance(&self) -> Real {
        self.variance
    }

    /// Node coordinates of the grid.
    pub fn grid(&self) -> Vec<Real> {
        symmetric_grid(self.size, self.step)
    }

    /// Replace `values` by their conditional expectation.
    ///
    /// # Errors
    /// `Size` if `values` does not match the bound grid.
    pub fn rollback(&self, values: &mut [Real]) -> Result<()> {
        ensure_size!(
            values.len() == self.size,
            "rollback bound to {} points, got {}",
            self.size,
            values.len()
        );
        self.inner.apply(values)
    }

    /// Roll back `values` and return the derivative of the result with
    /// respect to the grid coordinate.
    ///
    /// Uses `d/dx E[f(x+Z)] = E[f(x+Z) Z] / V`, at the cost of two rollbacks.
    pub fn rollback_with_delta(&self, values: &mut [Real]) -> Result<Vec<Real>> {
        let x = self.grid();
        let mut delta: Vec<Real> = values.iter().zip(&x).map(|(v, x)| v * x).collect();
        self.rollback(values)?;
        self.rollback(&mut delta)?;
        for ((d, v), x) in delta.iter_mut().zip(values.iter()).zip(&x) {
            *d = (*d - v * x) / self.variance;
        }
        Ok(delta)
    }

    /// Roll back `values` and return the first and second derivatives of the
    /// result, at the cost of three rollbacks.
    ///
    /// `Γ = (E[f(x+Z) Z²] / V - E[f(x+Z)]) / V`.
    pub fn rollback_with_gamma(&self, values: &mut [Real]) -> Result<(Vec<Real>, Vec<Real>)> {
        let x = self.grid();
        let mut delta: Vec<Real> = values.iter().zip(&x).map(|(v, x)| v * x).collect();
        let mut gamma: Vec<Real> = delta.iter().zip(&x).map(|(d, x)| d * x).collect();
        self.rollback(values)?;
        self.rollback(&mut delta)?;
        self.rollback(&mut gamma)?;
        let var = self.variance;
        for i in 0..self.size {
            let (v, d, xi) = (values[i], delta[i], x[i]);
            let g = (gamma[i] - 2.0 * xi * d + xi * xi * v) / var;
            gamma[i] = (g - v) / var;
            delta[i] = (d - v * xi) / var;
        }
        Ok((delta, gamma))
    }

    /// Turn a gamma buffer into the derivative with respect to the standard
    /// deviation `√V` of the increment.
    pub fn vega(&self, gamma: &mut [Real]) {
        let sd = self.variance.sqrt();
        for g in gamma.iter_mut() {
            *g *= sd;
        }
    }
}

// ── Fast scheme catalog ───────────────────────────────────────────────────────

/// The bulk layer of a default chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FastScheme {
    /// Crank-Nicolson with `r = 1`.
    CrankNicolson,
    /// Radix-2 FFT.
    #[default]
    Fft2,
    /// Mixed-radix FFT.
    Fft,
}

impl FastScheme {
    /// Recipe of the fast layer.
    pub fn scheme(self) -> GaussRollback {
        match self {
            FastScheme::CrankNicolson => GaussRollback::new(Theta::crank_nicolson_unit()),
            FastScheme::Fft2 => GaussRollback::fft2(),
            FastScheme::Fft => GaussRollback::fft(),
        }
    }
}

impl FromStr for FastScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "crankNicolson" => Ok(FastScheme::CrankNicolson),
            "fft2" => Ok(FastScheme::Fft2),
            "fft" => Ok(FastScheme::Fft),
            other => Err(Error::InvalidArgument(format!(
                "unknown rollback scheme '{other}', expected crankNicolson, fft2 or fft"
            ))),
        }
    }
}

impl fmt::Display for FastScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FastScheme::CrankNicolson => "crankNicolson",
            FastScheme::Fft2 => "fft2",
            FastScheme::Fft => "fft",
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
