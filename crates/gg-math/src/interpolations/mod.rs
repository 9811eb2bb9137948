//! 1D interpolation schemes.
//!
//! Interpolants implement [`Interpolation1D`].  Engines implement
//! [`Interpolator`], a virtual constructor that fits a fresh interpolant of
//! its own kind to sample data, so a model can be configured with an engine
//! once and fit it to every slice it is asked to interpolate.

use std::fmt;
use std::sync::Arc;

use gg_core::{ensure_size, ensure_sorted, errors::Result, Real};

use crate::function::Function;

pub mod cubic;

pub use cubic::{CubicSpline, FritschButlandCubic};

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: fmt::Debug + Send + Sync {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// First derivative at `x`.
    fn derivative(&self, x: Real) -> Real;

    /// Second derivative at `x`.
    fn second_derivative(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Builds interpolants of one kind from sample data.
pub trait Interpolator: fmt::Debug + Send + Sync {
    /// Fit an interpolant through `(xs[i], ys[i])`.
    ///
    /// # Errors
    /// `Size` if the slices differ in length or hold too few points,
    /// `Sort` if `xs` is not strictly increasing.
    fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<Arc<dyn Interpolation1D>>;
}

/// Validate sample data shared by every engine.
pub(crate) fn check_samples(xs: &[Real], ys: &[Real], min_points: usize) -> Result<()> {
    ensure_size!(
        xs.len() == ys.len(),
        "xs and ys must have the same length ({} != {})",
        xs.len(),
        ys.len()
    );
    ensure_size!(
        xs.len() >= min_points,
        "need at least {min_points} points for interpolation, got {}",
        xs.len()
    );
    ensure_sorted!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "interpolation abscissas must be strictly increasing"
    );
    Ok(())
}

/// Binary search: find `i` such that `xs[i] <= x < xs[i+1]`, clamped.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from sorted `xs` and corresponding `ys`.
    ///
    /// # Errors
    /// See [`Interpolator::fit`].
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_samples(xs, ys, 2)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    fn slope(&self, i: usize) -> Real {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slope(i)
    }

    fn derivative(&self, x: Real) -> Real {
        self.slope(locate(&self.xs, x))
    }

    fn second_derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

// ── Engines ───────────────────────────────────────────────────────────────────

/// Engine producing [`LinearInterpolation`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<Arc<dyn Interpolation1D>> {
        Ok(Arc::new(LinearInterpolation::new(xs, ys)?))
    }
}

/// Engine producing natural [`CubicSpline`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalCubic;

impl Interpolator for NaturalCubic {
    fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<Arc<dyn Interpolation1D>> {
        Ok(Arc::new(CubicSpline::natural(xs, ys)?))
    }
}

/// Engine producing [`FritschButlandCubic`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FritschButland;

impl Interpolator for FritschButland {
    fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<Arc<dyn Interpolation1D>> {
        Ok(Arc::new(FritschButlandCubic::new(xs, ys)?))
    }
}

/// Shared handle to an interpolation engine.
#[derive(Debug, Clone)]
pub struct Interp(Arc<dyn Interpolator>);

impl Interp {
    /// Wrap an arbitrary engine.
    pub fn new(engine: impl Interpolator + 'static) -> Self {
        Self(Arc::new(engine))
    }

    /// Piecewise linear interpolation.
    pub fn linear() -> Self {
        Self::new(Linear)
    }

    /// Natural cubic spline.
    pub fn cubic_spline() -> Self {
        Self::new(NaturalCubic)
    }

    /// Monotone Fritsch-Butland cubic.
    pub fn fritsch_butland() -> Self {
        Self::new(FritschButland)
    }

    /// Fit the engine to `(xs, ys)`.
    pub fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<FittedCurve> {
        Ok(FittedCurve(self.0.fit(xs, ys)?))
    }

    /// Fit the engine and return the interpolant as a curve.
    pub fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<Function> {
        Ok(self.fit(xs, ys)?.function())
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::cubic_spline()
    }
}

/// The result of [`Interp::fit`]: an interpolant with its derivatives.
#[derive(Debug, Clone)]
pub struct FittedCurve(Arc<dyn Interpolation1D>);

impl FittedCurve {
    /// The interpolant as a curve.
    pub fn function(&self) -> Function {
        Function::from_interpolation(Arc::clone(&self.0))
    }

    /// Its first derivative as a curve.
    pub fn derivative(&self) -> Function {
        let interp = Arc::clone(&self.0);
        let (lo, hi) = (interp.x_min(), interp.x_max());
        Function::new(move |x| interp.derivative(x), lo, hi)
    }

    /// Its second derivative as a curve.
    pub fn second_derivative(&self) -> Function {
        let interp = Arc::clone(&self.0);
        let (lo, hi) = (interp.x_min(), interp.x_max());
        Function::new(move |x| interp.second_derivative(x), lo, hi)
    }

    /// The underlying interpolant.
    pub fn inner(&self) -> &Arc<dyn Interpolation1D> {
        &self.0
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
