//! Grid sizing.
//!
//! Pure functions turning accuracy targets into grid parameters:
//!
//! * [`StepRule`]: grid step from the smallest variance gap between two
//!   event times,
//! * [`GaussWidth`]: grid width from the cumulative variance,
//! * [`SizeRule`]: rounding of a point count to an admissible size.

use std::fmt;
use std::str::FromStr;

use gg_core::{ensure_range, errors::Result, Error, Real, Size, EPS, VAR_EPS};

/// `h = min(1/Q, sqrt(1.5 Δvar / N))`.
///
/// The first bound caps the step for accuracy; the second leaves room for at
/// least `N` explicit micro-steps at Courant factor `1/3` between any two
/// consecutive event times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRule {
    quality: Real,
    uniform_steps: Size,
}

impl StepRule {
    /// Step rule with quality `Q` and at least `N` uniform micro-steps.
    ///
    /// # Errors
    /// `Range` unless `Q > 0` and `N >= 1`.
    pub fn new(quality: Real, uniform_steps: Size) -> Result<Self> {
        ensure_range!(quality > 0.0, "step quality must be positive, got {quality}");
        ensure_range!(uniform_steps >= 1, "need at least one uniform step");
        Ok(Self {
            quality,
            uniform_steps,
        })
    }

    /// Grid step for a minimal variance gap `min_var`.
    ///
    /// # Errors
    /// `Range` if `min_var <= VAR_EPS`.
    pub fn step(&self, min_var: Real) -> Result<Real> {
        ensure_range!(
            min_var > VAR_EPS,
            "variance gap {min_var:e} is below the numerical floor"
        );
        Ok((1.0 / self.quality).min((1.5 * min_var / self.uniform_steps as Real).sqrt()))
    }

    /// Step quality `Q`.
    pub fn quality(&self) -> Real {
        self.quality
    }

    /// Minimal number of micro-steps `N`.
    pub fn uniform_steps(&self) -> Size {
        self.uniform_steps
    }
}

/// `w(V) = 2 (V + sqrt(V (V + 4 ln R))) + EPS`.
///
/// Half of `w` bounds the Gaussian tail so that `E[e^X 1{X > w/2}]` under
/// `X ~ N(0, V)` stays below `1/R²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussWidth {
    quality: Real,
}

impl GaussWidth {
    /// Width rule with quality `R > 1`.
    ///
    /// # Errors
    /// `Range` unless `R > 1`.
    pub fn new(quality: Real) -> Result<Self> {
        ensure_range!(quality > 1.0, "width quality must exceed 1, got {quality}");
        Ok(Self { quality })
    }

    /// Full grid width for cumulative variance `var`.
    pub fn width(&self, var: Real) -> Real {
        debug_assert!(var >= 0.0);
        2.0 * (var + (var * (var + 4.0 * self.quality.ln())).sqrt()) + EPS
    }

    /// Width quality `R`.
    pub fn quality(&self) -> Real {
        self.quality
    }
}

/// Smallest integer `>= x`.
pub fn size(x: Real) -> Size {
    x.ceil().max(1.0) as Size
}

/// Smallest power of two `>= x`.
pub fn size2(x: Real) -> Size {
    size(x).next_power_of_two()
}

/// Rounding of a target point count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SizeRule {
    /// [`size`].
    Ceil,
    /// [`size2`], required by the radix-2 FFT scheme.
    #[default]
    PowerOfTwo,
}

impl SizeRule {
    /// Round `x` up to an admissible size.
    pub fn size(self, x: Real) -> Size {
        match self {
            SizeRule::Ceil => size(x),
            SizeRule::PowerOfTwo => size2(x),
        }
    }
}

impl FromStr for SizeRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ceil" => Ok(SizeRule::Ceil),
            "powerOfTwo" | "size2" => Ok(SizeRule::PowerOfTwo),
            other => Err(Error::InvalidArgument(format!("unknown size rule '{other}'"))),
        }
    }
}

impl fmt::Display for SizeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeRule::Ceil => "ceil",
            SizeRule::PowerOfTwo => "powerOfTwo",
        })
    }
}

/// Node coordinates of the symmetric grid with `n` points and step `h`:
/// `x_j = -(n-1) h / 2 + j h`.
pub fn symmetric_grid(n: Size, h: Real) -> Vec<Real> {
    let x0 = -0.5 * (n as Real - 1.0) * h;
    (0..n).map(|j| x0 + j as Real * h).collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
