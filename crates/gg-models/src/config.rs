//! Tunables of a Brownian grid.
//!
//! With the `serde` feature [`GridConfig`] and its enums deserialize from
//! camelCase keys, and every missing key falls back to its default:
//!
//! ```toml
//! stepQuality = 400.0
//! scheme = "fft"
//! indicator = "quadratic"
//! ```

use std::fmt;
use std::str::FromStr;

use gg_core::{ensure_range, errors::Result, Error, Real, Size};
use gg_math::Interp;
use gg_methods::{FastScheme, Indicator, SizeRule};

/// Interpolation engine used to read a slice off the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum InterpKind {
    /// Piecewise linear.
    Linear,
    /// Natural cubic spline.
    #[default]
    CubicSpline,
    /// Monotone Fritsch-Butland cubic.
    FritschButland,
}

impl InterpKind {
    /// Engine handle.
    pub fn engine(self) -> Interp {
        match self {
            InterpKind::Linear => Interp::linear(),
            InterpKind::CubicSpline => Interp::cubic_spline(),
            InterpKind::FritschButland => Interp::fritsch_butland(),
        }
    }
}

impl FromStr for InterpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(InterpKind::Linear),
            "cubicSpline" => Ok(InterpKind::CubicSpline),
            "fritschButland" => Ok(InterpKind::FritschButland),
            other => Err(Error::InvalidArgument(format!(
                "unknown interpolation '{other}'"
            ))),
        }
    }
}

impl fmt::Display for InterpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InterpKind::Linear => "linear",
            InterpKind::CubicSpline => "cubicSpline",
            InterpKind::FritschButland => "fritschButland",
        })
    }
}

/// Configuration of a [`BrownianGrid`](crate::BrownianGrid).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct GridConfig {
    /// `Q`: the grid step never exceeds `1/Q`.
    pub step_quality: Real,
    /// `R`: tail mass beyond the grid stays below `1/R²`.
    pub width_quality: Real,
    /// Minimal number of explicit micro-steps between two event times.
    pub uniform_steps: Size,
    /// Rounding of grid sizes.
    pub size_rule: SizeRule,
    /// Fast layer of the default chain.
    pub scheme: FastScheme,
    /// Indicator smoothing.
    pub indicator: Indicator,
    /// Interpolation engine.
    pub interp: InterpKind,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            step_quality: 200.0,
            width_quality: 100.0,
            uniform_steps: 3,
            size_rule: SizeRule::default(),
            scheme: FastScheme::default(),
            indicator: Indicator::default(),
            interp: InterpKind::default(),
        }
    }
}

impl GridConfig {
    /// Defaults of the Black model.
    pub fn black() -> Self {
        Self {
            uniform_steps: 1,
            ..Self::default()
        }
    }

    /// Defaults of the Hull-White model.
    pub fn hull_white() -> Self {
        Self {
            uniform_steps: 5,
            ..Self::default()
        }
    }

    /// Set the step and width qualities.
    pub fn with_quality(mut self, step_quality: Real, width_quality: Real) -> Self {
        self.step_quality = step_quality;
        self.width_quality = width_quality;
        self
    }

    /// Set the fast scheme.
    pub fn with_scheme(mut self, scheme: FastScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the indicator smoothing.
    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicator = indicator;
        self
    }

    /// Check the numeric fields.
    ///
    /// # Errors
    /// `Range` for a non-positive step quality, a width quality not above
    /// one, zero uniform steps, or a radix-2 scheme without power-of-two
    /// sizes.
    pub fn validate(&self) -> Result<()> {
        ensure_range!(
            self.step_quality > 0.0,
            "step quality must be positive, got {}",
            self.step_quality
        );
        ensure_range!(
            self.width_quality > 1.0,
            "width quality must exceed 1, got {}",
            self.width_quality
        );
        ensure_range!(self.uniform_steps >= 1, "need at least one uniform step");
        ensure_range!(
            self.scheme != FastScheme::Fft2 || self.size_rule == SizeRule::PowerOfTwo,
            "the radix-2 FFT scheme needs power-of-two grid sizes"
        );
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
