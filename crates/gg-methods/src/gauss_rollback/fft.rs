//! Spectral rollback.
//!
//! The Gaussian kernel is diagonal in frequency space: frequency
//! `ω_k = 2π k / (n h)` is damped by `exp(-V ω_k² / 2) = exp(-k² A)` with
//! `A = 2 V (π / (n h))²`.  One forward transform, one multiplication and
//! one inverse transform integrate any variance at once.  The convolution
//! is circular, so the grid must be wide enough for the wrap-around mass to
//! be negligible.

use std::f64::consts::PI;

use gg_core::{errors::Result, Real, Size};
use gg_math::{MixedRadixSpectrum, Radix2Spectrum, Spectrum};
use tracing::trace;

use super::{check_inputs, BoundRollback, Identity, RollbackScheme};

/// Transform back end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftKind {
    /// Power-of-two sizes only.
    Radix2,
    /// Any size.
    MixedRadix,
}

/// Spectral scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fft {
    kind: FftKind,
}

impl Fft {
    /// Spectral scheme on the given back end.
    pub fn new(kind: FftKind) -> Self {
        Self { kind }
    }
}

/// `exp(-k² A)` for `k = 0..=n/2`.
fn damping(size: Size, step: Real, variance: Real) -> Vec<Real> {
    let a = 2.0 * variance * (PI / (size as Real * step)).powi(2);
    (0..=size / 2).map(|k| (-((k * k) as Real) * a).exp()).collect()
}

impl RollbackScheme for Fft {
    fn instantiate(&self, size: Size, step: Real, variance: Real) -> Result<Box<dyn BoundRollback>> {
        check_inputs(size, step, variance)?;
        if size < 2 {
            return Ok(Box::new(Identity(size)));
        }
        let spectrum: Box<dyn Spectrum> = match self.kind {
            FftKind::Radix2 => Box::new(Radix2Spectrum::new(size)?),
            FftKind::MixedRadix => Box::new(MixedRadixSpectrum::new(size)),
        };
        trace!(size, step, variance, kind = ?self.kind, "spectral rollback");
        Ok(Box::new(FftBound {
            spectrum,
            weights: damping(size, step, variance),
        }))
    }

    fn supports_size(&self, size: Size) -> bool {
        self.kind == FftKind::MixedRadix || size.is_power_of_two()
    }
}

#[derive(Debug)]
struct FftBound {
    spectrum: Box<dyn Spectrum>,
    weights: Vec<Real>,
}

impl BoundRollback for FftBound {
    fn size(&self) -> Size {
        self.spectrum.len()
    }

    fn apply(&self, values: &mut [Real]) -> Result<()> {
        self.spectrum.filter(values, &self.weights)
    }
}
