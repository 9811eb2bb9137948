//! # gg-math
//!
//! Mathematical building blocks for gaussgrid: the [`Function`] curve value
//! object, 1D interpolation engines with a virtual-constructor interface,
//! the standard normal distribution (via statrs), and real-input FFT
//! filtering (via rustfft / realfft).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Spectral filtering of real sequences.
pub mod fft;

/// Curves: shared real-to-real closures with a domain.
pub mod function;

/// 1D interpolation schemes.
pub mod interpolations;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf};
pub use fft::{MixedRadixSpectrum, Radix2Spectrum, Spectrum};
pub use function::Function;
pub use interpolations::{FittedCurve, Interp, Interpolation1D, Interpolator};
