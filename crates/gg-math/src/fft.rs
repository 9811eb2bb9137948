//! Spectral filtering of real sequences.
//!
//! A [`Spectrum`] multiplies the discrete Fourier coefficients of a real
//! sequence by a real, even set of weights and transforms back, i.e. it
//! applies a circular convolution whose kernel is symmetric.  Weights are
//! given for the non-negative frequencies `0..=n/2`; frequency `n-k` reuses
//! the weight of `k`.
//!
//! Two back ends are provided:
//!
//! - [`Radix2Spectrum`] runs a complex radix-4/2 transform and requires a
//!   power-of-two length.
//! - [`MixedRadixSpectrum`] runs a real-to-complex transform planned for an
//!   arbitrary length.

use std::fmt;
use std::sync::Arc;

use gg_core::{ensure_size, errors::Result, fail, Real};
use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::algorithm::Radix4;
use rustfft::{Fft, FftDirection};

/// A planned convolution-by-spectral-weights for one sequence length.
pub trait Spectrum: fmt::Debug + Send + Sync {
    /// Sequence length the plan was built for.
    fn len(&self) -> usize;

    /// `true` for the degenerate empty plan.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace `values` by the inverse transform of `weights * fft(values)`.
    ///
    /// # Errors
    /// `Size` if `values.len() != self.len()` or
    /// `weights.len() != self.len() / 2 + 1`.
    fn filter(&self, values: &mut [Real], weights: &[Real]) -> Result<()>;
}

fn check_lengths(n: usize, values: &[Real], weights: &[Real]) -> Result<()> {
    ensure_size!(
        values.len() == n,
        "spectrum planned for {n} points, got {}",
        values.len()
    );
    ensure_size!(
        weights.len() == n / 2 + 1,
        "expected {} spectral weights, got {}",
        n / 2 + 1,
        weights.len()
    );
    Ok(())
}

// ── Radix-2 ──────────────────────────────────────────────────────────────────

/// Complex power-of-two transform.
pub struct Radix2Spectrum {
    n: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl Radix2Spectrum {
    /// Plan for `n` points.
    ///
    /// # Errors
    /// `Size` unless `n` is a power of two.
    pub fn new(n: usize) -> Result<Self> {
        ensure_size!(
            n.is_power_of_two(),
            "radix-2 transform needs a power-of-two length, got {n}"
        );
        Ok(Self {
            n,
            forward: Arc::new(Radix4::new(n, FftDirection::Forward)),
            inverse: Arc::new(Radix4::new(n, FftDirection::Inverse)),
        })
    }
}

impl Spectrum for Radix2Spectrum {
    fn len(&self) -> usize {
        self.n
    }

    fn filter(&self, values: &mut [Real], weights: &[Real]) -> Result<()> {
        check_lengths(self.n, values, weights)?;
        let n = self.n;
        let mut buf: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
        self.forward.process(&mut buf);
        for (k, z) in buf.iter_mut().enumerate() {
            *z *= weights[k.min(n - k)];
        }
        self.inverse.process(&mut buf);
        let inv_n = 1.0 / n as Real;
        for (v, z) in values.iter_mut().zip(buf.iter()) {
            *v = z.re * inv_n;
        }
        Ok(())
    }
}

impl fmt::Debug for Radix2Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Radix2Spectrum").field("n", &self.n).finish()
    }
}

// ── Mixed radix ──────────────────────────────────────────────────────────────

/// Real-input transform of arbitrary length.
pub struct MixedRadixSpectrum {
    n: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
}

impl MixedRadixSpectrum {
    /// Plan for `n` points.
    pub fn new(n: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            n,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
        }
    }
}

impl Spectrum for MixedRadixSpectrum {
    fn len(&self) -> usize {
        self.n
    }

    fn filter(&self, values: &mut [Real], weights: &[Real]) -> Result<()> {
        check_lengths(self.n, values, weights)?;
        let n = self.n;
        let mut input = values.to_vec();
        let mut spectrum = self.forward.make_output_vec();
        if let Err(e) = self.forward.process(&mut input, &mut spectrum) {
            fail!("forward real FFT of {n} points failed: {e}");
        }
        for (z, &w) in spectrum.iter_mut().zip(weights.iter()) {
            *z *= w;
        }
        // the inverse transform insists on exactly real DC and Nyquist bins
        spectrum[0].im = 0.0;
        if n % 2 == 0 {
            spectrum[n / 2].im = 0.0;
        }
        if let Err(e) = self.inverse.process(&mut spectrum, values) {
            fail!("inverse real FFT of {n} points failed: {e}");
        }
        let inv_n = 1.0 / n as Real;
        for v in values.iter_mut() {
            *v *= inv_n;
        }
        Ok(())
    }
}

impl fmt::Debug for MixedRadixSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixedRadixSpectrum").field("n", &self.n).finish()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
