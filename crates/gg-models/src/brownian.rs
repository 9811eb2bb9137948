//! Discretized Brownian state process.
//!
//! [`BrownianModel`] carries one state variable `X` with `X(t0) = 0` and a
//! deterministic cumulative variance.  Every event time owns a symmetric
//! grid of step `h` centered at zero; grids grow with the cumulative
//! variance, so a rollback to an earlier time rolls the values on the
//! larger grid and then drops nodes symmetrically from both ends.
//!
//! [`BrownianGrid`] is the builder: it fixes the numerical recipe (step and
//! width rules, size rounding, rollback scheme, indicator smoothing and
//! interpolation engine) and turns `(variance, event_times, interval)` into
//! a model.

use std::sync::Arc;

use gg_core::{
    ensure, ensure_post, ensure_range, ensure_size, ensure_sorted, errors::Result, Error, Real,
    Size, Time, EPS, OMEGA, VAR_EPS,
};
use gg_math::{Function, Interp};
use gg_methods::{
    symmetric_grid, GaussRollback, GaussWidth, Indicator, RollbackScheme, SizeRule, StepRule,
};
use tracing::debug;

use crate::config::GridConfig;
use crate::model::{Model, ModelHandle};
use crate::slice::Slice;

/// Slack on the one-micro-step condition `h² <= 1.5 Δvar` of a rollback.
const STEP_SLACK: Real = 1.5001;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Numerical recipe of a Brownian model.
#[derive(Debug, Clone)]
pub struct BrownianGrid {
    step: StepRule,
    width: GaussWidth,
    size: SizeRule,
    scheme: GaussRollback,
    indicator: Indicator,
    interp: Interp,
}

impl BrownianGrid {
    /// Recipe from explicit components.
    pub fn new(
        step: StepRule,
        width: GaussWidth,
        size: SizeRule,
        scheme: GaussRollback,
        indicator: Indicator,
        interp: Interp,
    ) -> Self {
        Self {
            step,
            width,
            size,
            scheme,
            indicator,
            interp,
        }
    }

    /// Recipe from a configuration.
    ///
    /// # Errors
    /// `Range` if the configuration does not pass [`GridConfig::validate`].
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            step: StepRule::new(config.step_quality, config.uniform_steps)?,
            width: GaussWidth::new(config.width_quality)?,
            size: config.size_rule,
            scheme: GaussRollback::default_chain(config.scheme),
            indicator: config.indicator,
            interp: config.interp.engine(),
        })
    }

    /// Replace the rollback scheme.
    pub fn with_scheme(mut self, scheme: GaussRollback) -> Self {
        self.scheme = scheme;
        self
    }

    /// Replace the size rounding rule.
    pub fn with_size_rule(mut self, size: SizeRule) -> Self {
        self.size = size;
        self
    }

    /// Replace the indicator smoothing.
    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicator = indicator;
        self
    }

    /// Replace the interpolation engine.
    pub fn with_interp(mut self, interp: Interp) -> Self {
        self.interp = interp;
        self
    }

    /// Build a model over `event_times`.
    ///
    /// `variance[i]` is the average variance per unit of time of the state
    /// between `event_times[0]` and `event_times[i]`; `interval` is the width
    /// of the range of initial values the model must resolve.
    ///
    /// # Errors
    /// * `Size` if `variance` and `event_times` differ in length or are empty,
    /// * `Sort` if `event_times` is not strictly increasing,
    /// * `Range` if `interval` is negative or the minimal variance gap is
    ///   below the numerical floor,
    /// * `Precondition` if the cumulative variance is not strictly increasing,
    /// * `Size` if the rollback scheme cannot run on one of the grid sizes,
    ///   e.g. the radix-2 FFT with [`SizeRule::Ceil`].
    pub fn build(
        &self,
        variance: &[Real],
        event_times: &[Time],
        interval: Real,
    ) -> Result<BrownianModel> {
        ensure_size!(!event_times.is_empty(), "a model needs at least one event time");
        ensure_size!(
            variance.len() == event_times.len(),
            "{} variances for {} event times",
            variance.len(),
            event_times.len()
        );
        ensure_sorted!(
            event_times.windows(2).all(|w| w[1] > w[0]),
            "event times must be strictly increasing"
        );
        ensure_range!(interval >= 0.0, "negative initial interval {interval}");

        let t0 = event_times[0];
        let total_var: Vec<Real> = variance
            .iter()
            .zip(event_times)
            .map(|(v, t)| v * (t - t0))
            .collect();
        ensure!(
            total_var.windows(2).all(|w| w[1] > w[0]),
            "cumulative variance must be strictly increasing"
        );

        let min_var = total_var
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(OMEGA, Real::min);
        let step = self.step.step(min_var)?;

        let mut sizes: Vec<Size> = Vec::with_capacity(total_var.len());
        for &var in &total_var {
            let width = self.width.width(var);
            let mut n = self.size.size(((interval + width) / step).max(2.0) + EPS);
            if let Some(&prev) = sizes.last() {
                if (n.max(prev) - n.min(prev)) % 2 == 1 {
                    n += 1;
                }
            }
            debug_assert!(n as Real * step > interval + width);
            sizes.push(n);
        }
        ensure_post!(
            sizes.windows(2).all(|w| w[1] >= w[0]),
            "grid sizes must not decrease with time"
        );
        if let Some(&n) = sizes.iter().find(|&&n| !self.scheme.supports_size(n)) {
            return Err(Error::Size(format!(
                "rollback scheme cannot run on a grid of {n} points under size rule '{}'",
                self.size
            )));
        }

        debug!(
            event_times = event_times.len(),
            step,
            min_var,
            first_size = sizes[0],
            last_size = sizes[sizes.len() - 1],
            "built Brownian grid"
        );

        Ok(BrownianModel {
            event_times: event_times.to_vec(),
            total_var,
            sizes,
            step,
            scheme: self.scheme.clone(),
            indicator: self.indicator,
            interp: self.interp.clone(),
        })
    }

    /// [`BrownianGrid::build`] behind a shared handle.
    pub fn model(&self, variance: &[Real], event_times: &[Time], interval: Real) -> Result<ModelHandle> {
        Ok(Arc::new(self.build(variance, event_times, interval)?))
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// One-dimensional Brownian state on a family of nested symmetric grids.
#[derive(Debug, Clone)]
pub struct BrownianModel {
    event_times: Vec<Time>,
    total_var: Vec<Real>,
    sizes: Vec<Size>,
    step: Real,
    scheme: GaussRollback,
    indicator: Indicator,
    interp: Interp,
}

impl BrownianModel {
    /// Grid step.
    pub fn step(&self) -> Real {
        self.step
    }

    /// Grid size at every event time.
    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    /// Cumulative variance at every event time.
    pub fn total_variance(&self) -> &[Real] {
        &self.total_var
    }

    /// Node coordinates at event time `time`.
    pub fn grid(&self, time: Size) -> Vec<Real> {
        symmetric_grid(self.sizes[time], self.step)
    }
}

impl Model for BrownianModel {
    fn event_times(&self) -> &[Time] {
        &self.event_times
    }

    fn number_of_states(&self) -> Size {
        1
    }

    fn number_of_nodes(&self, time: Size, dependence: &[Size]) -> Size {
        debug_assert!(dependence.len() <= 1);
        if dependence.is_empty() {
            1
        } else {
            self.sizes[time]
        }
    }

    fn state_values(&self, time: Size, state: Size) -> Result<Vec<Real>> {
        ensure_range!(state == 0, "Brownian model has one state, asked for {state}");
        ensure!(
            time < self.sizes.len(),
            "event time index {time} out of range"
        );
        Ok(self.grid(time))
    }

    fn origin(&self) -> Vec<Real> {
        vec![0.0]
    }

    fn add_dependence(&self, slice: &mut Slice, dependence: &[Size]) {
        debug_assert!(dependence.len() <= 1);
        if slice.is_constant() && !dependence.is_empty() {
            let c = slice.values()[0];
            let time = slice.time();
            slice.reset(time, dependence.to_vec(), vec![c; self.sizes[time]]);
        }
    }

    fn rollback(&self, slice: &mut Slice, time: Size) -> Result<()> {
        let from = slice.time();
        ensure!(
            time <= from,
            "cannot roll back from event time {from} to the later time {time}"
        );
        if time == from {
            return Ok(());
        }
        let dvar = self.total_var[from] - self.total_var[time];
        ensure_range!(dvar > VAR_EPS, "variance gap {dvar:e} is below the numerical floor");

        let len = slice.values().len();
        if len > 1 {
            ensure!(
                self.step * self.step <= STEP_SLACK * dvar,
                "grid step {} too coarse for variance gap {dvar:e}",
                self.step
            );
            let bound = self.scheme.bind(len, self.step, dvar)?;
            bound.rollback(slice.values_mut())?;
        }

        let dependence = slice.dependence().to_vec();
        let target = self.number_of_nodes(time, &dependence);
        ensure_size!(
            target <= len,
            "grid at time {time} has {target} nodes, more than the {len} being rolled back"
        );
        let start = (len - target) / 2;
        let values = slice.values()[start..start + target].to_vec();
        slice.reset(time, dependence, values);
        Ok(())
    }

    fn indicator(&self, slice: &mut Slice, barrier: Real) {
        self.indicator.apply(slice.values_mut(), barrier);
    }

    fn interpolate(&self, slice: &Slice) -> Result<Function> {
        if slice.is_constant() {
            return Ok(Function::constant(slice.values()[0], -OMEGA));
        }
        self.interp.interpolate(&self.grid(slice.time()), slice.values())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn uniform_axis(n: Size, dt: Real) -> Vec<Time> {
        (0..=n).map(|i| i as Real * dt).collect()
    }

    fn model(var: Real, n: Size) -> ModelHandle {
        let times = uniform_axis(n, 1.0 / n as Real);
        let variance = vec![var; times.len()];
        grid().model(&variance, &times, 0.0).unwrap()
    }

    fn grid() -> BrownianGrid {
        BrownianGrid::from_config(&GridConfig::default()).unwrap()
    }

    #[test]
    fn sizes_grow_and_keep_parity() {
        let times = uniform_axis(10, 0.1);
        let variance = vec![0.04; times.len()];
        let grid = BrownianGrid::from_config(&GridConfig {
            size_rule: SizeRule::Ceil,
            scheme: gg_methods::FastScheme::Fft,
            ..GridConfig::default()
        })
        .unwrap();
        let m = grid.build(&variance, &times, 0.2).unwrap();
        for w in m.sizes().windows(2) {
            assert!(w[1] >= w[0]);
            assert_eq!((w[1] - w[0]) % 2, 0);
        }
        let h = m.step();
        assert!(h <= 1.0 / 200.0 + 1e-15);
        assert!(m.sizes()[0] as Real * h > 0.2);
    }

    #[test]
    fn radix2_scheme_needs_power_of_two_sizes() {
        let times = uniform_axis(3, 0.5);
        let variance = vec![0.04; times.len()];
        let grid = BrownianGrid::new(
            StepRule::new(200.0, 3).unwrap(),
            GaussWidth::new(100.0).unwrap(),
            SizeRule::PowerOfTwo,
            GaussRollback::fft2(),
            Indicator::Linear,
            Interp::cubic_spline(),
        );
        let m = grid.build(&variance, &times, 0.2).unwrap();
        assert!(m.sizes().iter().all(|n| n.is_power_of_two()));

        let ceil = grid.clone().with_size_rule(SizeRule::Ceil);
        let e = ceil.build(&variance, &times, 0.2).unwrap_err();
        assert_eq!(e.kind(), gg_core::ErrorKind::Size);
        let e = self::grid()
            .with_size_rule(SizeRule::Ceil)
            .model(&variance, &times, 0.2)
            .unwrap_err();
        assert_eq!(e.kind(), gg_core::ErrorKind::Size);

        let mixed = ceil.with_scheme(GaussRollback::fft());
        assert!(mixed.build(&variance, &times, 0.2).is_ok());
    }

    #[test]
    fn rejects_bad_axes() {
        let grid = grid();
        let e = grid.build(&[0.04, 0.04], &[0.0, 1.0, 2.0], 0.0).unwrap_err();
        assert_eq!(e.kind(), gg_core::ErrorKind::Size);
        let e = grid.build(&[0.04; 3], &[0.0, 1.0, 1.0], 0.0).unwrap_err();
        assert_eq!(e.kind(), gg_core::ErrorKind::Sort);
        let e = grid.build(&[0.04, 0.04, 0.01], &[0.0, 1.0, 2.0], 0.0).unwrap_err();
        assert!(matches!(e, gg_core::Error::Precondition(_)));
    }

    #[test]
    fn state_is_symmetric_grid() {
        let m = model(0.04, 4);
        let s = Slice::state(&m, 2, 0).unwrap();
        let v = s.values();
        let n = v.len();
        assert_eq!(s.dependence(), &[0]);
        for j in 0..n {
            assert_abs_diff_eq!(v[j], -v[n - 1 - j], epsilon = 1e-14);
        }
        assert!(Slice::state(&m, 2, 1).is_err());
        assert_eq!(m.origin(), vec![0.0]);
    }

    #[test]
    fn rollback_truncates_and_preserves_constants() {
        let m = model(0.04, 8);
        let one = Slice::constant(&m, 8, 1.0);
        let x = Slice::state(&m, 8, 0).unwrap();
        let s = &x * 0.0 + one;
        let r = s.rollback(0).unwrap();
        assert_eq!(r.time(), 0);
        assert_eq!(r.values().len(), m.number_of_nodes(0, &[0]));
        for v in r.values() {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn rollback_of_state_is_martingale() {
        let m = model(0.04, 4);
        let x = Slice::state(&m, 4, 0).unwrap();
        let r = x.rollback(1).unwrap();
        let grid = Slice::state(&m, 1, 0).unwrap();
        let n = r.values().len();
        // Away from the edges E[X_T | X_t] = X_t.
        for j in n / 4..3 * n / 4 {
            assert_abs_diff_eq!(r.values()[j], grid.values()[j], epsilon = 1e-6);
        }
    }

    #[test]
    fn rollback_to_same_time_is_noop_and_forward_fails() {
        let m = model(0.04, 4);
        let x = Slice::state(&m, 2, 0).unwrap();
        let same = x.rollback(2).unwrap();
        assert_eq!(same.values(), x.values());
        assert!(x.rollback(3).is_err());
    }

    #[test]
    fn constant_slices_skip_the_grid() {
        let m = model(0.04, 4);
        let c = Slice::constant(&m, 4, 2.5);
        let r = c.rollback(0).unwrap();
        assert!(r.is_constant());
        assert_eq!(r.values(), &[2.5]);
        assert_abs_diff_eq!(r.at_origin().unwrap(), 2.5);
    }

    #[test]
    fn single_event_time() {
        let m = grid().build(&[0.04], &[0.5], 0.3).unwrap();
        assert_abs_diff_eq!(m.step(), 1.0 / 200.0);
        assert!(m.sizes()[0] >= 2);
    }
}
