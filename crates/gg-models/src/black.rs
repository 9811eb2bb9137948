//! Black model with a mean-reverting volatility factor.
//!
//! ```text
//! F(t, T) = F(0, T) exp(shape(T) X_t - ½ (σ(t) shape(T))² (t - t0))
//! ```
//!
//! where `X` is the Brownian state with variance `σ(t)² (t - t0)` and `F` the
//! forward price.  Interest rates are deterministic, so a rollback is the
//! Brownian rollback scaled by the discount factor between the two times.

use gg_core::{ensure, errors::Result, Real, Size, Time, EPS};
use gg_math::Function;

use crate::brownian::BrownianGrid;
use crate::config::GridConfig;
use crate::data;
use crate::facade::{check_axis, AssetModel};
use crate::model::ModelHandle;
use crate::similar::Similar;
use crate::slice::Slice;

/// Curves of a Black model.
#[derive(Debug, Clone)]
pub struct BlackData {
    /// Discount curve.
    pub discount: Function,
    /// Forward prices.
    pub forward: Function,
    /// Average volatility of the state up to a time.
    pub volatility: Function,
    /// Loading of a forward maturity on the state; `1` at the initial time.
    pub shape: Function,
    /// Initial time.
    pub initial_time: Time,
}

impl BlackData {
    /// Classical Black data: shape identically one.
    pub fn new(discount: Function, forward: Function, volatility: Function, initial_time: Time) -> Self {
        Self {
            discount,
            forward,
            volatility,
            shape: data::constant(1.0, initial_time),
            initial_time,
        }
    }

    /// Data with an explicit shape.
    ///
    /// # Errors
    /// `Precondition` unless `shape(initial_time) = 1`.
    pub fn with_shape(
        discount: Function,
        forward: Function,
        volatility: Function,
        shape: Function,
        initial_time: Time,
    ) -> Result<Self> {
        ensure!(
            (shape.value(initial_time) - 1.0).abs() < EPS,
            "shape must equal one at the initial time"
        );
        Ok(Self {
            discount,
            forward,
            volatility,
            shape,
            initial_time,
        })
    }

    /// Constant volatility `σ`.
    pub fn constant(discount: Function, forward: Function, sigma: Real, initial_time: Time) -> Self {
        Self::new(discount, forward, data::constant(sigma, initial_time), initial_time)
    }

    /// Volatility `σ` of a factor with mean reversion `λ`.
    pub fn with_mean_reversion(
        discount: Function,
        forward: Function,
        sigma: Real,
        lambda: Real,
        initial_time: Time,
    ) -> Self {
        Self {
            discount,
            forward,
            volatility: data::volatility(sigma, lambda, initial_time),
            shape: data::shape(lambda, initial_time),
            initial_time,
        }
    }
}

/// Black model on a Brownian grid.
#[derive(Debug, Clone)]
pub struct BlackModel {
    data: BlackData,
    interval: Real,
    grid: BrownianGrid,
    model: ModelHandle,
}

impl BlackModel {
    /// Model with the initial time as its only event time.
    ///
    /// `interval` is the width of the range of initial states the grid must
    /// resolve.
    pub fn new(data: BlackData, interval: Real, config: &GridConfig) -> Result<Self> {
        Self::with_grid(data, interval, BrownianGrid::from_config(config)?)
    }

    /// Model with an explicit grid recipe.
    pub fn with_grid(data: BlackData, interval: Real, grid: BrownianGrid) -> Result<Self> {
        let times = [data.initial_time];
        Self::build(data, interval, grid, &times)
    }

    fn build(data: BlackData, interval: Real, grid: BrownianGrid, event_times: &[Time]) -> Result<Self> {
        ensure!(
            event_times
                .first()
                .is_some_and(|t| (t - data.initial_time).abs() < EPS),
            "the first event time must be the initial time {}",
            data.initial_time
        );
        let variance: Vec<Real> = event_times
            .iter()
            .map(|&t| data.volatility.value(t).powi(2))
            .collect();
        let base = grid.model(&variance, event_times, interval)?;
        let discount = data.discount.clone();
        let model = Similar::handle(base, move |base, slice, time| {
            let times = base.event_times();
            let from = times[slice.time()];
            base.rollback(slice, time)?;
            slice.scale(discount.value(from) / discount.value(times[time]));
            Ok(())
        });
        Ok(Self {
            data,
            interval,
            grid,
            model,
        })
    }

    /// Model curves.
    pub fn data(&self) -> &BlackData {
        &self.data
    }
}

impl AssetModel for BlackModel {
    fn model(&self) -> &ModelHandle {
        &self.model
    }

    fn assign_event_times(&mut self, event_times: &[Time]) -> Result<()> {
        check_axis(self.model.as_ref(), event_times)?;
        *self = Self::build(self.data.clone(), self.interval, self.grid.clone(), event_times)?;
        Ok(())
    }

    fn discount_at(&self, time: Size, maturity: Time) -> Result<Slice> {
        let t = self.model.event_times()[time];
        let factor = self.data.discount.value(maturity) / self.data.discount.value(t);
        Ok(Slice::constant(&self.model, time, factor))
    }

    fn forward_at(&self, time: Size, maturity: Time) -> Result<Slice> {
        let t = self.model.event_times()[time];
        let shape = self.data.shape.value(maturity);
        let vol = self.data.volatility.value(t);
        let c = self.data.forward.value(maturity).ln()
            - 0.5 * (vol * shape).powi(2) * (t - self.data.initial_time);
        let x = Slice::state(&self.model, time, 0)?;
        Ok((x * shape + c).exp())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn model(times: &[Time]) -> BlackModel {
        let d = data::discount(0.05, 0.0);
        let f = data::forward_from_dividend(100.0, 0.0, &d, 0.0);
        let bd = BlackData::constant(d, f, 0.2, 0.0);
        let mut m = BlackModel::new(bd, 0.2, &GridConfig::black()).unwrap();
        m.assign_event_times(times).unwrap();
        m
    }

    #[test]
    fn initial_axis_is_the_initial_time() {
        let d = data::discount(0.05, 0.0);
        let f = data::forward_from_carry(100.0, 0.05, 0.0);
        let m = BlackModel::new(BlackData::constant(d, f, 0.2, 0.0), 0.2, &GridConfig::black()).unwrap();
        assert_eq!(m.event_times(), &[0.0]);
        assert_relative_eq!(m.spot(0).unwrap().at_origin().unwrap(), 100.0, max_relative = 1e-8);
    }

    #[test]
    fn axis_must_start_at_initial_time() {
        let mut m = model(&[0.0, 1.0]);
        assert!(m.assign_event_times(&[0.5, 1.0]).is_err());
        assert!(m.forward(1, 0.5).is_err());
        assert!(m.cash(2, 1.0).is_err());
    }

    #[test]
    fn discounted_forward_is_a_martingale() {
        let m = model(&[0.0, 0.5, 1.0]);
        // E[D(0,1) F(1,1)] = D(0,1) F(0,1)
        let s = m.spot(2).unwrap();
        let v = s.rollback(0).unwrap().at_origin().unwrap();
        let d1 = m.data().discount.value(1.0);
        assert_relative_eq!(v, d1 * m.data().forward.value(1.0), max_relative = 1e-6);
    }

    #[test]
    fn cash_rolls_back_to_its_discounted_value() {
        let m = model(&[0.0, 0.5, 1.0]);
        let c = m.cash(2, 1.0).unwrap();
        let v = c.rollback(1).unwrap();
        assert!(v.is_constant());
        assert_abs_diff_eq!(v.values()[0], (-0.025_f64).exp(), epsilon = 1e-14);
        let d = m.discount(1, 1.0).unwrap();
        assert_abs_diff_eq!(d.values()[0], v.values()[0], epsilon = 1e-14);
    }

    #[test]
    fn shape_must_start_at_one() {
        let d = data::discount(0.05, 0.0);
        let f = data::forward_from_carry(100.0, 0.05, 0.0);
        let v = data::constant(0.2, 0.0);
        assert!(BlackData::with_shape(d.clone(), f.clone(), v.clone(), data::shape(0.1, 0.0), 0.0).is_ok());
        assert!(BlackData::with_shape(d, f, v, data::constant(0.5, 0.0), 0.0).is_err());
    }
}
