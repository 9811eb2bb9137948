//! Hull-White model of the short rate on a Brownian grid.
//!
//! With `X` the Brownian state of variance `σ(t)² (t - t0)` and `A, B, C`
//! the bond shapes at `t`, `T` and the last event time, the zero-coupon
//! bond price is
//!
//! ```text
//! P(t, T) = D(T)/D(t) exp((B - A) X_t - ½ (B - A)(A + B - 2C) σ(t)² (t - t0))
//! ```
//!
//! with `X` measured under the forward measure of the last event time.  A
//! rollback therefore divides by the bond maturing at the last event time,
//! rolls back under that measure, and multiplies back.

use gg_core::{ensure, errors::Result, Real, Size, Time, EPS, TIME_EPS};
use gg_math::Function;

use crate::brownian::BrownianGrid;
use crate::config::GridConfig;
use crate::data;
use crate::facade::{check_axis, InterestRateModel};
use crate::model::ModelHandle;
use crate::similar::Similar;
use crate::slice::Slice;

/// Curves of a Hull-White model.
#[derive(Debug, Clone)]
pub struct HullWhiteData {
    /// Discount curve.
    pub discount: Function,
    /// Average volatility of the state up to a time.
    pub volatility: Function,
    /// Bond shape; `0` at the initial time.
    pub shape: Function,
    /// Initial time.
    pub initial_time: Time,
}

impl HullWhiteData {
    /// Data with an explicit shape.
    ///
    /// # Errors
    /// `Precondition` unless `shape(initial_time) = 0`.
    pub fn new(discount: Function, volatility: Function, shape: Function, initial_time: Time) -> Result<Self> {
        ensure!(
            shape.value(initial_time).abs() < EPS,
            "bond shape must vanish at the initial time"
        );
        Ok(Self {
            discount,
            volatility,
            shape,
            initial_time,
        })
    }

    /// Short-rate volatility `σ` and mean reversion `λ`.
    pub fn from_constant(discount: Function, sigma: Real, lambda: Real, initial_time: Time) -> Self {
        Self {
            discount,
            volatility: data::volatility(sigma, lambda, initial_time),
            shape: data::bond_shape(lambda, initial_time),
            initial_time,
        }
    }
}

/// Zero-coupon bond on `model` at event time `time` maturing at `maturity`.
fn zero_coupon(model: &ModelHandle, data: &HullWhiteData, time: Size, maturity: Time) -> Result<Slice> {
    let times = model.event_times();
    let t = times[time];
    if (maturity - t).abs() < TIME_EPS {
        return Ok(Slice::constant(model, time, 1.0));
    }
    let a = data.shape.value(t);
    let b = data.shape.value(maturity);
    let c = data.shape.value(times[times.len() - 1]);
    let var = data.volatility.value(t).powi(2) * (t - data.initial_time);
    let factor = data.discount.value(maturity) / data.discount.value(t)
        * (-0.5 * (b - a) * (a + b - 2.0 * c) * var).exp();
    let x = Slice::state(model, time, 0)?;
    Ok((x * (b - a)).exp() * factor)
}

/// Hull-White model on a Brownian grid.
#[derive(Debug, Clone)]
pub struct HullWhiteModel {
    data: HullWhiteData,
    interval: Real,
    grid: BrownianGrid,
    model: ModelHandle,
}

impl HullWhiteModel {
    /// Model with the initial time as its only event time.
    pub fn new(data: HullWhiteData, interval: Real, config: &GridConfig) -> Result<Self> {
        Self::with_grid(data, interval, BrownianGrid::from_config(config)?)
    }

    /// Model with an explicit grid recipe.
    pub fn with_grid(data: HullWhiteData, interval: Real, grid: BrownianGrid) -> Result<Self> {
        let times = [data.initial_time];
        Self::build(data, interval, grid, &times)
    }

    fn build(data: HullWhiteData, interval: Real, grid: BrownianGrid, event_times: &[Time]) -> Result<Self> {
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
        let curves = data.clone();
        let model = Similar::handle(base, move |base, slice, time| {
            let last = base.event_times()[base.event_times().len() - 1];
            let model = slice.model().clone();
            let numeraire = zero_coupon(&model, &curves, slice.time(), last)?;
            *slice /= numeraire;
            base.rollback(slice, time)?;
            *slice *= zero_coupon(&model, &curves, time, last)?;
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
    pub fn data(&self) -> &HullWhiteData {
        &self.data
    }
}

impl InterestRateModel for HullWhiteModel {
    fn model(&self) -> &ModelHandle {
        &self.model
    }

    fn assign_event_times(&mut self, event_times: &[Time]) -> Result<()> {
        check_axis(self.model.as_ref(), event_times)?;
        *self = Self::build(self.data.clone(), self.interval, self.grid.clone(), event_times)?;
        Ok(())
    }

    fn discount_at(&self, time: Size, maturity: Time) -> Result<Slice> {
        zero_coupon(&self.model, &self.data, time, maturity)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model(times: &[Time]) -> HullWhiteModel {
        let d = data::discount(0.07, 0.0);
        let hw = HullWhiteData::from_constant(d, 0.01, 0.02, 0.0);
        let mut m = HullWhiteModel::new(hw, 0.1, &GridConfig::hull_white()).unwrap();
        m.assign_event_times(times).unwrap();
        m
    }

    #[test]
    fn bond_at_origin_matches_the_curve() {
        let m = model(&[0.0, 1.0, 2.0]);
        let p = m.discount(0, 5.0).unwrap().at_origin().unwrap();
        assert_relative_eq!(p, (-0.35_f64).exp(), max_relative = 1e-7);
        let one = m.discount(1, 1.0).unwrap();
        assert!(one.is_constant());
    }

    #[test]
    fn rolled_back_bonds_reprice_the_curve() {
        let m = model(&[0.0, 1.0, 2.0]);
        // E[P(2, 5) discounted to 0] = P(0, 5)
        let bond = m.discount(2, 5.0).unwrap();
        let v = bond.rollback(0).unwrap().at_origin().unwrap();
        assert_relative_eq!(v, (-0.35_f64).exp(), max_relative = 1e-6);
        let c = m.cash(2, 1.0).unwrap().rollback(0).unwrap().at_origin().unwrap();
        assert_relative_eq!(c, (-0.14_f64).exp(), max_relative = 1e-6);
    }

    #[test]
    fn shape_must_vanish_initially() {
        let d = data::discount(0.07, 0.0);
        let v = data::constant(0.01, 0.0);
        assert!(HullWhiteData::new(d.clone(), v.clone(), data::bond_shape(0.1, 0.0), 0.0).is_ok());
        assert!(HullWhiteData::new(d, v, data::shape(0.1, 0.0), 0.0).is_err());
    }
}
