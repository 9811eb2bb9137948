//! Asset and interest-rate model façades.
//!
//! A concrete model (Black, Hull-White) owns a [`Model`] built over its
//! current event-time axis and exposes payoff building blocks as slices.
//! Re-assigning the axis rebuilds the underlying model; slices created
//! earlier keep the previous one alive.

use gg_core::{ensure, errors::Result, Real, Size, Time, TIME_EPS};

use crate::model::{Model, ModelHandle};
use crate::slice::Slice;

fn check_time(model: &dyn Model, time: Size) -> Result<Time> {
    let times = model.event_times();
    ensure!(
        time < times.len(),
        "event time index {time} out of range ({} event times)",
        times.len()
    );
    Ok(times[time])
}

fn check_maturity(model: &dyn Model, time: Size, maturity: Time) -> Result<Time> {
    let t = check_time(model, time)?;
    ensure!(
        maturity >= t - TIME_EPS,
        "maturity {maturity} precedes event time {t}"
    );
    Ok(t)
}

pub(crate) fn check_axis(model: &dyn Model, event_times: &[Time]) -> Result<()> {
    ensure!(
        event_times
            .first()
            .is_some_and(|t| (t - model.initial_time()).abs() < TIME_EPS),
        "a new event-time axis must start at the initial time {}",
        model.initial_time()
    );
    Ok(())
}

/// Model of one asset under a Gaussian state.
pub trait AssetModel {
    /// Underlying model.
    fn model(&self) -> &ModelHandle;

    /// Rebuild the model over `event_times`.
    ///
    /// # Errors
    /// `Precondition` unless `event_times[0]` is the initial time, plus any
    /// error of the grid construction.
    fn assign_event_times(&mut self, event_times: &[Time]) -> Result<()>;

    /// Price at `time` of the zero-coupon bond maturing at `maturity`.
    fn discount_at(&self, time: Size, maturity: Time) -> Result<Slice>;

    /// Forward price at `time` for delivery at `maturity`.
    fn forward_at(&self, time: Size, maturity: Time) -> Result<Slice>;

    /// Event times of the underlying model.
    fn event_times(&self) -> &[Time] {
        self.model().event_times()
    }

    /// First event time.
    fn initial_time(&self) -> Time {
        self.model().initial_time()
    }

    /// The constant `amount` at `time`.
    fn cash(&self, time: Size, amount: Real) -> Result<Slice> {
        check_time(self.model().as_ref(), time)?;
        Ok(Slice::constant(self.model(), time, amount))
    }

    /// Zero-coupon bond price, after checking the arguments.
    ///
    /// # Errors
    /// `Precondition` if `time` is out of range or `maturity` precedes it.
    fn discount(&self, time: Size, maturity: Time) -> Result<Slice> {
        check_maturity(self.model().as_ref(), time, maturity)?;
        self.discount_at(time, maturity)
    }

    /// Forward price, after checking the arguments.
    ///
    /// # Errors
    /// `Precondition` if `time` is out of range or `maturity` precedes it.
    fn forward(&self, time: Size, maturity: Time) -> Result<Slice> {
        check_maturity(self.model().as_ref(), time, maturity)?;
        self.forward_at(time, maturity)
    }

    /// Spot price: the forward for delivery at `time` itself.
    fn spot(&self, time: Size) -> Result<Slice> {
        let t = check_time(self.model().as_ref(), time)?;
        self.forward_at(time, t)
    }

    /// State variable `state` at `time`.
    fn state(&self, time: Size, state: Size) -> Result<Slice> {
        check_time(self.model().as_ref(), time)?;
        Slice::state(self.model(), time, state)
    }
}

/// Model of the term structure of interest rates under a Gaussian state.
pub trait InterestRateModel {
    /// Underlying model.
    fn model(&self) -> &ModelHandle;

    /// Rebuild the model over `event_times`.
    ///
    /// # Errors
    /// `Precondition` unless `event_times[0]` is the initial time, plus any
    /// error of the grid construction.
    fn assign_event_times(&mut self, event_times: &[Time]) -> Result<()>;

    /// Price at `time` of the zero-coupon bond maturing at `maturity`.
    fn discount_at(&self, time: Size, maturity: Time) -> Result<Slice>;

    /// Event times of the underlying model.
    fn event_times(&self) -> &[Time] {
        self.model().event_times()
    }

    /// First event time.
    fn initial_time(&self) -> Time {
        self.model().initial_time()
    }

    /// The constant `amount` at `time`.
    fn cash(&self, time: Size, amount: Real) -> Result<Slice> {
        check_time(self.model().as_ref(), time)?;
        Ok(Slice::constant(self.model(), time, amount))
    }

    /// Zero-coupon bond price, after checking the arguments.
    ///
    /// # Errors
    /// `Precondition` if `time` is out of range or `maturity` precedes it.
    fn discount(&self, time: Size, maturity: Time) -> Result<Slice> {
        check_maturity(self.model().as_ref(), time, maturity)?;
        self.discount_at(time, maturity)
    }

    /// State variable `state` at `time`.
    fn state(&self, time: Size, state: Size) -> Result<Slice> {
        check_time(self.model().as_ref(), time)?;
        Slice::state(self.model(), time, state)
    }
}
