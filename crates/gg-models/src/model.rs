//! The model contract.
//!
//! A [`Model`] owns a strictly increasing axis of event times and knows how
//! to represent a random variable observed at one of them as a [`Slice`]:
//! how many values it takes, how to widen a constant to a full grid, how to
//! take its conditional expectation at an earlier time, how to smooth an
//! indicator and how to turn it into a curve over the state variable.
//!
//! Models are immutable after construction and shared through
//! [`ModelHandle`]; every slice keeps its model alive.

use std::fmt;
use std::sync::Arc;

use gg_core::{errors::Result, Real, Size, Time};
use gg_math::Function;

use crate::slice::Slice;

/// Shared handle to a model.
pub type ModelHandle = Arc<dyn Model>;

/// A one-factor state process observed at discrete event times.
pub trait Model: fmt::Debug + Send + Sync {
    /// The event-time axis; the first element is the initial time.
    fn event_times(&self) -> &[Time];

    /// The initial time.
    fn initial_time(&self) -> Time {
        self.event_times()[0]
    }

    /// Number of state dimensions.
    fn number_of_states(&self) -> Size;

    /// Length of the value array of a slice at `time` depending on
    /// `dependence`.
    fn number_of_nodes(&self, time: Size, dependence: &[Size]) -> Size;

    /// Values of state variable `state` at event time `time`.
    fn state_values(&self, time: Size, state: Size) -> Result<Vec<Real>>;

    /// Value of the state vector at the initial time.
    fn origin(&self) -> Vec<Real>;

    /// Widen `slice` so that it depends on `dependence` as well.
    ///
    /// # Panics
    /// If `dependence` names a state the model does not have.
    fn add_dependence(&self, slice: &mut Slice, dependence: &[Size]);

    /// Replace `slice` by its conditional expectation at the earlier event
    /// time `time`.
    fn rollback(&self, slice: &mut Slice, time: Size) -> Result<()>;

    /// Replace `slice` by the smoothed indicator of `slice >= barrier`.
    fn indicator(&self, slice: &mut Slice, barrier: Real);

    /// Continuous approximation of `slice` over the state variable.
    fn interpolate(&self, slice: &Slice) -> Result<Function>;
}

/// `true` if both handles point to the same model.
pub fn same_model(a: &ModelHandle, b: &ModelHandle) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
