//! A model sharing the grid of another with its own rollback.
//!
//! Black and Hull-White both live on the grid of a Brownian model and only
//! change what a rollback does to the values (discounting, change of
//! numeraire).  [`Similar`] delegates everything to the base model except
//! `rollback`, which runs a supplied closure given the base model.

use std::fmt;
use std::sync::Arc;

use gg_core::{errors::Result, Real, Size, Time};
use gg_math::Function;

use crate::model::{Model, ModelHandle};
use crate::slice::Slice;

/// Rollback of a [`Similar`] model: `(base, slice, target_time)`.
pub type RollbackFn = Arc<dyn Fn(&dyn Model, &mut Slice, Size) -> Result<()> + Send + Sync>;

/// Base model with a replaced rollback.
pub struct Similar {
    base: ModelHandle,
    rollback: RollbackFn,
}

impl Similar {
    /// Wrap `base`.
    pub fn new(base: ModelHandle, rollback: RollbackFn) -> Self {
        Self { base, rollback }
    }

    /// Wrap `base` behind a shared handle.
    pub fn handle<F>(base: ModelHandle, rollback: F) -> ModelHandle
    where
        F: Fn(&dyn Model, &mut Slice, Size) -> Result<()> + Send + Sync + 'static,
    {
        Arc::new(Self::new(base, Arc::new(rollback)))
    }

    /// Underlying model.
    pub fn base(&self) -> &ModelHandle {
        &self.base
    }
}

impl fmt::Debug for Similar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Similar")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl Model for Similar {
    fn event_times(&self) -> &[Time] {
        self.base.event_times()
    }

    fn number_of_states(&self) -> Size {
        self.base.number_of_states()
    }

    fn number_of_nodes(&self, time: Size, dependence: &[Size]) -> Size {
        self.base.number_of_nodes(time, dependence)
    }

    fn state_values(&self, time: Size, state: Size) -> Result<Vec<Real>> {
        self.base.state_values(time, state)
    }

    fn origin(&self) -> Vec<Real> {
        self.base.origin()
    }

    fn add_dependence(&self, slice: &mut Slice, dependence: &[Size]) {
        self.base.add_dependence(slice, dependence);
    }

    fn rollback(&self, slice: &mut Slice, time: Size) -> Result<()> {
        (self.rollback)(self.base.as_ref(), slice, time)
    }

    fn indicator(&self, slice: &mut Slice, barrier: Real) {
        self.base.indicator(slice, barrier);
    }

    fn interpolate(&self, slice: &Slice) -> Result<Function> {
        self.base.interpolate(slice)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
