//! Random variables at one event time.
//!
//! A [`Slice`] holds the values of a payoff at one event time of a model,
//! either as a single number (empty dependence) or on the model's grid.
//! Arithmetic between slices requires the same model and the same event
//! time; a constant operand is applied as a scalar without being widened,
//! otherwise both operands are widened to the union of their dependences.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use gg_core::{ensure, ensure_size, errors::Result, Real, Size};
use gg_math::Function;

use crate::model::{same_model, ModelHandle};

/// A payoff observed at one event time.
#[derive(Clone)]
pub struct Slice {
    model: ModelHandle,
    time: Size,
    dependence: Vec<Size>,
    values: Vec<Real>,
}

impl Slice {
    /// Slice with explicit dependence and values.
    ///
    /// # Errors
    /// `Precondition` if `time` is not an event time of `model`, `Size` if
    /// `values` does not have the number of nodes the model expects.
    pub fn new(
        model: &ModelHandle,
        time: Size,
        mut dependence: Vec<Size>,
        values: Vec<Real>,
    ) -> Result<Self> {
        ensure!(
            time < model.event_times().len(),
            "event time index {time} out of range"
        );
        dependence.sort_unstable();
        dependence.dedup();
        let n = model.number_of_nodes(time, &dependence);
        ensure_size!(
            values.len() == n,
            "slice at time {time} needs {n} values, got {}",
            values.len()
        );
        Ok(Self {
            model: Arc::clone(model),
            time,
            dependence,
            values,
        })
    }

    /// Constant slice.
    ///
    /// # Panics
    /// If `time` is not an event time of `model`.
    pub fn constant(model: &ModelHandle, time: Size, value: Real) -> Self {
        assert!(
            time < model.event_times().len(),
            "event time index {time} out of range"
        );
        Self {
            model: Arc::clone(model),
            time,
            dependence: Vec::new(),
            values: vec![value],
        }
    }

    /// State variable `state` at event time `time`.
    pub fn state(model: &ModelHandle, time: Size, state: Size) -> Result<Self> {
        let values = model.state_values(time, state)?;
        Self::new(model, time, vec![state], values)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Supporting model.
    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Event time index.
    pub fn time(&self) -> Size {
        self.time
    }

    /// Sorted state dimensions the values vary over.
    pub fn dependence(&self) -> &[Size] {
        &self.dependence
    }

    /// `true` for a constant slice.
    pub fn is_constant(&self) -> bool {
        self.dependence.is_empty()
    }

    /// Raw values.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Raw values, for model implementations.  The length must be kept.
    pub fn values_mut(&mut self) -> &mut [Real] {
        &mut self.values
    }

    /// Consume the slice and return its values.
    pub fn into_values(self) -> Vec<Real> {
        self.values
    }

    /// Move the slice to another event time with new values, for model
    /// implementations.
    pub fn reset(&mut self, time: Size, dependence: Vec<Size>, values: Vec<Real>) {
        debug_assert_eq!(values.len(), self.model.number_of_nodes(time, &dependence));
        self.time = time;
        self.dependence = dependence;
        self.values = values;
    }

    /// Scale all values in place.
    pub fn scale(&mut self, factor: Real) {
        for v in &mut self.values {
            *v *= factor;
        }
    }

    // ── Model operations ──────────────────────────────────────────────────

    /// Conditional expectation at the earlier event time `time`.
    pub fn rollback(&self, time: Size) -> Result<Slice> {
        let mut s = self.clone();
        s.rollback_in_place(time)?;
        Ok(s)
    }

    /// In-place form of [`Slice::rollback`].
    pub fn rollback_in_place(&mut self, time: Size) -> Result<()> {
        let model = Arc::clone(&self.model);
        model.rollback(self, time)
    }

    /// Smoothed `1{self >= barrier}`.
    pub fn indicator(&self, barrier: Real) -> Slice {
        let mut s = self.clone();
        let model = Arc::clone(&self.model);
        model.indicator(&mut s, barrier);
        s
    }

    /// Smoothed `1{self < barrier}`.
    pub fn indicator_below(&self, barrier: Real) -> Slice {
        1.0 - self.indicator(barrier)
    }

    /// Smoothed `1{lower <= self < upper}`.
    pub fn indicator_between(&self, lower: Real, upper: Real) -> Slice {
        self.indicator(lower) - self.indicator(upper)
    }

    /// Smoothed `1{self >= other}`.
    pub fn indicator_of(&self, other: &Slice) -> Slice {
        (self - other).indicator(0.0)
    }

    /// Continuous approximation over the state variable.
    pub fn interpolate(&self) -> Result<Function> {
        self.model.interpolate(self)
    }

    /// Value at the origin of the state space.
    pub fn at_origin(&self) -> Result<Real> {
        if self.is_constant() {
            return Ok(self.values[0]);
        }
        let origin = self.model.origin();
        Ok(self.interpolate()?.value(origin[0]))
    }

    // ── Element-wise functions ────────────────────────────────────────────

    /// Apply `f` to every value.
    pub fn apply(&self, f: impl Fn(Real) -> Real) -> Slice {
        let mut s = self.clone();
        for v in &mut s.values {
            *v = f(*v);
        }
        s
    }

    /// `self^p`.
    pub fn pow(&self, p: Real) -> Slice {
        self.apply(|v| v.powf(p))
    }

    /// `|self|`.
    pub fn abs(&self) -> Slice {
        self.apply(Real::abs)
    }

    /// `e^self`.
    pub fn exp(&self) -> Slice {
        self.apply(Real::exp)
    }

    /// `ln self`.
    pub fn ln(&self) -> Slice {
        self.apply(Real::ln)
    }

    /// `√self`.
    pub fn sqrt(&self) -> Slice {
        self.apply(Real::sqrt)
    }

    /// `max(self, c)`.
    pub fn max_value(&self, c: Real) -> Slice {
        self.apply(|v| v.max(c))
    }

    /// `min(self, c)`.
    pub fn min_value(&self, c: Real) -> Slice {
        self.apply(|v| v.min(c))
    }

    /// Element-wise maximum.
    pub fn max(&self, other: &Slice) -> Slice {
        self.combine(other, Real::max)
    }

    /// Element-wise minimum.
    pub fn min(&self, other: &Slice) -> Slice {
        self.combine(other, Real::min)
    }

    // ── Binary combination ────────────────────────────────────────────────

    /// `true` if both slices live on the same model at the same time.
    pub fn is_compatible(&self, other: &Slice) -> bool {
        same_model(&self.model, &other.model) && self.time == other.time
    }

    /// Combine element-wise with `f(self, other)`.
    ///
    /// # Panics
    /// If the slices belong to different models or event times.
    pub fn combine(&self, other: &Slice, f: impl Fn(Real, Real) -> Real) -> Slice {
        assert!(
            self.is_compatible(other),
            "slices must share model and event time (times {} and {})",
            self.time,
            other.time
        );
        self.combine_unchecked(other, f)
    }

    /// Fallible form of [`Slice::combine`].
    ///
    /// # Errors
    /// `Precondition` if the slices belong to different models or event
    /// times.
    pub fn try_combine(&self, other: &Slice, f: impl Fn(Real, Real) -> Real) -> Result<Slice> {
        ensure!(
            self.is_compatible(other),
            "slices must share model and event time (times {} and {})",
            self.time,
            other.time
        );
        Ok(self.combine_unchecked(other, f))
    }

    fn combine_unchecked(&self, other: &Slice, f: impl Fn(Real, Real) -> Real) -> Slice {
        if other.is_constant() {
            let c = other.values[0];
            return self.apply(|v| f(v, c));
        }
        if self.is_constant() {
            let c = self.values[0];
            return other.apply(|v| f(c, v));
        }
        if self.dependence == other.dependence {
            let mut s = self.clone();
            for (a, b) in s.values.iter_mut().zip(&other.values) {
                *a = f(*a, *b);
            }
            return s;
        }
        let union = union(&self.dependence, &other.dependence);
        let mut a = self.clone();
        let mut b = other.clone();
        self.model.add_dependence(&mut a, &union);
        self.model.add_dependence(&mut b, &union);
        for (x, y) in a.values.iter_mut().zip(&b.values) {
            *x = f(*x, *y);
        }
        a
    }

    fn combine_in_place(&mut self, other: &Slice, f: impl Fn(Real, Real) -> Real) {
        if other.is_constant() && self.is_compatible(other) {
            let c = other.values[0];
            for v in &mut self.values {
                *v = f(*v, c);
            }
        } else {
            *self = self.combine(other, f);
        }
    }
}

/// Sorted union of two sorted index sets.
fn union(a: &[Size], b: &[Size]) -> Vec<Size> {
    let mut u: Vec<Size> = a.iter().chain(b).copied().collect();
    u.sort_unstable();
    u.dedup();
    u
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("time", &self.time)
            .field("dependence", &self.dependence)
            .field("values", &self.values.len())
            .finish_non_exhaustive()
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Conditional expectation of `slice` at event time `time`.
pub fn rollback(slice: &Slice, time: Size) -> Result<Slice> {
    slice.rollback(time)
}

/// Element-wise maximum.
pub fn max(a: &Slice, b: &Slice) -> Slice {
    a.max(b)
}

/// Element-wise minimum.
pub fn min(a: &Slice, b: &Slice) -> Slice {
    a.min(b)
}

/// Smoothed `1{a >= b}`.
pub fn indicator(a: &Slice, b: &Slice) -> Slice {
    a.indicator_of(b)
}

// ── Operators ─────────────────────────────────────────────────────────────────

macro_rules! slice_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait<&Slice> for &Slice {
            type Output = Slice;
            fn $method(self, rhs: &Slice) -> Slice {
                self.combine(rhs, |a, b| a $op b)
            }
        }

        impl $trait<Slice> for Slice {
            type Output = Slice;
            fn $method(self, rhs: Slice) -> Slice {
                self.combine(&rhs, |a, b| a $op b)
            }
        }

        impl $trait<&Slice> for Slice {
            type Output = Slice;
            fn $method(self, rhs: &Slice) -> Slice {
                self.combine(rhs, |a, b| a $op b)
            }
        }

        impl $trait<Real> for &Slice {
            type Output = Slice;
            fn $method(self, rhs: Real) -> Slice {
                self.apply(|a| a $op rhs)
            }
        }

        impl $trait<Real> for Slice {
            type Output = Slice;
            fn $method(mut self, rhs: Real) -> Slice {
                for v in &mut self.values {
                    *v = *v $op rhs;
                }
                self
            }
        }

        impl $trait<Slice> for Real {
            type Output = Slice;
            fn $method(self, mut rhs: Slice) -> Slice {
                for v in &mut rhs.values {
                    *v = self $op *v;
                }
                rhs
            }
        }

        impl $trait<&Slice> for Real {
            type Output = Slice;
            fn $method(self, rhs: &Slice) -> Slice {
                rhs.apply(|v| self $op v)
            }
        }

        impl $assign_trait<&Slice> for Slice {
            fn $assign_method(&mut self, rhs: &Slice) {
                self.combine_in_place(rhs, |a, b| a $op b);
            }
        }

        impl $assign_trait<Slice> for Slice {
            fn $assign_method(&mut self, rhs: Slice) {
                self.combine_in_place(&rhs, |a, b| a $op b);
            }
        }

        impl $assign_trait<Real> for Slice {
            fn $assign_method(&mut self, rhs: Real) {
                for v in &mut self.values {
                    *v = *v $op rhs;
                }
            }
        }
    };
}

slice_binary_op!(Add, add, AddAssign, add_assign, +);
slice_binary_op!(Sub, sub, SubAssign, sub_assign, -);
slice_binary_op!(Mul, mul, MulAssign, mul_assign, *);
slice_binary_op!(Div, div, DivAssign, div_assign, /);

impl Neg for Slice {
    type Output = Slice;
    fn neg(self) -> Slice {
        -1.0 * self
    }
}

impl Neg for &Slice {
    type Output = Slice;
    fn neg(self) -> Slice {
        self.apply(|v| -v)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
