//! Numerical tolerances.

use crate::{Real, Size};

/// Generic absolute tolerance for real comparisons.
pub const EPS: Real = 1e-10;

/// Two times closer than this are treated as equal.
pub const TIME_EPS: Real = 1e-5;

/// Smallest variance a rollback scheme accepts.
pub const VAR_EPS: Real = 1e-12;

/// Slack subtracted before rounding a micro-step count up, so that counts
/// which are integral up to round-off stay put.
pub const STEP_COUNT_EPS: Real = 1e-9;

/// Stand-in for an infinite real value.
pub const OMEGA: Real = 1e20;

/// Upper bound on iteration counts of numerical loops.
pub const IMAX: Size = 1000;

/// Return `true` if `|a - b| <= tol`.
#[inline]
pub fn close(a: Real, b: Real, tol: Real) -> bool {
    (a - b).abs() <= tol
}
