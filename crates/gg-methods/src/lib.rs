//! # gg-methods
//!
//! Numerical methods for Gaussian rollback on a one-dimensional grid.
//!
//! # Modules
//!
//! * [`gauss_rollback`]: explicit, θ-scheme, spectral and chained rollback
//!   operators behind a two-phase recipe / bound-operator interface
//! * [`grid`]: grid step, width and size rules
//! * [`indicator`]: smoothed indicator functions
//! * [`finite_differences`]: tridiagonal operator and stencils

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Tridiagonal operator and finite-difference stencils.
pub mod finite_differences;

/// Gaussian rollback schemes.
pub mod gauss_rollback;

/// Grid sizing rules.
pub mod grid;

/// Smoothed indicator functions.
pub mod indicator;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{TridiagonalOperator, TridiagonalSolver};
pub use gauss_rollback::{
    BoundGaussRollback, BoundRollback, Courant, FastScheme, GaussRollback, RollbackScheme,
    DEFAULT_EXPLICIT_P,
};
pub use grid::{symmetric_grid, GaussWidth, SizeRule, StepRule};
pub use indicator::Indicator;
