//! # gg-core
//!
//! Core types, numerical constants, and error definitions for gaussgrid.
//!
//! Every other crate in the workspace builds on the aliases, the tolerance
//! constants, and the error hierarchy defined here.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Tolerances and iteration bounds shared by the numerical code.
pub mod constants;

/// Error types and the `ensure!` family of early-return macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A time measurement in years.
pub type Time = Real;

/// A discount factor in (0, 1].
pub type DiscountFactor = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use constants::{EPS, IMAX, OMEGA, STEP_COUNT_EPS, TIME_EPS, VAR_EPS};
pub use errors::{Error, ErrorKind, Result};
