//! # gaussgrid
//!
//! Gaussian rollback on one-dimensional grids, and the Black and Hull-White
//! models built on it.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than on the individual `gg-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use gaussgrid::models::{data, AssetModel, BlackData, BlackModel, GridConfig};
//!
//! let discount = data::discount(0.05, 0.0);
//! let forward = data::forward_from_dividend(100.0, 0.0, &discount, 0.0);
//! let curves = BlackData::constant(discount, forward, 0.2, 0.0);
//! let mut model = BlackModel::new(curves, 0.2, &GridConfig::black()).unwrap();
//! model.assign_event_times(&[0.0, 1.0]).unwrap();
//!
//! // a forward contract struck at 100, paid at t = 1
//! let payoff = model.spot(1).unwrap() - 100.0;
//! let price = payoff.rollback(0).unwrap().at_origin().unwrap();
//! let exact = 100.0 - 100.0 * (-0.05_f64).exp();
//! assert!((price - exact).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use gg_core as core;

/// Curves, interpolation, distributions, and FFT helpers.
pub use gg_math as math;

/// Rollback schemes, grid sizing, and indicator smoothing.
pub use gg_methods as methods;

/// Slices, the Brownian model, and the Black and Hull-White models.
pub use gg_models as models;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use gg_core::{Error, Real, Result, Size, Time};
pub use gg_methods::{FastScheme, GaussRollback, Indicator};
pub use gg_models::{
    AssetModel, BlackData, BlackModel, BrownianGrid, GridConfig, HullWhiteData, HullWhiteModel,
    InterestRateModel, Model, ModelHandle, Slice,
};
