//! # gg-models
//!
//! Slices, the Brownian grid model, and the Gaussian pricing models built
//! on it.
//!
//! ## Layering
//!
//! ```text
//! Model (trait)
//! ├── BrownianModel          grid, rollback, indicator, interpolation
//! └── Similar                BrownianModel with a replaced rollback
//!     ├── BlackModel         → AssetModel
//!     └── HullWhiteModel     → InterestRateModel
//! ```
//!
//! Payoffs are written as [`Slice`] arithmetic and valued by rolling back to
//! the initial time.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Infrastructure ───────────────────────────────────────────────────────
pub mod config;
pub mod data;
pub mod model;
pub mod slice;

// ── State models ─────────────────────────────────────────────────────────
pub mod brownian;
pub mod similar;

// ── Pricing models ───────────────────────────────────────────────────────
pub mod black;
pub mod facade;
pub mod hull_white;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use black::{BlackData, BlackModel};
pub use brownian::{BrownianGrid, BrownianModel};
pub use config::{GridConfig, InterpKind};
pub use facade::{AssetModel, InterestRateModel};
pub use hull_white::{HullWhiteData, HullWhiteModel};
pub use model::{same_model, Model, ModelHandle};
pub use similar::{RollbackFn, Similar};
pub use slice::Slice;
