//! Probability distributions.
//!
//! Only the standard normal is needed by the engine; the error function
//! comes from `statrs`.

pub mod normal;

pub use normal::{normal_cdf, normal_pdf};
