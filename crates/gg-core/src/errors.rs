//! Error types for gaussgrid.
//!
//! All fallible operations return [`Result`] with the single [`Error`] enum
//! below.  Input validation in the numerical engine uses the three
//! catchable kinds `Range`, `Sort` and `Size`; broken preconditions and
//! postconditions of the model layer use `Precondition` and `Postcondition`.
//! The `ensure!` family of macros provides the early-return shorthand.

use thiserror::Error;

/// The top-level error type used throughout gaussgrid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// A parameter lies outside its domain.
    #[error("range error: {0}")]
    Range(String),

    /// Input is not sorted where sorting is required.
    #[error("sort error: {0}")]
    Sort(String),

    /// A container or array has an invalid size.
    #[error("size error: {0}")]
    Size(String),

    /// Invalid argument, typically a name that does not parse.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Not implemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Parameter out of domain.
    Range,
    /// Input not sorted.
    Sort,
    /// Invalid container size.
    Size,
    /// Misuse of the API: broken pre/postconditions, bad arguments.
    Usage,
    /// Anything else.
    Runtime,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Range(_) => ErrorKind::Range,
            Error::Sort(_) => ErrorKind::Sort,
            Error::Size(_) => ErrorKind::Size,
            Error::Precondition(_)
            | Error::Postcondition(_)
            | Error::InvalidArgument(_) => ErrorKind::Usage,
            Error::Runtime(_) | Error::NotImplemented(_) => ErrorKind::Runtime,
        }
    }
}

/// Shorthand `Result` type used throughout gaussgrid.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use gg_core::{ensure, errors::Error};
/// fn positive(x: f64) -> gg_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use gg_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> gg_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Range(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use gg_core::{ensure_range, errors::{Error, ErrorKind}};
/// fn variance(v: f64) -> gg_core::errors::Result<f64> {
///     ensure_range!(v > 0.0, "variance must be positive, got {v}");
///     Ok(v)
/// }
/// assert_eq!(variance(-1.0).unwrap_err().kind(), ErrorKind::Range);
/// ```
#[macro_export]
macro_rules! ensure_range {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Range(format!($($msg)*)));
        }
    };
}

/// Returns `Err(Error::Size(...))` if `$cond` is false.
#[macro_export]
macro_rules! ensure_size {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Size(format!($($msg)*)));
        }
    };
}

/// Returns `Err(Error::Sort(...))` if `$cond` is false.
#[macro_export]
macro_rules! ensure_sorted {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Sort(format!($($msg)*)));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use gg_core::{fail, errors::Error};
/// fn always_err() -> gg_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_sorted(xs: &[f64]) -> Result<()> {
        ensure_sorted!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "values must be strictly increasing"
        );
        Ok(())
    }

    fn check_len(xs: &[f64], n: usize) -> Result<()> {
        ensure_size!(xs.len() == n, "expected {n} values, got {}", xs.len());
        Ok(())
    }

    #[test]
    fn macros_map_to_kinds() {
        assert_eq!(check_sorted(&[1.0, 0.5]).unwrap_err().kind(), ErrorKind::Sort);
        assert!(check_sorted(&[0.5, 1.0]).is_ok());
        assert_eq!(check_len(&[1.0], 2).unwrap_err().kind(), ErrorKind::Size);
    }

    #[test]
    fn messages_carry_the_kind() {
        let e = Error::Range("variance 0".into());
        assert_eq!(e.to_string(), "range error: variance 0");
        assert_eq!(Error::Precondition("x".into()).kind(), ErrorKind::Usage);
    }
}
