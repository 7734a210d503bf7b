//! Error types for priceforge.
//!
//! A single `thiserror`-derived enum covers every failure the pricing layers
//! can report. The variants follow the failure taxonomy of the engines:
//! unsupported variants, numerical failures, degenerate inputs and invalid
//! configuration, plus the usual precondition catch-all.

use thiserror::Error;

/// The top-level error type used throughout priceforge.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated (invalid model parameters, invalid contract).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// An option kind, model capability or method the dispatch logic does
    /// not recognise.
    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// ODE non-convergence, NaN/Inf propagation through a characteristic
    /// function or a quadrature.
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// Inputs for which no price is defined (e.g. an option valued after
    /// its expiry).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid integration or simulation parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Shorthand `Result` type used throughout priceforge.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use pf_core::{ensure, errors::Error};
/// fn positive(x: f64) -> pf_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
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

/// Returns `Err(Error::Numerical(...))` if `$value` is NaN or infinite.
///
/// # Example
/// ```
/// use pf_core::{ensure_finite, errors::Error};
/// fn checked(x: f64) -> pf_core::errors::Result<f64> {
///     ensure_finite!(x, "checked value");
///     Ok(x)
/// }
/// assert!(checked(1.0).is_ok());
/// assert!(matches!(checked(f64::NAN), Err(Error::Numerical(_))));
/// ```
#[macro_export]
macro_rules! ensure_finite {
    ($value:expr, $($msg:tt)*) => {
        if !$value.is_finite() {
            return Err($crate::errors::Error::Numerical(format!(
                "{} is not finite ({})",
                format!($($msg)*),
                $value
            )));
        }
    };
}
