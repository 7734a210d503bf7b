//! # pf-core
//!
//! Core types, error definitions and time helpers for priceforge.
//!
//! This crate provides the building blocks shared across all other crates in
//! the workspace: primitive type aliases, the error enum with its `ensure!`
//! / `ensure_finite!` macros, and the timestamp / year-fraction conventions used to
//! turn an option's expiry into a time to maturity.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_finite!` macros.
pub mod errors;

/// Timestamps and year fractions.
pub mod time;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use time::{year_fraction, Timestamp, SECONDS_IN_A_YEAR};
