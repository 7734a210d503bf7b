//! # priceforge
//!
//! European option pricing under stochastic models with three
//! interchangeable techniques: closed-form formulas, Fourier inversion of a
//! characteristic function, and Monte Carlo simulation.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `pf-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use priceforge::instruments::{EuropeanOption, Underlying};
//! use priceforge::models::{
//!     CorrelationParameters, HestonModel, HestonParameters, RateParameters, SpotParameters,
//!     VolatilityParameters,
//! };
//! use priceforge::pricingengines::{FourierEngine, FourierMethod};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let option =
//!     EuropeanOption::call(100.0, today + Duration::days(365), Underlying::spot("SPX")).unwrap();
//! let model = HestonModel::new(HestonParameters::new(
//!     SpotParameters::new(100.0, 0.0),
//!     RateParameters::new(0.0),
//!     VolatilityParameters::new(0.16, 2.0, 0.16, 0.3),
//!     CorrelationParameters::spot_vol(0.0),
//! ))
//! .unwrap();
//!
//! let price = FourierEngine::new(FourierMethod::CarrMadan)
//!     .price(&model, &option, today)
//!     .unwrap();
//! assert!((price - 6.1369).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, errors and year fractions.
pub use pf_core as core;

/// ODE solvers, quadrature, distributions, RNG and statistics.
pub use pf_math as math;

/// Options, payoffs and underlyings.
pub use pf_instruments as instruments;

/// Stochastic process definitions.
pub use pf_processes as processes;

/// Pricing models and characteristic functions.
pub use pf_models as models;

/// Monte Carlo path simulation.
pub use pf_methods as methods;

/// Closed-form, Fourier and Monte Carlo engines.
pub use pf_pricingengines as pricingengines;

pub use pf_core::{Error, Result};
