//! # pf-pricingengines
//!
//! Engines that turn a model and a European option into a price.
//!
//! ## Engines
//!
//! - [`ClosedFormEngine`]: algebraic prices for models that have them
//! - [`FourierEngine`]: Carr-Madan or Gil-Pelaez inversion of the model's
//!   characteristic function
//! - [`MonteCarloEngine`]: Euler-Maruyama simulation of the model's process
//!
//! Every engine derives the time to expiry from the option and a valuation
//! timestamp. An option valued after its expiry is a
//! [`DegenerateInput`](pf_core::Error::DegenerateInput) error; at expiry every
//! engine returns the intrinsic value on today's underlying level.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod closed_form;
pub mod fourier;
pub mod monte_carlo;

pub use closed_form::ClosedFormEngine;
pub use fourier::{FourierEngine, FourierMethod, FourierParameters};
pub use monte_carlo::{MonteCarloEngine, MonteCarloResult};

use pf_core::{errors::Result, Price, Timestamp};
use pf_instruments::{EuropeanOption, ExpiryTimes};
use pf_models::PricingModel;

/// What is left of an option's life at the valuation time.
pub(crate) enum Horizon {
    /// The option expires now and is worth its intrinsic value.
    Expiring(Price),
    /// Time remains until expiry.
    Remaining(ExpiryTimes),
}

pub(crate) fn horizon<M: PricingModel + ?Sized>(
    model: &M,
    option: &EuropeanOption,
    valuation_time: Timestamp,
) -> Result<Horizon> {
    let times = option.expiry_times(valuation_time)?;
    if times.option == 0.0 {
        Ok(Horizon::Expiring(option.payoff(model.initial_level())))
    } else {
        Ok(Horizon::Remaining(times))
    }
}
