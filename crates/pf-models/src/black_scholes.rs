//! Black-Scholes model for options on a spot asset.
//!
//! ```text
//! dS = r·S dt + σ·S dW
//! ```

use crate::black_76::{black_formula, check_time, gaussian_cf};
use crate::model::{ClosedFormModel, PricingModel, SimulatableModel};
use crate::parameters::{RateParameters, SpotParameters};
use num_complex::Complex64;
use pf_core::{errors::Result, DiscountFactor, Price, Real, Time};
use pf_instruments::OptionKind;
use pf_processes::{LogNormalProcess, StochasticProcess};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of a [`BlackScholesModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlackScholesParameters {
    /// Spot level and volatility.
    pub spot: SpotParameters,
    /// Risk-free rate.
    pub rate: RateParameters,
}

/// Black-Scholes model.
#[derive(Debug, Clone)]
pub struct BlackScholesModel {
    params: BlackScholesParameters,
}

impl BlackScholesModel {
    /// Create a model from validated parameters.
    pub fn new(params: BlackScholesParameters) -> Result<Self> {
        params.spot.validate()?;
        params.rate.validate()?;
        Ok(Self { params })
    }

    /// The model parameters.
    pub fn params(&self) -> &BlackScholesParameters {
        &self.params
    }
}

impl PricingModel for BlackScholesModel {
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn characteristic_function(
        &self,
        u: Complex64,
        tau: Time,
        _tau_u: Option<Time>,
    ) -> Result<Complex64> {
        check_time(tau)?;
        let SpotParameters { value, volatility } = self.params.spot;
        let variance = volatility * volatility * tau;
        let mean = value.ln() + self.params.rate.value * tau - 0.5 * variance;
        Ok(gaussian_cf(u, mean, variance))
    }

    fn zero_coupon_bond(&self, tau: Time) -> DiscountFactor {
        self.params.rate.discount(tau)
    }

    fn initial_level(&self) -> Real {
        self.params.spot.value
    }
}

impl ClosedFormModel for BlackScholesModel {
    fn price(&self, tau: Time, strike: Real, kind: OptionKind) -> Result<Price> {
        check_time(tau)?;
        let discount = self.zero_coupon_bond(tau);
        let forward = self.params.spot.value / discount;
        let std_dev = self.params.spot.volatility * tau.sqrt();
        Ok(black_formula(kind, forward, strike, std_dev, discount))
    }
}

impl SimulatableModel for BlackScholesModel {
    fn process(&self, _tau: Time, _tau_u: Option<Time>) -> Result<Box<dyn StochasticProcess>> {
        Ok(Box::new(LogNormalProcess::new(
            self.params.spot.value,
            self.params.rate.value,
            self.params.spot.volatility,
        )?))
    }
}
