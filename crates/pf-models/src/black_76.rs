//! Black-76 model for options on forwards.
//!
//! ```text
//! dF = σ·F dW
//! ```
//!
//! The forward is driftless; the premium is discounted at the model rate.
//! Also hosts [`black_formula`], shared with the Black-Scholes model.

use crate::model::{ClosedFormModel, PricingModel, SimulatableModel};
use crate::parameters::{ForwardParameters, RateParameters};
use num_complex::Complex64;
use pf_core::{
    errors::{Error, Result},
    DiscountFactor, Price, Real, Time,
};
use pf_instruments::OptionKind;
use pf_math::normal_cdf;
use pf_processes::{LogNormalProcess, StochasticProcess};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Black's formula: `DF · [φ F N(φ d₁) − φ K N(φ d₂)]`.
///
/// `std_dev` is the total log-volatility `σ√τ`. A zero standard deviation
/// gives the discounted intrinsic value of the forward.
pub fn black_formula(
    kind: OptionKind,
    forward: Real,
    strike: Real,
    std_dev: Real,
    discount: DiscountFactor,
) -> Price {
    let phi = kind.sign();
    if std_dev <= 0.0 {
        return discount * (phi * (forward - strike)).max(0.0);
    }
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    discount * phi * (forward * normal_cdf(phi * d1) - strike * normal_cdf(phi * d2))
}

/// Characteristic function of a normal log-level with mean `m` and variance `s²`.
pub(crate) fn gaussian_cf(u: Complex64, mean: Real, variance: Real) -> Complex64 {
    (Complex64::i() * u * mean - 0.5 * variance * u * u).exp()
}

pub(crate) fn check_time(tau: Time) -> Result<()> {
    if tau < 0.0 {
        return Err(Error::DegenerateInput(format!(
            "negative time to expiry {tau}"
        )));
    }
    Ok(())
}

/// Parameters of a [`Black76Model`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Black76Parameters {
    /// Forward level and volatility.
    pub forward: ForwardParameters,
    /// Discount rate.
    pub rate: RateParameters,
}

/// Black-76 model.
#[derive(Debug, Clone)]
pub struct Black76Model {
    params: Black76Parameters,
}

impl Black76Model {
    /// Create a model from validated parameters.
    pub fn new(params: Black76Parameters) -> Result<Self> {
        params.forward.validate()?;
        params.rate.validate()?;
        Ok(Self { params })
    }

    /// The model parameters.
    pub fn params(&self) -> &Black76Parameters {
        &self.params
    }
}

impl PricingModel for Black76Model {
    fn name(&self) -> &'static str {
        "Black-76"
    }

    fn characteristic_function(
        &self,
        u: Complex64,
        tau: Time,
        _tau_u: Option<Time>,
    ) -> Result<Complex64> {
        check_time(tau)?;
        let vol = self.params.forward.volatility;
        let variance = vol * vol * tau;
        Ok(gaussian_cf(
            u,
            self.params.forward.value.ln() - 0.5 * variance,
            variance,
        ))
    }

    fn zero_coupon_bond(&self, tau: Time) -> DiscountFactor {
        self.params.rate.discount(tau)
    }

    fn initial_level(&self) -> Real {
        self.params.forward.value
    }
}

impl ClosedFormModel for Black76Model {
    fn price(&self, tau: Time, strike: Real, kind: OptionKind) -> Result<Price> {
        check_time(tau)?;
        let std_dev = self.params.forward.volatility * tau.sqrt();
        Ok(black_formula(
            kind,
            self.params.forward.value,
            strike,
            std_dev,
            self.zero_coupon_bond(tau),
        ))
    }
}

impl SimulatableModel for Black76Model {
    fn process(&self, _tau: Time, _tau_u: Option<Time>) -> Result<Box<dyn StochasticProcess>> {
        Ok(Box::new(LogNormalProcess::new(
            self.params.forward.value,
            0.0,
            self.params.forward.volatility,
        )?))
    }
}
