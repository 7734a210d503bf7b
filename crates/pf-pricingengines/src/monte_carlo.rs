//! Monte Carlo pricing engine.
//!
//! Simulates the model's process over `[0, τ]`, exponentiates the terminal
//! log level, applies the option payoff and discounts the average with the
//! model's zero-coupon bond.

use crate::{horizon, Horizon};
use pf_core::{errors::Result, Price, Real, Size, Timestamp};
use pf_instruments::EuropeanOption;
use pf_math::InverseCumulativeNormalRng;
use pf_methods::{simulate_terminal, MonteCarloParameters};
use pf_models::SimulatableModel;
use tracing::debug;

/// Price and sampling error of a Monte Carlo valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloResult {
    /// Discounted mean payoff.
    pub price: Price,
    /// Standard error of `price`.
    pub error_estimate: Real,
    /// Number of simulated paths.
    pub samples: Size,
}

/// Prices European options by Euler-Maruyama simulation.
///
/// The engine owns its random stream. With a fixed seed the stream is reset
/// at the start of every pricing call, so repeated calls agree; without one
/// it is seeded from entropy once and keeps advancing.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    params: MonteCarloParameters,
    rng: InverseCumulativeNormalRng,
}

impl MonteCarloEngine {
    /// Create a new engine after validating `params`.
    pub fn new(params: MonteCarloParameters) -> Result<Self> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => InverseCumulativeNormalRng::new(seed),
            None => InverseCumulativeNormalRng::from_entropy(),
        };
        Ok(Self { params, rng })
    }

    /// The simulation parameters.
    pub fn params(&self) -> &MonteCarloParameters {
        &self.params
    }

    /// Price `option` under `model` at `valuation_time`.
    pub fn price<M: SimulatableModel + ?Sized>(
        &mut self,
        model: &M,
        option: &EuropeanOption,
        valuation_time: Timestamp,
    ) -> Result<Price> {
        self.price_with_error(model, option, valuation_time)
            .map(|result| result.price)
    }

    /// Price together with the standard error of the estimate.
    ///
    /// At expiry the intrinsic value is returned with a zero error and no
    /// samples.
    pub fn price_with_error<M: SimulatableModel + ?Sized>(
        &mut self,
        model: &M,
        option: &EuropeanOption,
        valuation_time: Timestamp,
    ) -> Result<MonteCarloResult> {
        let times = match horizon(model, option, valuation_time)? {
            Horizon::Remaining(times) => times,
            Horizon::Expiring(intrinsic) => {
                return Ok(MonteCarloResult {
                    price: intrinsic,
                    error_estimate: 0.0,
                    samples: 0,
                })
            }
        };
        if let Some(seed) = self.params.seed {
            self.rng = InverseCumulativeNormalRng::new(seed);
        }

        let process = model.process(times.option, times.underlying)?;
        let summary = simulate_terminal(
            process.as_ref(),
            times.option,
            &self.params,
            &mut self.rng,
            |x| option.payoff(x[0].exp()),
        )?;
        let discount = model.zero_coupon_bond(times.option);
        let result = MonteCarloResult {
            price: discount * summary.mean,
            error_estimate: discount * summary.error_estimate,
            samples: summary.samples,
        };
        debug!(
            engine = "monte-carlo",
            model = model.name(),
            tau = times.option,
            tau_u = ?times.underlying,
            paths = result.samples,
            steps = self.params.n_steps,
            antithetic = self.params.antithetic_variates,
            price = result.price,
            error = result.error_estimate,
            "priced"
        );
        Ok(result)
    }
}
