//! Model capability traits.
//!
//! Engines are generic over these traits and pick a model family at
//! construction time; no engine inspects concrete model types.

use num_complex::Complex64;
use pf_core::{errors::Result, DiscountFactor, Price, Real, Time};
use pf_instruments::OptionKind;
use pf_processes::StochasticProcess;

/// A model with a characteristic function of the log terminal level.
pub trait PricingModel: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// `E[exp(iu · ln X_τ)]` for the terminal underlying level `X_τ`.
    ///
    /// `tau_u` is the time to the underlying forward's delivery, `None` for
    /// spot underlyings.
    fn characteristic_function(
        &self,
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> Result<Complex64>;

    /// Price today of one unit paid at `tau`.
    fn zero_coupon_bond(&self, tau: Time) -> DiscountFactor;

    /// Today's underlying level (spot or forward).
    fn initial_level(&self) -> Real;
}

/// A model whose dynamics can be simulated.
///
/// The process state's first component is the log of the underlying level.
pub trait SimulatableModel: PricingModel {
    /// The process to simulate for an option maturing at `tau`.
    fn process(&self, tau: Time, tau_u: Option<Time>) -> Result<Box<dyn StochasticProcess>>;
}

/// A model with an algebraic option price.
pub trait ClosedFormModel: PricingModel {
    /// European option price for maturity `tau` and `strike`.
    fn price(&self, tau: Time, strike: Real, kind: OptionKind) -> Result<Price>;
}
