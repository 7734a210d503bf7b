//! Forward-curve model with stochastic volatility and stochastic cost of
//! carry, in the style of Trolle and Schwartz.
//!
//! The option is written on a forward delivering at `T_u`, and priced from
//! the characteristic function of `ln F(τ, T_u)`. In backward time
//! `s ∈ [0, τ]` the remaining forward maturity is `m(s) = τ_u − τ + s` and
//!
//! ```text
//! D' = −½·a(m)·(u² + iu) + (iu·σ·b(m) − κ)·D + ½σ²·D²
//! C' = κθ·D
//! a(m) = 1 − 2ρ_Sδ·αB(m) + (αB(m))²
//! b(m) = ρ_Sv − ρ_vδ·αB(m)
//! ```
//!
//! The coefficients depend on `s`, so only the numerical solution exists.
//! With `α = 0` the system is Heston's on a forward with zero rate.

use crate::model::{PricingModel, SimulatableModel};
use crate::ode::{CharacteristicFunctionOdes, OdeSolutionMode};
use crate::parameters::{
    CorrelationParameters, CostOfCarryParameters, ForwardParameters, RateParameters,
    VolatilityParameters,
};
use num_complex::Complex64;
use pf_core::{
    ensure_finite,
    errors::{Error, Result},
    DiscountFactor, Real, Time,
};
use pf_math::{AdaptiveRungeKutta, OdeSolverParameters};
use pf_processes::{
    carry_loading, forward_covariance_loading, forward_variance_loading, StochasticProcess,
    TrolleSchwartzProcess,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
fn numerical() -> OdeSolutionMode {
    OdeSolutionMode::Numerical
}

/// Parameters of a [`TrolleSchwartzModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrolleSchwartzParameters {
    /// Today's forward level; its `volatility` is not used.
    pub forward: ForwardParameters,
    /// Rate used to discount the option premium.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rate: RateParameters,
    /// Variance process.
    pub volatility: VolatilityParameters,
    /// Cost-of-carry loading.
    pub cost_of_carry: CostOfCarryParameters,
    /// Forward / variance / cost-of-carry correlations.
    pub correlation: CorrelationParameters,
    /// Must be [`OdeSolutionMode::Numerical`].
    #[cfg_attr(feature = "serde", serde(default = "numerical"))]
    pub ode_solution: OdeSolutionMode,
}

impl TrolleSchwartzParameters {
    /// Parameters with a zero discount rate.
    pub fn new(
        forward: ForwardParameters,
        volatility: VolatilityParameters,
        cost_of_carry: CostOfCarryParameters,
        correlation: CorrelationParameters,
    ) -> Self {
        Self {
            forward,
            rate: RateParameters::default(),
            volatility,
            cost_of_carry,
            correlation,
            ode_solution: OdeSolutionMode::Numerical,
        }
    }

    /// Discount the premium at `rate`.
    pub fn with_rate(mut self, rate: RateParameters) -> Self {
        self.rate = rate;
        self
    }

    /// Validate every component.
    pub fn validate(&self) -> Result<()> {
        self.forward.validate()?;
        self.rate.validate()?;
        self.volatility.validate()?;
        self.cost_of_carry.validate()?;
        self.correlation.validate()?;
        if self.ode_solution == OdeSolutionMode::Analytical {
            return Err(Error::UnsupportedVariant(
                "the Trolle-Schwartz model has no analytical ODE solution".into(),
            ));
        }
        Ok(())
    }
}

// ── ODEs ─────────────────────────────────────────────────────────────────────

/// The Trolle-Schwartz Riccati system with maturity-dependent loadings.
#[derive(Debug, Clone)]
pub struct TrolleSchwartzOdes {
    kappa: Real,
    theta: Real,
    sigma: Real,
    alpha: Real,
    gamma: Real,
    correlation: CorrelationParameters,
    solver: AdaptiveRungeKutta,
}

impl TrolleSchwartzOdes {
    /// The system for `params`, integrated with the default solver.
    pub fn new(params: &TrolleSchwartzParameters) -> Self {
        Self {
            kappa: params.volatility.mean_reversion_rate,
            theta: params.volatility.long_term_variance(),
            sigma: params.volatility.volatility,
            alpha: params.cost_of_carry.alpha,
            gamma: params.cost_of_carry.gamma,
            correlation: params.correlation,
            solver: AdaptiveRungeKutta::default(),
        }
    }

    /// Replace the numerical integrator.
    pub fn with_solver(mut self, solver: AdaptiveRungeKutta) -> Self {
        self.solver = solver;
        self
    }
}

impl CharacteristicFunctionOdes for TrolleSchwartzOdes {
    fn rhs(
        &self,
        s: Time,
        state: [Complex64; 2],
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> [Complex64; 2] {
        let m = (tau_u.unwrap_or(tau) - tau + s).max(0.0);
        let alpha_b = carry_loading(self.alpha, self.gamma, m);
        let a = forward_variance_loading(alpha_b, self.correlation.spot_cost_of_carry);
        let b = forward_covariance_loading(
            alpha_b,
            self.correlation.spot_vol,
            self.correlation.vol_cost_of_carry,
        );

        let iu = Complex64::i() * u;
        let d = state[1];
        let d_dot = -0.5 * a * (u * u + iu) + (iu * self.sigma * b - self.kappa) * d
            + 0.5 * self.sigma * self.sigma * d * d;
        let c_dot = self.kappa * self.theta * d;
        [c_dot, d_dot]
    }

    fn solver(&self) -> &AdaptiveRungeKutta {
        &self.solver
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

/// Trolle-Schwartz-type model on a forward underlying.
#[derive(Debug, Clone)]
pub struct TrolleSchwartzModel {
    params: TrolleSchwartzParameters,
    odes: TrolleSchwartzOdes,
}

impl TrolleSchwartzModel {
    /// Create a model from validated parameters.
    pub fn new(params: TrolleSchwartzParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            odes: TrolleSchwartzOdes::new(&params),
            params,
        })
    }

    /// Integrate `(C, D)` with the given solver settings.
    pub fn with_ode_solver(mut self, solver: &OdeSolverParameters) -> Result<Self> {
        self.odes = self
            .odes
            .with_solver(AdaptiveRungeKutta::from_parameters(solver)?);
        Ok(self)
    }

    /// The model parameters.
    pub fn params(&self) -> &TrolleSchwartzParameters {
        &self.params
    }

    /// The Riccati system.
    pub fn odes(&self) -> &TrolleSchwartzOdes {
        &self.odes
    }
}

/// `τ_u`, checked against `τ`.
fn underlying_maturity(tau: Time, tau_u: Option<Time>) -> Result<Time> {
    let tau_u = tau_u.ok_or_else(|| {
        Error::UnsupportedVariant(
            "the Trolle-Schwartz model prices options on forwards only".into(),
        )
    })?;
    if tau_u < tau {
        return Err(Error::DegenerateInput(format!(
            "forward matures at τ_u = {tau_u}, before the option at τ = {tau}"
        )));
    }
    Ok(tau_u)
}

impl PricingModel for TrolleSchwartzModel {
    fn name(&self) -> &'static str {
        "Trolle-Schwartz"
    }

    fn characteristic_function(
        &self,
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> Result<Complex64> {
        if tau < 0.0 {
            return Err(Error::DegenerateInput(format!(
                "negative time to expiry {tau}"
            )));
        }
        let tau_u = underlying_maturity(tau, tau_u)?;
        let (c, d) = self
            .odes
            .solve(self.params.ode_solution, u, tau, Some(tau_u))?;
        let v0 = self.params.volatility.initial_variance();
        let x0 = self.params.forward.value.ln();
        let cf = (c + d * v0 + Complex64::i() * u * x0).exp();
        ensure_finite!(cf, "Trolle-Schwartz characteristic function at u = {u}, τ = {tau}");
        Ok(cf)
    }

    fn zero_coupon_bond(&self, tau: Time) -> DiscountFactor {
        self.params.rate.discount(tau)
    }

    fn initial_level(&self) -> Real {
        self.params.forward.value
    }
}

impl SimulatableModel for TrolleSchwartzModel {
    fn process(&self, tau: Time, tau_u: Option<Time>) -> Result<Box<dyn StochasticProcess>> {
        let tau_u = underlying_maturity(tau, tau_u)?;
        let p = &self.params;
        Ok(Box::new(TrolleSchwartzProcess::new(
            p.forward.value,
            p.volatility.initial_variance(),
            p.volatility.mean_reversion_rate,
            p.volatility.long_term_variance(),
            p.volatility.volatility,
            p.cost_of_carry.alpha,
            p.cost_of_carry.gamma,
            tau_u,
            p.correlation.spot_vol,
            p.correlation.spot_cost_of_carry,
            p.correlation.vol_cost_of_carry,
        )?))
    }
}
