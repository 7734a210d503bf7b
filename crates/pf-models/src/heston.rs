//! Heston stochastic volatility model.
//!
//! ```text
//! dS = r·S dt + √v·S dW₁
//! dv = κ(θ − v) dt + σ √v dW₂
//! dW₁·dW₂ = ρ dt
//! ```
//!
//! The characteristic function of `ln S_τ` is `exp(C + D·v₀ + iu·ln S₀)` with
//!
//! ```text
//! D' = −½(u² + iu) + (iσρu − κ)·D + ½σ²·D²
//! C' = κθ·D + iu·r
//! ```
//!
//! Both `(C, D)` paths are available. The closed form is written through
//! `φ = (1 − e^{−dτ})/d`:
//!
//! ```text
//! D = num·φ / (2 + (β − d)·φ)
//! C = iu·r·τ + κθ·num/(β + d)·(τ − φ·ln(1 + w)/w),   w = (β − d)·φ/2
//! ```
//!
//! with `num = −(u² + iu)`, `β = κ − iρσu` and `β − d = σ²·num/(β + d)`.
//! The root `d` is picked so that `β + d` is the larger of `β ± d`, and the
//! `κθ` term vanishes exactly when `num = 0` or `κθ = 0`; the limits
//! `d → 0`, `σ → 0`, `κ = 0` and `κ = ρσ` at `u = −i` all stay finite.

use crate::model::{PricingModel, SimulatableModel};
use crate::ode::{CharacteristicFunctionOdes, OdeSolutionMode};
use crate::parameters::{CorrelationParameters, RateParameters, SpotParameters, VolatilityParameters};
use num_complex::Complex64;
use pf_core::{
    ensure_finite,
    errors::{Error, Result},
    DiscountFactor, Real, Time,
};
use pf_math::{AdaptiveRungeKutta, OdeSolverParameters};
use pf_processes::{HestonLogProcess, StochasticProcess};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of a [`HestonModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HestonParameters {
    /// Spot level; its `volatility` is not used.
    pub spot: SpotParameters,
    /// Risk-free rate.
    pub rate: RateParameters,
    /// Variance process.
    pub volatility: VolatilityParameters,
    /// Only `spot_vol` is used.
    pub correlation: CorrelationParameters,
    /// How `(C, D)` are obtained.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ode_solution: OdeSolutionMode,
}

impl HestonParameters {
    /// Parameters with the analytical ODE solution.
    pub fn new(
        spot: SpotParameters,
        rate: RateParameters,
        volatility: VolatilityParameters,
        correlation: CorrelationParameters,
    ) -> Self {
        Self {
            spot,
            rate,
            volatility,
            correlation,
            ode_solution: OdeSolutionMode::default(),
        }
    }

    /// Select the ODE solution path.
    pub fn with_ode_solution(mut self, mode: OdeSolutionMode) -> Self {
        self.ode_solution = mode;
        self
    }

    /// Validate every component.
    pub fn validate(&self) -> Result<()> {
        self.spot.validate()?;
        self.rate.validate()?;
        self.volatility.validate()?;
        self.correlation.validate()
    }
}

// ── ODEs ─────────────────────────────────────────────────────────────────────

/// The Heston Riccati system.
#[derive(Debug, Clone)]
pub struct HestonOdes {
    kappa: Real,
    theta: Real,
    sigma: Real,
    rho: Real,
    rate: Real,
    solver: AdaptiveRungeKutta,
}

impl HestonOdes {
    /// The system for `params`, integrated with the default solver.
    pub fn new(params: &HestonParameters) -> Self {
        Self {
            kappa: params.volatility.mean_reversion_rate,
            theta: params.volatility.long_term_variance(),
            sigma: params.volatility.volatility,
            rho: params.correlation.spot_vol,
            rate: params.rate.value,
            solver: AdaptiveRungeKutta::default(),
        }
    }

    /// Replace the numerical integrator.
    pub fn with_solver(mut self, solver: AdaptiveRungeKutta) -> Self {
        self.solver = solver;
        self
    }
}

/// `ln(1 + w) / w`, accurate for small `|w|`.
fn ln_1p_ratio(w: Complex64) -> Complex64 {
    if w.norm() < 1e-4 {
        1.0 - w * (0.5 - w * (1.0 / 3.0 - w * 0.25))
    } else {
        (1.0 + w).ln() / w
    }
}

/// `(1 − e^{−dτ}) / d`, which tends to `τ` as `d → 0`.
fn one_minus_exp_over(d: Complex64, tau: Time) -> Complex64 {
    let z = d * tau;
    if z.norm() < 1e-4 {
        tau * (1.0 - z * (0.5 - z * (1.0 / 6.0 - z / 24.0)))
    } else {
        (1.0 - (-z).exp()) / d
    }
}

impl CharacteristicFunctionOdes for HestonOdes {
    fn rhs(
        &self,
        _s: Time,
        state: [Complex64; 2],
        u: Complex64,
        _tau: Time,
        _tau_u: Option<Time>,
    ) -> [Complex64; 2] {
        let iu = Complex64::i() * u;
        let d = state[1];
        let d_dot = -0.5 * (u * u + iu) + (iu * self.sigma * self.rho - self.kappa) * d
            + 0.5 * self.sigma * self.sigma * d * d;
        let c_dot = self.kappa * self.theta * d + iu * self.rate;
        [c_dot, d_dot]
    }

    fn solver(&self) -> &AdaptiveRungeKutta {
        &self.solver
    }

    fn analytical_solution(
        &self,
        u: Complex64,
        tau: Time,
        _tau_u: Option<Time>,
    ) -> Result<(Complex64, Complex64)> {
        if tau < 0.0 {
            return Err(Error::DegenerateInput(format!(
                "negative time to expiry {tau}"
            )));
        }
        let (kappa, sigma2) = (self.kappa, self.sigma * self.sigma);
        let iu = Complex64::i() * u;
        // (β + d)(β − d) = σ²·num, so β − d never needs a subtraction
        let num = -(iu + u * u);
        let beta = kappa - self.rho * self.sigma * iu;
        let mut d = (beta * beta - sigma2 * num).sqrt();
        // both roots solve the system; take the one that keeps β + d away from zero
        if (beta + d).norm() < 1e-3 * (beta - d).norm() {
            d = -d;
        }
        let beta_plus_d = beta + d;
        let beta_minus_d = if beta_plus_d == Complex64::new(0.0, 0.0) {
            Complex64::new(0.0, 0.0)
        } else {
            sigma2 * num / beta_plus_d
        };
        let phi = one_minus_exp_over(d, tau);

        let upper_d = num * phi / (2.0 + beta_minus_d * phi);
        // ∫₀^τ D
        let kappa_theta = kappa * self.theta;
        let integral_d = if num == Complex64::new(0.0, 0.0) || kappa_theta == 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            let w = 0.5 * beta_minus_d * phi;
            num / beta_plus_d * (tau - phi * ln_1p_ratio(w))
        };
        let upper_c = iu * self.rate * tau + kappa_theta * integral_d;

        if !(upper_c.is_finite() && upper_d.is_finite()) {
            return Err(Error::Numerical(format!(
                "Heston closed form is not finite at u = {u}, τ = {tau}"
            )));
        }
        Ok((upper_c, upper_d))
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

/// Heston stochastic volatility model on a spot underlying.
#[derive(Debug, Clone)]
pub struct HestonModel {
    params: HestonParameters,
    odes: HestonOdes,
}

impl HestonModel {
    /// Create a model from validated parameters.
    pub fn new(params: HestonParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            odes: HestonOdes::new(&params),
            params,
        })
    }

    /// Integrate numerical `(C, D)` with the given solver settings.
    pub fn with_ode_solver(mut self, solver: &OdeSolverParameters) -> Result<Self> {
        self.odes = self
            .odes
            .with_solver(AdaptiveRungeKutta::from_parameters(solver)?);
        Ok(self)
    }

    /// The model parameters.
    pub fn params(&self) -> &HestonParameters {
        &self.params
    }

    /// The Riccati system.
    pub fn odes(&self) -> &HestonOdes {
        &self.odes
    }
}

impl PricingModel for HestonModel {
    fn name(&self) -> &'static str {
        "Heston"
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
        let (c, d) = self.odes.solve(self.params.ode_solution, u, tau, tau_u)?;
        let v0 = self.params.volatility.initial_variance();
        let x0 = self.params.spot.value.ln();
        let cf = (c + d * v0 + Complex64::i() * u * x0).exp();
        ensure_finite!(cf, "Heston characteristic function at u = {u}, τ = {tau}");
        Ok(cf)
    }

    fn zero_coupon_bond(&self, tau: Time) -> DiscountFactor {
        self.params.rate.discount(tau)
    }

    fn initial_level(&self) -> Real {
        self.params.spot.value
    }
}

impl SimulatableModel for HestonModel {
    fn process(&self, _tau: Time, _tau_u: Option<Time>) -> Result<Box<dyn StochasticProcess>> {
        let p = &self.params;
        Ok(Box::new(HestonLogProcess::new(
            p.spot.value,
            p.volatility.initial_variance(),
            p.rate.value,
            p.volatility.mean_reversion_rate,
            p.volatility.long_term_variance(),
            p.volatility.volatility,
            p.correlation.spot_vol,
        )?))
    }
}
