//! Characteristic-function ODEs.
//!
//! Affine models write their characteristic function as
//! `exp(C(τ) + D(τ)·v₀ + iu·x₀)` where `(C, D)` solve a Riccati-type system
//! in backward time `s ∈ [0, τ]` with `(C, D)(0) = (0, 0)`. A model family
//! supplies the right-hand side and, when its coefficients are constant, a
//! closed-form solution; numerical integration is shared.

use num_complex::Complex64;
use num_traits::Zero;
use pf_core::{
    errors::{Error, Result},
    Time,
};
use pf_math::AdaptiveRungeKutta;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{trace, warn};

/// Which path a model takes to obtain `(C, D)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OdeSolutionMode {
    /// Closed-form expression.
    #[default]
    Analytical,
    /// Adaptive Runge-Kutta integration.
    Numerical,
}

impl fmt::Display for OdeSolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OdeSolutionMode::Analytical => write!(f, "analytical"),
            OdeSolutionMode::Numerical => write!(f, "numerical"),
        }
    }
}

impl FromStr for OdeSolutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analytical" => Ok(OdeSolutionMode::Analytical),
            "numerical" => Ok(OdeSolutionMode::Numerical),
            other => Err(Error::UnsupportedVariant(format!("ODE solution mode '{other}'"))),
        }
    }
}

/// A Riccati system for the characteristic-function terms `(C, D)`.
pub trait CharacteristicFunctionOdes: Send + Sync {
    /// `d(C, D)/ds` at backward time `s` for transform argument `u`, option
    /// maturity `τ` and, for forwards, underlying maturity `τ_u`.
    fn rhs(
        &self,
        s: Time,
        state: [Complex64; 2],
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> [Complex64; 2];

    /// The integrator used by [`numerical_solution`](Self::numerical_solution).
    fn solver(&self) -> &AdaptiveRungeKutta;

    /// Closed-form `(C(τ), D(τ))`.
    ///
    /// Systems without one return [`Error::UnsupportedVariant`].
    fn analytical_solution(
        &self,
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> Result<(Complex64, Complex64)> {
        let _ = (u, tau, tau_u);
        Err(Error::UnsupportedVariant(
            "this ODE system has no analytical solution".into(),
        ))
    }

    /// `(C(τ), D(τ))` by integrating [`rhs`](Self::rhs) from `(0, 0)` over `[0, τ]`.
    fn numerical_solution(
        &self,
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> Result<(Complex64, Complex64)> {
        if tau < 0.0 {
            return Err(Error::DegenerateInput(format!(
                "negative time to expiry {tau}"
            )));
        }
        let f = |s: Time, z: &[Complex64]| -> Vec<Complex64> {
            self.rhs(s, [z[0], z[1]], u, tau, tau_u).to_vec()
        };
        let z = self
            .solver()
            .integrate_complex(&f, 0.0, &[Complex64::zero(); 2], tau)?;
        let (c, d) = (z[0], z[1]);
        if !(c.is_finite() && d.is_finite()) {
            warn!(%u, tau, "non-finite characteristic-function ODE state");
            return Err(Error::Numerical(format!(
                "ODE solution is not finite at u = {u}, τ = {tau}: C = {c}, D = {d}"
            )));
        }
        trace!(%u, tau, %c, %d, "numerical (C, D)");
        Ok((c, d))
    }

    /// Dispatch on `mode`.
    fn solve(
        &self,
        mode: OdeSolutionMode,
        u: Complex64,
        tau: Time,
        tau_u: Option<Time>,
    ) -> Result<(Complex64, Complex64)> {
        match mode {
            OdeSolutionMode::Analytical => self.analytical_solution(u, tau, tau_u),
            OdeSolutionMode::Numerical => self.numerical_solution(u, tau, tau_u),
        }
    }
}
