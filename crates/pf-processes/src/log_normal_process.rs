//! Log of a geometric Brownian motion.
//!
//! ```text
//! d ln S = (μ − ½σ²) dt + σ dW
//! ```
//!
//! With `μ = r` this is the Black-Scholes spot; with `μ = 0` it is the
//! driftless Black-76 forward.

use crate::stochastic_process::StochasticProcess1D;
use pf_core::{ensure, errors::Result, Rate, Real, Time, Volatility};

/// Log-normal process on the log-level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalProcess {
    log_level: Real,
    drift: Rate,
    volatility: Volatility,
}

impl LogNormalProcess {
    /// A process for a level starting at `level > 0`, growing at `drift`
    /// with lognormal volatility `volatility >= 0`.
    pub fn new(level: Real, drift: Rate, volatility: Volatility) -> Result<Self> {
        ensure!(
            level.is_finite() && level > 0.0,
            "initial level must be positive, got {level}"
        );
        ensure!(
            volatility.is_finite() && volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        Ok(Self {
            log_level: level.ln(),
            drift,
            volatility,
        })
    }

    /// Volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }
}

impl StochasticProcess1D for LogNormalProcess {
    fn x0(&self) -> Real {
        self.log_level
    }

    fn drift_1d(&self, _t: Time, _x: Real) -> Real {
        self.drift - 0.5 * self.volatility * self.volatility
    }

    fn diffusion_1d(&self, _t: Time, _x: Real) -> Real {
        self.volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StochasticProcess;
    use approx::assert_abs_diff_eq;
    use pf_math::Array;

    #[test]
    fn state_is_log_level() {
        let p = LogNormalProcess::new(100.0, 0.05, 0.2).unwrap();
        assert_abs_diff_eq!(p.initial_values()[0], 100.0_f64.ln(), epsilon = 1e-15);
        assert_abs_diff_eq!(p.drift_1d(0.0, 0.0), 0.05 - 0.02, epsilon = 1e-15);
    }

    #[test]
    fn zero_noise_step_grows_at_drift() {
        let p = LogNormalProcess::new(1.0, 0.0, 0.3).unwrap();
        let x = p.evolve(0.0, &p.initial_values(), 1.0, &Array::zeros(1));
        assert_abs_diff_eq!(x[0], -0.045, epsilon = 1e-15);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(LogNormalProcess::new(0.0, 0.0, 0.2).is_err());
        assert!(LogNormalProcess::new(1.0, 0.0, -0.2).is_err());
    }
}
