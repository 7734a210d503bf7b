//! Heston stochastic volatility process on the log-spot.
//!
//! ```text
//! d ln S = (r − ½v) dt + √v dW₁
//! dv     = κ(θ − v) dt + σ √v dW₂
//! dW₁ dW₂ = ρ dt
//! ```
//!
//! State vector: `x = [ln S, v]`. Euler steps use full truncation: the
//! variance state may go negative between steps, but drift and diffusion
//! only ever see `v⁺ = max(v, 0)`.

use crate::stochastic_process::StochasticProcess;
use pf_core::{ensure, errors::Result, Rate, Real, Time};
use pf_math::{Array, Matrix};

/// The Heston process on `[ln S, v]`.
///
/// * `v0`    : initial variance
/// * `kappa` : mean-reversion speed of variance
/// * `theta` : long-run variance level
/// * `sigma` : vol-of-vol
/// * `rho`   : correlation between the two Brownian motions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HestonLogProcess {
    log_s0: Real,
    v0: Real,
    rate: Rate,
    kappa: Real,
    theta: Real,
    sigma: Real,
    rho: Real,
}

impl HestonLogProcess {
    /// Create a new Heston process.
    pub fn new(
        s0: Real,
        v0: Real,
        rate: Rate,
        kappa: Real,
        theta: Real,
        sigma: Real,
        rho: Real,
    ) -> Result<Self> {
        ensure!(s0.is_finite() && s0 > 0.0, "spot must be positive, got {s0}");
        ensure!(v0 >= 0.0, "initial variance must be non-negative, got {v0}");
        ensure!(kappa >= 0.0, "mean reversion speed must be non-negative, got {kappa}");
        ensure!(theta >= 0.0, "long-run variance must be non-negative, got {theta}");
        ensure!(sigma >= 0.0, "vol-of-vol must be non-negative, got {sigma}");
        ensure!(
            (-1.0..=1.0).contains(&rho),
            "correlation ρ must be in [-1, 1], got {rho}"
        );
        Ok(Self {
            log_s0: s0.ln(),
            v0,
            rate,
            kappa,
            theta,
            sigma,
            rho,
        })
    }
}

impl StochasticProcess for HestonLogProcess {
    fn size(&self) -> usize {
        2
    }

    fn initial_values(&self) -> Array {
        Array::from_vec(vec![self.log_s0, self.v0])
    }

    fn drift(&self, _t: Time, x: &Array) -> Array {
        let v = x[1].max(0.0);
        Array::from_vec(vec![
            self.rate - 0.5 * v,
            self.kappa * (self.theta - v),
        ])
    }

    fn diffusion(&self, _t: Time, x: &Array) -> Matrix {
        let vol = x[1].max(0.0).sqrt();
        let rho_bar = (1.0 - self.rho * self.rho).max(0.0).sqrt();
        Matrix::from_row_slice(
            2,
            2,
            &[
                vol,
                0.0,
                self.sigma * vol * self.rho,
                self.sigma * vol * rho_bar,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn process(rho: Real) -> HestonLogProcess {
        HestonLogProcess::new(100.0, 0.04, 0.02, 1.5, 0.09, 0.3, rho).unwrap()
    }

    #[test]
    fn initial_state() {
        let x = process(-0.5).initial_values();
        assert_abs_diff_eq!(x[0], 100.0_f64.ln(), epsilon = 1e-15);
        assert_eq!(x[1], 0.04);
    }

    #[test]
    fn diffusion_reproduces_covariance() {
        let p = process(-0.7);
        let x = p.initial_values();
        let s = p.diffusion(0.0, &x);
        let cov = &s * s.transpose();
        assert_abs_diff_eq!(cov[(0, 0)], 0.04, epsilon = 1e-14);
        assert_abs_diff_eq!(cov[(1, 1)], 0.09 * 0.04, epsilon = 1e-14);
        assert_abs_diff_eq!(cov[(0, 1)], -0.7 * 0.3 * 0.04, epsilon = 1e-14);
    }

    #[test]
    fn full_truncation_floors_variance() {
        let p = process(0.0);
        let x = Array::from_vec(vec![0.0, -0.01]);
        let mu = p.drift(0.0, &x);
        assert_abs_diff_eq!(mu[0], 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(mu[1], 1.5 * 0.09, epsilon = 1e-15);
        assert_eq!(p.diffusion(0.0, &x), Matrix::zeros(2, 2));
    }

    #[test]
    fn rejects_bad_correlation() {
        assert!(HestonLogProcess::new(100.0, 0.04, 0.0, 1.0, 0.04, 0.3, 1.2).is_err());
    }
}
