//! Log-forward process with stochastic volatility and a stochastic cost of
//! carry, in the style of Trolle and Schwartz.
//!
//! For a forward delivering at `T_u`, with remaining maturity `m = T_u − t`:
//!
//! ```text
//! d ln F = −½ v a(m) dt + √v (dW_S − α B(m) dW_δ)
//! dv     = κ(θ − v) dt + σ √v dW_v
//! B(m)   = (1 − e^{−γm}) / γ
//! a(m)   = 1 − 2 ρ_Sδ α B(m) + α² B(m)²
//! ```
//!
//! with `dW_S dW_δ = ρ_Sδ dt`, `dW_S dW_v = ρ_Sv dt`, `dW_v dW_δ = ρ_vδ dt`.
//! State vector: `x = [ln F, v]`, driven by three independent factors mapped
//! through a square root of the correlation matrix ordered `(S, δ, v)`.

use crate::stochastic_process::StochasticProcess;
use pf_core::{ensure, errors::Result, Real, Time};
use pf_math::{correlation_sqrt, Array, Matrix};

/// `α B(m)`, the loading of the log-forward on the cost-of-carry factor.
pub fn carry_loading(alpha: Real, gamma: Real, m: Time) -> Real {
    let b = if gamma.abs() < 1e-12 {
        m
    } else {
        -(-gamma * m).exp_m1() / gamma
    };
    alpha * b
}

/// `a = 1 − 2 ρ_Sδ αB + (αB)²`, the instantaneous log-forward variance per
/// unit of `v`.
pub fn forward_variance_loading(alpha_b: Real, rho_spot_carry: Real) -> Real {
    1.0 - 2.0 * rho_spot_carry * alpha_b + alpha_b * alpha_b
}

/// `b = ρ_Sv − ρ_vδ αB`, the log-forward/variance correlation loading.
pub fn forward_covariance_loading(alpha_b: Real, rho_spot_vol: Real, rho_vol_carry: Real) -> Real {
    rho_spot_vol - rho_vol_carry * alpha_b
}

/// The log-forward process on `[ln F, v]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrolleSchwartzProcess {
    log_f0: Real,
    v0: Real,
    kappa: Real,
    theta: Real,
    sigma: Real,
    alpha: Real,
    gamma: Real,
    maturity: Time,
    rho_spot_carry: Real,
    corr_sqrt: Matrix,
}

impl TrolleSchwartzProcess {
    /// Create a new process for a forward with `maturity` years left at `t = 0`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        f0: Real,
        v0: Real,
        kappa: Real,
        theta: Real,
        sigma: Real,
        alpha: Real,
        gamma: Real,
        maturity: Time,
        rho_spot_vol: Real,
        rho_spot_carry: Real,
        rho_vol_carry: Real,
    ) -> Result<Self> {
        ensure!(f0.is_finite() && f0 > 0.0, "forward must be positive, got {f0}");
        ensure!(v0 >= 0.0, "initial variance must be non-negative, got {v0}");
        ensure!(kappa >= 0.0, "mean reversion speed must be non-negative, got {kappa}");
        ensure!(theta >= 0.0, "long-run variance must be non-negative, got {theta}");
        ensure!(sigma >= 0.0, "vol-of-vol must be non-negative, got {sigma}");
        ensure!(gamma >= 0.0, "carry decay must be non-negative, got {gamma}");
        ensure!(maturity >= 0.0, "forward maturity must be non-negative, got {maturity}");

        let corr = Matrix::from_row_slice(
            3,
            3,
            &[
                1.0,
                rho_spot_carry,
                rho_spot_vol,
                rho_spot_carry,
                1.0,
                rho_vol_carry,
                rho_spot_vol,
                rho_vol_carry,
                1.0,
            ],
        );
        let corr_sqrt = correlation_sqrt(&corr)?;

        Ok(Self {
            log_f0: f0.ln(),
            v0,
            kappa,
            theta,
            sigma,
            alpha,
            gamma,
            maturity,
            rho_spot_carry,
            corr_sqrt,
        })
    }

    fn alpha_b(&self, t: Time) -> Real {
        carry_loading(self.alpha, self.gamma, (self.maturity - t).max(0.0))
    }
}

impl StochasticProcess for TrolleSchwartzProcess {
    fn size(&self) -> usize {
        2
    }

    fn factors(&self) -> usize {
        3
    }

    fn initial_values(&self) -> Array {
        Array::from_vec(vec![self.log_f0, self.v0])
    }

    fn drift(&self, t: Time, x: &Array) -> Array {
        let v = x[1].max(0.0);
        let a = forward_variance_loading(self.alpha_b(t), self.rho_spot_carry);
        Array::from_vec(vec![-0.5 * v * a, self.kappa * (self.theta - v)])
    }

    fn diffusion(&self, t: Time, x: &Array) -> Matrix {
        let vol = x[1].max(0.0).sqrt();
        let alpha_b = self.alpha_b(t);
        let l = &self.corr_sqrt;
        let mut m = Matrix::zeros(2, 3);
        for j in 0..3 {
            m[(0, j)] = vol * (l[(0, j)] - alpha_b * l[(1, j)]);
            m[(1, j)] = self.sigma * vol * l[(2, j)];
        }
        m
    }
}
