//! ODE solvers.
//!
//! Provides an adaptive Runge-Kutta 4th/5th order solver (Dormand-Prince)
//! for ordinary differential equations. Complex-valued systems are solved by
//! concatenating the real and imaginary parts of the state into one real
//! vector and integrating that.

use num_complex::Complex64;
use pf_core::{
    errors::{Error, Result},
    Real,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// A function `f(t, y) → dy/dt` for an ODE system.
pub trait OdeFunction {
    /// Evaluate the right-hand side of `dy/dt = f(t, y)`.
    fn eval(&self, t: Real, y: &[Real]) -> Vec<Real>;
}

impl<F> OdeFunction for F
where
    F: Fn(Real, &[Real]) -> Vec<Real>,
{
    fn eval(&self, t: Real, y: &[Real]) -> Vec<Real> {
        (self)(t, y)
    }
}

/// Tolerances and step budget of an [`AdaptiveRungeKutta`] solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OdeSolverParameters {
    /// Absolute tolerance (default `1e-10`).
    pub abs_tol: Real,
    /// Relative tolerance (default `1e-10`).
    pub rel_tol: Real,
    /// Maximum number of attempted steps, accepted and rejected
    /// (default `100_000`).
    pub max_steps: usize,
}

impl Default for OdeSolverParameters {
    fn default() -> Self {
        Self {
            abs_tol: 1e-10,
            rel_tol: 1e-10,
            max_steps: 100_000,
        }
    }
}

impl OdeSolverParameters {
    /// Check that tolerances are positive and the step budget non-zero.
    pub fn validate(&self) -> Result<()> {
        if !(self.abs_tol.is_finite() && self.abs_tol > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "ODE absolute tolerance must be positive, got {}",
                self.abs_tol
            )));
        }
        if !(self.rel_tol.is_finite() && self.rel_tol >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "ODE relative tolerance must be non-negative, got {}",
                self.rel_tol
            )));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfiguration(
                "ODE step budget must be at least one step".into(),
            ));
        }
        Ok(())
    }
}

/// Adaptive Runge-Kutta 4(5) ODE solver (Dormand-Prince method).
///
/// Integrates `dy/dt = f(t, y)` from `t0` to `t1` with automatic step-size
/// control to satisfy the specified tolerance. Running out of the step
/// budget, or step sizes collapsing below round-off, is reported as
/// [`Error::Numerical`] instead of returning a partially integrated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveRungeKutta {
    /// Absolute tolerance.
    pub abs_tol: Real,
    /// Relative tolerance.
    pub rel_tol: Real,
    /// Maximum allowed step size.
    pub max_step: Real,
    /// Maximum number of attempted steps.
    pub max_steps: usize,
}

impl AdaptiveRungeKutta {
    /// Create a new adaptive Runge-Kutta solver.
    pub fn new(abs_tol: Real, rel_tol: Real) -> Self {
        Self {
            abs_tol,
            rel_tol,
            max_step: f64::MAX,
            max_steps: OdeSolverParameters::default().max_steps,
        }
    }

    /// Create a solver from validated parameters.
    pub fn from_parameters(params: &OdeSolverParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(params.abs_tol, params.rel_tol).with_max_steps(params.max_steps))
    }

    /// Set the maximum step size.
    pub fn with_max_step(mut self, max_step: Real) -> Self {
        self.max_step = max_step;
        self
    }

    /// Set the step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// The tolerances and step budget of this solver.
    pub fn parameters(&self) -> OdeSolverParameters {
        OdeSolverParameters {
            abs_tol: self.abs_tol,
            rel_tol: self.rel_tol,
            max_steps: self.max_steps,
        }
    }

    /// Integrate `dy/dt = f(t, y)` from `t0` to `t1`, returning the final state `y(t1)`.
    pub fn integrate<F: OdeFunction>(
        &self,
        f: &F,
        t0: Real,
        y0: &[Real],
        t1: Real,
    ) -> Result<Vec<Real>> {
        if t0 == t1 {
            return Ok(y0.to_vec());
        }

        let n = y0.len();
        let span = (t1 - t0).abs();
        let direction = if t1 >= t0 { 1.0 } else { -1.0 };
        let min_step = 1e-15 * span.max(1.0);

        let mut t = t0;
        let mut y = y0.to_vec();
        let mut h = (span * 0.01).min(self.max_step) * direction;
        let (mut accepted, mut rejected) = (0usize, 0usize);

        for _ in 0..self.max_steps {
            if direction * (t - t1) >= 0.0 {
                break;
            }

            // Don't overshoot
            if direction * (t + h - t1) > 0.0 {
                h = t1 - t;
            }

            let (y_new, err) = dormand_prince_step(f, t, &y, h);

            let mut err_norm = 0.0;
            for i in 0..n {
                let scale = self.abs_tol + self.rel_tol * y[i].abs().max(y_new[i].abs());
                err_norm += (err[i] / scale) * (err[i] / scale);
            }
            err_norm = (err_norm / n.max(1) as Real).sqrt();

            if err_norm.is_finite() && err_norm <= 1.0 {
                t += h;
                y = y_new;
                accepted += 1;

                let growth = if err_norm > 1e-15 {
                    (0.9 * err_norm.powf(-0.2)).min(5.0)
                } else {
                    5.0
                };
                h = (h.abs() * growth).min(self.max_step) * direction;
            } else {
                rejected += 1;
                if h.abs() <= min_step {
                    warn!(t, t1, err_norm, "ODE step size collapsed");
                    return Err(Error::Numerical(format!(
                        "adaptive Runge-Kutta step size underflow at t = {t} (error norm {err_norm})"
                    )));
                }
                let shrink = if err_norm.is_finite() {
                    (0.9 * err_norm.powf(-0.25)).max(0.1)
                } else {
                    0.1
                };
                h = (h.abs() * shrink).max(min_step) * direction;
            }
        }

        if direction * (t - t1) < 0.0 {
            warn!(t, t1, accepted, rejected, "ODE step budget exhausted");
            return Err(Error::Numerical(format!(
                "adaptive Runge-Kutta exhausted {} steps at t = {t} before reaching t = {t1}",
                self.max_steps
            )));
        }

        trace!(accepted, rejected, t0, t1, "ODE integration finished");
        Ok(y)
    }

    /// Integrate a complex system `dz/dt = f(t, z)` from `t0` to `t1`.
    ///
    /// The state is packed as `[Re z₀, …, Re zₙ, Im z₀, …, Im zₙ]` and handed
    /// to [`integrate`](Self::integrate); tolerances therefore apply to real
    /// and imaginary parts separately.
    pub fn integrate_complex<F>(
        &self,
        f: &F,
        t0: Real,
        z0: &[Complex64],
        t1: Real,
    ) -> Result<Vec<Complex64>>
    where
        F: Fn(Real, &[Complex64]) -> Vec<Complex64>,
    {
        let real_rhs = |t: Real, y: &[Real]| -> Vec<Real> { pack_complex(&f(t, &unpack_complex(y))) };
        let y1 = self.integrate(&real_rhs, t0, &pack_complex(z0), t1)?;
        Ok(unpack_complex(&y1))
    }
}

impl Default for AdaptiveRungeKutta {
    fn default() -> Self {
        let params = OdeSolverParameters::default();
        Self::new(params.abs_tol, params.rel_tol)
    }
}

/// Concatenate real parts then imaginary parts of `z` into one real vector.
pub fn pack_complex(z: &[Complex64]) -> Vec<Real> {
    z.iter().map(|c| c.re).chain(z.iter().map(|c| c.im)).collect()
}

/// Inverse of [`pack_complex`].
pub fn unpack_complex(y: &[Real]) -> Vec<Complex64> {
    let n = y.len() / 2;
    (0..n).map(|i| Complex64::new(y[i], y[n + i])).collect()
}

/// `y + h · Σ cⱼ kⱼ`, element-wise.
fn combine(y: &[Real], h: Real, terms: &[(Real, &[Real])]) -> Vec<Real> {
    y.iter()
        .enumerate()
        .map(|(i, yi)| yi + h * terms.iter().map(|(c, k)| c * k[i]).sum::<Real>())
        .collect()
}

/// Single Dormand-Prince step. Returns `(y_new, error_estimate)`.
fn dormand_prince_step<F: OdeFunction>(
    f: &F,
    t: Real,
    y: &[Real],
    h: Real,
) -> (Vec<Real>, Vec<Real>) {
    let k1 = f.eval(t, y);
    let k2 = f.eval(t + h / 5.0, &combine(y, h, &[(1.0 / 5.0, &k1)]));
    let k3 = f.eval(
        t + 3.0 / 10.0 * h,
        &combine(y, h, &[(3.0 / 40.0, &k1), (9.0 / 40.0, &k2)]),
    );
    let k4 = f.eval(
        t + 4.0 / 5.0 * h,
        &combine(
            y,
            h,
            &[(44.0 / 45.0, &k1), (-56.0 / 15.0, &k2), (32.0 / 9.0, &k3)],
        ),
    );
    let k5 = f.eval(
        t + 8.0 / 9.0 * h,
        &combine(
            y,
            h,
            &[
                (19372.0 / 6561.0, &k1),
                (-25360.0 / 2187.0, &k2),
                (64448.0 / 6561.0, &k3),
                (-212.0 / 729.0, &k4),
            ],
        ),
    );
    let k6 = f.eval(
        t + h,
        &combine(
            y,
            h,
            &[
                (9017.0 / 3168.0, &k1),
                (-355.0 / 33.0, &k2),
                (46732.0 / 5247.0, &k3),
                (49.0 / 176.0, &k4),
                (-5103.0 / 18656.0, &k5),
            ],
        ),
    );

    // 5th order solution, used to advance
    let y_new = combine(
        y,
        h,
        &[
            (35.0 / 384.0, &k1),
            (500.0 / 1113.0, &k3),
            (125.0 / 192.0, &k4),
            (-2187.0 / 6784.0, &k5),
            (11.0 / 84.0, &k6),
        ],
    );

    // FSAL stage at the new point
    let k7 = f.eval(t + h, &y_new);

    let zeros = vec![0.0; y.len()];
    let err = combine(
        &zeros,
        h,
        &[
            (71.0 / 57600.0, &k1),
            (-71.0 / 16695.0, &k3),
            (71.0 / 1920.0, &k4),
            (-17253.0 / 339200.0, &k5),
            (22.0 / 525.0, &k6),
            (-1.0 / 40.0, &k7),
        ],
    );

    (y_new, err)
}
