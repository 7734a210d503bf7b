//! Process traits consumed by the Euler path generator.
//!
//! A process `dX = μ(t, X) dt + Σ(t, X) dW` is given by its starting state,
//! its drift vector `μ` and its `size × factors` diffusion matrix `Σ`, where
//! `factors` counts the independent Brownian drivers. Scalar processes
//! implement the lighter [`StochasticProcess1D`] and get the vector form for
//! free.

use pf_core::{Real, Time};
use pf_math::{Array, Matrix};

/// A vector-valued diffusion.
pub trait StochasticProcess: std::fmt::Debug + Send + Sync {
    /// Dimension of the state.
    fn size(&self) -> usize;

    /// Independent Brownian drivers; defaults to one per state component.
    fn factors(&self) -> usize {
        self.size()
    }

    /// State at `t = 0`.
    fn initial_values(&self) -> Array;

    /// `μ(t, x)`.
    fn drift(&self, t: Time, x: &Array) -> Array;

    /// `Σ(t, x)`, a `size() × factors()` matrix.
    fn diffusion(&self, t: Time, x: &Array) -> Matrix;

    /// One Euler-Maruyama step of length `dt` driven by `dw`, a vector of
    /// `factors()` standard-normal draws.
    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Array {
        let shock = self.diffusion(t, x) * dw;
        x + self.drift(t, x) * dt + shock * dt.sqrt()
    }
}

/// A scalar diffusion `dX = μ(t, X) dt + σ(t, X) dW`.
pub trait StochasticProcess1D: std::fmt::Debug + Send + Sync {
    /// State at `t = 0`.
    fn x0(&self) -> Real;

    /// `μ(t, x)`.
    fn drift_1d(&self, t: Time, x: Real) -> Real;

    /// `σ(t, x)`.
    fn diffusion_1d(&self, t: Time, x: Real) -> Real;

    /// Scalar Euler step.
    fn evolve_1d(&self, t: Time, x: Real, dt: Time, dw: Real) -> Real {
        let shock = self.diffusion_1d(t, x) * dw;
        x + self.drift_1d(t, x) * dt + shock * dt.sqrt()
    }
}

impl<P: StochasticProcess1D> StochasticProcess for P {
    fn size(&self) -> usize {
        1
    }

    fn initial_values(&self) -> Array {
        Array::from_element(1, self.x0())
    }

    fn drift(&self, t: Time, x: &Array) -> Array {
        Array::from_element(1, self.drift_1d(t, x[0]))
    }

    fn diffusion(&self, t: Time, x: &Array) -> Matrix {
        Matrix::from_element(1, 1, self.diffusion_1d(t, x[0]))
    }

    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Array {
        Array::from_element(1, self.evolve_1d(t, x[0], dt, dw[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Debug)]
    struct Drifting {
        start: Real,
        mu: Real,
        sigma: Real,
    }

    impl StochasticProcess1D for Drifting {
        fn x0(&self) -> Real {
            self.start
        }

        fn drift_1d(&self, _t: Time, _x: Real) -> Real {
            self.mu
        }

        fn diffusion_1d(&self, _t: Time, _x: Real) -> Real {
            self.sigma
        }
    }

    /// Independent components with diagonal diffusion
    #[derive(Debug)]
    struct Diagonal;

    impl StochasticProcess for Diagonal {
        fn size(&self) -> usize {
            2
        }

        fn initial_values(&self) -> Array {
            Array::from_vec(vec![1.0, 2.0])
        }

        fn drift(&self, _t: Time, _x: &Array) -> Array {
            Array::from_vec(vec![0.1, -0.1])
        }

        fn diffusion(&self, _t: Time, _x: &Array) -> Matrix {
            Matrix::from_row_slice(2, 2, &[0.2, 0.0, 0.0, 0.4])
        }
    }

    #[test]
    fn scalar_process_as_vector() {
        let p = Drifting { start: 4.6, mu: 0.05, sigma: 0.20 };
        assert_eq!((p.size(), p.factors()), (1, 1));
        assert_eq!(p.initial_values()[0], 4.6);
        assert_eq!(p.diffusion(0.0, &p.initial_values())[(0, 0)], 0.20);
    }

    #[test]
    fn scalar_euler_step() {
        let p = Drifting { start: 0.0, mu: 0.05, sigma: 0.20 };
        let up = p.evolve(0.0, &p.initial_values(), 0.25, &Array::from_element(1, 1.0));
        let down = p.evolve(0.0, &p.initial_values(), 0.25, &Array::from_element(1, -1.0));
        assert_abs_diff_eq!(up[0], 0.0125 + 0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(up[0] + down[0], 2.0 * 0.0125, epsilon = 1e-15);
    }

    #[test]
    fn vector_euler_step() {
        let p = Diagonal;
        assert_eq!(p.factors(), 2);
        let dw = Array::from_vec(vec![1.0, -1.0]);
        let x = p.evolve(0.0, &p.initial_values(), 0.04, &dw);
        assert_abs_diff_eq!(x[0], 1.0 + 0.1 * 0.04 + 0.2 * 0.2, epsilon = 1e-15);
        assert_abs_diff_eq!(x[1], 2.0 - 0.1 * 0.04 - 0.4 * 0.2, epsilon = 1e-15);
    }
}
