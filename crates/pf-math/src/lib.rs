//! # pf-math
//!
//! Numerical building blocks for the pricing engines: an adaptive
//! Dormand-Prince ODE solver over real or complex state, fixed-node
//! quadrature rules, the normal distribution, a Mersenne-Twister normal
//! generator, incremental statistics, and `nalgebra` array/matrix aliases.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Fixed-node quadrature rules.
pub mod integrals;

/// Dense vectors, matrices and their square roots.
pub mod matrix;

/// Ordinary differential equation solvers.
pub mod ode;

/// Random number generators.
pub mod random_numbers;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use integrals::{QuadratureRule, SimpsonRule};
pub use matrix::{correlation_sqrt, Array, Matrix};
pub use ode::{AdaptiveRungeKutta, OdeFunction, OdeSolverParameters};
pub use random_numbers::{InverseCumulativeNormalRng, MersenneTwisterUniformRng};
pub use statistics::IncrementalStatistics;

/// Complex number type used for characteristic functions and ODE state.
pub use num_complex::Complex64;
