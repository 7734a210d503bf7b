//! # pf-methods
//!
//! Numerical methods over stochastic processes. Currently the Monte Carlo
//! simulation framework: Euler-Maruyama path stepping, antithetic variates
//! and deterministic parallel chunking.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod monte_carlo;

pub use monte_carlo::{
    simulate_terminal, EulerPathGenerator, MonteCarloParameters, SimulationSummary, CHUNK_SIZE,
};
