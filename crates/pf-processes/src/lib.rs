//! # pf-processes
//!
//! Stochastic processes in the form the Monte Carlo simulator consumes:
//! initial state, drift vector, diffusion matrix and an Euler step.
//!
//! Every process here evolves the *logarithm* of the underlying level in its
//! first state component; the simulator exponentiates it at expiry.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod heston_process;
pub mod log_normal_process;
pub mod stochastic_process;
pub mod trolle_schwartz_process;

pub use heston_process::HestonLogProcess;
pub use log_normal_process::LogNormalProcess;
pub use stochastic_process::{StochasticProcess, StochasticProcess1D};
pub use trolle_schwartz_process::{
    carry_loading, forward_covariance_loading, forward_variance_loading, TrolleSchwartzProcess,
};
