//! # pf-models
//!
//! Pricing models and the characteristic-function layer.
//!
//! ## Trait hierarchy
//!
//! ```text
//! PricingModel                 characteristic function, discount bond, initial level
//! ├── SimulatableModel         stochastic process for Monte Carlo
//! └── ClosedFormModel          algebraic price
//!
//! CharacteristicFunctionOdes   Riccati system for (C, D), analytical or numerical
//! ```
//!
//! | model                 | cf | closed form | simulatable | ODE paths            |
//! |-----------------------|----|-------------|-------------|----------------------|
//! | [`HestonModel`]       | ✓  |             | ✓           | analytical, numerical |
//! | [`TrolleSchwartzModel`] | ✓ |            | ✓           | numerical            |
//! | [`BlackScholesModel`] | ✓  | ✓           | ✓           |                      |
//! | [`Black76Model`]      | ✓  | ✓           | ✓           |                      |

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Infrastructure ───────────────────────────────────────────────────────
pub mod model;
pub mod ode;
pub mod parameters;

// ── Stochastic volatility models ─────────────────────────────────────────
pub mod heston;
pub mod trolle_schwartz;

// ── Log-normal models ────────────────────────────────────────────────────
pub mod black_76;
pub mod black_scholes;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use black_76::{Black76Model, Black76Parameters};
pub use black_scholes::{BlackScholesModel, BlackScholesParameters};
pub use heston::{HestonModel, HestonOdes, HestonParameters};
pub use model::{ClosedFormModel, PricingModel, SimulatableModel};
pub use ode::{CharacteristicFunctionOdes, OdeSolutionMode};
pub use parameters::{
    CorrelationParameters, CostOfCarryParameters, ForwardParameters, RateParameters,
    SpotParameters, VolatilityParameters,
};
pub use trolle_schwartz::{TrolleSchwartzModel, TrolleSchwartzOdes, TrolleSchwartzParameters};
