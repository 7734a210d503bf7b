//! # pf-instruments
//!
//! The contract side of a pricing request: option kind and payoff, the
//! underlying the option is written on, and the European option itself.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod option;
pub mod payoff;
pub mod underlying;

pub use option::{EuropeanOption, ExpiryTimes};
pub use payoff::{OptionKind, Payoff, PlainVanillaPayoff};
pub use underlying::Underlying;
