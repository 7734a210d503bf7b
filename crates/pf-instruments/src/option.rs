//! European options.

use crate::payoff::{OptionKind, Payoff, PlainVanillaPayoff};
use crate::underlying::Underlying;
use pf_core::{
    ensure,
    errors::{Error, Result},
    year_fraction, Real, Time, Timestamp,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Times to expiry of an option and, for forwards, of its underlying, in
/// years from a valuation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpiryTimes {
    /// Time to the option's expiry, `τ >= 0`.
    pub option: Time,
    /// Time to the underlying forward's delivery, `τ_u >= τ`.
    pub underlying: Option<Time>,
}

/// A European option, exercisable only at expiry.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EuropeanOption {
    strike: Real,
    expiry: Timestamp,
    kind: OptionKind,
    underlying: Underlying,
}

impl EuropeanOption {
    /// Create a new option. The strike must be positive and finite.
    pub fn new(
        kind: OptionKind,
        strike: Real,
        expiry: Timestamp,
        underlying: Underlying,
    ) -> Result<Self> {
        ensure!(
            strike.is_finite() && strike > 0.0,
            "strike must be positive, got {strike}"
        );
        Ok(Self {
            strike,
            expiry,
            kind,
            underlying,
        })
    }

    /// Convenience: a call.
    pub fn call(strike: Real, expiry: Timestamp, underlying: Underlying) -> Result<Self> {
        Self::new(OptionKind::Call, strike, expiry, underlying)
    }

    /// Convenience: a put.
    pub fn put(strike: Real, expiry: Timestamp, underlying: Underlying) -> Result<Self> {
        Self::new(OptionKind::Put, strike, expiry, underlying)
    }

    /// The strike.
    pub fn strike(&self) -> Real {
        self.strike
    }

    /// The expiry.
    pub fn expiry(&self) -> Timestamp {
        self.expiry
    }

    /// Call or put.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The underlying.
    pub fn underlying(&self) -> &Underlying {
        &self.underlying
    }

    /// The plain vanilla payoff of this option.
    pub fn vanilla_payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.kind, self.strike)
    }

    /// Payoff if the underlying finishes at `level`.
    pub fn payoff(&self, level: Real) -> Real {
        self.vanilla_payoff().value(level)
    }

    /// Year fractions from `valuation_time` to the option's and the
    /// underlying's expiries.
    ///
    /// Fails with [`Error::DegenerateInput`] when the option has already
    /// expired or a forward underlying delivers before the option expires.
    pub fn expiry_times(&self, valuation_time: Timestamp) -> Result<ExpiryTimes> {
        let option = year_fraction(valuation_time, self.expiry);
        if option < 0.0 {
            return Err(Error::DegenerateInput(format!(
                "option expired {} years before valuation time {valuation_time}",
                -option
            )));
        }
        let underlying = match self.underlying.expiry() {
            None => None,
            Some(delivery) => {
                let tau_u = year_fraction(valuation_time, delivery);
                if tau_u < option {
                    return Err(Error::DegenerateInput(format!(
                        "forward '{}' delivers at {delivery}, before the option expiry {}",
                        self.underlying.symbol(),
                        self.expiry
                    )));
                }
                Some(tau_u)
            }
        };
        Ok(ExpiryTimes { option, underlying })
    }
}
