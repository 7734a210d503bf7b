//! Option kind and terminal payoffs.

use pf_core::{errors::Error, Real};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Option kind (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionKind {
    /// The right to buy at the strike.
    Call,
    /// The right to sell at the strike.
    Put,
}

impl OptionKind {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionKind::Call => 1.0,
            OptionKind::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Call => write!(f, "Call"),
            OptionKind::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionKind {
    type Err = Error;

    /// Parses `"call"` / `"put"` in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionKind::Call),
            "put" | "p" => Ok(OptionKind::Put),
            other => Err(Error::UnsupportedVariant(format!("option kind '{other}'"))),
        }
    }
}

/// A function of the terminal underlying level.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Payoff when the underlying finishes at `level`.
    fn value(&self, level: Real) -> Real;
}

/// `max(φ(S − K), 0)` where `φ = +1` for calls and `−1` for puts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlainVanillaPayoff {
    /// Option kind.
    pub kind: OptionKind,
    /// Strike.
    pub strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(kind: OptionKind, strike: Real) -> Self {
        Self { kind, strike }
    }
}

impl Payoff for PlainVanillaPayoff {
    fn value(&self, level: Real) -> Real {
        (self.kind.sign() * (level - self.strike)).max(0.0)
    }
}
