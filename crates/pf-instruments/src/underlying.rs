//! What an option is written on.

use pf_core::Timestamp;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The underlying of an option.
///
/// A forward carries its own delivery date, which must not precede the
/// option's expiry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Underlying {
    /// A spot-traded asset.
    Spot {
        /// Identifier of the asset.
        symbol: String,
    },
    /// A forward contract on an asset.
    Forward {
        /// Identifier of the asset.
        symbol: String,
        /// Delivery date of the forward.
        expiry: Timestamp,
    },
}

impl Underlying {
    /// A spot underlying.
    pub fn spot(symbol: impl Into<String>) -> Self {
        Underlying::Spot {
            symbol: symbol.into(),
        }
    }

    /// A forward underlying delivering at `expiry`.
    pub fn forward(symbol: impl Into<String>, expiry: Timestamp) -> Self {
        Underlying::Forward {
            symbol: symbol.into(),
            expiry,
        }
    }

    /// Identifier of the asset.
    pub fn symbol(&self) -> &str {
        match self {
            Underlying::Spot { symbol } | Underlying::Forward { symbol, .. } => symbol,
        }
    }

    /// Delivery date, for forwards.
    pub fn expiry(&self) -> Option<Timestamp> {
        match self {
            Underlying::Spot { .. } => None,
            Underlying::Forward { expiry, .. } => Some(*expiry),
        }
    }
}
