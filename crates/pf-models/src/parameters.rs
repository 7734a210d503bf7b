//! Model parameter structs.
//!
//! Plain immutable values, one struct per economic concern, composed into
//! the per-model parameter sets. Each has a `validate()` that the model
//! constructors call; invalid values are [`Error::Precondition`]s.
//!
//! Volatility levels are quoted as volatilities, not variances: a variance
//! process described by [`VolatilityParameters`] starts at `value²` and
//! reverts to `long_term_mean²`.
//!
//! [`Error::Precondition`]: pf_core::Error::Precondition

use pf_core::{ensure, errors::Result, Rate, Real, Volatility};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn check_correlation(name: &str, rho: Real) -> Result<()> {
    ensure!(
        (-1.0..=1.0).contains(&rho),
        "{name} correlation must be in [-1, 1], got {rho}"
    );
    Ok(())
}

fn check_non_negative(name: &str, x: Real) -> Result<()> {
    ensure!(x.is_finite() && x >= 0.0, "{name} must be non-negative, got {x}");
    Ok(())
}

/// Spot level and its lognormal volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpotParameters {
    /// Spot level `S₀ > 0`.
    pub value: Real,
    /// Lognormal volatility (unused by stochastic volatility models).
    pub volatility: Volatility,
}

impl SpotParameters {
    /// Spot with a lognormal volatility.
    pub fn new(value: Real, volatility: Volatility) -> Self {
        Self { value, volatility }
    }

    /// Check `value > 0` and `volatility >= 0`.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.value.is_finite() && self.value > 0.0,
            "spot must be positive, got {}",
            self.value
        );
        check_non_negative("spot volatility", self.volatility)
    }
}

/// Forward level and its lognormal volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForwardParameters {
    /// Forward level `F₀ > 0`.
    pub value: Real,
    /// Lognormal volatility (unused by stochastic volatility models).
    pub volatility: Volatility,
}

impl ForwardParameters {
    /// Forward with a lognormal volatility.
    pub fn new(value: Real, volatility: Volatility) -> Self {
        Self { value, volatility }
    }

    /// Check `value > 0` and `volatility >= 0`.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.value.is_finite() && self.value > 0.0,
            "forward must be positive, got {}",
            self.value
        );
        check_non_negative("forward volatility", self.volatility)
    }
}

/// Flat continuously compounded interest rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RateParameters {
    /// The rate. May be negative.
    pub value: Rate,
}

impl RateParameters {
    /// A flat rate.
    pub fn new(value: Rate) -> Self {
        Self { value }
    }

    /// Check the rate is finite.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.value.is_finite(), "rate must be finite, got {}", self.value);
        Ok(())
    }

    /// `exp(−r τ)`.
    pub fn discount(&self, tau: Real) -> Real {
        (-self.value * tau).exp()
    }
}

/// Mean-reverting square-root variance process.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolatilityParameters {
    /// Initial volatility level; the variance starts at `value²`.
    pub value: Volatility,
    /// Mean-reversion rate κ.
    pub mean_reversion_rate: Real,
    /// Long-run volatility level; the variance reverts to `long_term_mean²`.
    pub long_term_mean: Volatility,
    /// Vol-of-vol σ.
    pub volatility: Real,
}

impl VolatilityParameters {
    /// Variance process parameters.
    pub fn new(
        value: Volatility,
        mean_reversion_rate: Real,
        long_term_mean: Volatility,
        volatility: Real,
    ) -> Self {
        Self {
            value,
            mean_reversion_rate,
            long_term_mean,
            volatility,
        }
    }

    /// Check every field is non-negative.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("initial volatility", self.value)?;
        check_non_negative("mean reversion rate", self.mean_reversion_rate)?;
        check_non_negative("long-term volatility", self.long_term_mean)?;
        check_non_negative("vol-of-vol", self.volatility)
    }

    /// `v₀ = value²`.
    pub fn initial_variance(&self) -> Real {
        self.value * self.value
    }

    /// `θ = long_term_mean²`.
    pub fn long_term_variance(&self) -> Real {
        self.long_term_mean * self.long_term_mean
    }
}

/// Instantaneous correlations between the spot (or forward), its variance,
/// and the cost of carry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CorrelationParameters {
    /// Spot / variance.
    pub spot_vol: Real,
    /// Spot / cost of carry.
    pub spot_cost_of_carry: Real,
    /// Variance / cost of carry.
    pub vol_cost_of_carry: Real,
}

impl CorrelationParameters {
    /// Only a spot-vol correlation; the others are zero.
    pub fn spot_vol(rho: Real) -> Self {
        Self {
            spot_vol: rho,
            ..Self::default()
        }
    }

    /// Check each correlation is in `[-1, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_correlation("spot-vol", self.spot_vol)?;
        check_correlation("spot-cost-of-carry", self.spot_cost_of_carry)?;
        check_correlation("vol-cost-of-carry", self.vol_cost_of_carry)
    }
}

/// Cost-of-carry factor loading `α (1 − e^{−γm}) / γ` on remaining maturity `m`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostOfCarryParameters {
    /// Scale α.
    pub alpha: Real,
    /// Decay γ `>= 0`.
    pub gamma: Real,
}

impl CostOfCarryParameters {
    /// Cost-of-carry loading parameters.
    pub fn new(alpha: Real, gamma: Real) -> Self {
        Self { alpha, gamma }
    }

    /// Check α is finite and γ non-negative.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.alpha.is_finite(), "cost-of-carry α must be finite, got {}", self.alpha);
        check_non_negative("cost-of-carry γ", self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Error;

    #[test]
    fn variance_levels_are_squares() {
        let vol = VolatilityParameters::new(0.2, 1.5, 0.3, 0.4);
        assert!((vol.initial_variance() - 0.04).abs() < 1e-15);
        assert!((vol.long_term_variance() - 0.09).abs() < 1e-15);
    }

    #[test]
    fn correlations_out_of_range() {
        let corr = CorrelationParameters {
            vol_cost_of_carry: -1.01,
            ..Default::default()
        };
        assert!(matches!(corr.validate(), Err(Error::Precondition(_))));
        assert!(CorrelationParameters::spot_vol(1.0).validate().is_ok());
    }

    #[test]
    fn levels_must_be_positive() {
        assert!(SpotParameters::new(0.0, 0.2).validate().is_err());
        assert!(ForwardParameters::new(-1.0, 0.2).validate().is_err());
        assert!(SpotParameters::new(100.0, -0.1).validate().is_err());
        assert!(VolatilityParameters::new(0.2, -1.0, 0.2, 0.3).validate().is_err());
        assert!(RateParameters::new(f64::NAN).validate().is_err());
        assert!(CostOfCarryParameters::new(0.1, -0.5).validate().is_err());
    }

    #[test]
    fn discount_factor() {
        let r = RateParameters::new(0.05);
        assert!((r.discount(2.0) - (-0.1_f64).exp()).abs() < 1e-15);
    }
}
