//! Closed-form pricing engine.

use crate::{horizon, Horizon};
use pf_core::{errors::Result, Price, Timestamp};
use pf_instruments::EuropeanOption;
use pf_models::ClosedFormModel;
use tracing::debug;

/// Prices an option with the model's algebraic formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormEngine;

impl ClosedFormEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Price `option` under `model` at `valuation_time`.
    pub fn price<M: ClosedFormModel + ?Sized>(
        &self,
        model: &M,
        option: &EuropeanOption,
        valuation_time: Timestamp,
    ) -> Result<Price> {
        let times = match horizon(model, option, valuation_time)? {
            Horizon::Remaining(times) => times,
            Horizon::Expiring(intrinsic) => return Ok(intrinsic),
        };
        let price = model.price(times.option, option.strike(), option.kind())?;
        debug!(
            engine = "closed-form",
            model = model.name(),
            tau = times.option,
            price,
            "priced"
        );
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, NaiveDate};
    use pf_core::Error;
    use pf_instruments::{OptionKind, Underlying};
    use pf_models::{BlackScholesModel, BlackScholesParameters, RateParameters, SpotParameters};

    fn t0() -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn model() -> BlackScholesModel {
        BlackScholesModel::new(BlackScholesParameters {
            spot: SpotParameters::new(100.0, 0.2),
            rate: RateParameters::new(0.05),
        })
        .unwrap()
    }

    fn option(kind: OptionKind, days: i64) -> EuropeanOption {
        EuropeanOption::new(kind, 100.0, t0() + Duration::days(days), Underlying::spot("SPX"))
            .unwrap()
    }

    #[test]
    fn black_scholes_textbook_values() {
        let engine = ClosedFormEngine::new();
        let call = engine.price(&model(), &option(OptionKind::Call, 365), t0()).unwrap();
        let put = engine.price(&model(), &option(OptionKind::Put, 365), t0()).unwrap();
        assert_abs_diff_eq!(call, 10.450583572185565, epsilon = 1e-10);
        assert_abs_diff_eq!(put, 5.573526022256971, epsilon = 1e-10);
    }

    #[test]
    fn at_expiry_returns_intrinsic() {
        let in_the_money = EuropeanOption::put(120.0, t0(), Underlying::spot("SPX")).unwrap();
        let price = ClosedFormEngine.price(&model(), &in_the_money, t0()).unwrap();
        assert_abs_diff_eq!(price, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn after_expiry_is_degenerate() {
        let result = ClosedFormEngine.price(
            &model(),
            &option(OptionKind::Call, 10),
            t0() + Duration::days(11),
        );
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
    }
}
