#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use pf_core::{Real, Timestamp};
use pf_instruments::{EuropeanOption, OptionKind, Underlying};
use pf_models::{
    CorrelationParameters, CostOfCarryParameters, ForwardParameters, HestonModel,
    HestonParameters, OdeSolutionMode, RateParameters, SpotParameters, TrolleSchwartzModel,
    TrolleSchwartzParameters, VolatilityParameters,
};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; `RUST_LOG=debug` shows engine output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn valuation_time() -> Timestamp {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn in_years(years: i64) -> Timestamp {
    valuation_time() + Duration::days(365 * years)
}

pub fn spot_option(kind: OptionKind, strike: Real) -> EuropeanOption {
    EuropeanOption::new(kind, strike, in_years(1), Underlying::spot("SPX")).unwrap()
}

/// Option expiring in one year on a forward delivering in two.
pub fn forward_option(kind: OptionKind, strike: Real) -> EuropeanOption {
    EuropeanOption::new(
        kind,
        strike,
        in_years(1),
        Underlying::forward("CL", in_years(2)),
    )
    .unwrap()
}

/// Heston with v₀ = θ = 0.16², κ = 2, σ = 0.3, zero rate.
pub fn heston(rho: Real, mode: OdeSolutionMode) -> HestonModel {
    heston_with(VolatilityParameters::new(0.16, 2.0, 0.16, 0.3), rho, mode)
}

pub fn heston_with(
    volatility: VolatilityParameters,
    rho: Real,
    mode: OdeSolutionMode,
) -> HestonModel {
    HestonModel::new(
        HestonParameters::new(
            SpotParameters::new(100.0, 0.0),
            RateParameters::new(0.0),
            volatility,
            CorrelationParameters::spot_vol(rho),
        )
        .with_ode_solution(mode),
    )
    .unwrap()
}

pub fn trolle_schwartz(alpha: Real, correlation: CorrelationParameters) -> TrolleSchwartzModel {
    TrolleSchwartzModel::new(TrolleSchwartzParameters::new(
        ForwardParameters::new(100.0, 0.0),
        VolatilityParameters::new(0.16, 2.0, 0.16, 0.3),
        CostOfCarryParameters::new(alpha, 1.0),
        correlation,
    ))
    .unwrap()
}
