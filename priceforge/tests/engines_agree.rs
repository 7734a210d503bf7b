use approx::assert_abs_diff_eq;
use chrono::{Duration, NaiveDate};
use priceforge::instruments::{EuropeanOption, OptionKind, Underlying};
use priceforge::methods::MonteCarloParameters;
use priceforge::models::{BlackScholesModel, BlackScholesParameters, RateParameters, SpotParameters};
use priceforge::pricingengines::{
    ClosedFormEngine, FourierEngine, FourierMethod, MonteCarloEngine,
};

#[test]
fn three_engines_one_price() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let model = BlackScholesModel::new(BlackScholesParameters {
        spot: SpotParameters::new(50.0, 0.3),
        rate: RateParameters::new(0.01),
    })
    .unwrap();
    let option = EuropeanOption::new(
        OptionKind::Put,
        55.0,
        today + Duration::days(182),
        Underlying::spot("XYZ"),
    )
    .unwrap();

    let closed_form = ClosedFormEngine.price(&model, &option, today).unwrap();
    let fourier = FourierEngine::new(FourierMethod::HestonOriginal)
        .price(&model, &option, today)
        .unwrap();
    let monte_carlo = MonteCarloEngine::new(
        MonteCarloParameters::default()
            .with_seed(1)
            .with_paths(50_000)
            .with_steps(1),
    )
    .unwrap()
    .price_with_error(&model, &option, today)
    .unwrap();

    assert_abs_diff_eq!(fourier, closed_form, epsilon = 1e-6);
    assert_abs_diff_eq!(
        monte_carlo.price,
        closed_form,
        epsilon = 4.0 * monte_carlo.error_estimate
    );
}
