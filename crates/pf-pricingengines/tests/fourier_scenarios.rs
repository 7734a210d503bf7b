//! End-to-end Fourier pricing scenarios.

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use pf_core::Error;
use pf_instruments::OptionKind;
use pf_models::{
    Black76Model, Black76Parameters, BlackScholesModel, BlackScholesParameters, ClosedFormModel,
    CorrelationParameters, ForwardParameters, OdeSolutionMode, RateParameters, SpotParameters,
    VolatilityParameters,
};
use pf_pricingengines::{ClosedFormEngine, FourierEngine, FourierMethod};

const METHODS: [FourierMethod; 2] = [FourierMethod::CarrMadan, FourierMethod::HestonOriginal];

fn heston_call(rho: f64, mode: OdeSolutionMode, method: FourierMethod) -> f64 {
    FourierEngine::new(method)
        .price(
            &heston(rho, mode),
            &spot_option(OptionKind::Call, 100.0),
            valuation_time(),
        )
        .unwrap()
}

#[test]
fn heston_reference_prices() {
    init_tracing();
    for method in METHODS {
        for (rho, expected) in [(0.0, 6.1369), (0.9, 6.1651), (-0.9, 5.9388), (-0.99, 5.9085)] {
            let price = heston_call(rho, OdeSolutionMode::Analytical, method);
            assert_abs_diff_eq!(price, expected, epsilon = 1e-4);
        }
    }
}

#[test]
fn heston_price_moves_monotonically_with_correlation() {
    let prices: Vec<f64> = [-0.9, 0.0, 0.9]
        .into_iter()
        .map(|rho| heston_call(rho, OdeSolutionMode::Analytical, FourierMethod::CarrMadan))
        .collect();
    assert!(prices[0] < prices[1] && prices[1] < prices[2], "{prices:?}");
}

#[test]
fn heston_numerical_odes_match_analytical() {
    init_tracing();
    for rho in [0.0, -0.9] {
        let analytical = heston_call(rho, OdeSolutionMode::Analytical, FourierMethod::HestonOriginal);
        let numerical = heston_call(rho, OdeSolutionMode::Numerical, FourierMethod::HestonOriginal);
        assert_abs_diff_eq!(analytical, numerical, epsilon = 1e-6);
    }
}

#[test]
fn strong_positive_correlation_with_slow_mean_reversion() {
    // κ = 0.5 < ρσ = 0.7, where β vanishes at the expected-level node u = −i
    init_tracing();
    let volatility = VolatilityParameters::new(0.2, 0.5, 0.2, 1.0);
    for method in METHODS {
        let engine = FourierEngine::new(method);
        let price = |kind, mode| {
            engine
                .price(
                    &heston_with(volatility, 0.7, mode),
                    &spot_option(kind, 100.0),
                    valuation_time(),
                )
                .unwrap()
        };
        let call = price(OptionKind::Call, OdeSolutionMode::Analytical);
        let put = price(OptionKind::Put, OdeSolutionMode::Analytical);
        assert!(call > 0.0 && put > 0.0, "{call} {put}");
        assert_abs_diff_eq!(call - put, 0.0, epsilon = 1e-6);
        let numerical = price(OptionKind::Call, OdeSolutionMode::Numerical);
        assert_abs_diff_eq!(call, numerical, epsilon = 1e-6);
    }
}

#[test]
fn methods_agree_to_four_decimals() {
    let model = heston(-0.5, OdeSolutionMode::Analytical);
    for strike in [80.0, 95.0, 100.0, 110.0, 130.0] {
        for kind in [OptionKind::Call, OptionKind::Put] {
            let option = spot_option(kind, strike);
            let [cm, gp] = METHODS.map(|m| {
                FourierEngine::new(m).price(&model, &option, valuation_time()).unwrap()
            });
            assert_abs_diff_eq!(cm, gp, epsilon = 5e-5);
        }
    }
}

#[test]
fn vanishing_vol_of_vol_reaches_black_scholes() {
    let model = heston_with(
        VolatilityParameters::new(0.16, 1.0, 0.16, 1e-5),
        0.0,
        OdeSolutionMode::Analytical,
    );
    let black_scholes = BlackScholesModel::new(BlackScholesParameters {
        spot: SpotParameters::new(100.0, 0.16),
        rate: RateParameters::new(0.0),
    })
    .unwrap();
    let option = spot_option(OptionKind::Call, 100.0);
    let reference = ClosedFormEngine
        .price(&black_scholes, &option, valuation_time())
        .unwrap();
    assert_abs_diff_eq!(reference, 6.3763, epsilon = 1e-4);
    for method in METHODS {
        let price = FourierEngine::new(method)
            .price(&model, &option, valuation_time())
            .unwrap();
        assert_abs_diff_eq!(price, reference, epsilon = 1e-5);
    }
}

#[test]
fn put_call_parity() {
    let model = heston(-0.7, OdeSolutionMode::Analytical);
    for method in METHODS {
        let engine = FourierEngine::new(method);
        let call = engine
            .price(&model, &spot_option(OptionKind::Call, 105.0), valuation_time())
            .unwrap();
        let put = engine
            .price(&model, &spot_option(OptionKind::Put, 105.0), valuation_time())
            .unwrap();
        assert_abs_diff_eq!(call - put, 100.0 - 105.0, epsilon = 1e-8);
    }
}

#[test]
fn black_76_matches_closed_form() {
    let model = Black76Model::new(Black76Parameters {
        forward: ForwardParameters::new(80.0, 0.35),
        rate: RateParameters::new(0.03),
    })
    .unwrap();
    for strike in [60.0, 80.0, 100.0] {
        for kind in [OptionKind::Call, OptionKind::Put] {
            let option = forward_option(kind, strike);
            let reference = model.price(1.0, strike, kind).unwrap();
            for method in METHODS {
                let price = FourierEngine::new(method)
                    .price(&model, &option, valuation_time())
                    .unwrap();
                assert_abs_diff_eq!(price, reference, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn trolle_schwartz_without_carry_loading_is_heston() {
    init_tracing();
    let correlation = CorrelationParameters {
        spot_vol: -0.6,
        spot_cost_of_carry: 0.3,
        vol_cost_of_carry: 0.1,
    };
    let model = trolle_schwartz(0.0, correlation);
    let reference = heston(-0.6, OdeSolutionMode::Analytical);
    let engine = FourierEngine::new(FourierMethod::CarrMadan);
    let forward = engine
        .price(&model, &forward_option(OptionKind::Call, 100.0), valuation_time())
        .unwrap();
    let spot = engine
        .price(&reference, &spot_option(OptionKind::Call, 100.0), valuation_time())
        .unwrap();
    assert_abs_diff_eq!(forward, spot, epsilon = 1e-6);
}

#[test]
fn trolle_schwartz_methods_agree() {
    let correlation = CorrelationParameters {
        spot_vol: -0.5,
        spot_cost_of_carry: 0.3,
        vol_cost_of_carry: 0.2,
    };
    let model = trolle_schwartz(0.5, correlation);
    let option = forward_option(OptionKind::Put, 95.0);
    let [cm, gp] = METHODS.map(|m| {
        FourierEngine::new(m).price(&model, &option, valuation_time()).unwrap()
    });
    assert!(cm > 0.0);
    assert_abs_diff_eq!(cm, gp, epsilon = 5e-5);
}

#[test]
fn trolle_schwartz_needs_a_forward() {
    let model = trolle_schwartz(0.5, CorrelationParameters::default());
    let result = FourierEngine::default().price(
        &model,
        &spot_option(OptionKind::Call, 100.0),
        valuation_time(),
    );
    assert!(matches!(result, Err(Error::UnsupportedVariant(_))));
}
