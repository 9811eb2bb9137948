//! Black model prices against Black-Scholes closed forms.

use approx::assert_relative_eq;
use gaussgrid::math::normal_cdf;
use gaussgrid::models::data;
use gaussgrid::{AssetModel, BlackData, BlackModel, GridConfig, Indicator, Real};

const RATE: Real = 0.07;
const SIGMA: Real = 0.2;
const SPOT: Real = 100.0;
const STRIKE: Real = 100.0;
const MATURITY: Real = 1.0;

fn black_scholes_call(s: Real, k: Real, r: Real, sigma: Real, t: Real) -> Real {
    let sd = sigma * t.sqrt();
    let d1 = ((s / k).ln() + r * t) / sd + 0.5 * sd;
    s * normal_cdf(d1) - k * (-r * t).exp() * normal_cdf(d1 - sd)
}

fn cash_or_nothing_call(s: Real, k: Real, r: Real, sigma: Real, t: Real) -> Real {
    let sd = sigma * t.sqrt();
    let d2 = ((s / k).ln() + r * t) / sd - 0.5 * sd;
    (-r * t).exp() * normal_cdf(d2)
}

fn model(config: &GridConfig, event_times: &[Real]) -> BlackModel {
    let discount = data::discount(RATE, 0.0);
    let forward = data::forward_from_dividend(SPOT, 0.0, &discount, 0.0);
    let curves = BlackData::constant(discount, forward, SIGMA, 0.0);
    let mut m = BlackModel::new(curves, 0.2, config).unwrap();
    m.assign_event_times(event_times).unwrap();
    m
}

#[test]
fn european_call() {
    let m = model(&GridConfig::black(), &[0.0, MATURITY]);
    let payoff = (m.spot(1).unwrap() - STRIKE).max_value(0.0);
    let price = payoff.rollback(0).unwrap().at_origin().unwrap();
    let exact = black_scholes_call(SPOT, STRIKE, RATE, SIGMA, MATURITY);
    assert_relative_eq!(price, exact, max_relative = 1e-3);
}

#[test]
fn european_call_with_every_fast_scheme() {
    let exact = black_scholes_call(SPOT, STRIKE, RATE, SIGMA, MATURITY);
    for scheme in [
        gaussgrid::FastScheme::Fft2,
        gaussgrid::FastScheme::Fft,
        gaussgrid::FastScheme::CrankNicolson,
    ] {
        let m = model(&GridConfig::black().with_scheme(scheme), &[0.0, MATURITY]);
        let payoff = (m.spot(1).unwrap() - STRIKE).max_value(0.0);
        let price = payoff.rollback(0).unwrap().at_origin().unwrap();
        assert_relative_eq!(price, exact, max_relative = 1e-3);
    }
}

#[test]
fn call_through_intermediate_dates() {
    let times: Vec<Real> = (0..=4).map(|i| i as Real * 0.25).collect();
    let m = model(&GridConfig::black(), &times);
    let mut v = (m.spot(4).unwrap() - STRIKE).max_value(0.0);
    for t in (0..4).rev() {
        v = v.rollback(t).unwrap();
    }
    let exact = black_scholes_call(SPOT, STRIKE, RATE, SIGMA, MATURITY);
    assert_relative_eq!(v.at_origin().unwrap(), exact, max_relative = 1e-3);
}

#[test]
fn digital_call_with_smoothed_indicators() {
    let exact = cash_or_nothing_call(SPOT, STRIKE, RATE, SIGMA, MATURITY);
    for indicator in [Indicator::Linear, Indicator::Quadratic] {
        let m = model(&GridConfig::black().with_indicator(indicator), &[0.0, MATURITY]);
        let payoff = m.spot(1).unwrap().indicator(STRIKE);
        let price = payoff.rollback(0).unwrap().at_origin().unwrap();
        assert_relative_eq!(price, exact, max_relative = 1e-3);
    }
}

#[test]
fn put_call_parity() {
    let m = model(&GridConfig::black(), &[0.0, MATURITY]);
    let s = m.spot(1).unwrap();
    let call = (&s - STRIKE).max_value(0.0);
    let put = (STRIKE - &s).max_value(0.0);
    let diff = (call - put).rollback(0).unwrap().at_origin().unwrap();
    let exact = SPOT - STRIKE * (-RATE * MATURITY).exp();
    assert_relative_eq!(diff, exact, max_relative = 1e-5);
}
