//! Price-relative valuation formulas.

use super::combine;
use crate::{
    Result, TimeSeries,
    rolling::{BandConfig, rolling_mean},
    series::safe_div,
};
use chrono::NaiveDate;

/// Window of the average P/E used by [`fair_value_vs_market_price`].
pub const FAIR_VALUE_PE_WINDOW: usize = 3;

/// Upside of the no-growth value `EPS / WACC` over the price, in percent.
///
/// ```text
/// ((EPS / WACC) / price - 1) * 100
/// ```
pub fn steady_state_value(eps: &TimeSeries, wacc: &TimeSeries, price: &TimeSeries) -> TimeSeries {
    combine(&[eps, wacc, price], |values| {
        let &[eps, wacc, price] = values else {
            return None;
        };
        let value = safe_div(eps, wacc)?;
        Some((safe_div(value, price)? - 1.0) * 100.0)
    })
}

/// Absolute gap between a growth-adjusted fair value and the market price, in percent.
///
/// Inputs are restricted to the dates present in all of them. With
/// `roe = net_income / (total_assets - total_liabilities)`, `g` the EPS growth
/// and `avg_pe` the trailing three-period mean P/E:
///
/// ```text
/// fair  = (ln(1 + max(roe, -0.99)) + g) * EPS * (1 + ln(1 + |EPS|)) * avg_pe
/// value = |fair / price - 1| * 100
/// ```
pub fn fair_value_vs_market_price(
    net_income: &TimeSeries,
    total_assets: &TimeSeries,
    total_liabilities: &TimeSeries,
    eps: &TimeSeries,
    price: &TimeSeries,
) -> Result<TimeSeries> {
    let inputs = [net_income, total_assets, total_liabilities, eps, price];
    let dates: Vec<NaiveDate> = net_income
        .dates()
        .iter()
        .copied()
        .filter(|date| inputs.iter().all(|s| s.dates().binary_search(date).is_ok()))
        .collect();
    let [net_income, total_assets, total_liabilities, eps, price] =
        inputs.map(|series| series.reindex(&dates));

    let roe = &net_income / &(&total_assets - &total_liabilities);
    let prior_eps = eps.shift(1)?;
    let eps_growth = &(&eps - &prior_eps) / &prior_eps;
    let avg_pe = rolling_mean(&(&price / &eps), FAIR_VALUE_PE_WINDOW, 1)?;

    let fair_value = combine(&[&roe, &eps_growth, &eps, &avg_pe, &price], |values| {
        let &[roe, growth, eps, avg_pe, price] = values else {
            return None;
        };
        if eps == 0.0 {
            return None;
        }
        let earnings_power = eps * (1.0 + eps.abs().ln_1p());
        let fair = (roe.max(-0.99).ln_1p() + growth) * earnings_power * avg_pe;
        Some(((safe_div(fair, price)? - 1.0) * 100.0).abs())
    });
    Ok(fair_value)
}

/// Band of price over revenue per share.
pub fn price_to_revenue_band(
    price: &TimeSeries,
    revenue: &TimeSeries,
    shares_outstanding: &TimeSeries,
) -> Result<TimeSeries> {
    BandConfig::VALUATION.apply(&(price / &(revenue / shares_outstanding)))
}

/// Band of price over EPS.
pub fn price_to_earnings_band(price: &TimeSeries, eps: &TimeSeries) -> Result<TimeSeries> {
    BandConfig::VALUATION.apply(&(price / eps))
}

/// Band of price over operating cash flow per share.
pub fn price_to_cfo_band(
    price: &TimeSeries,
    cfo: &TimeSeries,
    shares_outstanding: &TimeSeries,
) -> Result<TimeSeries> {
    BandConfig::VALUATION.apply(&(price / &(cfo / shares_outstanding)))
}

/// Free cash flow over market capitalization, in percent, always non-negative.
pub fn fcf_yield(
    free_cash_flow: &TimeSeries,
    price: &TimeSeries,
    shares_outstanding: &TimeSeries,
) -> TimeSeries {
    combine(&[free_cash_flow, price, shares_outstanding], |values| {
        let &[fcf, price, shares] = values else {
            return None;
        };
        safe_div(fcf, price * shares).map(|y| (y * 100.0).abs())
    })
}
