//! Earnings and cash-flow quality formulas.
//!
//! Dip counters count, over the most recent ten periods, how often a
//! predicate held. A predicate with missing inputs counts as not holding.
//! Series shorter than ten periods produce an all-missing result.

use super::{combine, indicator};
use crate::{
    Result, TimeSeries,
    growth::growth,
    rolling::{BandConfig, rolling_sum},
    series::safe_div,
};

/// Lookback of the dip counters.
pub const DIP_WINDOW: usize = 10;

/// Year-over-year profit decline that counts as a dip.
pub const PROFIT_DIP_THRESHOLD: f64 = -0.10;

/// Annual intrinsic compounding rate: ROE times the retention ratio.
///
/// ```text
/// equity    = total_assets - total_liabilities
/// payout    = clip(dividends / net_income, 0, 1)
/// AICR      = net_income / equity * (1 - payout)
/// ```
///
/// Missing where equity or net income is zero.
pub fn aicr(
    net_income: &TimeSeries,
    total_assets: &TimeSeries,
    total_liabilities: &TimeSeries,
    dividends_paid: &TimeSeries,
) -> TimeSeries {
    combine(
        &[net_income, total_assets, total_liabilities, dividends_paid],
        |values| {
            let &[net_income, assets, liabilities, dividends] = values else {
                return None;
            };
            let roe = safe_div(net_income, assets - liabilities)?;
            let payout = safe_div(dividends, net_income)?.clamp(0.0, 1.0);
            Some(roe * (1.0 - payout))
        },
    )
}

/// Number of the last ten periods in which net income fell by more than 10%.
pub fn profit_dips(net_income: &TimeSeries) -> Result<TimeSeries> {
    let declines = growth(net_income, 1, None)?.values().to_vec();
    count_over_window(net_income, declines, |g| g < PROFIT_DIP_THRESHOLD)
}

/// Number of the last ten periods in which free cash flow fell.
pub fn fcf_dips(free_cash_flow: &TimeSeries) -> Result<TimeSeries> {
    let changes = growth(free_cash_flow, 1, None)?.values().to_vec();
    count_over_window(free_cash_flow, changes, |g| g < 0.0)
}

/// Number of the last ten periods with negative free cash flow.
pub fn negative_fcf_years(free_cash_flow: &TimeSeries) -> Result<TimeSeries> {
    count_over_window(free_cash_flow, free_cash_flow.values().to_vec(), |v| {
        v < 0.0
    })
}

/// Band of return on invested capital (NOPAT over invested capital).
pub fn roic_band(nopat: &TimeSeries, invested_capital: &TimeSeries) -> Result<TimeSeries> {
    BandConfig::QUALITY.apply(&(nopat / invested_capital))
}

/// Band of cash flow from operations.
pub fn cfo_band(cfo: &TimeSeries) -> Result<TimeSeries> {
    BandConfig::QUALITY.apply(cfo)
}

/// Band of free cash flow over net income.
pub fn fcf_to_profit_band(
    free_cash_flow: &TimeSeries,
    net_income: &TimeSeries,
) -> Result<TimeSeries> {
    BandConfig::QUALITY.apply(&(free_cash_flow / net_income))
}

fn count_over_window<P>(
    series: &TimeSeries,
    values: Vec<Option<f64>>,
    predicate: P,
) -> Result<TimeSeries>
where
    P: Fn(f64) -> bool,
{
    if series.len() < DIP_WINDOW {
        return Ok(TimeSeries::from_sorted(
            series.dates().to_vec(),
            vec![None; series.len()],
        ));
    }

    let hits = values
        .into_iter()
        .map(|v| Some(indicator(v.is_some_and(&predicate))))
        .collect();
    let hits = TimeSeries::from_sorted(series.dates().to_vec(), hits);
    rolling_sum(&hits, DIP_WINDOW, DIP_WINDOW)
}
