//! Solvency and liquidity formulas.

use super::combine;
use crate::{TimeSeries, series::safe_div};

/// Days in a year, the day count for annual statements.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Day count for quarterly statements.
pub const DAYS_PER_QUARTER: f64 = DAYS_PER_YEAR / 4.0;

/// Inputs of the Altman Z-score.
#[derive(Debug, Clone, Copy)]
pub struct AltmanInputs<'a> {
    /// Total current assets
    pub current_assets: &'a TimeSeries,
    /// Total current liabilities
    pub current_liabilities: &'a TimeSeries,
    /// Total assets
    pub total_assets: &'a TimeSeries,
    /// Earnings before interest and taxes
    pub ebit: &'a TimeSeries,
    /// Shares outstanding
    pub shares_outstanding: &'a TimeSeries,
    /// Revenue
    pub revenue: &'a TimeSeries,
    /// Total liabilities
    pub total_liabilities: &'a TimeSeries,
    /// Retained earnings
    pub retained_earnings: &'a TimeSeries,
    /// Stock price
    pub stock_price: &'a TimeSeries,
}

/// Total debt over total equity.
pub fn debt_to_equity(total_debt: &TimeSeries, total_equity: &TimeSeries) -> TimeSeries {
    total_debt / total_equity
}

/// EBITDA over the absolute interest expense.
pub fn interest_coverage(ebitda: &TimeSeries, interest_expense: &TimeSeries) -> TimeSeries {
    ebitda / &interest_expense.abs()
}

/// Current assets over current liabilities.
pub fn current_ratio(current_assets: &TimeSeries, current_liabilities: &TimeSeries) -> TimeSeries {
    current_assets / current_liabilities
}

/// Days inventory outstanding plus days sales outstanding minus days payables
/// outstanding.
///
/// ```text
/// DIO = inventory / COGS * days
/// DSO = receivables / revenue * days
/// DPO = payables / COGS * days
/// ```
pub fn cash_conversion_cycle(
    inventory: &TimeSeries,
    cogs: &TimeSeries,
    receivables: &TimeSeries,
    revenue: &TimeSeries,
    payables: &TimeSeries,
    days: f64,
) -> TimeSeries {
    let dio = &(inventory / cogs) * days;
    let dso = &(receivables / revenue) * days;
    let dpo = &(payables / cogs) * days;
    &(&dio + &dso) - &dpo
}

/// Altman Z-score.
///
/// ```text
/// Z = 1.2 * WC/TA + 1.4 * RE/TA + 3.3 * EBIT/TA + 0.6 * (price * shares)/TL + 1.0 * revenue/TA
/// ```
///
/// A zero total assets or total liabilities makes the score missing.
pub fn altman_z_score(inputs: &AltmanInputs<'_>) -> TimeSeries {
    combine(
        &[
            inputs.current_assets,
            inputs.current_liabilities,
            inputs.total_assets,
            inputs.ebit,
            inputs.shares_outstanding,
            inputs.revenue,
            inputs.total_liabilities,
            inputs.retained_earnings,
            inputs.stock_price,
        ],
        |values| {
            let &[ca, cl, ta, ebit, shares, revenue, tl, re, price] = values else {
                return None;
            };
            let working_capital = safe_div(ca - cl, ta)?;
            let retained = safe_div(re, ta)?;
            let profitability = safe_div(ebit, ta)?;
            let solvency = safe_div(price * shares, tl)?;
            let turnover = safe_div(revenue, ta)?;
            Some(
                1.2 * working_capital
                    + 1.4 * retained
                    + 3.3 * profitability
                    + 0.6 * solvency
                    + 1.0 * turnover,
            )
        },
    )
}
