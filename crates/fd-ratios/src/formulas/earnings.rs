//! Profitability, growth and estimate formulas.
//!
//! Trailing averages use a 20-period window and need a single valid
//! observation. "vs average" formulas report the relative distance of the
//! current value from its trailing average, measured against the absolute
//! average so a negative history does not flip the sign.

use super::{change, indicator, vs_average};
use crate::{
    Result, TimeSeries,
    growth::growth,
    rolling::{AVERAGE_WINDOW, rolling_average, rolling_mean},
    series::align,
};

/// Window of the "growths in the last N periods" counters.
pub const GROWTH_STREAK_WINDOW: usize = 20;

/// Window of the free-cash-flow average growth.
pub const FCF_AVERAGE_WINDOW: usize = 5;

/// Inputs of the Piotroski F-score.
#[derive(Debug, Clone, Copy)]
pub struct PiotroskiInputs<'a> {
    /// Net income
    pub net_income: &'a TimeSeries,
    /// Total assets
    pub total_assets: &'a TimeSeries,
    /// Operating cash flow
    pub operating_cash_flow: &'a TimeSeries,
    /// Total current assets
    pub current_assets: &'a TimeSeries,
    /// Total current liabilities
    pub current_liabilities: &'a TimeSeries,
    /// Total debt
    pub total_debt: &'a TimeSeries,
    /// Shares outstanding
    pub shares_outstanding: &'a TimeSeries,
    /// Revenue
    pub revenue: &'a TimeSeries,
    /// Cost of goods sold
    pub cogs: &'a TimeSeries,
}

/// Piotroski F-score, 0 to 9.
///
/// One point each for:
///
/// - ROA > 0
/// - operating cash flow > 0
/// - ROA improved
/// - operating cash flow > net income
/// - debt to assets decreased
/// - current ratio improved
/// - shares outstanding did not increase
/// - gross margin improved
/// - asset turnover improved
///
/// The score is missing when net income is missing or total assets are
/// missing or zero. Any other criterion whose inputs are missing awards no
/// point.
pub fn piotroski_f_score(inputs: &PiotroskiInputs<'_>) -> Result<TimeSeries> {
    let dates = align(&[
        inputs.net_income,
        inputs.total_assets,
        inputs.operating_cash_flow,
        inputs.current_assets,
        inputs.current_liabilities,
        inputs.total_debt,
        inputs.shares_outstanding,
        inputs.revenue,
        inputs.cogs,
    ])
    .0;

    let net_income = inputs.net_income.reindex(&dates);
    let total_assets = inputs.total_assets.reindex(&dates);
    let cfo = inputs.operating_cash_flow.reindex(&dates);
    let revenue = inputs.revenue.reindex(&dates);
    let cogs = inputs.cogs.reindex(&dates);
    let shares = inputs.shares_outstanding.reindex(&dates);

    let roa = &net_income / &total_assets;
    let leverage = &inputs.total_debt.reindex(&dates) / &total_assets;
    let current =
        &inputs.current_assets.reindex(&dates) / &inputs.current_liabilities.reindex(&dates);
    let margin = &(&revenue - &cogs) / &revenue;
    let turnover = &revenue / &total_assets;

    let criteria = [
        roa.map(|v| indicator(v > 0.0)),
        cfo.map(|v| indicator(v > 0.0)),
        change(&roa)?.map(|v| indicator(v > 0.0)),
        cfo.zip_with(&net_income, |c, n| Some(indicator(c > n))),
        change(&leverage)?.map(|v| indicator(v < 0.0)),
        change(&current)?.map(|v| indicator(v > 0.0)),
        change(&shares)?.map(|v| indicator(v <= 0.0)),
        change(&margin)?.map(|v| indicator(v > 0.0)),
        change(&turnover)?.map(|v| indicator(v > 0.0)),
    ];

    let scores = (0..dates.len())
        .map(|idx| {
            net_income.values()[idx]?;
            total_assets.values()[idx].filter(|ta| *ta != 0.0)?;
            Some(
                criteria
                    .iter()
                    .map(|c| c.values()[idx].unwrap_or(0.0))
                    .sum::<f64>(),
            )
        })
        .collect();

    Ok(TimeSeries::from_sorted(dates, scores))
}

/// Period-over-period revenue growth.
pub fn revenue_growth(revenue: &TimeSeries) -> Result<TimeSeries> {
    growth(revenue, 1, None)
}

/// Period-over-period EPS growth.
pub fn eps_growth(eps: &TimeSeries) -> Result<TimeSeries> {
    growth(eps, 1, None)
}

/// Period-over-period free-cash-flow growth.
pub fn fcf_growth(free_cash_flow: &TimeSeries) -> Result<TimeSeries> {
    growth(free_cash_flow, 1, None)
}

/// Running count of consecutive periods with positive growth.
///
/// The count includes the current period and resets to zero on any
/// non-positive or missing growth value.
pub fn consecutive_growth(series: &TimeSeries) -> Result<TimeSeries> {
    let growth = growth(series, 1, None)?;
    let mut streak = 0.0;
    let values = growth
        .values()
        .iter()
        .map(|g| {
            streak = if g.is_some_and(|g| g > 0.0) {
                streak + 1.0
            } else {
                0.0
            };
            Some(streak)
        })
        .collect();
    Ok(TimeSeries::from_sorted(series.dates().to_vec(), values))
}

/// Longest run of positive growth inside the trailing `period` growth values.
///
/// Unlike [`consecutive_growth`], a run that ended within the window still
/// counts.
pub fn max_growth_streak(series: &TimeSeries, period: usize) -> Result<TimeSeries> {
    let growth = growth(series, 1, None)?;
    let positive: Vec<bool> = growth
        .values()
        .iter()
        .map(|g| g.is_some_and(|g| g > 0.0))
        .collect();

    let values = (0..positive.len())
        .map(|idx| {
            let lo = (idx + 1).saturating_sub(period.max(1));
            let (longest, _) = positive[lo..=idx]
                .iter()
                .fold((0usize, 0usize), |(longest, run), up| {
                    let run = if *up { run + 1 } else { 0 };
                    (longest.max(run), run)
                });
            Some(longest as f64)
        })
        .collect();
    Ok(TimeSeries::from_sorted(series.dates().to_vec(), values))
}

/// Trailing average of revenue growth.
pub fn average_revenue_growth(revenue: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(revenue, AVERAGE_WINDOW, true, 1)
}

/// Trailing average of the gross margin.
pub fn average_gross_margin(gross_margin: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(gross_margin, AVERAGE_WINDOW, false, 1)
}

/// Trailing average of gross margin growth. Zero margins are ignored.
pub fn average_gross_margin_growth(gross_margin: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(&gross_margin.nonzero(), AVERAGE_WINDOW, true, 1)
}

/// EBITDA over revenue.
pub fn ebitda_margin(ebitda: &TimeSeries, revenue: &TimeSeries) -> TimeSeries {
    ebitda / revenue
}

/// Trailing average of the EBITDA margin.
pub fn average_ebitda_margin(ebitda: &TimeSeries, revenue: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(&ebitda_margin(ebitda, revenue), AVERAGE_WINDOW, false, 1)
}

/// Trailing average of EBITDA margin growth.
pub fn average_ebitda_margin_growth(ebitda: &TimeSeries, revenue: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(&ebitda_margin(ebitda, revenue), AVERAGE_WINDOW, true, 1)
}

/// Trailing average of EPS growth.
pub fn average_eps_growth(eps: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(eps, AVERAGE_WINDOW, true, 1)
}

/// Current revenue growth relative to its trailing average.
pub fn revenue_growth_vs_average(revenue: &TimeSeries) -> Result<TimeSeries> {
    Ok(vs_average(&revenue_growth(revenue)?, &average_revenue_growth(revenue)?))
}

/// Current EPS growth relative to its trailing average.
pub fn eps_growth_vs_average(eps: &TimeSeries) -> Result<TimeSeries> {
    Ok(vs_average(&eps_growth(eps)?, &average_eps_growth(eps)?))
}

/// Current EBITDA margin relative to its trailing average.
pub fn ebitda_margin_vs_average(ebitda: &TimeSeries, revenue: &TimeSeries) -> Result<TimeSeries> {
    Ok(vs_average(
        &ebitda_margin(ebitda, revenue),
        &average_ebitda_margin(ebitda, revenue)?,
    ))
}

/// Current gross margin relative to its trailing average.
pub fn gross_margin_vs_average(gross_margin: &TimeSeries) -> Result<TimeSeries> {
    Ok(vs_average(gross_margin, &average_gross_margin(gross_margin)?))
}

/// Net income over total equity.
pub fn return_on_equity(net_income: &TimeSeries, total_equity: &TimeSeries) -> TimeSeries {
    net_income / total_equity
}

/// Current ROE relative to its trailing average.
pub fn roe_vs_average(net_income: &TimeSeries, total_equity: &TimeSeries) -> Result<TimeSeries> {
    let roe = return_on_equity(net_income, total_equity);
    Ok(vs_average(&roe, &rolling_mean(&roe, AVERAGE_WINDOW, 1)?))
}

/// Net income over total assets.
pub fn return_on_assets(net_income: &TimeSeries, total_assets: &TimeSeries) -> TimeSeries {
    net_income / total_assets
}

/// Current ROA relative to its trailing average.
pub fn roa_vs_average(net_income: &TimeSeries, total_assets: &TimeSeries) -> Result<TimeSeries> {
    let roa = return_on_assets(net_income, total_assets);
    Ok(vs_average(&roa, &rolling_mean(&roa, AVERAGE_WINDOW, 1)?))
}

/// Actual revenue over the consensus estimate.
pub fn revenue_vs_estimate(revenue: &TimeSeries, revenue_estimate: &TimeSeries) -> TimeSeries {
    revenue / revenue_estimate
}

/// Implied shares outstanding over implied estimated shares.
///
/// Shares are derived as net income over EPS on both sides.
pub fn shares_outstanding_vs_estimate(
    net_income: &TimeSeries,
    eps: &TimeSeries,
    net_income_estimate: &TimeSeries,
    eps_estimate: &TimeSeries,
) -> TimeSeries {
    &(net_income / eps) / &(net_income_estimate / eps_estimate)
}

/// Trailing five-period average of free-cash-flow growth.
pub fn fcf_average_growth(free_cash_flow: &TimeSeries) -> Result<TimeSeries> {
    rolling_average(free_cash_flow, FCF_AVERAGE_WINDOW, true, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{year_ends, yearly};
    use approx::assert_relative_eq;

    fn streak_values(series: &TimeSeries) -> Vec<f64> {
        series.values().iter().map(|v| v.unwrap()).collect()
    }

    #[test]
    fn test_consecutive_growth_example() {
        let revenue = yearly(&[100.0, 90.0, 95.0, 105.0, 120.0]);
        assert_eq!(
            streak_values(&consecutive_growth(&revenue).unwrap()),
            vec![0.0, 0.0, 1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_max_streak_differs_from_running_streak() {
        let revenue = yearly(&[100.0, 90.0, 95.0, 105.0, 120.0, 110.0, 130.0, 140.0]);

        assert_eq!(
            streak_values(&consecutive_growth(&revenue).unwrap()),
            vec![0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0]
        );
        assert_eq!(
            streak_values(&max_growth_streak(&revenue, 3).unwrap()),
            vec![0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0]
        );
    }

    #[test]
    fn test_streak_resets_on_missing() {
        let eps = TimeSeries::new(
            year_ends(5),
            vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)],
        )
        .unwrap();
        assert_eq!(
            streak_values(&consecutive_growth(&eps).unwrap()),
            vec![0.0, 1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_piotroski_perfect_score() {
        let inputs = PiotroskiInputs {
            net_income: &yearly(&[10.0, 20.0]),
            total_assets: &yearly(&[100.0, 100.0]),
            operating_cash_flow: &yearly(&[15.0, 30.0]),
            current_assets: &yearly(&[200.0, 300.0]),
            current_liabilities: &yearly(&[100.0, 100.0]),
            total_debt: &yearly(&[50.0, 40.0]),
            shares_outstanding: &yearly(&[10.0, 10.0]),
            revenue: &yearly(&[100.0, 120.0]),
            cogs: &yearly(&[60.0, 60.0]),
        };

        let score = piotroski_f_score(&inputs).unwrap();
        // First period has no prior: ROA > 0, CFO > 0 and CFO > NI only.
        assert_eq!(score.values(), &[Some(3.0), Some(9.0)]);
    }

    #[test]
    fn test_piotroski_missing_core_inputs() {
        let net_income =
            TimeSeries::new(year_ends(3), vec![Some(10.0), None, Some(12.0)]).unwrap();
        let total_assets = yearly(&[100.0, 100.0, 0.0]);
        let other = yearly(&[1.0, 1.0, 1.0]);
        let inputs = PiotroskiInputs {
            net_income: &net_income,
            total_assets: &total_assets,
            operating_cash_flow: &other,
            current_assets: &other,
            current_liabilities: &other,
            total_debt: &other,
            shares_outstanding: &other,
            revenue: &other,
            cogs: &other,
        };

        let score = piotroski_f_score(&inputs).unwrap();
        assert!(score.values()[0].is_some());
        assert_eq!(score.values()[1], None);
        assert_eq!(score.values()[2], None);
    }

    #[test]
    fn test_piotroski_peripheral_gap_awards_no_point() {
        let shares = TimeSeries::new(year_ends(2), vec![Some(10.0), None]).unwrap();
        let inputs = PiotroskiInputs {
            net_income: &yearly(&[10.0, 20.0]),
            total_assets: &yearly(&[100.0, 100.0]),
            operating_cash_flow: &yearly(&[15.0, 30.0]),
            current_assets: &yearly(&[200.0, 300.0]),
            current_liabilities: &yearly(&[100.0, 100.0]),
            total_debt: &yearly(&[50.0, 40.0]),
            shares_outstanding: &shares,
            revenue: &yearly(&[100.0, 120.0]),
            cogs: &yearly(&[60.0, 60.0]),
        };

        assert_eq!(piotroski_f_score(&inputs).unwrap().values()[1], Some(8.0));
    }

    #[test]
    fn test_average_revenue_growth() {
        let result = average_revenue_growth(&yearly(&[100.0, 110.0, 99.0])).unwrap();
        assert_eq!(result.values()[0], None);
        // mean(0.1, -0.1)
        assert_relative_eq!(result.values()[2].unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_growth_vs_average_zero_average_is_missing() {
        let result = revenue_growth_vs_average(&yearly(&[100.0, 110.0, 99.0])).unwrap();
        assert_eq!(result.values()[0], None);
        assert_relative_eq!(result.values()[1].unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(result.values()[2], None);
    }

    #[test]
    fn test_roe_vs_average() {
        let net_income = yearly(&[10.0, 30.0]);
        let equity = yearly(&[100.0, 100.0]);

        let result = roe_vs_average(&net_income, &equity).unwrap();
        // ROE 0.3 against an average of 0.2
        assert_relative_eq!(result.values()[1].unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_shares_outstanding_vs_estimate() {
        let result = shares_outstanding_vs_estimate(
            &yearly(&[100.0]),
            &yearly(&[2.0]),
            &yearly(&[90.0]),
            &yearly(&[2.0]),
        );
        assert_relative_eq!(result.values()[0].unwrap(), 50.0 / 45.0, epsilon = 1e-12);
    }

    #[test]
    fn test_revenue_vs_estimate_zero_estimate() {
        let result = revenue_vs_estimate(&yearly(&[110.0, 50.0]), &yearly(&[100.0, 0.0]));
        assert_eq!(result.values(), &[Some(1.1), None]);
    }

    #[test]
    fn test_fcf_average_growth_window() {
        let fcf = yearly(&[10.0, 20.0, 40.0, 80.0, 160.0, 320.0, 320.0]);
        let result = fcf_average_growth(&fcf).unwrap();
        // Five growth values of 1.0 and one of 0.0 in the last window
        assert_relative_eq!(result.values()[5].unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.values()[6].unwrap(), 0.8, epsilon = 1e-12);
    }
}
