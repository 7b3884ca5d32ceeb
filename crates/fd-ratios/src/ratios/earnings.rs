//! Earnings, growth and return ratios.

use super::fields::*;
use crate::formulas::earnings::{self, GROWTH_STREAK_WINDOW, PiotroskiInputs};

ratio! {
    /// Piotroski F-score.
    PiotroskiFScore {
        name: "piotroski_f_score",
        label: "Piotroski F-Score",
        description: "Nine-point score of profitability, leverage and efficiency signals",
        category: Earnings,
        fields: [
            NET_INCOME,
            TOTAL_ASSETS,
            OPERATING_CASH_FLOW,
            TOTAL_CURRENT_ASSETS,
            TOTAL_CURRENT_LIABILITIES,
            TOTAL_DEBT,
            SHARES_OUTSTANDING,
            REVENUE,
            COST_OF_GOODS_SOLD,
        ],
        compute: |inputs| {
            let net_income = inputs.field(NET_INCOME)?;
            let total_assets = inputs.field(TOTAL_ASSETS)?;
            let operating_cash_flow = inputs.field(OPERATING_CASH_FLOW)?;
            let current_assets = inputs.field(TOTAL_CURRENT_ASSETS)?;
            let current_liabilities = inputs.field(TOTAL_CURRENT_LIABILITIES)?;
            let total_debt = inputs.field(TOTAL_DEBT)?;
            let shares_outstanding = inputs.field(SHARES_OUTSTANDING)?;
            let revenue = inputs.field(REVENUE)?;
            let cogs = inputs.field(COST_OF_GOODS_SOLD)?;

            earnings::piotroski_f_score(&PiotroskiInputs {
                net_income: &net_income,
                total_assets: &total_assets,
                operating_cash_flow: &operating_cash_flow,
                current_assets: &current_assets,
                current_liabilities: &current_liabilities,
                total_debt: &total_debt,
                shares_outstanding: &shares_outstanding,
                revenue: &revenue,
                cogs: &cogs,
            })
        },
    }
}

ratio! {
    /// Period-over-period revenue growth.
    RevenueGrowth {
        name: "revenue_growth",
        label: "Revenue Growth",
        description: "Revenue growth over the prior period",
        category: Earnings,
        fields: [REVENUE],
        compute: |inputs| earnings::revenue_growth(&inputs.field(REVENUE)?),
    }
}

ratio! {
    /// Period-over-period EPS growth.
    EpsGrowth {
        name: "eps_growth",
        label: "EPS Growth",
        description: "Basic EPS growth over the prior period",
        category: Earnings,
        fields: [BASIC_EPS],
        compute: |inputs| earnings::eps_growth(&inputs.field(BASIC_EPS)?),
    }
}

ratio! {
    /// Running streak of revenue growth.
    RevenueConsecutiveGrowth {
        name: "revenue_consecutive_growth",
        label: "Revenue Consecutive Growth",
        description: "Number of consecutive periods of positive revenue growth",
        category: Earnings,
        fields: [REVENUE],
        compute: |inputs| earnings::consecutive_growth(&inputs.field(REVENUE)?),
    }
}

ratio! {
    /// Running streak of EPS growth.
    EpsConsecutiveGrowth {
        name: "eps_consecutive_growth",
        label: "EPS Consecutive Growth",
        description: "Number of consecutive periods of positive EPS growth",
        category: Earnings,
        fields: [BASIC_EPS],
        compute: |inputs| earnings::consecutive_growth(&inputs.field(BASIC_EPS)?),
    }
}

ratio! {
    /// Longest revenue growth streak in the last 20 periods.
    RevenueGrowthStreak {
        name: "revenue_growth_streak",
        label: "Revenue Growths in Last 20 Periods",
        description: "Longest run of positive revenue growth within the last 20 periods",
        category: Earnings,
        fields: [REVENUE],
        compute: |inputs| earnings::max_growth_streak(
            &inputs.field(REVENUE)?,
            GROWTH_STREAK_WINDOW,
        ),
    }
}

ratio! {
    /// Longest EPS growth streak in the last 20 periods.
    EpsGrowthStreak {
        name: "eps_growth_streak",
        label: "EPS Growths in Last 20 Periods",
        description: "Longest run of positive EPS growth within the last 20 periods",
        category: Earnings,
        fields: [BASIC_EPS],
        compute: |inputs| earnings::max_growth_streak(
            &inputs.field(BASIC_EPS)?,
            GROWTH_STREAK_WINDOW,
        ),
    }
}

ratio! {
    /// Trailing average revenue growth.
    AverageRevenueGrowth {
        name: "average_revenue_growth",
        label: "Average Revenue Growth",
        description: "20-period trailing average of revenue growth",
        category: Earnings,
        fields: [REVENUE],
        compute: |inputs| earnings::average_revenue_growth(&inputs.field(REVENUE)?),
    }
}

ratio! {
    /// Trailing average gross margin.
    AverageGrossMargin {
        name: "average_gross_margin",
        label: "Average Gross Margin",
        description: "20-period trailing average of the gross margin",
        category: Earnings,
        fields: [GROSS_MARGIN],
        compute: |inputs| earnings::average_gross_margin(&inputs.field(GROSS_MARGIN)?),
    }
}

ratio! {
    /// Trailing average gross margin growth.
    AverageGrossMarginGrowth {
        name: "average_gross_margin_growth",
        label: "Average Gross Margin Growth",
        description: "20-period trailing average of gross margin growth",
        category: Earnings,
        fields: [GROSS_MARGIN],
        compute: |inputs| earnings::average_gross_margin_growth(
            &inputs.field(GROSS_MARGIN)?,
        ),
    }
}

ratio! {
    /// Trailing average EBITDA margin.
    AverageEbitdaMargin {
        name: "average_ebitda_margin",
        label: "Average EBITDA Margin",
        description: "20-period trailing average of EBITDA over revenue",
        category: Earnings,
        fields: [EBITDA, REVENUE],
        compute: |inputs| earnings::average_ebitda_margin(
            &inputs.field(EBITDA)?,
            &inputs.field(REVENUE)?,
        ),
    }
}

ratio! {
    /// Trailing average EBITDA margin growth.
    AverageEbitdaMarginGrowth {
        name: "average_ebitda_margin_growth",
        label: "Average EBITDA Margin Growth",
        description: "20-period trailing average of EBITDA margin growth",
        category: Earnings,
        fields: [EBITDA, REVENUE],
        compute: |inputs| earnings::average_ebitda_margin_growth(
            &inputs.field(EBITDA)?,
            &inputs.field(REVENUE)?,
        ),
    }
}

ratio! {
    /// Trailing average EPS growth.
    AverageEpsGrowth {
        name: "average_eps_growth",
        label: "Average EPS Growth",
        description: "20-period trailing average of EPS growth",
        category: Earnings,
        fields: [BASIC_EPS],
        compute: |inputs| earnings::average_eps_growth(&inputs.field(BASIC_EPS)?),
    }
}

ratio! {
    /// Revenue growth relative to its trailing average.
    RevenueGrowthVsAverage {
        name: "revenue_growth_vs_average",
        label: "Revenue Growth vs Average",
        description: "Current revenue growth relative to its 20-period average",
        category: Earnings,
        fields: [REVENUE],
        compute: |inputs| earnings::revenue_growth_vs_average(&inputs.field(REVENUE)?),
    }
}

ratio! {
    /// EPS growth relative to its trailing average.
    EpsGrowthVsAverage {
        name: "eps_growth_vs_average",
        label: "EPS Growth vs Average",
        description: "Current EPS growth relative to its 20-period average",
        category: Earnings,
        fields: [BASIC_EPS],
        compute: |inputs| earnings::eps_growth_vs_average(&inputs.field(BASIC_EPS)?),
    }
}

ratio! {
    /// EBITDA margin relative to its trailing average.
    EbitdaMarginVsAverage {
        name: "ebitda_margin_vs_average",
        label: "EBITDA Margin vs Average",
        description: "Current EBITDA margin relative to its 20-period average",
        category: Earnings,
        fields: [EBITDA, REVENUE],
        compute: |inputs| earnings::ebitda_margin_vs_average(
            &inputs.field(EBITDA)?,
            &inputs.field(REVENUE)?,
        ),
    }
}

ratio! {
    /// Gross margin relative to its trailing average.
    GrossMarginVsAverage {
        name: "gross_margin_vs_average",
        label: "Gross Margin vs Average",
        description: "Current gross margin relative to its 20-period average",
        category: Earnings,
        fields: [GROSS_MARGIN],
        compute: |inputs| earnings::gross_margin_vs_average(&inputs.field(GROSS_MARGIN)?),
    }
}

ratio! {
    /// EBITDA over revenue.
    EbitdaMargin {
        name: "ebitda_margin",
        label: "EBITDA Margin",
        description: "EBITDA as a fraction of revenue",
        category: Earnings,
        fields: [EBITDA, REVENUE],
        compute: |inputs| Ok(earnings::ebitda_margin(
            &inputs.field(EBITDA)?,
            &inputs.field(REVENUE)?,
        )),
    }
}

ratio! {
    /// Return on equity.
    ReturnOnEquity {
        name: "return_on_equity",
        label: "ROE",
        description: "Net income over total equity",
        category: Earnings,
        fields: [NET_INCOME, TOTAL_EQUITY],
        compute: |inputs| Ok(earnings::return_on_equity(
            &inputs.field(NET_INCOME)?,
            &inputs.field(TOTAL_EQUITY)?,
        )),
    }
}

ratio! {
    /// Return on equity relative to its trailing average.
    RoeVsAverage {
        name: "roe_vs_average",
        label: "ROE vs Average",
        description: "Current ROE relative to its 20-period average",
        category: Earnings,
        fields: [NET_INCOME, TOTAL_EQUITY],
        compute: |inputs| earnings::roe_vs_average(
            &inputs.field(NET_INCOME)?,
            &inputs.field(TOTAL_EQUITY)?,
        ),
    }
}

ratio! {
    /// Return on assets.
    ReturnOnAssets {
        name: "return_on_assets",
        label: "ROA",
        description: "Net income over total assets",
        category: Earnings,
        fields: [NET_INCOME, TOTAL_ASSETS],
        compute: |inputs| Ok(earnings::return_on_assets(
            &inputs.field(NET_INCOME)?,
            &inputs.field(TOTAL_ASSETS)?,
        )),
    }
}

ratio! {
    /// Return on assets relative to its trailing average.
    RoaVsAverage {
        name: "roa_vs_average",
        label: "ROA vs Average",
        description: "Current ROA relative to its 20-period average",
        category: Earnings,
        fields: [NET_INCOME, TOTAL_ASSETS],
        compute: |inputs| earnings::roa_vs_average(
            &inputs.field(NET_INCOME)?,
            &inputs.field(TOTAL_ASSETS)?,
        ),
    }
}

ratio! {
    /// Reported revenue over the consensus estimate.
    RevenueVsEstimate {
        name: "revenue_vs_estimate",
        label: "Revenue vs Estimate",
        description: "Reported revenue relative to the consensus estimate",
        category: Earnings,
        fields: [REVENUE, REVENUE_ESTIMATE],
        compute: |inputs| Ok(earnings::revenue_vs_estimate(
            &inputs.field(REVENUE)?,
            &inputs.field(REVENUE_ESTIMATE)?,
        )),
    }
}

ratio! {
    /// Implied share count over the implied estimated share count.
    SharesOutstandingVsEstimate {
        name: "shares_outstanding_vs_estimate",
        label: "Shares Outstanding vs Estimate",
        description: "Net income per EPS relative to the estimated net income per estimated EPS",
        category: Earnings,
        fields: [NET_INCOME, BASIC_EPS, NET_INCOME_ESTIMATE, EPS_ESTIMATE],
        compute: |inputs| Ok(earnings::shares_outstanding_vs_estimate(
            &inputs.field(NET_INCOME)?,
            &inputs.field(BASIC_EPS)?,
            &inputs.field(NET_INCOME_ESTIMATE)?,
            &inputs.field(EPS_ESTIMATE)?,
        )),
    }
}

ratio! {
    /// Period-over-period free-cash-flow growth.
    FcfGrowth {
        name: "fcf_growth",
        label: "FCF Growth",
        description: "Free cash flow growth over the prior period",
        category: Earnings,
        fields: [FREE_CASH_FLOW],
        compute: |inputs| earnings::fcf_growth(&inputs.field(FREE_CASH_FLOW)?),
    }
}

ratio! {
    /// Trailing five-period average free-cash-flow growth.
    FcfAverageGrowth {
        name: "fcf_average_growth",
        label: "FCF Average Growth",
        description: "5-period trailing average of free cash flow growth",
        category: Earnings,
        fields: [FREE_CASH_FLOW],
        compute: |inputs| earnings::fcf_average_growth(&inputs.field(FREE_CASH_FLOW)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Ratio, RatioCategory, Table,
        frequency::SeriesTransform,
        series::tests::yearly,
        traits::RatioInputs,
    };

    #[test]
    fn test_metadata() {
        assert_eq!(PiotroskiFScore.required_fields().len(), 9);
        assert_eq!(PiotroskiFScore.category(), RatioCategory::Earnings);
        assert_eq!(ReturnOnEquity.label(), "ROE");
        assert_eq!(
            SharesOutstandingVsEstimate.required_fields(),
            &[NET_INCOME, BASIC_EPS, NET_INCOME_ESTIMATE, EPS_ESTIMATE]
        );
    }

    #[test]
    fn test_revenue_growth_streak() {
        let table = Table::new().with_column(REVENUE, yearly(&[100.0, 90.0, 95.0, 105.0, 120.0]));
        let inputs = RatioInputs::new(&table, SeriesTransform::Identity, 365.0);

        let running = RevenueConsecutiveGrowth.compute(&inputs).unwrap();
        let longest = RevenueGrowthStreak.compute(&inputs).unwrap();
        assert_eq!(running, longest);
        assert_eq!(running.values()[4], Some(3.0));
    }

    #[test]
    fn test_trailing_transform_reaches_formula() {
        let table = Table::new().with_column(REVENUE, yearly(&[1.0, 1.0, 2.0, 2.0]));
        let inputs = RatioInputs::new(&table, SeriesTransform::TrailingPeriods(2), 365.0);

        // Trailing sums 2, 3, 4
        let growth = RevenueGrowth.compute(&inputs).unwrap();
        assert_eq!(growth.len(), 3);
        assert_eq!(growth.values()[1], Some(0.5));
    }
}
