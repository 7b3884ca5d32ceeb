//! Financial health ratios.

use super::fields::*;
use crate::formulas::health::{self, AltmanInputs};

ratio! {
    /// Total debt over total equity.
    DebtToEquity {
        name: "debt_to_equity",
        label: "Debt to Equity",
        description: "Total debt relative to shareholders' equity",
        category: FinancialHealth,
        fields: [TOTAL_DEBT, TOTAL_EQUITY],
        compute: |inputs| Ok(health::debt_to_equity(
            &inputs.field(TOTAL_DEBT)?,
            &inputs.field(TOTAL_EQUITY)?,
        )),
    }
}

ratio! {
    /// EBITDA over the absolute interest expense.
    InterestCoverage {
        name: "interest_coverage",
        label: "Interest Coverage",
        description: "How many times EBITDA covers interest expense",
        category: FinancialHealth,
        fields: [EBITDA, INTEREST_EXPENSE],
        compute: |inputs| Ok(health::interest_coverage(
            &inputs.field(EBITDA)?,
            &inputs.field(INTEREST_EXPENSE)?,
        )),
    }
}

ratio! {
    /// Current assets over current liabilities.
    CurrentRatio {
        name: "current_ratio",
        label: "Current Ratio",
        description: "Short-term assets relative to short-term obligations",
        category: FinancialHealth,
        fields: [TOTAL_CURRENT_ASSETS, TOTAL_CURRENT_LIABILITIES],
        compute: |inputs| Ok(health::current_ratio(
            &inputs.field(TOTAL_CURRENT_ASSETS)?,
            &inputs.field(TOTAL_CURRENT_LIABILITIES)?,
        )),
    }
}

ratio! {
    /// Days inventory plus days sales outstanding minus days payables.
    ///
    /// The day count comes from the call: 365 for annual statements and a
    /// quarter of that for quarterly ones.
    CashConversionCycle {
        name: "cash_conversion_cycle",
        label: "Cash Conversion Cycle",
        description: "Days between paying suppliers and collecting from customers",
        category: FinancialHealth,
        fields: [
            TOTAL_INVENTORIES,
            COST_OF_GOODS_SOLD,
            ACCOUNTS_RECEIVABLE,
            REVENUE,
            ACCOUNTS_PAYABLE,
        ],
        compute: |inputs| Ok(health::cash_conversion_cycle(
            &inputs.field(TOTAL_INVENTORIES)?,
            &inputs.field(COST_OF_GOODS_SOLD)?,
            &inputs.field(ACCOUNTS_RECEIVABLE)?,
            &inputs.field(REVENUE)?,
            &inputs.field(ACCOUNTS_PAYABLE)?,
            inputs.days(),
        )),
    }
}

ratio! {
    /// Altman Z-score bankruptcy predictor.
    AltmanZScore {
        name: "altman_z_score",
        label: "Altman Z-Score",
        description: "Weighted combination of five balance-sheet and income ratios predicting distress",
        category: FinancialHealth,
        fields: [
            TOTAL_CURRENT_ASSETS,
            TOTAL_CURRENT_LIABILITIES,
            TOTAL_ASSETS,
            EBIT,
            SHARES_OUTSTANDING,
            REVENUE,
            TOTAL_LIABILITIES,
            RETAINED_EARNINGS,
            STOCK_PRICE,
        ],
        compute: |inputs| {
            let current_assets = inputs.field(TOTAL_CURRENT_ASSETS)?;
            let current_liabilities = inputs.field(TOTAL_CURRENT_LIABILITIES)?;
            let total_assets = inputs.field(TOTAL_ASSETS)?;
            let ebit = inputs.field(EBIT)?;
            let shares_outstanding = inputs.field(SHARES_OUTSTANDING)?;
            let revenue = inputs.field(REVENUE)?;
            let total_liabilities = inputs.field(TOTAL_LIABILITIES)?;
            let retained_earnings = inputs.field(RETAINED_EARNINGS)?;
            let stock_price = inputs.field(STOCK_PRICE)?;

            Ok(health::altman_z_score(&AltmanInputs {
                current_assets: &current_assets,
                current_liabilities: &current_liabilities,
                total_assets: &total_assets,
                ebit: &ebit,
                shares_outstanding: &shares_outstanding,
                revenue: &revenue,
                total_liabilities: &total_liabilities,
                retained_earnings: &retained_earnings,
                stock_price: &stock_price,
            }))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Ratio, RatioCategory, Table,
        formulas::health::DAYS_PER_QUARTER,
        frequency::SeriesTransform,
        series::tests::yearly,
        traits::RatioInputs,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_metadata() {
        let ratio = DebtToEquity;
        assert_eq!(ratio.name(), "debt_to_equity");
        assert_eq!(ratio.label(), "Debt to Equity");
        assert_eq!(ratio.category(), RatioCategory::FinancialHealth);
        assert_eq!(ratio.required_fields(), &["Total Debt", "Total Equity"]);
        assert_eq!(AltmanZScore.required_fields().len(), 9);
    }

    #[test]
    fn test_cash_conversion_cycle_uses_call_days() {
        let table = Table::new()
            .with_column(TOTAL_INVENTORIES, yearly(&[100.0]))
            .with_column(COST_OF_GOODS_SOLD, yearly(&[365.0]))
            .with_column(ACCOUNTS_RECEIVABLE, yearly(&[0.0]))
            .with_column(REVENUE, yearly(&[365.0]))
            .with_column(ACCOUNTS_PAYABLE, yearly(&[0.0]));
        let inputs = RatioInputs::new(&table, SeriesTransform::Identity, DAYS_PER_QUARTER);

        let result = CashConversionCycle.compute(&inputs).unwrap();
        assert_relative_eq!(result.values()[0].unwrap(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let table = Table::new().with_column(TOTAL_DEBT, yearly(&[1.0]));
        let inputs = RatioInputs::new(&table, SeriesTransform::Identity, 365.0);

        let err = DebtToEquity.compute(&inputs).unwrap_err();
        assert_eq!(err.missing_field(), Some(TOTAL_EQUITY));
    }
}
