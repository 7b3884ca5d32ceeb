//! Earnings and cash-flow quality ratios.

use super::fields::*;
use crate::formulas::quality;

ratio! {
    /// Annual intrinsic compounding rate.
    Aicr {
        name: "aicr",
        label: "AICR",
        description: "Return on equity times the earnings retention ratio",
        category: Quality,
        fields: [NET_INCOME, TOTAL_ASSETS, TOTAL_LIABILITIES, DIVIDENDS_PAID],
        compute: |inputs| Ok(quality::aicr(
            &inputs.field(NET_INCOME)?,
            &inputs.field(TOTAL_ASSETS)?,
            &inputs.field(TOTAL_LIABILITIES)?,
            &inputs.field(DIVIDENDS_PAID)?,
        )),
    }
}

ratio! {
    /// Profit declines of more than 10% in the last ten periods.
    ProfitDips {
        name: "profit_dips",
        label: "Dips in Profit over 10 Years",
        description: "Count of periods in the last ten where net income fell more than 10%",
        category: Quality,
        fields: [NET_INCOME],
        compute: |inputs| quality::profit_dips(&inputs.field(NET_INCOME)?),
    }
}

ratio! {
    /// Band of return on invested capital.
    RoicBand {
        name: "roic_band",
        label: "ROIC Band",
        description: "ROIC deviation from its trailing 5-10 period history in standard deviations",
        category: Quality,
        fields: [NOPAT, INVESTED_CAPITAL],
        compute: |inputs| quality::roic_band(
            &inputs.field(NOPAT)?,
            &inputs.field(INVESTED_CAPITAL)?,
        ),
    }
}

ratio! {
    /// Band of cash flow from operations.
    CfoBand {
        name: "cfo_band",
        label: "CFO Band",
        description: "Operating cash flow deviation from its trailing 5-10 period history",
        category: Quality,
        fields: [CASH_FLOW_FROM_OPERATIONS],
        compute: |inputs| quality::cfo_band(&inputs.field(CASH_FLOW_FROM_OPERATIONS)?),
    }
}

ratio! {
    /// Free-cash-flow declines in the last ten periods.
    FcfDips {
        name: "fcf_dips",
        label: "Negative Dips in FCF over 10 Years",
        description: "Count of periods in the last ten where free cash flow fell",
        category: Quality,
        fields: [FREE_CASH_FLOW],
        compute: |inputs| quality::fcf_dips(&inputs.field(FREE_CASH_FLOW)?),
    }
}

ratio! {
    /// Periods of negative free cash flow in the last ten.
    NegativeFcfYears {
        name: "negative_fcf_years",
        label: "Negative FCF Years",
        description: "Count of periods in the last ten with negative free cash flow",
        category: Quality,
        fields: [FREE_CASH_FLOW],
        compute: |inputs| quality::negative_fcf_years(&inputs.field(FREE_CASH_FLOW)?),
    }
}

ratio! {
    /// Band of free cash flow over net income.
    FcfToProfitBand {
        name: "fcf_to_profit_band",
        label: "FCF to Profit Band",
        description: "Cash conversion of profit relative to its trailing 5-10 period history",
        category: Quality,
        fields: [FREE_CASH_FLOW, NET_INCOME],
        compute: |inputs| quality::fcf_to_profit_band(
            &inputs.field(FREE_CASH_FLOW)?,
            &inputs.field(NET_INCOME)?,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Ratio, RatioCategory, RatioError, Table,
        frequency::SeriesTransform,
        series::tests::yearly,
        traits::RatioInputs,
    };

    #[test]
    fn test_band_error_reaches_caller() {
        let table = Table::new().with_column(CASH_FLOW_FROM_OPERATIONS, yearly(&[1.0, 2.0]));
        let inputs = RatioInputs::new(&table, SeriesTransform::Identity, 365.0);

        assert!(matches!(
            CfoBand.compute(&inputs),
            Err(RatioError::InsufficientData { required: 5, .. })
        ));
    }

    #[test]
    fn test_metadata() {
        assert_eq!(Aicr.category(), RatioCategory::Quality);
        assert_eq!(RoicBand.required_fields(), &[NOPAT, INVESTED_CAPITAL]);
    }
}
