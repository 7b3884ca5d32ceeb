//! Valuation ratios.

use super::fields::*;
use crate::formulas::valuation;

ratio! {
    /// Steady-state value upside.
    SteadyStateValue {
        name: "steady_state_value",
        label: "Steady State Value",
        description: "Percent upside of EPS capitalized at WACC over the stock price",
        category: Valuation,
        fields: [BASIC_EPS, WACC, STOCK_PRICE],
        compute: |inputs| Ok(valuation::steady_state_value(
            &inputs.field(BASIC_EPS)?,
            &inputs.field(WACC)?,
            &inputs.field(STOCK_PRICE)?,
        )),
    }
}

ratio! {
    /// Gap between fair value and market price.
    FairValueVsMarketPrice {
        name: "fair_value_vs_market_price",
        label: "Fair Value vs Market Price",
        description: "Absolute percent gap between a growth-adjusted fair value and the price",
        category: Valuation,
        fields: [NET_INCOME, TOTAL_ASSETS, TOTAL_LIABILITIES, BASIC_EPS, STOCK_PRICE],
        compute: |inputs| valuation::fair_value_vs_market_price(
            &inputs.field(NET_INCOME)?,
            &inputs.field(TOTAL_ASSETS)?,
            &inputs.field(TOTAL_LIABILITIES)?,
            &inputs.field(BASIC_EPS)?,
            &inputs.field(STOCK_PRICE)?,
        ),
    }
}

ratio! {
    /// Band of price to revenue per share.
    PriceToRevenueBand {
        name: "price_to_revenue_band",
        label: "Price to Revenue Band",
        description: "P/S deviation from its trailing three-period history",
        category: Valuation,
        fields: [STOCK_PRICE, REVENUE, SHARES_OUTSTANDING],
        compute: |inputs| valuation::price_to_revenue_band(
            &inputs.field(STOCK_PRICE)?,
            &inputs.field(REVENUE)?,
            &inputs.field(SHARES_OUTSTANDING)?,
        ),
    }
}

ratio! {
    /// Band of price to earnings.
    PriceToEarningsBand {
        name: "price_to_earnings_band",
        label: "Price to Earnings Band",
        description: "P/E deviation from its trailing three-period history",
        category: Valuation,
        fields: [STOCK_PRICE, BASIC_EPS],
        compute: |inputs| valuation::price_to_earnings_band(
            &inputs.field(STOCK_PRICE)?,
            &inputs.field(BASIC_EPS)?,
        ),
    }
}

ratio! {
    /// Band of price to operating cash flow per share.
    PriceToCfoBand {
        name: "price_to_cfo_band",
        label: "Price to CFO Band",
        description: "P/CFO deviation from its trailing three-period history",
        category: Valuation,
        fields: [STOCK_PRICE, OPERATING_CASH_FLOW, SHARES_OUTSTANDING],
        compute: |inputs| valuation::price_to_cfo_band(
            &inputs.field(STOCK_PRICE)?,
            &inputs.field(OPERATING_CASH_FLOW)?,
            &inputs.field(SHARES_OUTSTANDING)?,
        ),
    }
}

ratio! {
    /// Free cash flow yield.
    FcfYield {
        name: "fcf_yield",
        label: "FCF Yield",
        description: "Free cash flow over market capitalization, in percent",
        category: Valuation,
        fields: [FREE_CASH_FLOW, STOCK_PRICE, SHARES_OUTSTANDING],
        compute: |inputs| Ok(valuation::fcf_yield(
            &inputs.field(FREE_CASH_FLOW)?,
            &inputs.field(STOCK_PRICE)?,
            &inputs.field(SHARES_OUTSTANDING)?,
        )),
    }
}
