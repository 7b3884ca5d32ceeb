//! Ratio types, one per catalogue entry.
//!
//! Each type binds a formula from [`crate::formulas`] to its input field
//! names and metadata. They are registered in
//! [`RatioRegistry::with_defaults`](crate::RatioRegistry::with_defaults).

/// Declare a unit ratio type and its [`Ratio`](crate::Ratio) implementation.
macro_rules! ratio {
    (
        $(#[$meta:meta])*
        $ty:ident {
            name: $name:literal,
            label: $label:literal,
            description: $description:literal,
            category: $category:ident,
            fields: [$($field:expr),* $(,)?],
            compute: |$inputs:ident| $body:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl $crate::traits::Ratio for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn label(&self) -> &str {
                $label
            }

            fn description(&self) -> &str {
                $description
            }

            fn category(&self) -> $crate::registry::RatioCategory {
                $crate::registry::RatioCategory::$category
            }

            fn required_fields(&self) -> &[&str] {
                &[$($field),*]
            }

            fn compute(
                &self,
                $inputs: &$crate::traits::RatioInputs<'_>,
            ) -> $crate::Result<$crate::TimeSeries> {
                $body
            }
        }
    };
}

pub mod earnings;
pub mod health;
pub mod quality;
pub mod valuation;

pub use earnings::*;
pub use health::*;
pub use quality::*;
pub use valuation::*;

/// Column names expected in the input table.
pub mod fields {
    use crate::frequency::FieldKind;

    /// Point-in-time fields. Transforms take their as-of value instead of a sum.
    pub const STOCK_FIELDS: &[&str] = &[
        ACCOUNTS_PAYABLE,
        ACCOUNTS_RECEIVABLE,
        GROSS_MARGIN,
        INVESTED_CAPITAL,
        RETAINED_EARNINGS,
        SHARES_OUTSTANDING,
        STOCK_PRICE,
        TOTAL_ASSETS,
        TOTAL_CURRENT_ASSETS,
        TOTAL_CURRENT_LIABILITIES,
        TOTAL_DEBT,
        TOTAL_EQUITY,
        TOTAL_INVENTORIES,
        TOTAL_LIABILITIES,
        WACC,
    ];

    /// How a field aggregates over a period. Names not listed in
    /// [`STOCK_FIELDS`] are flows.
    pub fn kind(name: &str) -> FieldKind {
        if STOCK_FIELDS.contains(&name) {
            FieldKind::Stock
        } else {
            FieldKind::Flow
        }
    }

    /// Accounts payable
    pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable";
    /// Accounts receivable
    pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
    /// Basic earnings per share
    pub const BASIC_EPS: &str = "Basic EPS";
    /// Cash flow from operations, as used by the CFO band
    pub const CASH_FLOW_FROM_OPERATIONS: &str = "Cash Flow from Operations";
    /// Cost of goods sold
    pub const COST_OF_GOODS_SOLD: &str = "Cost of Goods Sold";
    /// Dividends paid
    pub const DIVIDENDS_PAID: &str = "Dividends Paid";
    /// Earnings before interest and taxes
    pub const EBIT: &str = "EBIT";
    /// Earnings before interest, taxes, depreciation and amortization
    pub const EBITDA: &str = "EBITDA";
    /// Consensus EPS estimate
    pub const EPS_ESTIMATE: &str = "EPS Estimate";
    /// Free cash flow
    pub const FREE_CASH_FLOW: &str = "Free Cash Flow";
    /// Gross margin
    pub const GROSS_MARGIN: &str = "Gross Margin";
    /// Interest expense
    pub const INTEREST_EXPENSE: &str = "Interest Expense";
    /// Invested capital
    pub const INVESTED_CAPITAL: &str = "Invested Capital";
    /// Net income
    pub const NET_INCOME: &str = "Net Income";
    /// Consensus net income estimate
    pub const NET_INCOME_ESTIMATE: &str = "Net Income Estimate";
    /// Net operating profit after tax
    pub const NOPAT: &str = "NOPAT";
    /// Operating cash flow
    pub const OPERATING_CASH_FLOW: &str = "Operating Cash Flow";
    /// Retained earnings
    pub const RETAINED_EARNINGS: &str = "Retained Earnings";
    /// Revenue
    pub const REVENUE: &str = "Revenue";
    /// Consensus revenue estimate
    pub const REVENUE_ESTIMATE: &str = "Revenue Estimate";
    /// Shares outstanding
    pub const SHARES_OUTSTANDING: &str = "Shares Outstanding";
    /// Stock price
    pub const STOCK_PRICE: &str = "Stock Price";
    /// Total assets
    pub const TOTAL_ASSETS: &str = "Total Assets";
    /// Total current assets
    pub const TOTAL_CURRENT_ASSETS: &str = "Total Current Assets";
    /// Total current liabilities
    pub const TOTAL_CURRENT_LIABILITIES: &str = "Total Current Liabilities";
    /// Total debt
    pub const TOTAL_DEBT: &str = "Total Debt";
    /// Total equity
    pub const TOTAL_EQUITY: &str = "Total Equity";
    /// Total inventories
    pub const TOTAL_INVENTORIES: &str = "Total Inventories";
    /// Total liabilities
    pub const TOTAL_LIABILITIES: &str = "Total Liabilities";
    /// Weighted average cost of capital
    pub const WACC: &str = "WACC";
}
