//! Reporting frequency, fiscal-year conventions and per-call series transforms.

use crate::{
    RatioError, Result, TimeSeries,
    aggregate::{
        aggregate_fiscal_year_ending, aggregate_trailing_n, aggregate_ttm, fiscal_year_closing,
        trailing_mean_n,
    },
};
use chrono::{Datelike, Days, Months, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// How raw fields are aggregated before a ratio formula sees them.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyMode {
    /// Use the raw series as supplied
    #[default]
    None,
    /// Sum over the exchange's fiscal year
    FiscalYear,
    /// Sum over a trailing 365-day window
    TrailingTwelveMonth,
}

/// How a field behaves over a reporting period.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Accumulates over the period (revenue, net income, cash flows)
    #[default]
    Flow,
    /// Measured at a point in time (balances, share counts, prices)
    Stock,
}

/// Fiscal-year-end month and day.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("{month:02}-{day:02}")]
pub struct FiscalYearEnd {
    /// Month of the fiscal-year end (1-12)
    pub month: u32,
    /// Day of the fiscal-year end
    pub day: u32,
}

impl FiscalYearEnd {
    /// Calendar year ending December 31.
    pub const CALENDAR: Self = Self { month: 12, day: 31 };

    /// Indian fiscal year ending March 31.
    pub const INDIAN: Self = Self { month: 3, day: 31 };

    /// Fiscal-year end used by an exchange.
    ///
    /// NYSE and NASDAQ report on the calendar year. Every other identifier,
    /// including unknown ones, uses the Indian convention.
    pub fn for_exchange(exchange: &str) -> Self {
        match exchange.trim().to_ascii_uppercase().as_str() {
            "NYSE" | "NASDAQ" => Self::CALENDAR,
            _ => Self::INDIAN,
        }
    }

    /// Whether `date` falls on the fiscal-year end.
    pub fn is_anchor(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }

    /// First day of the fiscal year ending on `anchor`.
    pub fn year_start(&self, anchor: NaiveDate) -> NaiveDate {
        anchor
            .checked_sub_months(Months::new(12))
            .and_then(|prior| prior.checked_add_days(Days::new(1)))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for FiscalYearEnd {
    fn default() -> Self {
        Self::INDIAN
    }
}

/// Fiscal-year end for an exchange identifier.
pub fn fiscal_year_end(exchange: &str) -> FiscalYearEnd {
    FiscalYearEnd::for_exchange(exchange)
}

/// Transform applied to every raw field of a ratio call.
///
/// The orchestrator picks one transform per call; formulas never branch on
/// frequency themselves. Flow fields are summed over the window and stock
/// fields keep their as-of value (or the window mean for trailing periods).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeriesTransform {
    /// Pass the series through unchanged
    #[default]
    Identity,
    /// Fiscal-year sums
    FiscalYear(FiscalYearEnd),
    /// Trailing 365-day sums
    TrailingTwelveMonth,
    /// Sums of the most recent `n` observations
    TrailingPeriods(usize),
}

impl SeriesTransform {
    /// Select the transform for a call.
    ///
    /// A frequency mode other than [`FrequencyMode::None`] takes precedence
    /// over a legacy `trailing` window.
    pub fn select(
        frequency: FrequencyMode,
        exchange: &str,
        trailing: Option<usize>,
    ) -> Result<Self> {
        match (frequency, trailing) {
            (FrequencyMode::FiscalYear, _) => Ok(Self::FiscalYear(fiscal_year_end(exchange))),
            (FrequencyMode::TrailingTwelveMonth, _) => Ok(Self::TrailingTwelveMonth),
            (FrequencyMode::None, Some(0)) => Err(RatioError::InvalidParameter(
                "trailing window must be at least 1".to_string(),
            )),
            (FrequencyMode::None, Some(n)) => Ok(Self::TrailingPeriods(n)),
            (FrequencyMode::None, None) => Ok(Self::Identity),
        }
    }

    /// Apply the transform to one raw field of the given kind.
    pub fn apply(&self, series: &TimeSeries, kind: FieldKind) -> Result<TimeSeries> {
        match (self, kind) {
            (Self::Identity, _) | (Self::TrailingTwelveMonth, FieldKind::Stock) => {
                Ok(series.clone())
            }
            (Self::FiscalYear(fye), FieldKind::Flow) => {
                Ok(aggregate_fiscal_year_ending(series, *fye))
            }
            (Self::FiscalYear(fye), FieldKind::Stock) => Ok(fiscal_year_closing(series, *fye)),
            (Self::TrailingTwelveMonth, FieldKind::Flow) => aggregate_ttm(series),
            (Self::TrailingPeriods(n), FieldKind::Flow) => aggregate_trailing_n(series, *n),
            (Self::TrailingPeriods(n), FieldKind::Stock) => trailing_mean_n(series, *n),
        }
    }

    /// Display name for a ratio computed under this transform.
    pub fn label(&self, label: &str) -> String {
        match self {
            Self::Identity => label.to_string(),
            Self::FiscalYear(_) => format!("FY {label}"),
            Self::TrailingTwelveMonth => format!("TTM {label}"),
            Self::TrailingPeriods(n) => format!("Trailing {n} {label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{date, yearly};
    use rstest::rstest;

    #[rstest]
    #[case("NYSE", FiscalYearEnd::CALENDAR)]
    #[case("nasdaq", FiscalYearEnd::CALENDAR)]
    #[case("NSE", FiscalYearEnd::INDIAN)]
    #[case("BSE", FiscalYearEnd::INDIAN)]
    #[case("LSE", FiscalYearEnd::INDIAN)]
    #[case("", FiscalYearEnd::INDIAN)]
    fn test_exchange_convention(#[case] exchange: &str, #[case] expected: FiscalYearEnd) {
        assert_eq!(fiscal_year_end(exchange), expected);
    }

    #[test]
    fn test_year_start() {
        assert_eq!(
            FiscalYearEnd::INDIAN.year_start(date(2024, 3, 31)),
            date(2023, 4, 1)
        );
        assert_eq!(
            FiscalYearEnd::CALENDAR.year_start(date(2023, 12, 31)),
            date(2023, 1, 1)
        );
    }

    #[test]
    fn test_transform_selection() {
        assert_eq!(
            SeriesTransform::select(FrequencyMode::FiscalYear, "NYSE", Some(4)).unwrap(),
            SeriesTransform::FiscalYear(FiscalYearEnd::CALENDAR)
        );
        assert_eq!(
            SeriesTransform::select(FrequencyMode::None, "NSE", Some(4)).unwrap(),
            SeriesTransform::TrailingPeriods(4)
        );
        assert_eq!(
            SeriesTransform::select(FrequencyMode::None, "NSE", None).unwrap(),
            SeriesTransform::Identity
        );
        assert!(SeriesTransform::select(FrequencyMode::None, "NSE", Some(0)).is_err());
    }

    #[rstest]
    #[case(FieldKind::Flow, vec![Some(1.0), Some(3.0), Some(6.0), Some(10.0)])]
    #[case(FieldKind::Stock, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])]
    fn test_ttm_sums_flows_only(#[case] kind: FieldKind, #[case] expected: Vec<Option<f64>>) {
        let quarters = TimeSeries::from_values(
            vec![date(2023, 3, 31), date(2023, 6, 30), date(2023, 9, 30), date(2023, 12, 31)],
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();

        let result = SeriesTransform::TrailingTwelveMonth
            .apply(&quarters, kind)
            .unwrap();
        assert_eq!(result.values(), expected.as_slice());
    }

    #[test]
    fn test_trailing_periods_average_stocks() {
        let series = yearly(&[100.0, 200.0, 600.0]);
        let transform = SeriesTransform::TrailingPeriods(2);

        let flow = transform.apply(&series, FieldKind::Flow).unwrap();
        let stock = transform.apply(&series, FieldKind::Stock).unwrap();
        assert_eq!(flow.values(), &[Some(300.0), Some(800.0)]);
        assert_eq!(stock.values(), &[Some(150.0), Some(400.0)]);
    }

    #[test]
    fn test_labels() {
        let fy = SeriesTransform::FiscalYear(FiscalYearEnd::INDIAN);
        assert_eq!(fy.label("Debt to Equity"), "FY Debt to Equity");
        assert_eq!(
            SeriesTransform::TrailingTwelveMonth.label("Interest Coverage"),
            "TTM Interest Coverage"
        );
        assert_eq!(SeriesTransform::Identity.label("ROE"), "ROE");
    }
}
