//! Periodic aggregation of point-in-time fundamentals.
//!
//! Statements arrive at arbitrary cadences (quarterly, semiannual, annual).
//! These functions turn a raw series into fiscal-year or trailing sums while
//! keeping the original observation dates:
//!
//! - [`aggregate_fiscal_year`] gives every observation the sum of its most
//!   recent completed fiscal year.
//! - [`aggregate_ttm`] sums a trailing 365-day window.
//! - [`aggregate_trailing_n`] sums the last `n` observations by position.
//!
//! Balance-sheet style fields are never summed. [`fiscal_year_closing`] and
//! [`trailing_mean_n`] are their counterparts for the fiscal-year and
//! trailing-n windows.
//!
//! Windows containing no valid observation produce no output, so an empty or
//! all-missing input always yields an empty series.

use crate::{
    Result, TimeSeries,
    frequency::{FiscalYearEnd, fiscal_year_end},
    window::{date, evaluate_dated, evaluate_series, fixed_window, value},
};
use polars::prelude::*;

/// Length of the trailing-twelve-month window.
pub const TTM_WINDOW_DAYS: u64 = 365;

/// Fiscal-year sums using the fiscal-year end of `exchange`.
pub fn aggregate_fiscal_year(series: &TimeSeries, exchange: &str) -> TimeSeries {
    aggregate_fiscal_year_ending(series, fiscal_year_end(exchange))
}

/// Fiscal-year sums for an explicit fiscal-year end.
///
/// Observations dated on the fiscal-year end are anchors. An anchor's sum
/// covers every observation from one year before the anchor (exclusive)
/// through the anchor itself. Each output date carries the sum of the most
/// recent anchor at or before it; dates before the first anchor are dropped.
pub fn aggregate_fiscal_year_ending(series: &TimeSeries, fye: FiscalYearEnd) -> TimeSeries {
    fiscal_year_windows(series, fye, sum_valid)
}

/// Fiscal-year closing values: the last valid observation of each fiscal
/// year, carried to later dates the same way as [`aggregate_fiscal_year_ending`].
pub fn fiscal_year_closing(series: &TimeSeries, fye: FiscalYearEnd) -> TimeSeries {
    fiscal_year_windows(series, fye, |window| window.iter().rev().find_map(|v| *v))
}

fn fiscal_year_windows<F>(series: &TimeSeries, fye: FiscalYearEnd, reduce: F) -> TimeSeries
where
    F: Fn(&[Option<f64>]) -> Option<f64>,
{
    let dates = series.dates();
    let values = series.values();

    let mut out_dates = Vec::with_capacity(dates.len());
    let mut out_values = Vec::with_capacity(dates.len());
    let mut anchor_value: Option<Option<f64>> = None;

    for (idx, date) in dates.iter().enumerate() {
        if fye.is_anchor(*date) {
            let start = fye.year_start(*date);
            let lo = dates.partition_point(|d| *d < start);
            anchor_value = Some(reduce(&values[lo..=idx]));
        }
        if let Some(carried) = anchor_value {
            out_dates.push(*date);
            out_values.push(carried);
        }
    }

    TimeSeries::from_sorted(out_dates, out_values).drop_missing()
}

/// Trailing-twelve-month sums over `(t - 365 days, t]`.
pub fn aggregate_ttm(series: &TimeSeries) -> Result<TimeSeries> {
    let options = RollingOptionsDynamicWindow {
        window_size: Duration::try_parse(&format!("{TTM_WINDOW_DAYS}d"))?,
        min_periods: 1,
        closed_window: ClosedWindow::Right,
        fn_params: None,
    };
    let valid = value()
        .is_not_null()
        .cast(DataType::Float64)
        .rolling_sum_by(date(), options.clone());
    let sum = value().fill_null(lit(0.0)).rolling_sum_by(date(), options);

    let expr = when(valid.gt(lit(0.0))).then(sum).otherwise(lit(NULL));
    Ok(evaluate_dated(series, expr)?.drop_missing())
}

/// Rolling sums of the most recent `n` observations.
///
/// Only full windows produce output: a window with fewer than `n` valid
/// observations is dropped.
pub fn aggregate_trailing_n(series: &TimeSeries, n: usize) -> Result<TimeSeries> {
    full_windows(series, n, value().rolling_sum(fixed_window(n, n)))
}

/// Rolling means of the most recent `n` observations, full windows only.
pub fn trailing_mean_n(series: &TimeSeries, n: usize) -> Result<TimeSeries> {
    full_windows(series, n, value().rolling_mean(fixed_window(n, n)))
}

fn full_windows(series: &TimeSeries, n: usize, expr: Expr) -> Result<TimeSeries> {
    if n == 0 {
        return Ok(TimeSeries::empty());
    }
    Ok(evaluate_series(series, expr)?.drop_missing())
}

/// Sum of the valid values in a window, `None` if there are none.
fn sum_valid(window: &[Option<f64>]) -> Option<f64> {
    window
        .iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{date, year_ends, yearly};
    use approx::assert_relative_eq;

    fn quarterly_indian() -> TimeSeries {
        TimeSeries::from_values(
            vec![
                date(2022, 6, 30),
                date(2022, 9, 30),
                date(2022, 12, 31),
                date(2023, 3, 31),
                date(2023, 6, 30),
                date(2024, 3, 31),
            ],
            vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
        )
        .unwrap()
    }

    #[test]
    fn test_fiscal_year_indian_convention() {
        let fy = aggregate_fiscal_year(&quarterly_indian(), "NSE");

        assert_eq!(
            fy.dates(),
            &[date(2023, 3, 31), date(2023, 6, 30), date(2024, 3, 31)]
        );
        assert_eq!(fy.values(), &[Some(100.0), Some(100.0), Some(110.0)]);
    }

    #[test]
    fn test_fiscal_year_unknown_exchange_falls_back_to_march() {
        assert_eq!(
            aggregate_fiscal_year(&quarterly_indian(), "XETRA"),
            aggregate_fiscal_year(&quarterly_indian(), "NSE")
        );
    }

    #[test]
    fn test_fiscal_year_one_anchor_per_year() {
        let series = TimeSeries::from_values(
            vec![date(2020, 6, 30), date(2020, 12, 31), date(2021, 12, 31), date(2022, 12, 31)],
            vec![5.0, 10.0, 20.0, 30.0],
        )
        .unwrap();

        let fy = aggregate_fiscal_year(&series, "NYSE");
        assert_eq!(fy.values(), &[Some(15.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_fiscal_year_without_anchor_is_empty() {
        let series = TimeSeries::from_values(
            vec![date(2022, 6, 30), date(2022, 9, 30)],
            vec![1.0, 2.0],
        )
        .unwrap();

        assert!(aggregate_fiscal_year(&series, "NSE").is_empty());
    }

    #[test]
    fn test_ttm_sums_trailing_year() {
        let series = TimeSeries::from_values(
            vec![
                date(2023, 3, 31),
                date(2023, 6, 30),
                date(2023, 9, 30),
                date(2023, 12, 31),
                date(2024, 3, 31),
            ],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();

        let ttm = aggregate_ttm(&series).unwrap();
        assert_eq!(ttm.len(), 5);
        assert_relative_eq!(ttm.get(date(2023, 3, 31)).unwrap(), 1.0);
        assert_relative_eq!(ttm.get(date(2023, 12, 31)).unwrap(), 10.0);
        assert_relative_eq!(ttm.get(date(2024, 3, 31)).unwrap(), 14.0);
    }

    #[test]
    fn test_ttm_single_point() {
        let series = yearly(&[42.0]);
        assert_eq!(aggregate_ttm(&series).unwrap(), series);
    }

    #[test]
    fn test_ttm_window_is_open_on_the_left() {
        let series = TimeSeries::from_values(
            vec![date(2022, 12, 31), date(2023, 1, 1), date(2023, 12, 31)],
            vec![100.0, 10.0, 1.0],
        )
        .unwrap();

        let ttm = aggregate_ttm(&series).unwrap();
        // 2022-12-31 is exactly 365 days back and falls outside the window;
        // 2023-01-01 is 364 days back and falls inside it.
        assert_relative_eq!(ttm.get(date(2023, 12, 31)).unwrap(), 11.0);
        assert_relative_eq!(ttm.get(date(2023, 1, 1)).unwrap(), 110.0);
    }

    #[test]
    fn test_ttm_gap_inside_window() {
        let series = TimeSeries::new(
            vec![date(2023, 3, 31), date(2023, 6, 30), date(2024, 9, 30)],
            vec![Some(1.0), None, None],
        )
        .unwrap();

        let ttm = aggregate_ttm(&series).unwrap();
        assert_eq!(ttm.dates(), &[date(2023, 3, 31), date(2023, 6, 30)]);
        assert_eq!(ttm.values(), &[Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_fiscal_year_closing_takes_last_value() {
        let assets = TimeSeries::new(
            vec![date(2022, 9, 30), date(2022, 12, 31), date(2023, 6, 30), date(2023, 12, 31)],
            vec![Some(80.0), Some(100.0), Some(90.0), None],
        )
        .unwrap();

        let closing = fiscal_year_closing(&assets, FiscalYearEnd::CALENDAR);
        assert_eq!(
            closing.dates(),
            &[date(2022, 12, 31), date(2023, 6, 30), date(2023, 12, 31)]
        );
        assert_eq!(closing.values(), &[Some(100.0), Some(100.0), Some(90.0)]);
    }

    #[test]
    fn test_trailing_mean_requires_full_window() {
        let trailing = trailing_mean_n(&yearly(&[10.0, 20.0, 60.0]), 2).unwrap();
        assert_eq!(trailing.dates(), &year_ends(3)[1..]);
        assert_eq!(trailing.values(), &[Some(15.0), Some(40.0)]);
        assert!(trailing_mean_n(&yearly(&[1.0]), 0).unwrap().is_empty());
    }

    #[test]
    fn test_trailing_n_requires_full_window() {
        let series = TimeSeries::new(
            year_ends(6),
            vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)],
        )
        .unwrap();

        let trailing = aggregate_trailing_n(&series, 2).unwrap();
        let dates = year_ends(6);
        assert_eq!(trailing.dates(), &[dates[1], dates[4], dates[5]]);
        assert_eq!(trailing.values(), &[Some(3.0), Some(9.0), Some(11.0)]);
    }

    #[test]
    fn test_empty_and_missing_inputs() {
        let empty = TimeSeries::empty();
        assert!(aggregate_ttm(&empty).unwrap().is_empty());
        assert!(aggregate_fiscal_year(&empty, "NSE").is_empty());
        assert!(aggregate_trailing_n(&empty, 4).unwrap().is_empty());

        let missing = TimeSeries::new(year_ends(3), vec![None, None, None]).unwrap();
        assert!(aggregate_ttm(&missing).unwrap().is_empty());
        assert!(aggregate_fiscal_year(&missing, "NYSE").is_empty());
        assert!(aggregate_trailing_n(&missing, 1).unwrap().is_empty());
    }
}
