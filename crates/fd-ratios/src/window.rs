//! Polars evaluation of window expressions over a single value column.
//!
//! Shifts, fixed-count rolling statistics and date-ranged rolling sums are
//! written as lazy expressions over a `value` column (plus a `date` column
//! for date-ranged windows) and collected back into plain values.
//! Non-finite results come back as missing.

use crate::{Result, TimeSeries};
use polars::prelude::*;
use polars::series::IsSorted;

const VALUE: &str = "value";
const DATE: &str = "date";

/// The value column.
pub(crate) fn value() -> Expr {
    col(VALUE)
}

/// The date column, only present in [`evaluate_dated`].
pub(crate) fn date() -> Expr {
    col(DATE)
}

/// The value column shifted forward by `periods` positions.
pub(crate) fn lagged(periods: usize) -> Expr {
    value().shift(lit(periods as i64))
}

/// Sign-safe percentage change over `lag` positions.
pub(crate) fn pct_change(lag: usize) -> Expr {
    (value() - lagged(lag)) / lagged(lag).abs()
}

/// Fixed window over `window` observations needing `min_periods` valid ones.
pub(crate) fn fixed_window(window: usize, min_periods: usize) -> RollingOptionsFixedWindow {
    let window_size = window.max(1);
    RollingOptionsFixedWindow {
        window_size,
        min_periods: min_periods.clamp(1, window_size),
        ..Default::default()
    }
}

/// Evaluate `expr` over a bare value slice.
pub(crate) fn evaluate(values: &[Option<f64>], expr: Expr) -> Result<Vec<Option<f64>>> {
    let df = DataFrame::new(vec![Column::new(VALUE.into(), values)])?;
    collect_values(df.lazy(), expr)
}

/// Evaluate `expr` over the values of a series, keeping its dates.
pub(crate) fn evaluate_series(series: &TimeSeries, expr: Expr) -> Result<TimeSeries> {
    let values = evaluate(series.values(), expr)?;
    Ok(TimeSeries::from_sorted(series.dates().to_vec(), values))
}

/// Evaluate `expr` with both the `date` and `value` columns of a series.
pub(crate) fn evaluate_dated(series: &TimeSeries, expr: Expr) -> Result<TimeSeries> {
    let mut dates =
        DateChunked::from_naive_date(DATE.into(), series.dates().iter().copied()).into_series();
    dates.set_sorted_flag(IsSorted::Ascending);
    let df = DataFrame::new(vec![
        dates.into_column(),
        Column::new(VALUE.into(), series.values()),
    ])?;
    let values = collect_values(df.lazy(), expr)?;
    Ok(TimeSeries::from_sorted(series.dates().to_vec(), values))
}

fn collect_values(frame: LazyFrame, expr: Expr) -> Result<Vec<Option<f64>>> {
    let out = frame
        .select([expr.cast(DataType::Float64).alias(VALUE)])
        .collect()?;
    let values = out
        .column(VALUE)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}
