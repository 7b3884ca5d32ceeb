//! Period-over-period growth with a sign-safe denominator.
//!
//! Growth is measured against the absolute value of the prior observation:
//!
//! ```text
//! growth[i] = (x[i] - x[i - lag]) / |x[i - lag]|
//! ```
//!
//! so moving from a loss of 100 to a loss of 50 reads as +50% rather than
//! -50%. A zero or missing prior value yields a missing growth value, and
//! gaps are not bridged: the prior is always the observation `lag` positions
//! back.

use crate::{
    Result, Table, TimeSeries,
    series::{align, round_to},
    window,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Default number of decimal places for ratio output.
pub const DEFAULT_ROUNDING: u32 = 4;

/// One or several lag periods for growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lag {
    /// A single lag, producing one series
    Single(usize),
    /// Several lags, producing one labelled series per lag
    Multiple(Vec<usize>),
}

impl Lag {
    /// Lag periods in request order.
    pub fn periods(&self) -> &[usize] {
        match self {
            Self::Single(lag) => std::slice::from_ref(lag),
            Self::Multiple(lags) => lags,
        }
    }
}

impl Default for Lag {
    fn default() -> Self {
        Self::Single(1)
    }
}

impl From<usize> for Lag {
    fn from(lag: usize) -> Self {
        Self::Single(lag)
    }
}

impl From<Vec<usize>> for Lag {
    fn from(lags: Vec<usize>) -> Self {
        Self::Multiple(lags)
    }
}

/// Direction along which tabular growth is computed.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Along time, independently for each column
    #[default]
    Index,
    /// Across columns, independently for each date
    Columns,
}

/// Column label for one lag of a multi-lag growth request.
pub fn lag_label(name: &str, lag: usize) -> String {
    if name.is_empty() {
        format!("Lag {lag}")
    } else {
        format!("{name} (Lag {lag})")
    }
}

/// Growth of a series over `lag` periods, rounded last when `rounding` is set.
pub fn growth(series: &TimeSeries, lag: usize, rounding: Option<u32>) -> Result<TimeSeries> {
    let values = finish(abs_pct_change(series.values(), lag)?, rounding);
    Ok(TimeSeries::from_sorted(series.dates().to_vec(), values))
}

/// Growth of a series for several lags, one column per lag named `Lag n`.
pub fn growth_lags(series: &TimeSeries, lags: &[usize], rounding: Option<u32>) -> Result<Table> {
    lags.iter()
        .map(|&lag| Ok((lag_label("", lag), growth(series, lag, rounding)?)))
        .collect()
}

/// Growth of every column of a table.
///
/// With a single lag the column names are preserved; with several lags each
/// column is expanded into `<name> (Lag n)` columns.
pub fn table_growth(table: &Table, lag: &Lag, rounding: Option<u32>, axis: Axis) -> Result<Table> {
    let mut result = Table::new();
    for &period in lag.periods() {
        let grown: Table = match axis {
            Axis::Index => table
                .iter()
                .map(|(name, series)| Ok((name.to_string(), growth(series, period, rounding)?)))
                .collect::<Result<_>>()?,
            Axis::Columns => row_growth(table, period, rounding)?,
        };
        for (name, series) in grown.iter() {
            let name = match lag {
                Lag::Single(_) => name.to_string(),
                Lag::Multiple(_) => lag_label(name, period),
            };
            result.insert(name, series.clone());
        }
    }
    Ok(result)
}

fn row_growth(table: &Table, lag: usize, rounding: Option<u32>) -> Result<Table> {
    let names: Vec<&str> = table.column_names().collect();
    let series: Vec<&TimeSeries> = table.iter().map(|(_, s)| s).collect();
    let (dates, columns) = align(&series);

    let mut grown: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(dates.len()); names.len()];
    for row_idx in 0..dates.len() {
        let row: Vec<Option<f64>> = columns.iter().map(|column| column[row_idx]).collect();
        for (col_idx, value) in finish(abs_pct_change(&row, lag)?, rounding)
            .into_iter()
            .enumerate()
        {
            grown[col_idx].push(value);
        }
    }

    Ok(names
        .into_iter()
        .zip(grown)
        .map(|(name, values)| {
            (
                name.to_string(),
                TimeSeries::from_sorted(dates.clone(), values),
            )
        })
        .collect())
}

/// Sign-safe percentage change along a slice.
fn abs_pct_change(values: &[Option<f64>], lag: usize) -> Result<Vec<Option<f64>>> {
    window::evaluate(values, window::pct_change(lag))
}

fn finish(values: Vec<Option<f64>>, rounding: Option<u32>) -> Vec<Option<f64>> {
    match rounding {
        Some(decimals) => values
            .into_iter()
            .map(|v| v.map(|x| round_to(x, decimals)))
            .collect(),
        None => values,
    }
}
