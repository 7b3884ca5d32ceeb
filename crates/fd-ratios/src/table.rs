//! Named collections of time series.
//!
//! A [`Table`] maps metric names (e.g. `"Revenue"`, `"Total Assets"`) to
//! [`TimeSeries`]. Columns share a conceptual time axis but need not be
//! literally aligned. Tables are both the input contract of the ratio
//! orchestrator and the shape of its output.

use crate::{RatioError, Result, TimeSeries, series::align};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Format used for dates in input and output frames.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordered mapping from column name to time series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, TimeSeries)>,
}

impl Table {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Insert a column, replacing any existing column with the same name.
    pub fn insert(&mut self, name: impl Into<String>, series: TimeSeries) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = series,
            None => self.columns.push((name, series)),
        }
    }

    /// Builder-style [`Self::insert`].
    pub fn with_column(mut self, name: impl Into<String>, series: TimeSeries) -> Self {
        self.insert(name, series);
        self
    }

    /// Append every column of `other`, replacing same-named columns.
    pub fn extend(&mut self, other: Self) {
        for (name, series) in other.columns {
            self.insert(name, series);
        }
    }

    /// Column by name.
    pub fn get(&self, name: &str) -> Option<&TimeSeries> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, series)| series)
    }

    /// Column by name, failing with [`RatioError::MissingField`] when absent.
    pub fn field(&self, name: &str) -> Result<&TimeSeries> {
        self.get(name)
            .ok_or_else(|| RatioError::MissingField(name.to_string()))
    }

    /// Whether a column exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, series)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeSeries)> + '_ {
        self.columns
            .iter()
            .map(|(name, series)| (name.as_str(), series))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Build a table from a wide DataFrame with one row per date.
    ///
    /// `date_column` may hold a polars `Date` or `YYYY-MM-DD` strings. Every
    /// other non-text column becomes a `Float64` series.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let dates = parse_dates(df, date_column)?;
        let mut table = Self::new();

        for (name, values) in numeric_columns(df, &[date_column])? {
            let points = dates
                .iter()
                .zip(values)
                .filter_map(|(date, value)| date.map(|d| (d, value)));
            table.insert(name, TimeSeries::from_points(points));
        }

        Ok(table)
    }

    /// Split a long-format DataFrame into one table per symbol.
    pub fn split_by_symbol(
        df: &DataFrame,
        symbol_column: &str,
        date_column: &str,
    ) -> Result<BTreeMap<String, Self>> {
        let dates = parse_dates(df, date_column)?;
        let symbols: Vec<Option<String>> = df
            .column(symbol_column)
            .map_err(|_| RatioError::MissingField(symbol_column.to_string()))?
            .cast(&DataType::String)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s| s.map(str::to_string))
            .collect();

        let mut rows: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, symbol) in symbols.into_iter().enumerate() {
            if let Some(symbol) = symbol {
                rows.entry(symbol).or_default().push(idx);
            }
        }

        let columns = numeric_columns(df, &[date_column, symbol_column])?;
        let tables = rows
            .into_iter()
            .map(|(symbol, indices)| {
                let mut table = Self::new();
                for (name, values) in &columns {
                    let points = indices
                        .iter()
                        .filter_map(|&idx| dates[idx].map(|d| (d, values[idx])));
                    table.insert(name.clone(), TimeSeries::from_points(points));
                }
                (symbol, table)
            })
            .collect();

        Ok(tables)
    }

    /// Render as a DataFrame aligned on the union of column dates.
    ///
    /// The first column is `date` (`YYYY-MM-DD` strings), followed by one
    /// `Float64` column per series.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let series: Vec<&TimeSeries> = self.columns.iter().map(|(_, s)| s).collect();
        let (dates, values) = align(&series);

        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        let date_strings: Vec<String> = dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();
        columns.push(Column::new("date".into(), date_strings));
        for ((name, _), column) in self.columns.iter().zip(values) {
            columns.push(Column::new(name.as_str().into(), column));
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl FromIterator<(String, TimeSeries)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, TimeSeries)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, series) in iter {
            table.insert(name, series);
        }
        table
    }
}

fn parse_dates(df: &DataFrame, date_column: &str) -> Result<Vec<Option<NaiveDate>>> {
    let column = df
        .column(date_column)
        .map_err(|_| RatioError::MissingField(date_column.to_string()))?
        .cast(&DataType::String)?;

    column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(parse_date).transpose())
        .collect()
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    // Datetime columns render with a time suffix.
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|_| RatioError::InvalidDate(text.to_string()))
}

fn numeric_columns(df: &DataFrame, skip: &[&str]) -> Result<Vec<(String, Vec<Option<f64>>)>> {
    let mut columns = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if skip.contains(&name)
            || matches!(
                column.dtype(),
                DataType::String | DataType::Date | DataType::Datetime(_, _)
            )
        {
            continue;
        }
        let values: Vec<Option<f64>> = column
            .cast(&DataType::Float64)?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        columns.push((name.to_string(), values));
    }
    Ok(columns)
}
