//! Date-indexed time series with nullable values.
//!
//! [`TimeSeries`] is the universal input and output type of the crate. Every
//! series is sorted ascending by date with unique timestamps, and missing or
//! non-finite observations are stored as `None`.
//!
//! Binary arithmetic on `&TimeSeries` aligns both operands on the union of
//! their timestamps. A missing operand produces a missing result, and division
//! by zero produces a missing result rather than an infinity.

use crate::{RatioError, Result, window};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{Add, Div, Mul, Sub};

/// An ordered sequence of `(date, value)` observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Create a series from parallel date and value vectors.
    ///
    /// The observations are sorted by date. When a date occurs more than once
    /// the last observation wins. Non-finite values become missing.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(RatioError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        Ok(Self::from_points(dates.into_iter().zip(values)))
    }

    /// Create a series from plain floats, treating `NaN` as missing.
    pub fn from_values(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        Self::new(dates, values.into_iter().map(Some).collect())
    }

    /// Create a series from `(date, value)` pairs in any order.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut points: Vec<_> = points.into_iter().collect();
        // Stable sort keeps insertion order among duplicate dates.
        points.sort_by_key(|(date, _)| *date);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(points.len());
        let mut values: Vec<Option<f64>> = Vec::with_capacity(points.len());
        for (date, value) in points {
            let value = value.filter(|v| v.is_finite());
            match (dates.last(), values.last_mut()) {
                (Some(last), Some(slot)) if *last == date => *slot = value,
                _ => {
                    dates.push(date);
                    values.push(value);
                }
            }
        }

        Self { dates, values }
    }

    /// Build from already sorted, unique dates.
    pub(crate) fn from_sorted(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Self { dates, values }
    }

    /// An empty series.
    pub const fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of observations, including missing ones.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Observation dates in ascending order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observation values, aligned with [`Self::dates`].
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterate over `(date, value)` pairs, from either end.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at a given date. `None` when the date is absent or the value missing.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .and_then(|idx| self.values[idx])
    }

    /// Number of non-missing observations.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Apply `f` to every non-missing value.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        self.filter_map(|v| Some(f(v)))
    }

    /// Apply `f` to every non-missing value; `None` marks the result missing.
    pub fn filter_map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> Option<f64>,
    {
        Self::from_sorted(
            self.dates.clone(),
            self.values.iter().map(|v| v.and_then(&f)).collect(),
        )
    }

    /// Combine two series elementwise on the union of their dates.
    ///
    /// `f` is only called where both sides have a value.
    pub fn zip_with<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(f64, f64) -> Option<f64>,
    {
        if self.dates == other.dates {
            let values = self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => f(*a, *b),
                    _ => None,
                })
                .collect();
            return Self::from_sorted(self.dates.clone(), values);
        }

        let dates: Vec<NaiveDate> = self
            .dates
            .iter()
            .chain(&other.dates)
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let values = dates
            .iter()
            .map(|date| match (self.get(*date), other.get(*date)) {
                (Some(a), Some(b)) => f(a, b),
                _ => None,
            })
            .collect();
        Self::from_sorted(dates, values)
    }

    /// Replace exact zeros with missing values.
    pub fn nonzero(&self) -> Self {
        self.filter_map(|v| (v != 0.0).then_some(v))
    }

    /// Absolute values.
    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    /// Clamp every value to `[lower, upper]`.
    pub fn clip(&self, lower: f64, upper: f64) -> Self {
        self.map(|v| v.clamp(lower, upper))
    }

    /// Shift values forward by `periods` positions, leaving leading gaps missing.
    pub fn shift(&self, periods: usize) -> Result<Self> {
        window::evaluate_series(self, window::lagged(periods))
    }

    /// Round every value to `decimals` places.
    pub fn round(&self, decimals: u32) -> Self {
        self.map(|v| round_to(v, decimals))
    }

    /// Drop missing observations.
    pub fn drop_missing(&self) -> Self {
        let (dates, values) = self
            .iter()
            .filter(|(_, value)| value.is_some())
            .unzip();
        Self { dates, values }
    }

    /// Values at `dates`, missing where this series has no observation.
    pub fn reindex(&self, dates: &[NaiveDate]) -> Self {
        Self::from_points(dates.iter().map(|date| (*date, self.get(*date))))
    }
}

/// Align several series on the union of their dates.
///
/// Returns the shared date axis and one value column per input series.
pub fn align(series: &[&TimeSeries]) -> (Vec<NaiveDate>, Vec<Vec<Option<f64>>>) {
    let dates: Vec<NaiveDate> = series
        .iter()
        .flat_map(|s| s.dates().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns = series
        .iter()
        .map(|s| dates.iter().map(|date| s.get(*date)).collect())
        .collect();
    (dates, columns)
}

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Division with a zero or missing denominator yielding missing.
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

impl Add for &TimeSeries {
    type Output = TimeSeries;

    fn add(self, rhs: Self) -> TimeSeries {
        self.zip_with(rhs, |a, b| Some(a + b))
    }
}

impl Sub for &TimeSeries {
    type Output = TimeSeries;

    fn sub(self, rhs: Self) -> TimeSeries {
        self.zip_with(rhs, |a, b| Some(a - b))
    }
}

impl Mul for &TimeSeries {
    type Output = TimeSeries;

    fn mul(self, rhs: Self) -> TimeSeries {
        self.zip_with(rhs, |a, b| Some(a * b))
    }
}

impl Div for &TimeSeries {
    type Output = TimeSeries;

    fn div(self, rhs: Self) -> TimeSeries {
        self.zip_with(rhs, safe_div)
    }
}

impl Add<f64> for &TimeSeries {
    type Output = TimeSeries;

    fn add(self, rhs: f64) -> TimeSeries {
        self.map(|v| v + rhs)
    }
}

impl Sub<f64> for &TimeSeries {
    type Output = TimeSeries;

    fn sub(self, rhs: f64) -> TimeSeries {
        self.map(|v| v - rhs)
    }
}

impl Mul<f64> for &TimeSeries {
    type Output = TimeSeries;

    fn mul(self, rhs: f64) -> TimeSeries {
        self.map(|v| v * rhs)
    }
}
