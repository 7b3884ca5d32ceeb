//! Stateless ratio formulas.
//!
//! Every formula takes already-resolved input series (raw, or pre-aggregated
//! by the series transform chosen for the call) and returns a new series.
//! Divisions are guarded: a zero denominator yields a missing value at that
//! index instead of an infinity. Formulas built on shifts or rolling windows
//! return [`Result`](crate::Result); bands that need a minimum history
//! surface [`RatioError::InsufficientData`](crate::RatioError::InsufficientData)
//! to the caller.

pub mod earnings;
pub mod health;
pub mod quality;
pub mod valuation;

use crate::{
    Result, TimeSeries,
    series::{align, safe_div},
};

/// Elementwise combination of several series on the union of their dates.
///
/// `f` receives one value per input, in input order, and is only called
/// where every input has a value.
pub(crate) fn combine<F>(inputs: &[&TimeSeries], f: F) -> TimeSeries
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let (dates, columns) = align(inputs);
    let mut row = Vec::with_capacity(columns.len());
    let values = (0..dates.len())
        .map(|idx| {
            row.clear();
            for column in &columns {
                row.push(column[idx]?);
            }
            f(&row)
        })
        .collect();
    TimeSeries::from_sorted(dates, values)
}

/// Relative distance of `current` from `average`: `(current - average) / |average|`.
pub(crate) fn vs_average(current: &TimeSeries, average: &TimeSeries) -> TimeSeries {
    current.zip_with(average, |value, avg| safe_div(value - avg, avg.abs()))
}

/// Period-over-period change by position.
pub(crate) fn change(series: &TimeSeries) -> Result<TimeSeries> {
    Ok(series - &series.shift(1)?)
}

/// `1.0` for true, `0.0` for false.
pub(crate) fn indicator(flag: bool) -> f64 {
    f64::from(u8::from(flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{year_ends, yearly};

    #[test]
    fn test_combine_requires_every_input() {
        let a = yearly(&[1.0, 2.0, 3.0]);
        let b = TimeSeries::new(year_ends(3), vec![Some(1.0), None, Some(1.0)]).unwrap();

        let sum = combine(&[&a, &b], |v| Some(v.iter().sum()));
        assert_eq!(sum.values(), &[Some(2.0), None, Some(4.0)]);
    }

    #[test]
    fn test_vs_average_uses_absolute_average() {
        let current = yearly(&[1.0, -3.0, 5.0]);
        let average = yearly(&[0.0, -2.0, 4.0]);

        let result = vs_average(&current, &average);
        assert_eq!(result.values(), &[None, Some(-0.5), Some(0.25)]);
    }
}
