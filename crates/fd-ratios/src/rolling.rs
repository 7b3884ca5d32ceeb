//! Trailing-window statistics and the standardized band.
//!
//! All rolling functions keep the full date index of their input. A window
//! that holds fewer than `min_periods` valid observations yields a missing
//! value at that index. `min_periods` is capped at the window length.

use crate::{
    RatioError, Result, TimeSeries,
    growth::growth,
    series::safe_div,
    window::{evaluate_series, fixed_window, value},
};
use serde::{Deserialize, Serialize};

/// Window used by trailing-average ratios.
pub const AVERAGE_WINDOW: usize = 20;

/// Window and minimum history for [`band`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConfig {
    /// Trailing window length
    pub window: usize,
    /// Minimum number of valid observations
    pub min_window: usize,
}

impl BandConfig {
    /// Bands over five to ten periods of history.
    pub const QUALITY: Self = Self {
        window: 10,
        min_window: 5,
    };

    /// Short bands for price multiples.
    pub const VALUATION: Self = Self {
        window: 3,
        min_window: 1,
    };

    /// Apply the band with this configuration.
    pub fn apply(&self, series: &TimeSeries) -> Result<TimeSeries> {
        band(series, self.window, self.min_window)
    }
}

impl Default for BandConfig {
    fn default() -> Self {
        Self::QUALITY
    }
}

/// Trailing mean over `window` observations.
pub fn rolling_mean(series: &TimeSeries, window: usize, min_periods: usize) -> Result<TimeSeries> {
    evaluate_series(series, value().rolling_mean(fixed_window(window, min_periods)))
}

/// Trailing sample standard deviation (`ddof = 1`) over `window` observations.
pub fn rolling_std(series: &TimeSeries, window: usize, min_periods: usize) -> Result<TimeSeries> {
    evaluate_series(series, value().rolling_std(fixed_window(window, min_periods)))
}

/// Trailing sum over `window` observations.
pub fn rolling_sum(series: &TimeSeries, window: usize, min_periods: usize) -> Result<TimeSeries> {
    evaluate_series(series, value().rolling_sum(fixed_window(window, min_periods)))
}

/// Simple moving average, optionally of the lag-1 growth of `series`.
pub fn rolling_average(
    series: &TimeSeries,
    window: usize,
    growth_first: bool,
    min_periods: usize,
) -> Result<TimeSeries> {
    if growth_first {
        rolling_mean(&growth(series, 1, None)?, window, min_periods)
    } else {
        rolling_mean(series, window, min_periods)
    }
}

/// Deviation of each value from its trailing mean, in trailing standard deviations.
///
/// The effective window is `min(window, len)`. Both the window and the
/// number of non-missing, non-zero observations must reach `min_window`,
/// otherwise [`RatioError::InsufficientData`] is returned. A zero or
/// undefined standard deviation yields a missing value.
pub fn band(series: &TimeSeries, window: usize, min_window: usize) -> Result<TimeSeries> {
    let effective = window.min(series.len());
    if effective < min_window {
        return Err(RatioError::InsufficientData {
            required: min_window,
            available: effective,
        });
    }

    let usable = series
        .values()
        .iter()
        .filter(|v| v.is_some_and(|x| x != 0.0))
        .count();
    if usable < min_window {
        return Err(RatioError::InsufficientData {
            required: min_window,
            available: usable,
        });
    }

    let mean = rolling_mean(series, effective, min_window)?;
    let std = rolling_std(series, effective, min_window)?;
    let values = series
        .values()
        .iter()
        .zip(mean.values().iter().zip(std.values()))
        .map(|(value, (mean, std))| safe_div((*value)? - (*mean)?, (*std)?))
        .collect();

    Ok(TimeSeries::from_sorted(series.dates().to_vec(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{year_ends, yearly};
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_rolling_mean_min_periods() {
        let series = yearly(&[1.0, 2.0, 3.0, 4.0]);

        let lenient = rolling_mean(&series, 2, 1).unwrap();
        assert_eq!(
            lenient.values(),
            &[Some(1.0), Some(1.5), Some(2.5), Some(3.5)]
        );

        let strict = rolling_mean(&series, 2, 2).unwrap();
        assert_eq!(strict.values()[0], None);
        assert_eq!(strict.len(), 4);
    }

    #[test]
    fn test_rolling_mean_skips_missing() {
        let series =
            TimeSeries::new(year_ends(3), vec![Some(2.0), None, Some(4.0)]).unwrap();
        let result = rolling_mean(&series, 3, 1).unwrap();
        assert_eq!(result.values(), &[Some(2.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_rolling_std_is_sample() {
        let result =
            rolling_std(&yearly(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8, 8).unwrap();
        assert_relative_eq!(
            result.values()[7].unwrap(),
            2.138_089_935_299_395,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rolling_sum() {
        let result = rolling_sum(&yearly(&[1.0, 0.0, 1.0, 1.0]), 3, 3).unwrap();
        assert_eq!(result.values(), &[None, None, Some(2.0), Some(2.0)]);
    }

    #[test]
    fn test_rolling_average_of_growth() {
        let result =
            rolling_average(&yearly(&[100.0, 110.0, 121.0]), AVERAGE_WINDOW, true, 1).unwrap();
        assert_eq!(result.values()[0], None);
        assert_relative_eq!(result.values()[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(result.values()[2].unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_band_quality_window() {
        let result = band(&yearly(&[1.0, 2.0, 3.0, 4.0, 5.0]), 10, 5).unwrap();

        assert!(result.values()[..4].iter().all(Option::is_none));
        assert_relative_eq!(
            result.values()[4].unwrap(),
            2.0 / 2.5f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_band_valuation_window() {
        let result = BandConfig::VALUATION
            .apply(&yearly(&[10.0, 12.0, 14.0]))
            .unwrap();

        assert_eq!(result.values()[0], None);
        assert_relative_eq!(result.values()[1].unwrap(), 1.0 / 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(result.values()[2].unwrap(), 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(&[1.0, 2.0, 3.0, 4.0])]
    #[case(&[0.0, 0.0, 1.0, 2.0, 3.0, 4.0])]
    fn test_band_insufficient_history(#[case] values: &[f64]) {
        assert!(matches!(
            band(&yearly(values), 10, 5),
            Err(RatioError::InsufficientData { required: 5, .. })
        ));
    }

    #[test]
    fn test_band_zero_std_is_missing() {
        let result = band(&yearly(&[2.0; 6]), 10, 5).unwrap();
        assert!(result.values().iter().all(Option::is_none));
    }
}
