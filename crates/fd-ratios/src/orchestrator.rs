//! Per-entity ratio calculation.
//!
//! [`Ratios`] holds one entity's [`Table`] and computes ratios by name.
//! A single call resolves the ratio, picks one [`SeriesTransform`] from the
//! call parameters, computes, labels, optionally applies growth and rounds
//! last. [`Ratios::calculate`] reports every failure to its caller; the
//! `collect*` batch methods log failures and substitute empty columns so that
//! one bad ratio never aborts a batch.

use crate::{
    RatioCategory, RatioError, RatioRegistry, Result, Table, TimeSeries,
    formulas::health::{DAYS_PER_QUARTER, DAYS_PER_YEAR},
    frequency::{FrequencyMode, SeriesTransform},
    growth::{Axis, DEFAULT_ROUNDING, Lag, lag_label, table_growth},
    traits::{Ratio, RatioInputs},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Aligned multi-column ratio output.
pub type RatioFrame = Table;

/// Entity-level defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatiosConfig {
    /// Decimal places when a call does not set its own
    pub rounding: u32,
    /// Whether statements are quarterly; selects the day count
    pub quarterly: bool,
    /// Exchange identifier used for the fiscal-year convention
    pub exchange: String,
}

impl Default for RatiosConfig {
    fn default() -> Self {
        Self {
            rounding: DEFAULT_ROUNDING,
            quarterly: false,
            exchange: "NSE".to_string(),
        }
    }
}

impl RatiosConfig {
    /// Day count for day-based ratios.
    pub const fn days(&self) -> f64 {
        if self.quarterly {
            DAYS_PER_QUARTER
        } else {
            DAYS_PER_YEAR
        }
    }
}

/// Per-call parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioParams {
    /// Decimal places, falling back to [`RatiosConfig::rounding`]
    pub rounding: Option<u32>,
    /// Replace the ratio with its period-over-period growth
    pub growth: bool,
    /// Growth lag or lags
    pub lag: Lag,
    /// Sum each field over the last `n` observations
    pub trailing: Option<usize>,
    /// Aggregation applied to every field; takes precedence over `trailing`
    pub frequency: FrequencyMode,
    /// Exchange override for the fiscal-year convention
    pub exchange: Option<String>,
}

impl RatioParams {
    /// Set the rounding.
    pub fn with_rounding(mut self, rounding: u32) -> Self {
        self.rounding = Some(rounding);
        self
    }

    /// Request growth over `lag`.
    pub fn with_growth(mut self, lag: impl Into<Lag>) -> Self {
        self.growth = true;
        self.lag = lag.into();
        self
    }

    /// Set a trailing observation window.
    pub fn with_trailing(mut self, trailing: usize) -> Self {
        self.trailing = Some(trailing);
        self
    }

    /// Set the frequency mode.
    pub fn with_frequency(mut self, frequency: FrequencyMode) -> Self {
        self.frequency = frequency;
        self
    }

    /// Override the exchange.
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Reject lags of zero and empty lag lists.
    pub fn validate(&self) -> Result<()> {
        let periods = self.lag.periods();
        if periods.is_empty() {
            return Err(RatioError::InvalidParameter("lag list is empty".to_string()));
        }
        if periods.contains(&0) {
            return Err(RatioError::InvalidParameter("lag must be positive".to_string()));
        }
        Ok(())
    }
}

/// Ratio calculator for one entity.
#[derive(Debug, Clone)]
pub struct Ratios {
    table: Table,
    config: RatiosConfig,
    registry: Arc<RatioRegistry>,
}

impl Ratios {
    /// Calculator over `table` with the full ratio catalogue.
    pub fn new(table: Table, config: RatiosConfig) -> Self {
        Self::with_registry(table, config, Arc::new(RatioRegistry::with_defaults()))
    }

    /// Calculator sharing an existing registry.
    pub const fn with_registry(
        table: Table,
        config: RatiosConfig,
        registry: Arc<RatioRegistry>,
    ) -> Self {
        Self {
            table,
            config,
            registry,
        }
    }

    /// Input table.
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Entity defaults.
    pub const fn config(&self) -> &RatiosConfig {
        &self.config
    }

    /// Ratio registry.
    pub fn registry(&self) -> &RatioRegistry {
        &self.registry
    }

    /// Compute one ratio.
    ///
    /// Fails with [`RatioError::NotFound`] for an unknown name, and with the
    /// ratio's own error when a field is missing or history is too short.
    pub fn calculate(&self, name: &str, params: &RatioParams) -> Result<RatioFrame> {
        let ratio = self.registry.resolve(name)?;
        params.validate()?;
        let transform = self.transform(params)?;
        debug!(ratio = name, ?transform, "computing ratio");

        let inputs = RatioInputs::new(&self.table, transform, self.config.days());
        let series = ratio.compute(&inputs)?;
        let frame = Table::new().with_column(transform.label(ratio.label()), series);

        let rounding = params.rounding.unwrap_or(self.config.rounding);
        if params.growth {
            table_growth(&frame, &params.lag, Some(rounding), Axis::Index)
        } else {
            Ok(frame
                .iter()
                .map(|(label, series)| (label.to_string(), series.round(rounding)))
                .collect())
        }
    }

    /// Compute several ratios into one frame.
    ///
    /// Unknown names and invalid parameters fail the whole batch before any
    /// computation. Per-ratio failures are logged and produce empty columns.
    pub fn collect(&self, names: &[&str], params: &RatioParams) -> Result<RatioFrame> {
        let ratios = names
            .iter()
            .map(|name| self.registry.resolve(name))
            .collect::<Result<Vec<_>>>()?;
        params.validate()?;
        let transform = self.transform(params)?;

        let mut frame = RatioFrame::new();
        for ratio in ratios {
            let labels = output_labels(ratio, transform, params);
            frame.extend(self.calculate(ratio.name(), params).or_empty(ratio.name(), &labels));
        }
        Ok(frame)
    }

    /// Compute every ratio of a category.
    pub fn collect_category(
        &self,
        category: RatioCategory,
        params: &RatioParams,
    ) -> Result<RatioFrame> {
        let names: Vec<&str> = self
            .registry
            .by_category(category)
            .into_iter()
            .map(|r| r.name())
            .collect();
        self.collect(&names, params)
    }

    /// Compute every registered ratio.
    pub fn collect_all(&self, params: &RatioParams) -> Result<RatioFrame> {
        self.collect(&self.registry.names(), params)
    }

    /// Compute all financial health ratios.
    pub fn collect_financial_health_ratios(&self, params: &RatioParams) -> Result<RatioFrame> {
        self.collect_category(RatioCategory::FinancialHealth, params)
    }

    /// Compute all earnings ratios.
    pub fn collect_earnings_ratios(&self, params: &RatioParams) -> Result<RatioFrame> {
        self.collect_category(RatioCategory::Earnings, params)
    }

    /// Compute all quality ratios.
    pub fn collect_quality_ratios(&self, params: &RatioParams) -> Result<RatioFrame> {
        self.collect_category(RatioCategory::Quality, params)
    }

    /// Compute all valuation ratios.
    pub fn collect_valuation_ratios(&self, params: &RatioParams) -> Result<RatioFrame> {
        self.collect_category(RatioCategory::Valuation, params)
    }

    fn transform(&self, params: &RatioParams) -> Result<SeriesTransform> {
        let exchange = params.exchange.as_deref().unwrap_or(&self.config.exchange);
        SeriesTransform::select(params.frequency, exchange, params.trailing)
    }
}

/// Column labels a successful call would produce.
fn output_labels(ratio: &dyn Ratio, transform: SeriesTransform, params: &RatioParams) -> Vec<String> {
    let label = transform.label(ratio.label());
    match &params.lag {
        Lag::Multiple(lags) if params.growth => {
            lags.iter().map(|&lag| lag_label(&label, lag)).collect()
        }
        _ => vec![label],
    }
}

/// Empty-on-error conversion for the batch layer.
trait OrEmpty {
    fn or_empty(self, ratio: &str, labels: &[String]) -> RatioFrame;
}

impl OrEmpty for Result<RatioFrame> {
    fn or_empty(self, ratio: &str, labels: &[String]) -> RatioFrame {
        self.unwrap_or_else(|error| {
            match error.missing_field() {
                Some(field) => warn!(ratio, field, %error, "ratio skipped"),
                None => warn!(ratio, %error, "ratio skipped"),
            }
            labels
                .iter()
                .map(|label| (label.clone(), TimeSeries::empty()))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ratios::fields::*,
        series::tests::{date, yearly},
    };
    use approx::assert_relative_eq;

    fn ratios() -> Ratios {
        let table = Table::new()
            .with_column(TOTAL_DEBT, yearly(&[50.0, 60.0, 90.0]))
            .with_column(TOTAL_EQUITY, yearly(&[100.0, 100.0, 100.0]))
            .with_column(REVENUE, yearly(&[3.0, 6.0, 9.0]))
            .with_column(EBITDA, yearly(&[1.0, 1.0, 2.0]));
        Ratios::new(table, RatiosConfig::default())
    }

    #[test]
    fn test_config_defaults() {
        let config = RatiosConfig::default();
        assert_eq!(config.rounding, 4);
        assert_eq!(config.exchange, "NSE");
        assert_relative_eq!(config.days(), 365.0);

        let quarterly = RatiosConfig {
            quarterly: true,
            ..config
        };
        assert_relative_eq!(quarterly.days(), 91.25);
    }

    #[test]
    fn test_calculate_plain() {
        let frame = ratios()
            .calculate("debt_to_equity", &RatioParams::default())
            .unwrap();
        let column = frame.get("Debt to Equity").unwrap();
        assert_eq!(column.values(), &[Some(0.5), Some(0.6), Some(0.9)]);
    }

    #[test]
    fn test_calculate_rounds_last() {
        let params = RatioParams::default().with_rounding(2);
        let frame = ratios().calculate("ebitda_margin", &params).unwrap();
        assert_eq!(
            frame.get("EBITDA Margin").unwrap().values(),
            &[Some(0.33), Some(0.17), Some(0.22)]
        );
    }

    #[test]
    fn test_calculate_growth_single_lag_keeps_label() {
        let params = RatioParams::default().with_growth(1);
        let frame = ratios().calculate("debt_to_equity", &params).unwrap();
        assert_eq!(frame.column_names().collect::<Vec<_>>(), vec!["Debt to Equity"]);
        assert_eq!(frame.get("Debt to Equity").unwrap().values()[2], Some(0.5));
    }

    #[test]
    fn test_calculate_growth_multiple_lags() {
        let params = RatioParams::default().with_growth(vec![1, 2]);
        let frame = ratios().calculate("debt_to_equity", &params).unwrap();
        assert_eq!(
            frame.column_names().collect::<Vec<_>>(),
            vec!["Debt to Equity (Lag 1)", "Debt to Equity (Lag 2)"]
        );
        assert_eq!(frame.get("Debt to Equity (Lag 2)").unwrap().values()[2], Some(0.8));
    }

    #[test]
    fn test_calculate_labels_follow_transform() {
        let ratios = ratios();
        let fy = RatioParams::default()
            .with_frequency(FrequencyMode::FiscalYear)
            .with_exchange("NYSE");
        let frame = ratios.calculate("current_ratio", &fy);
        assert!(matches!(frame, Err(RatioError::MissingField(_))));

        let frame = ratios.calculate("debt_to_equity", &fy).unwrap();
        assert!(frame.contains("FY Debt to Equity"));

        let ttm = RatioParams::default().with_frequency(FrequencyMode::TrailingTwelveMonth);
        assert!(ratios.calculate("debt_to_equity", &ttm).unwrap().contains("TTM Debt to Equity"));

        let trailing = RatioParams::default().with_trailing(2);
        let frame = ratios.calculate("debt_to_equity", &trailing).unwrap();
        let column = frame.get("Trailing 2 Debt to Equity").unwrap();
        assert_eq!(column.dates(), &[date(2016, 12, 31), date(2017, 12, 31)]);
        assert_eq!(column.values(), &[Some(0.55), Some(0.75)]);
    }

    #[test]
    fn test_calculate_errors() {
        let ratios = ratios();
        assert!(matches!(
            ratios.calculate("momentum", &RatioParams::default()),
            Err(RatioError::NotFound(_))
        ));
        assert!(matches!(
            ratios.calculate("debt_to_equity", &RatioParams::default().with_growth(0)),
            Err(RatioError::InvalidParameter(_))
        ));
        assert!(matches!(
            ratios.calculate("debt_to_equity", &RatioParams::default().with_trailing(0)),
            Err(RatioError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_collect_substitutes_empty_columns() {
        let frame = ratios()
            .collect(&["debt_to_equity", "current_ratio"], &RatioParams::default())
            .unwrap();
        assert_eq!(
            frame.column_names().collect::<Vec<_>>(),
            vec!["Debt to Equity", "Current Ratio"]
        );
        assert!(frame.get("Current Ratio").unwrap().is_empty());
    }

    #[test]
    fn test_collect_empty_columns_follow_lags() {
        let params = RatioParams::default().with_growth(vec![1, 4]);
        let frame = ratios().collect(&["current_ratio"], &params).unwrap();
        assert_eq!(
            frame.column_names().collect::<Vec<_>>(),
            vec!["Current Ratio (Lag 1)", "Current Ratio (Lag 4)"]
        );
    }

    #[test]
    fn test_collect_rejects_unknown_names() {
        let result = ratios().collect(&["debt_to_equity", "momentum"], &RatioParams::default());
        assert!(matches!(result, Err(RatioError::NotFound(name)) if name == "momentum"));
    }

    #[test]
    fn test_collect_category() {
        let frame = ratios()
            .collect_financial_health_ratios(&RatioParams::default())
            .unwrap();
        assert_eq!(frame.len(), 5);
        assert!(!frame.get("Debt to Equity").unwrap().is_empty());
        assert!(frame.get("Altman Z-Score").unwrap().is_empty());
    }

    #[test]
    fn test_params_from_json() {
        let params: RatioParams =
            serde_json::from_str(r#"{"growth": true, "lag": [1, 4], "frequency": "fiscal_year"}"#)
                .unwrap();
        assert!(params.growth);
        assert_eq!(params.lag, Lag::Multiple(vec![1, 4]));
        assert_eq!(params.frequency, FrequencyMode::FiscalYear);
        assert_eq!(params.rounding, None);
    }
}
