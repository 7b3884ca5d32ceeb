//! Core trait definitions for ratios.
//!
//! Every ratio implements [`Ratio`]. A ratio never reads the input table
//! directly: it asks [`RatioInputs`] for its fields, which applies the series
//! transform chosen for the call before the formula sees any data.

use crate::{RatioCategory, Result, Table, TimeSeries, frequency::SeriesTransform, ratios::fields};

/// A financial ratio computed from named input fields.
pub trait Ratio: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this ratio.
    ///
    /// Should be snake_case and stable across versions.
    fn name(&self) -> &str;

    /// Display name used as the output column label.
    fn label(&self) -> &str;

    /// Human-readable description of what this ratio measures.
    fn description(&self) -> &str;

    /// Ratio category for grouping and batch collection.
    fn category(&self) -> RatioCategory;

    /// Fields required in the input table.
    fn required_fields(&self) -> &[&str];

    /// Compute the ratio from transformed inputs.
    fn compute(&self, inputs: &RatioInputs<'_>) -> Result<TimeSeries>;
}

/// Field access for one ratio call.
#[derive(Debug, Clone, Copy)]
pub struct RatioInputs<'a> {
    table: &'a Table,
    transform: SeriesTransform,
    days: f64,
}

impl<'a> RatioInputs<'a> {
    /// Create inputs over `table` with a transform and a day count.
    pub const fn new(table: &'a Table, transform: SeriesTransform, days: f64) -> Self {
        Self {
            table,
            transform,
            days,
        }
    }

    /// A field after the call's transform has been applied.
    ///
    /// Flow fields are aggregated and stock fields keep their as-of value;
    /// see [`fields::kind`]. Fails with
    /// [`RatioError::MissingField`](crate::RatioError::MissingField) when the
    /// table has no such column.
    pub fn field(&self, name: &str) -> Result<TimeSeries> {
        self.transform
            .apply(self.table.field(name)?, fields::kind(name))
    }

    /// Day count for day-based ratios.
    pub const fn days(&self) -> f64 {
        self.days
    }
}
