//! Ratio registry for discovery and dependency declaration.
//!
//! The registry maps ratio names to implementations and publishes the input
//! fields each ratio needs, so a caller can check a table for completeness
//! before computing anything.

use crate::{Ratio, RatioError, Result, ratios};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;

/// Ratio category for grouping and batch collection.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioCategory {
    /// Leverage, liquidity and solvency
    #[display("financial_health")]
    FinancialHealth,
    /// Growth, margins and returns
    #[display("earnings")]
    Earnings,
    /// Stability of profit and cash flow
    #[display("quality")]
    Quality,
    /// Price relative to fundamentals
    #[display("valuation")]
    Valuation,
}

impl RatioCategory {
    /// Every category in collection order.
    pub const ALL: [Self; 4] = [
        Self::FinancialHealth,
        Self::Earnings,
        Self::Quality,
        Self::Valuation,
    ];
}

impl FromStr for RatioCategory {
    type Err = RatioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "financial_health" | "health" => Ok(Self::FinancialHealth),
            "earnings" => Ok(Self::Earnings),
            "quality" => Ok(Self::Quality),
            "valuation" => Ok(Self::Valuation),
            other => Err(RatioError::InvalidParameter(format!(
                "unknown ratio category '{other}'"
            ))),
        }
    }
}

/// Metadata for ratio introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioInfo {
    /// Ratio name (unique identifier)
    pub name: String,
    /// Output column label
    pub label: String,
    /// Human-readable description
    pub description: String,
    /// Ratio category
    pub category: RatioCategory,
    /// Required input fields
    pub required_fields: Vec<String>,
}

impl RatioInfo {
    fn of(ratio: &dyn Ratio) -> Self {
        Self {
            name: ratio.name().to_string(),
            label: ratio.label().to_string(),
            description: ratio.description().to_string(),
            category: ratio.category(),
            required_fields: ratio.required_fields().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Registry for ratio discovery and lookup.
///
/// Iteration follows registration order.
#[derive(Debug, Default)]
pub struct RatioRegistry {
    ratios: HashMap<String, Arc<dyn Ratio>>,
    order: Vec<String>,
}

impl RatioRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the full ratio catalogue.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Financial health
        registry.register(Arc::new(ratios::DebtToEquity));
        registry.register(Arc::new(ratios::InterestCoverage));
        registry.register(Arc::new(ratios::CurrentRatio));
        registry.register(Arc::new(ratios::CashConversionCycle));
        registry.register(Arc::new(ratios::AltmanZScore));

        // Earnings
        registry.register(Arc::new(ratios::PiotroskiFScore));
        registry.register(Arc::new(ratios::RevenueGrowth));
        registry.register(Arc::new(ratios::EpsGrowth));
        registry.register(Arc::new(ratios::RevenueConsecutiveGrowth));
        registry.register(Arc::new(ratios::EpsConsecutiveGrowth));
        registry.register(Arc::new(ratios::RevenueGrowthStreak));
        registry.register(Arc::new(ratios::EpsGrowthStreak));
        registry.register(Arc::new(ratios::AverageRevenueGrowth));
        registry.register(Arc::new(ratios::AverageGrossMargin));
        registry.register(Arc::new(ratios::AverageGrossMarginGrowth));
        registry.register(Arc::new(ratios::AverageEbitdaMargin));
        registry.register(Arc::new(ratios::AverageEbitdaMarginGrowth));
        registry.register(Arc::new(ratios::AverageEpsGrowth));
        registry.register(Arc::new(ratios::RevenueGrowthVsAverage));
        registry.register(Arc::new(ratios::EpsGrowthVsAverage));
        registry.register(Arc::new(ratios::EbitdaMarginVsAverage));
        registry.register(Arc::new(ratios::GrossMarginVsAverage));
        registry.register(Arc::new(ratios::EbitdaMargin));
        registry.register(Arc::new(ratios::ReturnOnEquity));
        registry.register(Arc::new(ratios::RoeVsAverage));
        registry.register(Arc::new(ratios::ReturnOnAssets));
        registry.register(Arc::new(ratios::RoaVsAverage));
        registry.register(Arc::new(ratios::RevenueVsEstimate));
        registry.register(Arc::new(ratios::SharesOutstandingVsEstimate));
        registry.register(Arc::new(ratios::FcfGrowth));
        registry.register(Arc::new(ratios::FcfAverageGrowth));

        // Quality
        registry.register(Arc::new(ratios::Aicr));
        registry.register(Arc::new(ratios::ProfitDips));
        registry.register(Arc::new(ratios::RoicBand));
        registry.register(Arc::new(ratios::CfoBand));
        registry.register(Arc::new(ratios::FcfDips));
        registry.register(Arc::new(ratios::NegativeFcfYears));
        registry.register(Arc::new(ratios::FcfToProfitBand));

        // Valuation
        registry.register(Arc::new(ratios::SteadyStateValue));
        registry.register(Arc::new(ratios::FairValueVsMarketPrice));
        registry.register(Arc::new(ratios::PriceToRevenueBand));
        registry.register(Arc::new(ratios::PriceToEarningsBand));
        registry.register(Arc::new(ratios::PriceToCfoBand));
        registry.register(Arc::new(ratios::FcfYield));

        registry
    }

    /// Register a ratio, replacing any ratio with the same name.
    pub fn register(&mut self, ratio: Arc<dyn Ratio>) {
        let name = ratio.name().to_string();
        if self.ratios.insert(name.clone(), ratio).is_none() {
            self.order.push(name);
        }
    }

    /// Get a ratio by name.
    pub fn get(&self, name: &str) -> Option<&dyn Ratio> {
        self.ratios.get(name).map(|r| r.as_ref())
    }

    /// Get a ratio by name, failing with [`RatioError::NotFound`].
    pub fn resolve(&self, name: &str) -> Result<&dyn Ratio> {
        self.get(name)
            .ok_or_else(|| RatioError::NotFound(name.to_string()))
    }

    /// Ratios in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Ratio> + '_ {
        self.order.iter().filter_map(|name| self.get(name))
    }

    /// Get ratios by category.
    pub fn by_category(&self, category: RatioCategory) -> Vec<&dyn Ratio> {
        self.iter().filter(|r| r.category() == category).collect()
    }

    /// Get all ratio metadata.
    pub fn all_info(&self) -> Vec<RatioInfo> {
        self.iter().map(RatioInfo::of).collect()
    }

    /// Metadata for one ratio.
    pub fn info(&self, name: &str) -> Result<RatioInfo> {
        self.resolve(name).map(RatioInfo::of)
    }

    /// Get all ratio names.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Fields required by a ratio.
    pub fn required_fields(&self, name: &str) -> Result<&[&str]> {
        Ok(self.resolve(name)?.required_fields())
    }

    /// Union of the fields required by every registered ratio.
    pub fn all_fields(&self) -> BTreeSet<&str> {
        self.iter()
            .flat_map(|r| r.required_fields().iter().copied())
            .collect()
    }

    /// Union of the fields required by the ratios in `categories`.
    pub fn fields_for_categories(&self, categories: &[RatioCategory]) -> BTreeSet<&str> {
        self.iter()
            .filter(|r| categories.contains(&r.category()))
            .flat_map(|r| r.required_fields().iter().copied())
            .collect()
    }

    /// Fields a ratio needs that are not in `available`.
    pub fn missing_fields(&self, available: &[&str], name: &str) -> Result<Vec<&str>> {
        Ok(self
            .required_fields(name)?
            .iter()
            .copied()
            .filter(|field| !available.contains(field))
            .collect())
    }

    /// Availability of each field a ratio needs.
    pub fn check_fields(&self, available: &[&str], name: &str) -> Result<BTreeMap<&str, bool>> {
        Ok(self
            .required_fields(name)?
            .iter()
            .map(|field| (*field, available.contains(field)))
            .collect())
    }

    /// Number of registered ratios.
    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}
