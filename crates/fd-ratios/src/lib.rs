#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratios/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod error;
pub mod formulas;
pub mod frequency;
pub mod growth;
pub mod orchestrator;
pub mod ratios;
pub mod registry;
pub mod rolling;
pub mod series;
pub mod table;
pub mod traits;
mod window;

// Re-export core types
pub use error::{RatioError, Result};
pub use frequency::{FieldKind, FiscalYearEnd, FrequencyMode, SeriesTransform};
pub use growth::{Axis, Lag};
pub use orchestrator::{RatioFrame, RatioParams, Ratios, RatiosConfig};
pub use registry::{RatioCategory, RatioInfo, RatioRegistry};
pub use rolling::BandConfig;
pub use series::TimeSeries;
pub use table::Table;
pub use traits::{Ratio, RatioInputs};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
