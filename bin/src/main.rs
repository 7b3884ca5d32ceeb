//! CLI for the fd-ratios financial ratio library.
//!
//! Lists and describes the ratio catalogue, reports the input fields ratios
//! need, and computes ratios from a CSV of financial-statement data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fd_ratios::{
    FrequencyMode, Lag, RatioCategory, RatioError, RatioParams, RatioRegistry, Ratios,
    RatiosConfig, Table,
};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fd-ratios")]
#[command(about = "Corporate-finance ratios from financial-statement data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available ratios
    List,
    /// Show information about a specific ratio
    Info {
        /// Ratio name
        ratio: String,
    },
    /// Show the input fields needed by ratios or categories
    Fields {
        /// Ratio names or categories
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Compute ratios from a CSV file
    Compute(ComputeArgs),
}

#[derive(Debug, clap::Args)]
struct ComputeArgs {
    /// CSV with a `date` column, an optional `symbol` column and one column per field
    #[arg(long, short)]
    input: PathBuf,
    /// Ratio to compute (repeatable)
    #[arg(long = "ratio", conflicts_with = "categories")]
    ratios: Vec<String>,
    /// Category to compute (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,
    /// JSON file with call parameters; flags override its fields
    #[arg(long)]
    params: Option<PathBuf>,
    /// Aggregation applied to every field
    #[arg(long, value_enum)]
    frequency: Option<Frequency>,
    /// Exchange identifier for the fiscal-year convention
    #[arg(long)]
    exchange: Option<String>,
    /// Sum each field over the last N observations
    #[arg(long)]
    trailing: Option<usize>,
    /// Report period-over-period growth of each ratio
    #[arg(long)]
    growth: bool,
    /// Growth lag; repeat for one column per lag
    #[arg(long)]
    lag: Vec<usize>,
    /// Decimal places
    #[arg(long)]
    rounding: Option<u32>,
    /// Statements are quarterly
    #[arg(long)]
    quarterly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Frequency {
    None,
    Fy,
    Ttm,
}

impl From<Frequency> for FrequencyMode {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::None => Self::None,
            Frequency::Fy => Self::FiscalYear,
            Frequency::Ttm => Self::TrailingTwelveMonth,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = RatioRegistry::with_defaults();

    let result = match cli.command {
        Commands::List => {
            list_ratios(&registry);
            Ok(())
        }
        Commands::Info { ratio } => show_ratio_info(&registry, &ratio),
        Commands::Fields { targets } => show_fields(&registry, &targets),
        Commands::Compute(args) => compute(registry, &args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// List all available ratios grouped by category.
fn list_ratios(registry: &RatioRegistry) {
    println!("Available Ratios ({} total)\n", registry.len());

    for category in RatioCategory::ALL {
        println!("{category}:");
        for ratio in registry.by_category(category) {
            println!("  {} - {}", ratio.name(), ratio.description());
        }
        println!();
    }
}

/// Show detailed information about a specific ratio.
fn show_ratio_info(registry: &RatioRegistry, name: &str) -> Result<()> {
    let info = registry.info(name)?;

    println!("Ratio: {}", info.name);
    println!("Label: {}", info.label);
    println!("Category: {}", info.category);
    println!("Description: {}", info.description);
    println!("Required fields:");
    for field in &info.required_fields {
        println!("  - {field}");
    }
    Ok(())
}

/// Union of the fields needed by ratio names and category names.
fn show_fields(registry: &RatioRegistry, targets: &[String]) -> Result<()> {
    for field in target_fields(registry, targets)? {
        println!("{field}");
    }
    Ok(())
}

/// Resolve each target as a ratio name, then as a category.
fn target_fields<'a>(
    registry: &'a RatioRegistry,
    targets: &[String],
) -> Result<BTreeSet<&'a str>> {
    let mut fields = BTreeSet::new();
    for target in targets {
        match registry.get(target) {
            Some(ratio) => fields.extend(ratio.required_fields().iter().copied()),
            None => {
                let category: RatioCategory = target
                    .parse()
                    .map_err(|_| RatioError::NotFound(target.clone()))?;
                fields.extend(registry.fields_for_categories(&[category]));
            }
        }
    }
    Ok(fields)
}

/// Compute the requested ratios for every entity in the input file.
fn compute(registry: RatioRegistry, args: &ComputeArgs) -> Result<()> {
    let params = call_params(args)?;
    let config = RatiosConfig {
        quarterly: args.quarterly,
        ..Default::default()
    };

    let df = read_csv(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let entities = if df.get_column_names().iter().any(|name| name.as_str() == "symbol") {
        Table::split_by_symbol(&df, "symbol", "date")?
    } else {
        BTreeMap::from([(String::new(), Table::from_dataframe(&df, "date")?)])
    };
    info!(entities = entities.len(), rows = df.height(), "loaded input");

    let registry = Arc::new(registry);
    let categories = args
        .categories
        .iter()
        .map(|c| c.parse::<RatioCategory>())
        .collect::<fd_ratios::Result<Vec<_>>>()?;

    for (symbol, table) in entities {
        let ratios = Ratios::with_registry(table, config.clone(), Arc::clone(&registry));
        let frame = if !args.ratios.is_empty() {
            let names: Vec<&str> = args.ratios.iter().map(String::as_str).collect();
            ratios
                .collect(&names, &params)
                .with_context(|| format!("failed to compute ratios for '{symbol}'"))?
        } else if !categories.is_empty() {
            let mut frame = Table::new();
            for category in &categories {
                frame.extend(ratios.collect_category(*category, &params)?);
            }
            frame
        } else {
            ratios.collect_all(&params)?
        };

        if !symbol.is_empty() {
            println!("{symbol}");
        }
        println!("{}", frame.to_dataframe()?);
    }
    Ok(())
}

/// Parameters from the optional JSON file, overridden by flags.
fn call_params(args: &ComputeArgs) -> Result<RatioParams> {
    let mut params = match &args.params {
        Some(path) => load_params(path)?,
        None => RatioParams::default(),
    };

    if let Some(frequency) = args.frequency {
        params.frequency = frequency.into();
    }
    if let Some(exchange) = &args.exchange {
        params.exchange = Some(exchange.clone());
    }
    if let Some(trailing) = args.trailing {
        params.trailing = Some(trailing);
    }
    if let Some(rounding) = args.rounding {
        params.rounding = Some(rounding);
    }
    if args.growth {
        params.growth = true;
    }
    match args.lag.as_slice() {
        [] => {}
        [lag] => params.lag = Lag::Single(*lag),
        lags => params.lag = Lag::Multiple(lags.to_vec()),
    }
    params.validate().context("invalid ratio parameters")?;

    Ok(params)
}

fn load_params(path: &Path) -> Result<RatioParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read params file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse params file {}", path.display()))
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}
