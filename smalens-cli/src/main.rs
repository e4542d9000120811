//! smalens CLI: list the catalog and print SMA selections from a price CSV.
//!
//! Commands:
//! - `categories`: distinct categories, one per line
//! - `instruments <CATEGORY>`: distinct instruments in a category
//! - `show <CATEGORY> <STOCK>`: the selection with close, SMA 50 and SMA 200
//! - `summary`: row counts, dropped rows, date range, fingerprint

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use smalens_core::export;
use smalens_core::logging::{init_logging, LogConfig};
use smalens_core::{
    Dataset, NullPolicy, Pipeline, PipelineError, Record, TableCache, ViewerConfig, WindowScope,
};
use tracing::{debug, error};

#[derive(Parser)]
#[command(
    name = "smalens",
    about = "smalens CLI: closing prices with 50/200 simple moving averages"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./smalens.toml, then the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Price CSV to read. Overrides the config file and SMALENS_SOURCE.
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Rolling window scope.
    #[arg(long, global = true, value_enum)]
    scope: Option<ScopeArg>,

    /// How null closes affect a window.
    #[arg(long, global = true, value_enum)]
    null_policy: Option<NullPolicyArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List distinct categories.
    Categories,
    /// List distinct instruments in a category.
    Instruments {
        /// Category name, matched exactly.
        category: String,
    },
    /// Print the rows for one category and stock.
    Show {
        category: String,
        stock: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only print the last N rows.
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Report table size, dropped rows, catalog size and fingerprint.
    Summary,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Global,
    PerInstrument,
}

impl From<ScopeArg> for WindowScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Global => WindowScope::Global,
            ScopeArg::PerInstrument => WindowScope::PerInstrument,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NullPolicyArg {
    Skip,
    Propagate,
}

impl From<NullPolicyArg> for NullPolicy {
    fn from(arg: NullPolicyArg) -> Self {
        match arg {
            NullPolicyArg::Skip => NullPolicy::Skip,
            NullPolicyArg::Propagate => NullPolicy::Propagate,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(LogConfig::from_env()) {
        eprintln!("WARNING: logging disabled: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Pipeline failures read as load errors; everything else is a plain error.
fn error_message(e: &anyhow::Error) -> String {
    if e.downcast_ref::<PipelineError>().is_some() {
        format!("Error loading data: {e:#}")
    } else {
        format!("Error: {e:#}")
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let cache = TableCache::new(Pipeline::from_config(&config.pipeline)?);
    let dataset = cache.get_or_load(&config.source).map_err(|e| {
        error!(kind = e.kind(), source = %config.source.display(), "pipeline failed");
        e
    })?;

    match cli.command {
        Commands::Categories => {
            for category in dataset.catalog().categories() {
                println!("{category}");
            }
        }
        Commands::Instruments { category } => {
            for instrument in dataset.catalog().instruments(&category) {
                println!("{instrument}");
            }
        }
        Commands::Show {
            category,
            stock,
            format,
            tail,
        } => run_show(&dataset, &category, &stock, format, tail)?,
        Commands::Summary => print_summary(&dataset, &config),
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = ViewerConfig::discover(cli.config.as_deref())?;
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(scope) = cli.scope {
        config.pipeline.window_scope = scope.into();
    }
    if let Some(policy) = cli.null_policy {
        config.pipeline.null_policy = policy.into();
    }
    config.validate()?;
    debug!(
        source = %config.source.display(),
        scope = ?config.pipeline.window_scope,
        null_policy = ?config.pipeline.null_policy,
        "resolved config"
    );
    Ok(config)
}

fn run_show(
    dataset: &Arc<Dataset>,
    category: &str,
    stock: &str,
    format: OutputFormat,
    tail: Option<usize>,
) -> Result<()> {
    if tail == Some(0) {
        bail!("--tail must be at least 1");
    }

    let rows = dataset.query().rows_for(category, stock);
    if rows.is_empty() {
        eprintln!("No data available for this stock.");
        return Ok(());
    }

    let skip = tail.map(|n| rows.len().saturating_sub(n)).unwrap_or(0);
    let rows = &rows[skip..];

    match format {
        OutputFormat::Table => print_table(stock, rows),
        OutputFormat::Csv => print!("{}", export::to_csv(rows)?),
        OutputFormat::Json => println!("{}", export::to_json(rows)?),
    }
    Ok(())
}

fn print_table(stock: &str, rows: &[&Record]) {
    println!("{stock} - Closing Price & SMAs");
    println!("{:<12} {:>12} {:>12} {:>12}", "Date", "Close", "SMA 50", "SMA 200");
    for r in rows {
        println!(
            "{:<12} {:>12} {:>12} {:>12}",
            r.date.format("%Y-%m-%d"),
            fmt_value(r.close),
            fmt_value(r.sma_50),
            fmt_value(r.sma_200),
        );
    }
}

fn fmt_value(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

fn print_summary(dataset: &Dataset, config: &ViewerConfig) {
    let report = dataset.report();
    let catalog = dataset.catalog();

    println!("=== smalens summary ===");
    println!("Source:        {}", dataset.source().display());
    println!(
        "Scope:         {:?} (null policy: {:?})",
        config.pipeline.window_scope, config.pipeline.null_policy
    );
    println!("Rows read:     {}", report.input_rows);
    println!("Rows kept:     {}", report.kept_rows);
    println!("Bad dates:     {} (dropped)", report.dropped_invalid_dates);
    println!("Null closes:   {}", report.null_closes);
    println!("No category:   {}", report.null_categories);
    println!("Categories:    {}", catalog.category_count());
    println!("Instruments:   {}", catalog.instrument_count());
    match dataset.table().date_range() {
        Some((first, last)) => println!("Date range:    {first} .. {last}"),
        None => println!("Date range:    (empty)"),
    }
    println!("Fingerprint:   {}", dataset.fingerprint());
}
