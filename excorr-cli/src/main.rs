//! Exchange correlations CLI: list indices and run the correlation analysis.
//!
//! Commands:
//! - `indices`: print the symbol, display name, and exchange of each index
//! - `analyze`: fetch ten years of daily prices for all five indices, then
//!   compare the selected index against the other four

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use excorr_core::analytics::ComparisonReport;
use excorr_core::data::{
    CsvProvider, DataProvider, FetchProgress, SilentProgress, StdoutProgress, SyntheticProvider,
    YahooProvider,
};
use excorr_core::domain::{MarketIndex, INDEX_TABLE};
use excorr_core::{FetchConfig, RetryingFetcher};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "excorr",
    about = "Exchange correlations: how five world stock indices move together"
)]
struct Cli {
    /// Log fetch attempts and pipeline steps to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the index table.
    Indices,
    /// Compare one index against the other four.
    Analyze {
        /// Selected index: symbol (GSPC), ticker (^GSPC), or name (S&P 500).
        #[arg(long)]
        index: MarketIndex,

        /// Where daily prices come from.
        #[arg(long, value_enum, default_value_t = Source::Yahoo)]
        source: Source,

        /// Directory of `{SYMBOL}.csv` files (required with --source csv).
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// TOML file with retry and HTTP settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Fail if any per-year coefficient is undefined.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
    Synthetic,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Indices => {
            print_indices();
            Ok(())
        }
        Commands::Analyze {
            index,
            source,
            csv_dir,
            config,
            json,
            strict,
        } => run_analyze(index, source, csv_dir, config, json, strict),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_indices() {
    println!("{:<6} {:<12} Exchange", "Symbol", "Name");
    for info in &INDEX_TABLE {
        println!("{:<6} {:<12} {}", info.symbol, info.display_name, info.exchange);
    }
}

fn run_analyze(
    index: MarketIndex,
    source: Source,
    csv_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
    strict: bool,
) -> Result<()> {
    let config = match &config {
        Some(path) => FetchConfig::from_file(path)?,
        None => FetchConfig::default(),
    };

    let provider: Box<dyn DataProvider> = match source {
        Source::Yahoo => Box::new(YahooProvider::new(&config.http)?),
        Source::Csv => {
            let Some(dir) = csv_dir else {
                bail!("--csv-dir is required with --source csv");
            };
            Box::new(CsvProvider::new(dir))
        }
        Source::Synthetic => Box::new(SyntheticProvider::new()),
    };

    // JSON output owns stdout; progress lines would corrupt it.
    let progress: &dyn FetchProgress = if json { &SilentProgress } else { &StdoutProgress };

    let fetcher = RetryingFetcher::new(provider.as_ref(), config.retry).with_progress(progress);
    info!(
        provider = provider.name(),
        max_attempts = fetcher.policy().max_attempts(),
        start = %fetcher.window().start,
        end = %fetcher.window().end,
        "starting analysis"
    );

    let table = fetcher.fetch_stacked_monthly_returns(&MarketIndex::ALL)?;
    let report = ComparisonReport::build(&table, index).context("build comparison report")?;

    if strict {
        for comparison in &report.comparisons {
            comparison
                .trend
                .ensure_defined()
                .with_context(|| format!("{} vs {}", report.selected, comparison.index))?;
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, source == Source::Synthetic);
    }

    Ok(())
}

fn print_report(report: &ComparisonReport, synthetic: bool) {
    println!();
    println!("=== {} ({}) ===", report.selected_name, report.selected);
    println!("Months:         {}", report.months);
    println!("Dataset hash:   {}", &report.dataset_hash[..16.min(report.dataset_hash.len())]);
    println!();
    println!("--- Whole-period correlation ---");
    for comparison in &report.comparisons {
        println!(
            "{:<12} {:>7}",
            comparison.display_name,
            format_coefficient(comparison.coefficient)
        );
    }

    let years = report.trend_years();
    if !years.is_empty() {
        println!();
        println!("--- Correlation by year ---");
        print!("{:<12}", "");
        for year in &years {
            print!(" {year:>6}");
        }
        println!();
        for comparison in &report.comparisons {
            print!("{:<12}", comparison.display_name);
            for year in &years {
                let cell = comparison
                    .trend
                    .coefficient_for(*year)
                    .map(format_coefficient)
                    .unwrap_or_default();
                print!(" {cell:>6}");
            }
            println!();
        }
    }

    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

fn format_coefficient(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.3}")
    }
}
