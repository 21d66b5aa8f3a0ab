//! BarLab CLI: run backtests and generate demo data.
//!
//! Commands:
//! - `run`: execute a backtest from a TOML config file (defaults if absent)
//! - `generate`: write a reproducible synthetic price series as CSV

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use barlab_runner::data_loader::{generate_sine_bars, write_bars_csv};
use barlab_runner::runner::run_backtest;
use barlab_runner::{BacktestConfig, BacktestResult};

const DEFAULT_LOG_FILTER: &str = "barlab=info,barlab_core=info,barlab_runner=info";

#[derive(Parser)]
#[command(name = "barlab", about = "BarLab CLI: single-asset bar replay backtester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file. Missing file means demo defaults.
        #[arg(long, default_value = "configs/demo.toml")]
        config: PathBuf,

        /// Override the start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Override the end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Override the results directory.
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Print summary.json instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a synthetic sine-drift price series as `date,close` CSV.
    Generate {
        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,

        /// First calendar day (YYYY-MM-DD).
        #[arg(long, default_value = "2015-01-01")]
        start: String,

        /// Number of calendar days to cover (weekends are skipped).
        #[arg(long, default_value_t = 600)]
        days: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            start,
            end,
            results_dir,
            json,
        } => run_backtest_cmd(config, start, end, results_dir, json),
        Commands::Generate {
            out,
            start,
            days,
            seed,
        } => run_generate(out, &start, days, seed),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn run_backtest_cmd(
    config_path: PathBuf,
    start: Option<String>,
    end: Option<String>,
    results_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = BacktestConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if let Some(s) = start.as_deref() {
        config.start = parse_date(s)?;
    }
    if let Some(e) = end.as_deref() {
        config.end = parse_date(e)?;
    }
    if let Some(dir) = results_dir {
        config.results_dir = dir;
    }

    let result = run_backtest(&config)?;

    if json {
        let text = std::fs::read_to_string(&result.summary_path)
            .with_context(|| format!("reading {}", result.summary_path.display()))?;
        println!("{text}");
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn run_generate(out: PathBuf, start: &str, days: usize, seed: u64) -> Result<()> {
    if days == 0 {
        bail!("--days must be at least 1");
    }
    let start = parse_date(start)?;
    let bars = generate_sine_bars(start, days, seed);
    write_bars_csv(&out, &bars).with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {} bars to {}", bars.len(), out.display());
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Run:            {}", result.run_id);
    println!("Strategy:       {}", result.strategy);
    println!("Dataset:        {}", result.dataset_hash);
    println!("Bars:           {}", result.bar_count);

    match &result.summary {
        Some(s) => {
            println!("Period:         {} to {}", s.start_date, s.end_date);
            println!();
            println!("--- Performance ---");
            println!("Start Value:    {:.2}", s.start_value);
            println!("End Value:      {:.2}", s.end_value);
            println!("Total Return:   {:.2}%", s.total_return * 100.0);
            println!("CAGR:           {:.2}%", s.cagr * 100.0);
            println!("Volatility:     {:.2}%", s.volatility * 100.0);
            println!("Sharpe:         {:.3}", s.sharpe);
            println!(
                "Max Drawdown:   {:.2}% ({} days)",
                s.max_drawdown * 100.0,
                s.max_drawdown_days
            );
        }
        None => println!("No bars in the configured date range."),
    }

    if result.synthetic_data {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
    println!("Equity curve:   {}", result.equity_path.display());
    println!("Summary:        {}", result.summary_path.display());
}
