//! ScreenLab CLI — screening runs and single-ticker objectives.
//!
//! Commands:
//! - `screen` — run the full screening pass for a date and print the outcome
//! - `objective` — solve one ticker's objectives and print the set
//! - `demo` — screen a seeded synthetic universe (no data files needed)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use screenlab_core::config::{ScreenConfig, SolverKind};
use screenlab_core::data::{synthetic_universe, MarketStore, MemoryStore};
use screenlab_core::report::assemble_report;
use screenlab_core::screen::{ScreenError, Screener};

#[derive(Parser)]
#[command(name = "screenlab", about = "ScreenLab CLI — KRX daily screening engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SolverArg {
    Scored,
    SupportLevel,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Scored => SolverKind::Scored,
            SolverArg::SupportLevel => SolverKind::SupportLevel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full screening pass and print the outcome as JSON.
    Screen {
        /// Directory holding tickers.csv, prices.csv, and supply.csv.
        #[arg(long)]
        data_dir: PathBuf,

        /// Target date (YYYY-MM-DD). Defaults to the latest price date.
        #[arg(long)]
        date: Option<String>,

        /// Objective solver generation.
        #[arg(long, value_enum)]
        solver: Option<SolverArg>,

        /// TOML config file overriding the default parameter set.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the outcome JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Solve one ticker's objectives and print the report as JSON.
    Objective {
        /// Directory holding tickers.csv, prices.csv, and supply.csv.
        #[arg(long)]
        data_dir: PathBuf,

        /// Ticker code (e.g. 005930).
        #[arg(long)]
        ticker: String,

        /// Objective solver generation.
        #[arg(long, value_enum)]
        solver: Option<SolverArg>,
    },
    /// Screen a seeded synthetic universe; useful as a smoke run.
    Demo {
        /// RNG seed for the synthetic universe.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of synthetic tickers.
        #[arg(long, default_value_t = 200)]
        tickers: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Screen {
            data_dir,
            date,
            solver,
            config,
            output,
        } => {
            let mut cfg = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading config {}", path.display()))?;
                    ScreenConfig::from_toml(&text)
                        .with_context(|| format!("parsing config {}", path.display()))?
                }
                None => ScreenConfig::default(),
            };
            if let Some(solver) = solver {
                cfg.solver = solver.into();
            }
            let date = date.map(|d| parse_date(&d)).transpose()?;

            let store = MemoryStore::load_csv_dir(&data_dir)
                .with_context(|| format!("loading data from {}", data_dir.display()))?;
            run_screen(&store, cfg, date, output)
        }
        Commands::Objective {
            data_dir,
            ticker,
            solver,
        } => {
            let mut cfg = ScreenConfig::default();
            if let Some(solver) = solver {
                cfg.solver = solver.into();
            }
            let store = MemoryStore::load_csv_dir(&data_dir)
                .with_context(|| format!("loading data from {}", data_dir.display()))?;

            let price_history = store.price_history(&ticker, 400);
            if price_history.is_empty() {
                bail!("no price history for ticker {ticker}");
            }
            let supply_history = store.supply_history(&ticker, 400);

            let screener = Screener::new(&store, cfg)?;
            let outcome = screener.objectives(price_history[0].close, &price_history);
            let report = assemble_report(&ticker, &price_history, &supply_history, outcome)
                .context("empty price history")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Demo { seed, tickers } => {
            let store = synthetic_universe(seed, tickers, 150);
            run_screen(&store, ScreenConfig::default(), None, None)
        }
    }
}

fn run_screen(
    store: &dyn MarketStore,
    config: ScreenConfig,
    date: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<()> {
    let screener = Screener::new(store, config)?;
    match screener.screen(date) {
        Ok(outcome) => {
            let json = serde_json::to_string_pretty(&outcome)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "outcome written");
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        // A holiday or an empty export is a skip, not a failure.
        Err(err @ ScreenError::MissingUniverseData { .. }) => {
            tracing::warn!(%err, "screening skipped");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{text}', expected YYYY-MM-DD"))
}
