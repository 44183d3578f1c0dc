//! Holdings CLI
//!
//! Command-line interface for Holdings operations:
//! - Render the chart to SVG
//! - Print the derived series
//! - Show the tooltip for an instant
//! - Package a CSV price history into a snapshot
//! - Check snapshot status

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use holdings::chart::format;
use holdings::config::{generate_default_config, Config};
use holdings::series::Series;
use holdings::session::Session;
use holdings::snapshot::{parse_timestamp, SnapshotBuilder, SnapshotLoader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "holdings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chart the value of a Bitcoin holding over time")]
#[command(long_about = "Holdings charts a Bitcoin price history scaled by the amount you hold.\nPrices come from a serialized SQLite snapshot; the amount only rescales the series.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file, overriding the config
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Holdings amount (default: from config)
    #[arg(short, long, global = true)]
    pub amount: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the chart as SVG
    Render {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the derived series
    Series,

    /// Show the tooltip for the point nearest to an instant
    Tooltip {
        /// Unix seconds, YYYY-MM-DD, MM/DD/YYYY or RFC 3339
        at: String,
    },

    /// Show snapshot and query status
    Status,

    /// Package a CSV price history into a snapshot
    BuildSnapshot {
        /// Path to CSV file
        csv: PathBuf,
        /// Date column header
        #[arg(long, default_value = "date")]
        date_column: String,
        /// Price column header
        #[arg(long, default_value = "price")]
        price_column: String,
        /// Output snapshot (default: configured snapshot path)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Dry run (parse only, write nothing)
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(path) = &cli.snapshot {
        config.snapshot.path = path.clone();
    }

    holdings::logging::init_cli_tracing(&config.logging);

    match cli.command {
        Commands::Render { output } => {
            let mut session = open_session(&config, cli.amount.as_deref()).await?;
            let svg = session.render();

            match output {
                Some(path) => {
                    std::fs::write(&path, &svg)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Chart written to {:?}", path);
                }
                None => {
                    println!("{}", svg);
                }
            }
        }

        Commands::Series => {
            let mut session = open_session(&config, cli.amount.as_deref()).await?;
            let series = session.series();

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(series.as_ref())?);
                }
                "csv" => {
                    print_csv(&series)?;
                }
                _ => {
                    print_table(&series);
                }
            }
        }

        Commands::Tooltip { at } => {
            let ts = parse_timestamp(at.trim())
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
                .with_context(|| format!("Invalid instant: {}", at))?;

            let mut session = open_session(&config, cli.amount.as_deref()).await?;
            match session.tooltip_at(ts) {
                Some(tooltip) => println!("{}", tooltip),
                None => println!("No data points"),
            }
        }

        Commands::Status => {
            let mut session = open_session(&config, None).await?;
            let state = session.state();

            println!("Holdings v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Snapshot: {:?}", config.snapshot.path);
            println!("State: {}", state.name());

            if let Some(reason) = state.failure() {
                println!("Reason: {}", reason);
            }

            if let Some(outcome) = state.outcome() {
                println!("Rows: {}", outcome.result.row_count());
                let series = session.series();
                if let Some((first, last)) = series.time_bounds() {
                    println!(
                        "Range: {} - {}",
                        format::tooltip_date(first),
                        format::tooltip_date(last)
                    );
                }
            }
        }

        Commands::BuildSnapshot {
            csv,
            date_column,
            price_column,
            output,
            dry_run,
        } => {
            if !csv.exists() {
                bail!("File not found: {:?}", csv);
            }

            let file = std::fs::File::open(&csv).with_context(|| format!("opening {:?}", csv))?;
            let mut builder = SnapshotBuilder::new()
                .with_table(&config.snapshot.table)
                .with_columns(&config.snapshot.timestamp_column, &config.snapshot.price_column);
            let report = builder.import_csv(file, &date_column, &price_column)?;

            println!("Import results:");
            println!("  Rows processed: {}", report.rows_processed);
            println!("  Rows failed: {}", report.rows_failed);
            println!("  Prices: {}", builder.len());

            if !report.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in report.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no snapshot was written)");
            } else {
                let path = output.unwrap_or_else(|| config.snapshot.path.clone());
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let snapshot = builder.write_to(&path)?;
                println!();
                println!("Snapshot written to {:?} ({} bytes)", path, snapshot.len());
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Load the configured snapshot into a fresh session and apply `amount`
async fn open_session(config: &Config, amount: Option<&str>) -> anyhow::Result<Session> {
    let mut session = Session::from_config(config);

    let snapshot = SnapshotLoader::from_path(&config.snapshot.path).await?;
    session.load(snapshot);

    let state = session.settled().await;
    if let Some(reason) = state.failure() {
        eprintln!("Price history unavailable: {}", reason);
        eprintln!("The chart will be empty.");
    }

    if let Some(amount) = amount {
        session.set_pending(amount);
        session.confirm()?;
    }

    Ok(session)
}

fn print_table(series: &Series) {
    if series.is_empty() {
        println!("No data");
        return;
    }

    // Header
    println!("{:<12} | {:>16} | {:>16}", "Date", "Price", series.label);

    // Separator
    println!("{}", "-".repeat(50));

    // Data rows
    for point in &series.points {
        println!(
            "{:<12} | {:>16} | {:>16}",
            point.timestamp.format("%Y-%m-%d").to_string(),
            format::usd(point.raw_value),
            format::usd(point.derived_value)
        );
    }
}

fn print_csv(series: &Series) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(["date", "price", "value"])?;

    for point in &series.points {
        writer.write_record([
            point.timestamp.format("%Y-%m-%d").to_string(),
            point.raw_value.to_string(),
            point.derived_value.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
