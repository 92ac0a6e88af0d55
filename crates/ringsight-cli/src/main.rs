//! Ringsight CLI tool.
//!
//! Analyse a transaction CSV from the command line, or run the built-in
//! synthetic sample, and emit the JSON report to stdout or a file.

use clap::{Parser, Subcommand};
use ringsight_core::config::EngineConfig;
use ringsight_engine::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ringsight")]
#[command(version, about = "Financial-transaction fraud-ring detection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a transaction CSV file
    Analyze {
        /// Path to the CSV file
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Analyse the built-in synthetic sample dataset
    Sample {
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::default();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            pretty,
        } => {
            let bytes = std::fs::read(&input)?;
            let ingest = ringsight_ingest::read_transactions(&bytes)?;
            if ingest.rejected.total() > 0 {
                tracing::warn!(
                    rejected = ingest.rejected.total(),
                    total = ingest.total_rows,
                    "some rows were skipped"
                );
            }

            let mut report = analyze(&ingest.transactions, &config)?;
            report.summary.rows_rejected = ingest.rejected.total();
            emit(&report, output.as_deref(), pretty)?;
        }

        Commands::Sample { output, pretty } => {
            let batch = generate_sample();
            let report = analyze(&batch, &config)?;
            emit(&report, output.as_deref(), pretty)?;
        }
    }

    Ok(())
}

fn emit(report: &Report, output: Option<&std::path::Path>, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
