use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_finance::{Analysis, Pipeline, SampleGenerator};
use tally_ingest::IngestError;
use tally_ingest::template::{CSV_TEMPLATE, TEMPLATE_FILE_NAME, write_transactions_csv};

mod config;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Personal finance analysis for South African bank statements"
)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a bank-exported CSV statement
    Analyze {
        /// Path to the CSV statement
        #[arg(long)]
        csv: PathBuf,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate seeded sample data and analyze it
    Sample {
        /// Seed for reproducible data
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Also write the generated transactions as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the CSV import template
    Template {
        /// Write to a file instead of stdout; bare `--out` uses personal_finance_template.csv
        #[arg(long, num_args = 0..=1, default_missing_value = TEMPLATE_FILE_NAME)]
        out: Option<PathBuf>,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config_file = cli.config.as_deref();

    match cli.command {
        Command::Analyze { csv, json } => {
            let cfg = config::load_config(config_file)?;
            let pipeline = cfg.pipeline()?;
            let analysis = pipeline
                .run_csv(&csv)
                .map_err(ingest_error)
                .with_context(|| format!("analyzing {}", csv.display()))?;
            print_analysis(&analysis, json)?;
        }

        Command::Sample { seed, json, out } => {
            let cfg = config::load_config(config_file)?;
            let pipeline = cfg.pipeline()?;
            sample(&pipeline, cfg.clock()?, seed, json, out.as_deref())?;
        }

        Command::Template { out } => {
            let mut w = state::output(out.as_deref())?;
            w.write_all(CSV_TEMPLATE.as_bytes())
                .and_then(|_| w.flush())
                .context("write template")?;
            if let Some(p) = out {
                info!("Wrote template to {}", p.display());
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_file)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(config_file)?;
                // catch bad budgets or zones before printing
                cfg.aggregate_options()?;
                cfg.clock()?;
                print!(
                    "{}",
                    toml::to_string_pretty(&cfg).context("serialize config")?
                );
            }
        },
    }

    Ok(())
}

fn sample(
    pipeline: &Pipeline,
    clock: tally_core::SystemClock,
    seed: u64,
    json: bool,
    out: Option<&Path>,
) -> Result<()> {
    let txns = SampleGenerator::new(seed, clock).generate();

    if let Some(p) = out {
        let w = state::output(Some(p))?;
        write_transactions_csv(w, &txns)
            .map_err(ingest_error)
            .with_context(|| format!("writing {}", p.display()))?;
        info!("Wrote {} sample transactions to {}", txns.len(), p.display());
    }

    print_analysis(&pipeline.run_transactions(&txns), json)
}

fn print_analysis(analysis: &Analysis, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(analysis).context("serialize analysis")?
        );
    } else {
        let mut text = String::new();
        report::write_analysis(&mut text, analysis).context("render report")?;
        print!("{}", text);
    }
    Ok(())
}

/// Lead with the short user-facing message, keep the cause underneath.
fn ingest_error(e: IngestError) -> anyhow::Error {
    let msg = e.user_message();
    anyhow::Error::new(e).context(msg)
}
