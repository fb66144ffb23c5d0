//! Steplens CLI
//!
//! Timing analysis for batch-processing step logs.
//! Summarises step durations, fits a distribution to the slowest step and
//! buckets durations by time of day.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

use steplens::commands::{
    display_schema, display_version, execute_analyze, print_report, validate_args, AnalyzeArgs,
};

/// Steplens - step timing analysis for batch logs
#[derive(Parser, Debug)]
#[command(name = "steplens")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a timing log
    Analyze {
        /// Path to the timing log
        #[arg(short, long)]
        input: PathBuf,

        /// Analysis configuration file (TOML)
        #[arg(short, long, env = "STEPLENS_CONFIG")]
        config: Option<PathBuf>,

        /// Step to fit (default: slowest step by mean duration)
        #[arg(short, long)]
        step: Option<String>,

        /// Skip malformed and negative-duration rows instead of aborting
        #[arg(long)]
        lenient: bool,

        /// Row whose start time is the origin for hours-since-origin
        #[arg(long)]
        origin_row: Option<usize>,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Number of variates to draw from the best fit
        #[arg(long)]
        sample: Option<usize>,

        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Print the terminal summary (to stderr when combined with --json)
        #[arg(long)]
        summary: bool,
    },

    /// Display table schema information
    Schema {
        /// Show input format details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();
    debug!("Command: {:?}", cli.command);

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            config,
            step,
            lenient,
            origin_row,
            seed,
            sample,
            json,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                config,
                step,
                lenient,
                origin_row,
                seed,
                sample,
                json,
                summary,
            };

            // Validate args first
            validate_args(&args)?;

            let report = execute_analyze(&args)?;
            print_report(&report, &args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
