//! Viswall CLI
//!
//! Fetches cluster usage from Prometheus and writes the dashboard data
//! for the video wall.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use viswall::commands::{
    display_schema, display_version, execute_align, execute_snapshot, validate_args,
    validate_dashboard_file, AlignArgs, SnapshotArgs,
};
use viswall::utils::config::{validate_threshold, DEFAULT_FILL_VALUE};

/// Viswall - cluster usage dashboard data
#[derive(Parser, Debug)]
#[command(name = "viswall")]
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
    /// Query every cluster and write the dashboard
    Snapshot {
        /// Number of days to look back from today
        #[arg(short, long, default_value = "7")]
        days: u32,

        /// Time step for the data points
        #[arg(short, long, default_value = "1h")]
        step: String,

        /// Share of the total below which accounts are merged into Others
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Dashboard config (TOML)
        #[arg(short, long, env = "VISWALL_CONFIG")]
        config: Option<PathBuf>,

        /// Output path (default: usage_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Align a saved query_range response
    Align {
        /// Saved Prometheus response
        #[arg(short, long)]
        input: PathBuf,

        /// Label to group series by
        #[arg(short, long, default_value = "account")]
        group_by: String,

        /// Merge groups below this share into Others
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Value for missing samples
        #[arg(long, default_value_t = DEFAULT_FILL_VALUE)]
        fill: f64,

        /// Output path for the matrix JSON
        #[arg(short, long, default_value = "matrix.json")]
        output: PathBuf,
    },

    /// Validate a dashboard JSON file
    Validate {
        /// Path to dashboard JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
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

    // Execute command
    match cli.command {
        Commands::Snapshot {
            days,
            step,
            threshold,
            config,
            output,
            summary,
        } => {
            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!("usage_{}.json", Local::now().format("%Y-%m-%d_%H%M%S")))
            });

            let args = SnapshotArgs {
                days,
                step,
                threshold,
                config,
                output,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_snapshot(args)?;
        }

        Commands::Align {
            input,
            group_by,
            threshold,
            fill,
            output,
        } => {
            if let Some(t) = threshold {
                validate_threshold(t)?;
            }

            execute_align(AlignArgs {
                input,
                group_by,
                threshold,
                fill_value: fill,
                output,
            })?;
        }

        Commands::Validate { file } => {
            validate_dashboard_file(&file)?;
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
