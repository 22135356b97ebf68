#![warn(missing_docs)]
//! steadybench command line.
//!
//! Two subcommands cover the workflow: `run` executes a JSON list of
//! tool invocations and leaves one record + log pair per invocation,
//! `postprocess` rebuilds the store from those files and emits the
//! comparison scalars, summary table, and plot CSVs.

mod config;
mod invoke;
mod postprocess;

pub use config::*;
pub use invoke::{run_invocations, RunOptions};
pub use postprocess::{postprocess, PostprocessOptions};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use steadybench_exec::ArtifactDir;

/// steadybench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "steadybench")]
#[command(author, version, about = "Comparative benchmarking of steady-state verification tools")]
pub struct Cli {
    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute an invocation file sequentially
    Run {
        /// JSON file holding the invocation list
        #[arg(short = 'f', long)]
        invocations: PathBuf,

        /// Run only the invocation at this zero-based index
        #[arg(short, long)]
        index: Option<usize>,

        /// Results directory (logs/ and exports/ are created inside)
        #[arg(short, long)]
        results_dir: PathBuf,

        /// Override the per-invocation time limit in seconds
        #[arg(long)]
        time_limit: Option<f64>,

        /// Skip the discarded warm-up run before each command
        #[arg(long)]
        no_warm_up: bool,
    },
    /// Aggregate recorded results into tables and plot CSVs
    Postprocess {
        /// Results directory written by `run`
        #[arg(short, long)]
        results_dir: PathBuf,

        /// Time limit the run used, for plot cutoffs, in seconds
        #[arg(short = 'l', long, default_value = "1800")]
        time_limit: f64,

        /// Compute baseline-relative accuracy scalars
        #[arg(long)]
        compare: bool,
    },
}

/// Parse arguments and run the steadybench CLI.
pub fn run() -> anyhow::Result<()> {
    run_with_cli(Cli::parse())
}

/// Run the steadybench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("steadybench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("steadybench=info")
            .init();
    }

    // Discover steadybench.toml configuration (CLI flags override)
    let config = SteadyConfig::discover().unwrap_or_default();
    let artifacts = match &config.artifact_dir {
        Some(dir) => ArtifactDir::new(dir),
        None => ArtifactDir::new(std::env::current_dir()?),
    };

    match cli.command {
        Commands::Run {
            invocations,
            index,
            results_dir,
            time_limit,
            no_warm_up,
        } => {
            let options = RunOptions {
                invocations_file: invocations,
                index,
                results_dir,
                warm_up: config.runner.warm_up && !no_warm_up,
                time_limit: time_limit.or(config.runner.time_limit),
            };
            run_invocations(&options, &artifacts)
        }
        Commands::Postprocess {
            results_dir,
            time_limit,
            compare,
        } => {
            let options = PostprocessOptions {
                results_dir,
                time_limit,
                compare,
            };
            postprocess(&options, &config, &artifacts)
        }
    }
}
