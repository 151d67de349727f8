//! GKE Cost Optimizer CLI
//!
//! A command-line tool for analyzing cluster and billing snapshots,
//! listing recommendations, planning rollouts and exporting results.

mod commands;
mod config;
mod input;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{analyze, costs, export, recommendations, roadmap};
use optimizer_lib::RuleKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GKE Cost Optimizer CLI
#[derive(Parser)]
#[command(name = "gko")]
#[command(author, version, about = "CLI for GKE Cost Optimizer", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Configuration file (defaults to ~/.config/gko/config.toml)
    #[arg(long, global = true, env = "GKO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Snapshot files produced by the collectors
#[derive(Args)]
pub struct SnapshotArgs {
    /// Resource snapshot (JSON)
    #[arg(long, short)]
    pub resources: PathBuf,

    /// Cost snapshot (JSON)
    #[arg(long, short)]
    pub costs: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis and save a report
    Analyze {
        #[command(flatten)]
        snapshots: SnapshotArgs,

        /// Directory for saved reports
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        /// Print the report without saving it
        #[arg(long)]
        no_save: bool,
    },

    /// List recommendations
    Recommendations {
        #[command(flatten)]
        snapshots: SnapshotArgs,

        /// Filter by category (e.g. rightsizing, resource_cleanup)
        #[arg(long)]
        category: Option<RuleKind>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<recommendations::PriorityFilter>,
    },

    /// Show the implementation roadmap
    Roadmap {
        #[command(flatten)]
        snapshots: SnapshotArgs,
    },

    /// Show cost analysis and savings projection
    Costs {
        /// Cost snapshot (JSON)
        #[arg(long, short)]
        costs: PathBuf,

        /// Project savings for this optimization percentage
        #[arg(long)]
        projection_percent: Option<f64>,

        /// Projection horizon in months
        #[arg(long, default_value_t = 12)]
        months: u32,
    },

    /// Export recommendations as CSV
    Export {
        #[command(flatten)]
        snapshots: SnapshotArgs,

        /// Output file path (stdout if not specified)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let settings = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            snapshots,
            output_dir,
            no_save,
        } => {
            let save_to = (!no_save).then_some(output_dir.as_path());
            analyze::run(&snapshots, &settings, save_to, cli.format)?;
        }
        Commands::Recommendations {
            snapshots,
            category,
            priority,
        } => {
            recommendations::list(&snapshots, &settings, category, priority, cli.format)?;
        }
        Commands::Roadmap { snapshots } => {
            roadmap::show(&snapshots, &settings, cli.format)?;
        }
        Commands::Costs {
            costs,
            projection_percent,
            months,
        } => {
            costs::show(&costs, projection_percent, months, cli.format)?;
        }
        Commands::Export { snapshots, output } => {
            export::run(&snapshots, &settings, output.as_deref())?;
        }
    }

    Ok(())
}
