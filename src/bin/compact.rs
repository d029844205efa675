//! segstore Compaction Tool
//!
//! Operator entrypoint for rewriting rotated-out segment files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use segstore::CompactionService;
use tracing_subscriber::{fmt, EnvFilter};

/// segstore compaction tool
#[derive(Parser, Debug)]
#[command(name = "segstore-compact")]
#[command(about = "Rewrite segment files, discarding overwritten records")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compact one segment file into a fresh destination
    Compact {
        /// Segment file to compact (deleted after a successful rewrite)
        source: PathBuf,

        /// Destination file (must not already exist)
        dest: PathBuf,
    },

    /// Merge several segment files into one deduplicated destination
    Merge {
        /// Segment files to merge, oldest first (all deleted on success)
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Destination file (must not already exist)
        #[arg(short, long)]
        dest: PathBuf,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,segstore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    let service = CompactionService::new();

    let result = match args.command {
        Commands::Compact { source, dest } => service.compact(&source, &dest),
        Commands::Merge { sources, dest } => service.compact_and_merge(&sources, &dest),
    };

    if let Err(e) = result {
        tracing::error!("Compaction failed: {}", e);
        std::process::exit(1);
    }
}
