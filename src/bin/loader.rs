//! vmstore Loader Binary
//!
//! Builds a history block store from a text log.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use vmstore::history::HistoryLoader;
use vmstore::Config;

/// vmstore Loader
#[derive(Parser, Debug)]
#[command(name = "vmstore-loader")]
#[command(about = "Make binary <index, block> files from user history")]
#[command(version)]
struct Args {
    /// Input log, one event per line: uid pid label time [played] [length]
    #[arg(short, long)]
    input: PathBuf,

    /// Output store (base name, or a .index/.block file name)
    #[arg(short, long)]
    output: PathBuf,

    /// Write buffer size in KB
    #[arg(short = 'b', long, default_value = "64")]
    buffer_kb: usize,

    /// Skip fsync when closing the store
    #[arg(long)]
    no_sync: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vmstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("vmstore loader v{}", vmstore::VERSION);
    tracing::info!("Input: {}", args.input.display());
    tracing::info!("Output: {}", args.output.display());

    let config = Config::builder()
        .write_buffer_size(args.buffer_kb * 1024)
        .sync_on_close(!args.no_sync)
        .build();

    let mut loader = HistoryLoader::new();
    if let Err(e) = loader.ingest_file(&args.input) {
        tracing::error!("Failed to read input: {}", e);
        std::process::exit(1);
    }

    match loader.write_store(&args.output, &config) {
        Ok(stats) => {
            tracing::info!(
                lines = stats.lines,
                skipped = stats.skipped,
                users = stats.users,
                records = stats.records,
                "store written"
            );
        }
        Err(e) => {
            tracing::error!("Failed to write store: {}", e);
            std::process::exit(1);
        }
    }
}
