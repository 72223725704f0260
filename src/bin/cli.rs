//! vmstore CLI
//!
//! Command-line inspection of history block stores.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use vmstore::history::HistoryRecord;
use vmstore::{BlockStoreReader, BoundsPolicy, Config};

/// vmstore CLI
#[derive(Parser, Debug)]
#[command(name = "vmstore-cli")]
#[command(about = "CLI for vmstore history stores")]
#[command(version)]
struct Args {
    /// Store to open (base name, or a .index/.block file name)
    #[arg(short, long)]
    store: PathBuf,

    /// Fail on index entries that point past the block file
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show index and block sizes
    Info,

    /// List keys with their record ranges
    Keys,

    /// Print all records of a key
    Get {
        /// The key (uid) to get
        key: u64,
    },

    /// Print one record of a key
    One {
        /// The key (uid)
        key: u64,

        /// Position within the key's records
        index: u32,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let policy = if args.strict {
        BoundsPolicy::Strict
    } else {
        BoundsPolicy::Exclude
    };
    let config = Config::builder().bounds_policy(policy).build();

    let reader = match BlockStoreReader::<HistoryRecord>::load_with_config(&args.store, config) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load store: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Info => {
            println!("index entries: {}", reader.index_size());
            println!("block records: {}", reader.block_size());
        }
        Commands::Keys => {
            for entry in reader.entries() {
                println!("{}\t{}\t{}", entry.key, entry.offset, entry.count);
            }
        }
        Commands::Get { key } => match reader.get(key) {
            Some(records) => {
                for record in &records {
                    print_record(record);
                }
            }
            None => {
                println!("(not found)");
                std::process::exit(2);
            }
        },
        Commands::One { key, index } => match reader.get_one(key, index) {
            Some(record) => print_record(&record),
            None => {
                println!("(not found)");
                std::process::exit(2);
            }
        },
    }
}

fn print_record(record: &HistoryRecord) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        record.pid, record.label, record.time, record.played, record.length
    );
}
