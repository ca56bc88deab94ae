//! Roster - interactive student record manager
//!
//! Menu-driven shell over the roster engine's record store and file codec.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use roster_engine::{codec, RecordStore, RosterError};

mod config;
mod shell;

use config::Config;
use shell::Shell;

/// Roster - student record manager with flat-file persistence
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Data file name
    #[arg(short, long)]
    pub file: Option<String>,

    /// Data directory for relative paths
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::resolve(&args)?;

    // Set up logging
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let path = config.data_path();
    info!("Starting roster v{}", env!("CARGO_PKG_VERSION"));
    info!("Data file: {}", path.display());

    // Load prior data; a missing file just means an empty roster.
    let store = match codec::load(&path) {
        Ok(store) => {
            info!("Loaded {} student(s)", store.len());
            store
        }
        Err(RosterError::FileNotFound { .. }) => {
            info!("No existing data file, starting empty");
            RecordStore::new()
        }
        Err(e) => return Err(e.into()),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut shell = Shell::new(store, path);
    shell.run(&mut input)?;

    Ok(())
}
