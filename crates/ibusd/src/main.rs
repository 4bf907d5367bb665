//! Daemon entry point.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ibusd::{config, DaemonConfig, DaemonError};

/// I-Bus CD-changer emulator daemon.
#[derive(Debug, Parser)]
#[command(name = "ibusd", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bus interface endpoint from the config file.
    #[arg(long)]
    bus: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), DaemonError> {
    let mut config = match &cli.config {
        Some(path) => config::load(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(bus) = cli.bus {
        config.bus_endpoint = bus;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))?;

    ibusd::run(&config, &stop)
}
