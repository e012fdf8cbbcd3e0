mod config;
mod editor;
mod error;
mod export;
mod models;
mod run;
mod schedule;
mod storage;
mod store;
mod util;

#[cfg(test)]
#[path = "util_tests.rs"]
mod util_tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging();

    let cli = run::Cli::parse();
    let config = config::Config::resolve(cli.data_dir, cli.autosave_ms)?;
    config.ensure_data_dir()?;

    let storage = storage::SqliteStorage::open(&config.db_path())?;
    let mut store = store::LocalStore::new(storage);
    run::as_cli(cli.command, &mut store, &config)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
