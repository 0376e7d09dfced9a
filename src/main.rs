mod config;
mod db;
mod error;
mod export;
mod logging;
mod models;
mod records;
mod run;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = config::Settings::from_args(&args)?;
    logging::init_or_disable(&settings.log_path, settings.log_level);

    let result = start(&settings);
    if let Err(ref e) = result {
        log::error!("{e:#}");
    }
    result
}

fn start(settings: &config::Settings) -> Result<()> {
    let db = db::Database::open(&settings.db_path)
        .with_context(|| format!("Failed to open database: {}", settings.db_path.display()))?;

    if settings.command.is_empty() {
        run::as_tui(&db)
    } else {
        run::as_cli(&settings.command, &db)
    }
}
