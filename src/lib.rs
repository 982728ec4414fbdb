pub mod cli;
pub mod core;
pub mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Revalue {
        amount: String,
        year: i32,
        month: u32,
        no_save: bool,
    },
    Periods {
        year: Option<i32>,
    },
    History(HistoryCommand),
}

pub enum HistoryCommand {
    List,
    Delete { id: String },
    Clear,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Rivaluta starting...");

    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = Arc::new(core::dataset::load_catalog(&config)?);

    let db_path = config.history_db_path()?;
    let store = store::KeyValueStore::open(&db_path)
        .with_context(|| format!("Failed to open history store at {}", db_path.display()))?;
    let history = core::HistoryStore::new(Arc::new(store.collection("history")?));

    match command {
        AppCommand::Revalue {
            amount,
            year,
            month,
            no_save,
        } => cli::revalue::run(&amount, year, month, !no_save, catalog, &history).await,
        AppCommand::Periods { year } => cli::periods::run(&catalog, year),
        AppCommand::History(HistoryCommand::List) => cli::history::list(&history).await,
        AppCommand::History(HistoryCommand::Delete { id }) => {
            cli::history::delete(&history, &id).await
        }
        AppCommand::History(HistoryCommand::Clear) => cli::history::clear(&history).await,
    }
}
