pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::{table, ui};
use crate::core::ViewStore;
use crate::core::config::{AppConfig, FileSourceConfig, SourceConfig};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Options of the `table` command.
#[derive(Debug, Clone, Default)]
pub struct TableArgs {
    pub currency: Option<String>,
    pub file: Option<String>,
    pub sort: Vec<String>,
    pub limit: Option<usize>,
    pub compact: bool,
}

pub enum AppCommand {
    Table(TableArgs),
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinview starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Table(args) => {
            let (store, options) = prepare_table(&config, &args).await?;
            println!("{}", table::render(&store, &options));
        }
        AppCommand::Currencies => {
            println!(
                "{}",
                table::render_currencies(&config.currencies, &config.currency)
            );
        }
    }
    Ok(())
}

/// Loads the config at `config_path`, or the default config when present.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => {
            let path = AppConfig::default_config_path()?;
            if path.exists() {
                AppConfig::load_from_path(&path)
            } else {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

/// Fetches the dataset and builds a sorted view for the `table` command.
pub async fn prepare_table(
    config: &AppConfig,
    args: &TableArgs,
) -> Result<(ViewStore, table::TableOptions)> {
    let code = args.currency.as_deref().unwrap_or(&config.currency);
    let currency = config.resolve_currency(code)?;

    let source_config = match (&args.file, &config.source) {
        (Some(path), _) => SourceConfig::File(FileSourceConfig { path: path.clone() }),
        (None, Some(source)) => source.clone(),
        (None, None) => {
            anyhow::bail!("No dataset source configured; pass --file or run `coinview setup`")
        }
    };
    // One fetch per run; the HTTP revalidation cache only helps long-lived sources.
    let source = providers::from_config(&source_config);

    let pb = ui::new_spinner("Fetching market data...");
    let snapshot = source.fetch_dataset().await;
    pb.finish_and_clear();
    let snapshot = snapshot.context("Failed to fetch market data")?;

    let mut store = ViewStore::new();
    store.replace_dataset(snapshot.records, currency)?;
    for column in &args.sort {
        store.set_sort(column)?;
    }

    let options = table::TableOptions {
        limit: args.limit.or(config.limit),
        compact: args.compact,
        fetched_at: Some(snapshot.fetched_at),
        width: None,
    };
    Ok((store, options))
}
