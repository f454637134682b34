mod cli;
mod commands;
mod telemetry;

use crate::cli::{Command, CLI};
use anyhow::Context;
use clap::Parser;
use shortlink_storage::{MappingStore, SqliteMappingStore, SqliteStoreOptions};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = commands::exit_code(&err);
            if code == 1 {
                error!(error = ?err, "command failed");
            }
            eprintln!("error: {err:#}");
            ExitCode::from(code)
        }
    }
}

async fn run(config: CLI) -> anyhow::Result<()> {
    info!(
        database = %config.database,
        max_connections = config.max_connections,
        log_format = %config.log_format,
        "starting shortlink"
    );

    let options = SqliteStoreOptions::builder()
        .database(config.database.clone())
        .max_connections(config.max_connections)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .build();

    let store = SqliteMappingStore::open(options)
        .await
        .with_context(|| format!("failed to open database '{}'", config.database))?;

    let result = prepare_and_execute(&store, config.command, config.base_url.as_deref()).await;
    store.close().await;
    result
}

async fn prepare_and_execute(
    store: &SqliteMappingStore,
    command: Command,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    store
        .initialize()
        .await
        .context("failed to initialize schema")?;

    if command == Command::Init {
        store
            .check_integrity()
            .await
            .context("database failed its integrity check")?;
    }

    commands::execute(store, command, base_url, &mut std::io::stdout()).await
}
