use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod config;
mod present;
mod repl;
mod service;
mod session;
mod util;
mod workbench;

use crate::config::{AppConfig, CliArgs, Command};
use crate::service::catalog::resolve_target;
use crate::service::http::HttpBackend;
use crate::service::DatabaseCatalog;
use crate::session::{SessionContext, SessionTarget};
use crate::util::logging::init_tracing;
use crate::workbench::driver::WorkbenchSession;
use crate::workbench::Workbench;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Using query service at {}", config.api.base_url);
    let context = SessionContext::new(config.api.token.clone());
    let backend = Arc::new(HttpBackend::new(&config.api, context)?);

    let command = args.command.clone().unwrap_or(Command::Repl);

    if let Command::Databases = command {
        for db in backend.list_databases().await? {
            println!("{}\t{}\t{}", db.id, db.original_name, db.filename);
        }
        return Ok(());
    }

    let target = match select_target(&args, backend.as_ref()).await {
        Ok(target) => target,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };
    info!("Working against database {}", target);

    let session = WorkbenchSession::new(
        Workbench::new(target, config.workbench.max_prompt_chars),
        backend.clone(),
        backend.clone(),
        backend,
        Duration::from_secs(config.api.timeout_secs),
        &config.export.dir,
    );

    // Schema is advisory; a failure here only means an empty table list
    session.load_schema().await;

    match command {
        Command::Ask {
            prompt,
            run,
            acknowledge,
            export,
        } => repl::run_once(session, &prompt, run, acknowledge, export).await,
        Command::Repl | Command::Databases => repl::run(session).await,
    }
}

async fn select_target(
    args: &CliArgs,
    catalog: &dyn DatabaseCatalog,
) -> Result<SessionTarget, Box<dyn std::error::Error>> {
    if let Some(file) = &args.db_file {
        return Ok(SessionTarget::from_storage_id(file.clone()));
    }

    let Some(wanted) = &args.database else {
        return Err("No database selected: pass --database NAME or --db-file FILE".into());
    };

    let databases = catalog.list_databases().await?;
    resolve_target(&databases, wanted)
        .ok_or_else(|| format!("Database '{}' not found in catalog", wanted).into())
}
