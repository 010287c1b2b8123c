//! Toolroom startup: configuration, logging, database, services.
//!
//! Prints the cycles each tool has run since its last regeneration.

use std::error::Error;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::fmt;

use toolroom::adapters::postgres::{
    PostgresCycleReadingRepository, PostgresRegenerationRepository, PostgresToolRepository,
};
use toolroom::application::{
    AccountingService, CycleLedger, ListToolsHandler, ListToolsQuery, RegenerationTracker,
    TableLocks,
};
use toolroom::config::{AppConfig, LoggingConfig};

fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    Ok(())
}

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let pool = config.database.connect().await?;
    info!(max_connections = config.database.max_connections, "Database pool ready");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let locks = TableLocks::new();
    let ledger = CycleLedger::new(
        Arc::new(PostgresCycleReadingRepository::new(pool.clone())),
        locks.clone(),
        config.accounting.partial_policy(),
    );
    let tracker = RegenerationTracker::new(
        Arc::new(PostgresRegenerationRepository::new(pool.clone())),
        ledger.clone(),
        locks,
    );
    let accounting = AccountingService::new(ledger, tracker);
    let tools = ListToolsHandler::new(Arc::new(PostgresToolRepository::new(pool)));

    for tool in tools.handle(ListToolsQuery::default()).await? {
        let total = accounting.total_cycles_since(tool.id()).await?;
        info!(
            tool_id = %tool.id(),
            format = %tool.data().format(),
            code = tool.data().code(),
            regenerating = tool.data().is_regenerating(),
            cycles_since_regeneration = total,
            "Tool cycle total"
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    if let Err(err) = run(config).await {
        error!(error = %err, "Toolroom failed");
        return Err(err);
    }
    Ok(())
}
