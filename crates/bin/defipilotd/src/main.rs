//! # defipilotd — defipilot daemon
//!
//! Composition root that wires all adapters together and runs the
//! automation engine.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository and gateway implementations (adapters)
//! - Assemble the engine, injecting adapters via port traits
//! - Run the scheduler until SIGINT/ctrl-c, then drain the in-flight pass
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tokio::sync::watch;

use defipilot_adapter_storage_sqlite_sqlx::{SqliteRuleRepository, SqliteUserRepository};
use defipilot_app::engine::{ActionExecutor, RuleProcessor, Scheduler, TriggerEvaluator};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = defipilot_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let rule_repo = SqliteRuleRepository::new(pool.clone());
    let user_repo = SqliteUserRepository::new(pool);

    // Downstream service gateways
    let (market, risk) = defipilot_adapter_services_http::Config {
        defi_base_url: config.services.defi_url.clone(),
        ml_base_url: config.services.ml_url.clone(),
        timeout: config.service_timeout(),
    }
    .build()?;

    // Engine
    let processor = RuleProcessor::new(
        TriggerEvaluator::new(market, risk, user_repo.clone()),
        ActionExecutor::new(user_repo),
        rule_repo.clone(),
    );
    let scheduler = Scheduler::new(processor, rule_repo, config.interval());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, draining in-flight pass");
    let _ = shutdown_tx.send(true);
    engine.await?;

    Ok(())
}
