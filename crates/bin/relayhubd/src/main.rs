//! # relayhubd — relayhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env var overrides)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Spawn the periodic minute trigger for the scheduler engine
//! - Build the axum router, bind to a TCP port, serve
//! - Handle graceful shutdown (SIGINT), cancelling the trigger task
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use relayhub_adapter_http_axum::state::AppState;
use relayhub_adapter_push_expo::ExpoPushSender;
use relayhub_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteExecutionLogStore, SqliteExecutionStore, SqlitePushTokenRepository,
    SqliteRelayRepository, SqliteScheduleRepository,
};
use relayhub_app::engine::SchedulerEngine;
use relayhub_app::notifier::Notifier;
use relayhub_app::services::relay_service::RelayService;
use relayhub_app::services::schedule_service::ScheduleService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let relay_repo = SqliteRelayRepository::new(pool.clone());
    let schedule_repo = SqliteScheduleRepository::new(pool.clone());
    let execution_store = SqliteExecutionStore::new(pool.clone());
    let log_store = Arc::new(SqliteExecutionLogStore::new(pool.clone()));
    let push_tokens = Arc::new(SqlitePushTokenRepository::new(pool));

    // Engine, shared between the periodic trigger and the HTTP surface
    let notifier = Notifier::new(Arc::clone(&push_tokens), ExpoPushSender::new());
    let engine = Arc::new(SchedulerEngine::new(
        execution_store,
        Arc::clone(&log_store),
        notifier,
        config.timezone(),
    ));

    let cancel = CancellationToken::new();
    let ticker = {
        let engine = Arc::clone(&engine);
        let cancel = cancel.clone();
        tokio::spawn(async move { engine.run_periodic(cancel).await })
    };

    // HTTP
    let state = AppState::from_arcs(
        Arc::new(RelayService::new(relay_repo, config.toggle_policy())),
        Arc::new(ScheduleService::new(schedule_repo)),
        engine,
        log_store,
        push_tokens,
    );
    let app = relayhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, zone = %config.timezone(), "relayhubd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    let _ = ticker.await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
