//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API under `/api` and includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<RR, SR, ES, LS, PT, PS>(state: AppState<RR, SR, ES, LS, PT, PS>) -> Router
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
