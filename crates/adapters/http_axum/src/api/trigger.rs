//! On-demand trigger endpoint.
//!
//! `POST /api/schedules/run` runs one evaluation cycle immediately. The
//! optional `time` query overrides the clock with "today, in the
//! configured zone, at that `H:MM`" for deterministic testing of rule
//! matching. The response envelope is fixed: `{ok, result}` on success,
//! `{ok, error}` with status 500 on any failure.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};
use relayhub_domain::error::RelayHubError;

use crate::state::AppState;

/// Query parameters for the run endpoint.
#[derive(Deserialize)]
pub struct RunParams {
    /// Optional `H:MM` clock override.
    pub time: Option<String>,
}

#[derive(Serialize)]
struct RunResult {
    executed: usize,
}

#[derive(Serialize)]
struct RunOk {
    ok: bool,
    result: RunResult,
}

#[derive(Serialize)]
struct RunFailed {
    ok: bool,
    error: String,
}

/// Possible responses from the run endpoint.
pub enum RunResponse {
    Executed(Json<RunOk>),
    Failed(Json<RunFailed>),
}

impl IntoResponse for RunResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Executed(json) => (StatusCode::OK, json).into_response(),
            Self::Failed(json) => (StatusCode::INTERNAL_SERVER_ERROR, json).into_response(),
        }
    }
}

/// The most specific message available for the error envelope.
fn error_message(err: &RelayHubError) -> String {
    match err {
        RelayHubError::Validation(inner) => inner.to_string(),
        RelayHubError::NotFound(inner) => inner.to_string(),
        RelayHubError::Storage(_) | RelayHubError::Notification(_) => err.to_string(),
    }
}

/// `POST /api/schedules/run` — run one tick now, or at the `time` override.
pub async fn run<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Query(params): Query<RunParams>,
) -> RunResponse
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    match state.engine.run_once(params.time.as_deref()).await {
        Ok(outcome) => RunResponse::Executed(Json(RunOk {
            ok: true,
            result: RunResult {
                executed: outcome.executed,
            },
        })),
        Err(err) => {
            tracing::error!(error = %err, "on-demand trigger failed");
            RunResponse::Failed(Json(RunFailed {
                ok: false,
                error: error_message(&err),
            }))
        }
    }
}
