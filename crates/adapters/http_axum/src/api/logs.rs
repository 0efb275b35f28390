//! Execution log listing.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};
use relayhub_domain::log::ExecutionRecord;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;

/// Query parameters for the log listing.
#[derive(Deserialize)]
pub struct LogParams {
    pub limit: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ExecutionRecord>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/logs` — most recent execution records first.
pub async fn list<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Query(params): Query<LogParams>,
) -> Result<ListResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let records = state.log_store.recent(limit).await?;
    Ok(ListResponse::Ok(Json(records)))
}
