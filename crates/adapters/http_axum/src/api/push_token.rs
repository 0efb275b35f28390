//! Push-token registration.
//!
//! The token itself is never echoed back; the status endpoint only says
//! whether one is registered.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering the delivery token.
#[derive(Deserialize)]
pub struct SetTokenRequest {
    pub token: String,
}

/// Response body for the status endpoint.
#[derive(Serialize)]
pub struct TokenStatus {
    pub registered: bool,
}

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<TokenStatus>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the registration endpoint.
pub enum SetResponse {
    NoContent,
}

impl IntoResponse for SetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/push-token` — whether a delivery token is registered.
pub async fn status<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
) -> Result<StatusResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let token = state.push_tokens.get().await?;
    Ok(StatusResponse::Ok(Json(TokenStatus {
        registered: token.is_some(),
    })))
}

/// `PUT /api/push-token` — register (or replace) the delivery token.
///
/// Registration is deliberately lenient: a structurally invalid token is
/// stored as-is and filtered out by the notifier at delivery time.
pub async fn set<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Json(req): Json<SetTokenRequest>,
) -> Result<SetResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    state.push_tokens.set(&req.token).await?;
    Ok(SetResponse::NoContent)
}
