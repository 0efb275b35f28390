//! JSON REST handlers for relays.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};
use relayhub_domain::error::RelayHubError;
use relayhub_domain::relay::{ActuatorId, Relay};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for setting a relay's state.
#[derive(Deserialize)]
pub struct SetStateRequest {
    pub state: bool,
}

/// Request body for setting a relay's schedule-enablement flag.
#[derive(Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Relay>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the state/enablement write endpoints.
pub enum UpdateResponse {
    Ok(Json<Relay>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<ActuatorId, ApiError> {
    ActuatorId::new(raw)
        .map_err(RelayHubError::from)
        .map_err(ApiError::from)
}

/// `GET /api/relays` — list all relays with state and enablement flags.
pub async fn list<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
) -> Result<ListResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let relays = state.relay_service.list().await?;
    Ok(ListResponse::Ok(Json(relays)))
}

/// `PUT /api/relays/{id}` — set a relay's state. The configured toggle
/// policy decides whether the enablement flag follows.
pub async fn set_state<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Path(id): Path<String>,
    Json(req): Json<SetStateRequest>,
) -> Result<UpdateResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let relay = state.relay_service.set_state(&id, req.state).await?;
    Ok(UpdateResponse::Ok(Json(relay)))
}

/// `PUT /api/relays/{id}/schedule-enabled` — set only the enablement flag.
pub async fn set_schedule_enabled<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Path(id): Path<String>,
    Json(req): Json<SetEnabledRequest>,
) -> Result<UpdateResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let relay = state
        .relay_service
        .set_schedule_enabled(&id, req.enabled)
        .await?;
    Ok(UpdateResponse::Ok(Json(relay)))
}
