//! JSON REST handlers for schedule rules.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};
use relayhub_domain::error::{NotFoundError, RelayHubError};
use relayhub_domain::id::ScheduleId;
use relayhub_domain::schedule::{ScheduleRule, SwitchAction};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or editing a rule. The time is a raw label
/// validated by the service; the action deserializes as `"ON"`/`"OFF"`.
#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub time: String,
    pub action: SwitchAction,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ScheduleRule>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ScheduleRule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<ScheduleRule>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<ScheduleId, ApiError> {
    ScheduleId::from_str(raw).map_err(|_| {
        ApiError::from(RelayHubError::NotFound(NotFoundError {
            entity: "Schedule",
            id: raw.to_string(),
        }))
    })
}

/// `GET /api/schedules` — list all rules, newest first.
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
    let rules = state.schedule_service.list().await?;
    Ok(ListResponse::Ok(Json(rules)))
}

/// `POST /api/schedules` — create a new rule.
pub async fn create<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Json(req): Json<ScheduleRequest>,
) -> Result<CreateResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let rule = state
        .schedule_service
        .create(&req.time, req.action)
        .await?;
    Ok(CreateResponse::Created(Json(rule)))
}

/// `PUT /api/schedules/{id}` — edit a rule's time and action.
pub async fn update<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Path(id): Path<String>,
    Json(req): Json<ScheduleRequest>,
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
    let rule = state
        .schedule_service
        .update(id, &req.time, req.action)
        .await?;
    Ok(UpdateResponse::Ok(Json(rule)))
}

/// `DELETE /api/schedules/{id}` — delete a rule.
pub async fn delete<RR, SR, ES, LS, PT, PS>(
    State(state): State<AppState<RR, SR, ES, LS, PT, PS>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state.schedule_service.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}
