//! JSON REST API route assembly.

use axum::Router;
use axum::routing::{get, post, put};

use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};

use crate::state::AppState;

pub mod logs;
pub mod push_token;
pub mod relays;
pub mod schedules;
pub mod trigger;

/// Build the `/api` sub-router.
pub fn routes<RR, SR, ES, LS, PT, PS>() -> Router<AppState<RR, SR, ES, LS, PT, PS>>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    Router::new()
        .route("/relays", get(relays::list))
        .route("/relays/{id}", put(relays::set_state))
        .route(
            "/relays/{id}/schedule-enabled",
            put(relays::set_schedule_enabled),
        )
        .route("/schedules", get(schedules::list).post(schedules::create))
        .route("/schedules/run", post(trigger::run))
        .route(
            "/schedules/{id}",
            put(schedules::update).delete(schedules::delete),
        )
        .route("/logs", get(logs::list))
        .route("/push-token", get(push_token::status).put(push_token::set))
}
