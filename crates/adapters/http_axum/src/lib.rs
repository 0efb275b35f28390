//! # relayhub-adapter-http-axum
//!
//! HTTP adapter. Serves the REST API over the application services:
//!
//! - `GET /health`
//! - `GET /api/relays`, `PUT /api/relays/{id}`,
//!   `PUT /api/relays/{id}/schedule-enabled`
//! - `GET|POST /api/schedules`, `PUT|DELETE /api/schedules/{id}`
//! - `POST /api/schedules/run` — on-demand trigger with optional `time`
//! - `GET /api/logs`
//! - `GET|PUT /api/push-token`

pub mod api;
pub mod error;
pub mod router;
pub mod state;
