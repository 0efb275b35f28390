//! Shared application state for axum handlers.

use std::sync::Arc;

use relayhub_app::engine::SchedulerEngine;
use relayhub_app::ports::{
    ExecutionLogStore, ExecutionStore, PushSender, PushTokenRepository, RelayRepository,
    ScheduleRepository,
};
use relayhub_app::services::relay_service::RelayService;
use relayhub_app::services::schedule_service::ScheduleService;

/// Application state shared across all axum handlers.
///
/// Generic over the port implementations to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do
/// not need to be `Clone` — only the `Arc` wrappers are cloned. The log
/// store and push-token repository are shared with the scheduler engine,
/// which is why the engine is parameterized over their `Arc` wrappers.
pub struct AppState<RR, SR, ES, LS, PT, PS> {
    /// Relay toggle/list service.
    pub relay_service: Arc<RelayService<RR>>,
    /// Schedule rule CRUD service.
    pub schedule_service: Arc<ScheduleService<SR>>,
    /// The evaluate/commit/notify pipeline, shared with the periodic task.
    pub engine: Arc<SchedulerEngine<ES, Arc<LS>, Arc<PT>, PS>>,
    /// Audit log reads.
    pub log_store: Arc<LS>,
    /// Push-token registration.
    pub push_tokens: Arc<PT>,
}

impl<RR, SR, ES, LS, PT, PS> Clone for AppState<RR, SR, ES, LS, PT, PS> {
    fn clone(&self) -> Self {
        Self {
            relay_service: Arc::clone(&self.relay_service),
            schedule_service: Arc::clone(&self.schedule_service),
            engine: Arc::clone(&self.engine),
            log_store: Arc::clone(&self.log_store),
            push_tokens: Arc::clone(&self.push_tokens),
        }
    }
}

impl<RR, SR, ES, LS, PT, PS> AppState<RR, SR, ES, LS, PT, PS>
where
    RR: RelayRepository + Send + Sync + 'static,
    SR: ScheduleRepository + Send + Sync + 'static,
    ES: ExecutionStore + Send + Sync + 'static,
    LS: ExecutionLogStore + Send + Sync + 'static,
    PT: PushTokenRepository + Send + Sync + 'static,
    PS: PushSender + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        relay_service: RelayService<RR>,
        schedule_service: ScheduleService<SR>,
        engine: SchedulerEngine<ES, Arc<LS>, Arc<PT>, PS>,
        log_store: Arc<LS>,
        push_tokens: Arc<PT>,
    ) -> Self {
        Self {
            relay_service: Arc::new(relay_service),
            schedule_service: Arc::new(schedule_service),
            engine: Arc::new(engine),
            log_store,
            push_tokens,
        }
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when the engine needs to be shared with the periodic
    /// trigger task before constructing the HTTP state.
    pub fn from_arcs(
        relay_service: Arc<RelayService<RR>>,
        schedule_service: Arc<ScheduleService<SR>>,
        engine: Arc<SchedulerEngine<ES, Arc<LS>, Arc<PT>, PS>>,
        log_store: Arc<LS>,
        push_tokens: Arc<PT>,
    ) -> Self {
        Self {
            relay_service,
            schedule_service,
            engine,
            log_store,
            push_tokens,
        }
    }
}
