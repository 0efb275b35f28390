//! # relayhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RelayRepository` — per-actuator state and enablement writes
//!   - `ScheduleRepository` — CRUD for schedule rules
//!   - `ExecutionStore` — single-snapshot read + atomic multi-key commit
//!   - `ExecutionLogStore` — append & query audit records
//!   - `PushTokenRepository` / `PushSender` — push delivery capability
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RelayService` — list & toggle relays under the toggle policy
//!   - `ScheduleService` — create, edit, list, delete rules
//!   - `SchedulerEngine` — snapshot → evaluate → commit → log → notify
//! - Keep the notifier in its own failure domain ([`notifier::Notifier`])
//!
//! ## Dependency rule
//! Depends on `relayhub-domain` only (plus `tokio` for time and
//! `tokio-util` for cancellation). Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod notifier;
pub mod ports;
pub mod services;
