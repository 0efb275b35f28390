//! # relayhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter. Implements every storage port defined in
//! `relayhub-app`:
//!
//! - [`SqliteRelayRepository`] — the two per-actuator maps
//! - [`SqliteScheduleRepository`] — schedule rule CRUD
//! - [`SqliteExecutionStore`] — single-snapshot read and atomic commit,
//!   each exactly one transaction
//! - [`SqliteExecutionLogStore`] — append-only audit log
//! - [`SqlitePushTokenRepository`] — the single registered push token

mod error;
mod execution_store;
mod log_store;
mod pool;
mod push_token_repo;
mod relay_repo;
mod schedule_repo;

pub use error::StorageError;
pub use execution_store::SqliteExecutionStore;
pub use log_store::SqliteExecutionLogStore;
pub use pool::{Config, Database};
pub use push_token_repo::SqlitePushTokenRepository;
pub use relay_repo::SqliteRelayRepository;
pub use schedule_repo::SqliteScheduleRepository;
