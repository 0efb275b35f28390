//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the use-case layer
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod execution_store;
pub mod log_store;
pub mod push;
pub mod relay_repo;
pub mod schedule_repo;

pub use execution_store::{CommitBatch, ExecutionStore, StoreSnapshot};
pub use log_store::ExecutionLogStore;
pub use push::{PushSender, PushTokenRepository};
pub use relay_repo::RelayRepository;
pub use schedule_repo::ScheduleRepository;
