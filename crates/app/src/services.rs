//! Application services — use-case entry points over the ports.

pub mod relay_service;
pub mod schedule_service;
