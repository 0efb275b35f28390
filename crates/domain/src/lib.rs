//! # relayhub-domain
//!
//! Pure domain model for the relayhub relay-control system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Relays** (named binary actuators) and their two independent
//!   per-actuator maps: current state and schedule enablement
//! - Define **Schedule rules** (time-of-day instructions applied to all relays)
//! - Define the **minute key** idempotency unit and the pure
//!   [`evaluate`](evaluate::evaluate) function that turns a rule set and a
//!   state snapshot into a set of writes, stamps, and audit records
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod evaluate;
pub mod log;
pub mod relay;
pub mod schedule;
