//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define table-oriented data access contracts for goals and connections.
//! - Isolate SQLite query details from store/orchestration logic.
//!
//! # Invariants
//! - Goal writes must enforce `Goal::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod connection_repo;
pub mod goal_repo;
