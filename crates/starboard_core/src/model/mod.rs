//! Domain model for the goal board.
//!
//! # Responsibility
//! - Define canonical goal/connection records shared by storage and UI.
//! - Hold the derived board snapshot rendered between refreshes.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Archiving is a soft flag on `Goal`; deletion removes the row.

pub mod board;
pub mod connection;
pub mod goal;
