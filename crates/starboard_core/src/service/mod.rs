//! Use-case services.
//!
//! # Responsibility
//! - `goal_service`: the data-access contract and its repository-backed
//!   implementation.
//! - `board_service`: the orchestrator that owns board state and routes
//!   interaction commands to the store.

pub mod board_service;
pub mod goal_service;
