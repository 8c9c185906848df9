//! Directional link between two goals.
//!
//! # Invariants
//! - At most one connection exists per ordered `(source_id, target_id)`.
//! - Connections are never mutated; they are created or deleted.
//! - A connection may outlive its endpoints (orphan); readers filter it.

use crate::model::goal::GoalId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a connection.
pub type ConnectionId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source_id: GoalId,
    pub target_id: GoalId,
    /// Epoch milliseconds, assigned by storage.
    pub created_at: i64,
}

impl Connection {
    pub fn new(source_id: GoalId, target_id: GoalId) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            target_id,
            created_at: 0,
        }
    }

    /// Returns whether this connection touches `goal_id` at either end.
    pub fn touches(&self, goal_id: GoalId) -> bool {
        self.source_id == goal_id || self.target_id == goal_id
    }
}
