//! Derived board snapshot.
//!
//! # Responsibility
//! - Hold active goals, archived goals and connections loaded together.
//! - Resolve which connections can be rendered right now.
//!
//! # Invariants
//! - The snapshot is replaced wholesale on every reload; the only in-place
//!   edit is the optimistic drag position patch.
//! - A connection renders only when both endpoints are active goals.

use crate::model::connection::Connection;
use crate::model::goal::{Goal, GoalId, Position};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardState {
    pub goals: Vec<Goal>,
    pub archived_goals: Vec<Goal>,
    pub connections: Vec<Connection>,
}

impl BoardState {
    /// Looks up an active (non-archived) goal.
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Looks up an archived goal.
    pub fn archived_goal(&self, id: GoalId) -> Option<&Goal> {
        self.archived_goals.iter().find(|goal| goal.id == id)
    }

    /// Connections whose source and target are both on the active board.
    ///
    /// Orphans (deleted endpoint) and links into the archive are skipped.
    pub fn renderable_connections(&self) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|connection| {
                self.goal(connection.source_id).is_some()
                    && self.goal(connection.target_id).is_some()
            })
            .collect()
    }

    /// Moves an active goal locally, ahead of persisted confirmation.
    ///
    /// Returns `false` when the goal is not on the active board.
    pub fn patch_position(&mut self, id: GoalId, position: Position) -> bool {
        match self.goals.iter_mut().find(|goal| goal.id == id) {
            Some(goal) => {
                goal.position = position;
                true
            }
            None => false,
        }
    }
}
