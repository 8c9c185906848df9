//! Pending-connection controller.
//!
//! `Inert <-> PendingFrom(source)`. Every resolution attempt returns the
//! controller to `Inert`, whether it produced a create request or not.

use crate::interaction::geometry::GuideLine;
use crate::interaction::InteractionError;
use crate::model::goal::{GoalId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ConnectionState {
    #[default]
    Inert,
    PendingFrom(GoalId),
}

/// Result of clicking a goal while a connection may be pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionResolution {
    /// Caller should create `source_id -> target_id`.
    Create { source_id: GoalId, target_id: GoalId },
    /// Clicked the pending source itself; nothing is created.
    Cancelled { source_id: GoalId },
    /// No connection was pending.
    NotPending,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionController {
    state: ConnectionState,
    pointer: Option<Position>,
}

impl ConnectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_source(&self) -> Option<GoalId> {
        match self.state {
            ConnectionState::Inert => None,
            ConnectionState::PendingFrom(source) => Some(source),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_source().is_some()
    }

    /// Enters `PendingFrom(source)`. A second pending connection is rejected.
    pub fn start(&mut self, source: GoalId) -> Result<(), InteractionError> {
        if let Some(pending) = self.pending_source() {
            return Err(InteractionError::ConnectionPending { source: pending });
        }
        self.state = ConnectionState::PendingFrom(source);
        Ok(())
    }

    /// Records the latest pointer position for the guide line.
    pub fn track_pointer(&mut self, pointer: Position) {
        self.pointer = Some(pointer);
    }

    /// Guide line from the source goal to the last tracked pointer.
    pub fn guide_line(&self, source_position: Position) -> Option<GuideLine> {
        if !self.is_pending() {
            return None;
        }
        self.pointer.map(|to| GuideLine {
            from: source_position,
            to,
        })
    }

    /// Resolves a click on `target` and returns to `Inert`.
    pub fn resolve(&mut self, target: GoalId) -> ConnectionResolution {
        let resolution = match self.state {
            ConnectionState::Inert => ConnectionResolution::NotPending,
            ConnectionState::PendingFrom(source_id) if source_id == target => {
                ConnectionResolution::Cancelled { source_id }
            }
            ConnectionState::PendingFrom(source_id) => ConnectionResolution::Create {
                source_id,
                target_id: target,
            },
        };
        self.state = ConnectionState::Inert;
        resolution
    }

    /// Drops any pending connection, returning its source.
    pub fn cancel(&mut self) -> Option<GoalId> {
        let pending = self.pending_source();
        self.state = ConnectionState::Inert;
        pending
    }
}
