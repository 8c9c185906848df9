//! Per-goal press/drag/release state machine.
//!
//! `Idle -> Pressed -> Dragging -> Idle`, with a release from either
//! `Pressed` or `Dragging` resolving to one of:
//! - `Archive` when the pointer lands in the archive capture region,
//! - `Click` when the pointer travelled less than the click threshold,
//! - `Moved` otherwise.

use crate::config::DEFAULT_CLICK_THRESHOLD;
use crate::interaction::archive_zone::ArchiveZone;
use crate::interaction::InteractionError;
use crate::model::goal::{GoalId, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeGesture {
    Idle,
    Pressed {
        goal_id: GoalId,
        press: Position,
        grab_offset: Position,
    },
    Dragging {
        goal_id: GoalId,
        press: Position,
        grab_offset: Position,
        node_position: Position,
    },
}

/// Outcome of releasing a pressed node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRelease {
    /// Dropped inside the archive capture region.
    Archive { goal_id: GoalId },
    /// Press and release within the click threshold; the stored position
    /// stays and `origin` is where the node sat when pressed.
    Click { goal_id: GoalId, origin: Position },
    /// Dragged to a new resting position that should be persisted.
    Moved { goal_id: GoalId, position: Position },
}

#[derive(Debug, Clone)]
pub struct NodeInteractionController {
    gesture: NodeGesture,
    click_threshold: f64,
}

impl Default for NodeInteractionController {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_THRESHOLD)
    }
}

impl NodeInteractionController {
    pub fn new(click_threshold: f64) -> Self {
        Self {
            gesture: NodeGesture::Idle,
            click_threshold,
        }
    }

    /// Goal owning the current gesture, if any.
    pub fn active_goal(&self) -> Option<GoalId> {
        match self.gesture {
            NodeGesture::Idle => None,
            NodeGesture::Pressed { goal_id, .. } | NodeGesture::Dragging { goal_id, .. } => {
                Some(goal_id)
            }
        }
    }

    /// True once the pressed node has moved at least once.
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, NodeGesture::Dragging { .. })
    }

    /// Starts a gesture on `goal_id`.
    ///
    /// The grab offset keeps the node from jumping under the pointer.
    pub fn press(
        &mut self,
        goal_id: GoalId,
        pointer: Position,
        node_position: Position,
    ) -> Result<(), InteractionError> {
        if let Some(active) = self.active_goal() {
            return Err(InteractionError::GestureInProgress { active });
        }
        self.gesture = NodeGesture::Pressed {
            goal_id,
            press: pointer,
            grab_offset: pointer.offset_from(node_position),
        };
        Ok(())
    }

    /// Tracks the pointer and returns the node's new position.
    ///
    /// Returns `None` when no node is pressed.
    pub fn drag_to(&mut self, pointer: Position) -> Option<(GoalId, Position)> {
        let (goal_id, press, grab_offset) = match self.gesture {
            NodeGesture::Idle => return None,
            NodeGesture::Pressed {
                goal_id,
                press,
                grab_offset,
            }
            | NodeGesture::Dragging {
                goal_id,
                press,
                grab_offset,
                ..
            } => (goal_id, press, grab_offset),
        };

        let node_position = pointer.offset_from(grab_offset);
        self.gesture = NodeGesture::Dragging {
            goal_id,
            press,
            grab_offset,
            node_position,
        };
        Some((goal_id, node_position))
    }

    /// Ends the gesture. A release without a prior press is a no-op.
    pub fn release(&mut self, pointer: Position, zone: &ArchiveZone) -> Option<NodeRelease> {
        let (goal_id, press, grab_offset) = match self.gesture {
            NodeGesture::Idle => return None,
            NodeGesture::Pressed {
                goal_id,
                press,
                grab_offset,
            }
            | NodeGesture::Dragging {
                goal_id,
                press,
                grab_offset,
                ..
            } => (goal_id, press, grab_offset),
        };
        self.gesture = NodeGesture::Idle;

        if zone.is_captured(pointer) {
            return Some(NodeRelease::Archive { goal_id });
        }
        if press.distance_to(pointer) < self.click_threshold {
            return Some(NodeRelease::Click {
                goal_id,
                origin: press.offset_from(grab_offset),
            });
        }
        Some(NodeRelease::Moved {
            goal_id,
            position: pointer.offset_from(grab_offset),
        })
    }

    /// Drops the current gesture without an outcome.
    pub fn abort(&mut self) -> Option<GoalId> {
        let active = self.active_goal();
        self.gesture = NodeGesture::Idle;
        active
    }
}
