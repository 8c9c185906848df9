//! Archive ("black hole") zone: capture region plus archived-item list.
//!
//! # Invariants
//! - A point is captured when its distance to the centre is strictly
//!   less than the capture radius.
//! - Archived items can be dragged only while the list view is open.
//! - Releasing a dragged item outside the list bounds restores it there and
//!   closes the list; releasing inside abandons the drag.

use crate::config::DEFAULT_CAPTURE_RADIUS;
use crate::interaction::geometry::Rect;
use crate::interaction::InteractionError;
use crate::model::goal::{GoalId, Position};

/// An archived goal being dragged out of the list view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchivedDrag {
    pub goal_id: GoalId,
    pub pointer: Position,
}

/// Outcome of releasing a dragged archived item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArchiveRelease {
    /// Restore the goal at `position`.
    RestoreAt { goal_id: GoalId, position: Position },
    /// Released over the list; nothing changes.
    Abandoned { goal_id: GoalId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ArchiveListView {
    bounds: Rect,
    drag: Option<ArchivedDrag>,
}

#[derive(Debug, Clone)]
pub struct ArchiveZone {
    center: Position,
    capture_radius: f64,
    list_view: Option<ArchiveListView>,
}

impl ArchiveZone {
    pub fn new(center: Position, capture_radius: f64) -> Self {
        Self {
            center,
            capture_radius,
            list_view: None,
        }
    }

    pub fn with_default_radius(center: Position) -> Self {
        Self::new(center, DEFAULT_CAPTURE_RADIUS)
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn capture_radius(&self) -> f64 {
        self.capture_radius
    }

    pub fn is_captured(&self, pointer: Position) -> bool {
        pointer.distance_to(self.center) < self.capture_radius
    }

    /// Opens (or re-bounds) the archived-goal list view.
    pub fn open(&mut self, bounds: Rect) {
        let drag = self.list_view.and_then(|view| view.drag);
        self.list_view = Some(ArchiveListView { bounds, drag });
    }

    pub fn is_open(&self) -> bool {
        self.list_view.is_some()
    }

    pub fn list_bounds(&self) -> Option<Rect> {
        self.list_view.map(|view| view.bounds)
    }

    /// Closes the list view. Ignored while an item is being dragged.
    ///
    /// Returns whether the view is closed afterwards.
    pub fn close(&mut self) -> bool {
        if self.dragging().is_some() {
            return false;
        }
        self.list_view = None;
        true
    }

    pub fn dragging(&self) -> Option<ArchivedDrag> {
        self.list_view.and_then(|view| view.drag)
    }

    pub fn press_item(
        &mut self,
        goal_id: GoalId,
        pointer: Position,
    ) -> Result<(), InteractionError> {
        let view = self
            .list_view
            .as_mut()
            .ok_or(InteractionError::ArchiveListClosed)?;
        if let Some(active) = view.drag {
            return Err(InteractionError::GestureInProgress {
                active: active.goal_id,
            });
        }
        view.drag = Some(ArchivedDrag { goal_id, pointer });
        Ok(())
    }

    pub fn drag_item_to(&mut self, pointer: Position) -> Option<ArchivedDrag> {
        let drag = self.list_view.as_mut()?.drag.as_mut()?;
        drag.pointer = pointer;
        Some(*drag)
    }

    /// Ends an archived-item drag. No-op when nothing is dragged.
    pub fn release_item(&mut self, pointer: Position) -> Option<ArchiveRelease> {
        let view = self.list_view.as_mut()?;
        let drag = view.drag.take()?;

        if view.bounds.contains(pointer) {
            return Some(ArchiveRelease::Abandoned {
                goal_id: drag.goal_id,
            });
        }

        self.list_view = None;
        Some(ArchiveRelease::RestoreAt {
            goal_id: drag.goal_id,
            position: pointer,
        })
    }
}
