//! Pointer-driven interaction controllers.
//!
//! # Responsibility
//! - Turn press/drag/release/click input into board-level intents.
//! - Keep gesture state free of storage concerns; callers persist results.
//!
//! # Invariants
//! - At most one pointer gesture (node drag or archived-item drag) is
//!   active at a time; a second one is rejected, never overwritten.
//! - At most one pending connection exists at a time.

use crate::model::goal::GoalId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod archive_zone;
pub mod connect;
pub mod geometry;
pub mod node;

pub use archive_zone::{ArchiveRelease, ArchiveZone, ArchivedDrag};
pub use connect::{ConnectionController, ConnectionResolution};
pub use geometry::{GuideLine, Rect};
pub use node::{NodeInteractionController, NodeRelease};

/// Rejected interaction requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionError {
    /// Another gesture already owns the pointer.
    GestureInProgress { active: GoalId },
    /// A connection is already pending from `source`.
    ConnectionPending { source: GoalId },
    /// Archived items can only be dragged while the list view is open.
    ArchiveListClosed,
    /// Goal is not present where the gesture expects it.
    UnknownGoal(GoalId),
}

impl Display for InteractionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GestureInProgress { active } => {
                write!(f, "another gesture is in progress on goal {active}")
            }
            Self::ConnectionPending { source } => {
                write!(f, "a connection is already pending from goal {source}")
            }
            Self::ArchiveListClosed => write!(f, "archive list view is closed"),
            Self::UnknownGoal(id) => write!(f, "goal not on board: {id}"),
        }
    }
}

impl Error for InteractionError {}
