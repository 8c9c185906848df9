//! Board orchestrator.
//!
//! # Responsibility
//! - Own the canonical `BoardState` and the interaction controllers.
//! - Route board commands to `GoalStore` operations.
//! - Reload the full snapshot after every mutation, successful or not.
//!
//! # Invariants
//! - Local state is only edited by reloads and by the optimistic drag
//!   patch; the two may disagree until the next reload lands.
//! - A failed mutation never leaves a local patch behind: the snapshot is
//!   reloaded before the error is returned.
//! - Selection, details and pending connection only ever reference goals
//!   present on the active board.

use crate::config::{BoardConfig, ConfigError};
use crate::interaction::{
    ArchiveRelease, ArchiveZone, ArchivedDrag, ConnectionController, ConnectionResolution,
    GuideLine, InteractionError, NodeInteractionController, NodeRelease, Rect,
};
use crate::model::board::BoardState;
use crate::model::connection::{Connection, ConnectionId};
use crate::model::goal::{Goal, GoalId, GoalPatch, GoalValidationError, Position};
use crate::repo::goal_repo::GoalListQuery;
use crate::service::goal_service::{CreateGoalRequest, GoalStore, StoreError, StoreResult};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const RESTORE_PLACEMENT_ATTEMPTS: usize = 8;

/// Input events accepted by the board.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCommand {
    CreateGoal(CreateGoalRequest),
    Select(GoalId),
    StartDrag { goal_id: GoalId, pointer: Position },
    UpdateDrag { pointer: Position },
    EndDrag { pointer: Position },
    /// Bare pointer motion; feeds the pending-connection guide line.
    PointerMoved { pointer: Position },
    StartConnection(GoalId),
    CompleteConnection(GoalId),
    CancelConnection,
    /// Click on empty board background.
    BoardClick,
    DeleteConnection(ConnectionId),
    ToggleComplete(GoalId),
    Archive(GoalId),
    Restore(GoalId),
    RestoreAtPosition { goal_id: GoalId, position: Position },
    DeletePermanently(GoalId),
    OpenDetails(GoalId),
    CloseDetails,
    OpenArchive { bounds: Rect },
    CloseArchive,
    PressArchived { goal_id: GoalId, pointer: Position },
    DragArchived { pointer: Position },
    ReleaseArchived { pointer: Position },
}

/// What a command did, for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Unchanged,
    Selected(GoalId),
    SelectionCleared,
    GoalCreated(Goal),
    DragStarted(GoalId),
    /// Optimistic, not yet persisted.
    DragTracked { goal_id: GoalId, position: Position },
    GoalMoved(Goal),
    GoalUpdated(Goal),
    DetailsOpened(GoalId),
    DetailsClosed,
    ConnectionPending(GoalId),
    ConnectionCreated(Connection),
    ConnectionCancelled,
    ConnectionDeleted(ConnectionId),
    GoalArchived(GoalId),
    GoalRestored(Goal),
    GoalDeleted(GoalId),
    ArchiveOpened,
    ArchiveClosed,
    ArchivedDragStarted(GoalId),
    ArchivedDragTracked(ArchivedDrag),
    ArchivedDragAbandoned(GoalId),
}

/// Errors returned by board commands.
#[derive(Debug)]
pub enum BoardError {
    Store(StoreError),
    Interaction(InteractionError),
    Config(ConfigError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Interaction(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "invalid board config: {err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Interaction(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ConfigError> for BoardError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<InteractionError> for BoardError {
    fn from(value: InteractionError) -> Self {
        Self::Interaction(value)
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Composes the store, the snapshot and the interaction controllers.
pub struct BoardService<S: GoalStore> {
    store: S,
    config: BoardConfig,
    state: BoardState,
    selected: Option<GoalId>,
    details: Option<GoalId>,
    node: NodeInteractionController,
    connection: ConnectionController,
    zone: ArchiveZone,
}

impl<S: GoalStore> BoardService<S> {
    /// Creates an empty board. Call `reload` to load the first snapshot.
    ///
    /// # Errors
    /// - `BoardError::Config` when `config` fails validation.
    pub fn new(store: S, config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            node: NodeInteractionController::new(config.click_threshold),
            connection: ConnectionController::new(),
            zone: ArchiveZone::new(config.archive_center, config.capture_radius),
            config,
            state: BoardState::default(),
            selected: None,
            details: None,
        })
    }

    /// Creates a board and loads the initial snapshot.
    pub fn open(store: S, config: BoardConfig) -> BoardResult<Self> {
        let mut board = Self::new(store, config)?;
        board.reload()?;
        Ok(board)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn selected(&self) -> Option<GoalId> {
        self.selected
    }

    /// Goal shown in the detail view.
    pub fn details(&self) -> Option<&Goal> {
        self.details.and_then(|id| self.state.goal(id))
    }

    pub fn pending_connection(&self) -> Option<GoalId> {
        self.connection.pending_source()
    }

    pub fn guide_line(&self) -> Option<GuideLine> {
        let source = self.state.goal(self.connection.pending_source()?)?;
        self.connection.guide_line(source.position)
    }

    /// True while any node gesture is active; drives the archive highlight.
    pub fn is_dragging(&self) -> bool {
        self.node.active_goal().is_some()
    }

    pub fn archive_zone(&self) -> &ArchiveZone {
        &self.zone
    }

    /// Replaces the snapshot with the store's current goals and connections.
    pub fn reload(&mut self) -> StoreResult<()> {
        let goals = self.store.list_goals(&GoalListQuery::active())?;
        let archived_goals = self.store.list_goals(&GoalListQuery::archived())?;
        let connections = self.store.list_connections()?;
        self.state = BoardState {
            goals,
            archived_goals,
            connections,
        };
        self.drop_stale_references();

        debug!(
            "event=board_reload module=board status=ok goals={} archived={} connections={}",
            self.state.goals.len(),
            self.state.archived_goals.len(),
            self.state.connections.len()
        );
        Ok(())
    }

    /// Routes one command to the matching handler.
    pub fn dispatch(&mut self, command: BoardCommand) -> BoardResult<BoardEvent> {
        match command {
            BoardCommand::CreateGoal(request) => {
                self.create_goal(&request).map(BoardEvent::GoalCreated)
            }
            BoardCommand::Select(goal_id) => self.select(goal_id),
            BoardCommand::StartDrag { goal_id, pointer } => self.start_drag(goal_id, pointer),
            BoardCommand::UpdateDrag { pointer } => Ok(self.update_drag(pointer)),
            BoardCommand::EndDrag { pointer } => self.end_drag(pointer),
            BoardCommand::PointerMoved { pointer } => {
                self.connection.track_pointer(pointer);
                Ok(BoardEvent::Unchanged)
            }
            BoardCommand::StartConnection(goal_id) => self.start_connection(goal_id),
            BoardCommand::CompleteConnection(goal_id) => self.complete_connection(goal_id),
            BoardCommand::CancelConnection => Ok(self.cancel_connection()),
            BoardCommand::BoardClick => Ok(self.board_click()),
            BoardCommand::DeleteConnection(id) => self.delete_connection(id),
            BoardCommand::ToggleComplete(goal_id) => self.toggle_complete(goal_id),
            BoardCommand::Archive(goal_id) => self.archive(goal_id),
            BoardCommand::Restore(goal_id) => self.restore(goal_id),
            BoardCommand::RestoreAtPosition { goal_id, position } => {
                self.restore_at(goal_id, position)
            }
            BoardCommand::DeletePermanently(goal_id) => self.delete_permanently(goal_id),
            BoardCommand::OpenDetails(goal_id) => self.open_details(goal_id),
            BoardCommand::CloseDetails => Ok(self.close_details()),
            BoardCommand::OpenArchive { bounds } => {
                self.zone.open(bounds);
                Ok(BoardEvent::ArchiveOpened)
            }
            BoardCommand::CloseArchive => Ok(if self.zone.close() {
                BoardEvent::ArchiveClosed
            } else {
                BoardEvent::Unchanged
            }),
            BoardCommand::PressArchived { goal_id, pointer } => {
                self.press_archived(goal_id, pointer)
            }
            BoardCommand::DragArchived { pointer } => Ok(self
                .zone
                .drag_item_to(pointer)
                .map_or(BoardEvent::Unchanged, BoardEvent::ArchivedDragTracked)),
            BoardCommand::ReleaseArchived { pointer } => self.release_archived(pointer),
        }
    }

    /// Creates a goal. Blank titles are rejected before reaching the store.
    pub fn create_goal(&mut self, request: &CreateGoalRequest) -> BoardResult<Goal> {
        if request.title.trim().is_empty() {
            warn!("event=goal_create module=board status=error error_code=empty_title");
            return Err(StoreError::Validation(GoalValidationError::EmptyTitle).into());
        }
        self.mutate("goal_create", |store| store.create_goal(request))
    }

    /// Exclusive selection of an active goal.
    pub fn select(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        self.require_active(goal_id)?;
        self.selected = Some(goal_id);
        Ok(BoardEvent::Selected(goal_id))
    }

    /// Primary press on a node.
    ///
    /// While a connection is pending the press completes it instead of
    /// starting a drag.
    pub fn start_drag(&mut self, goal_id: GoalId, pointer: Position) -> BoardResult<BoardEvent> {
        if self.connection.is_pending() {
            return self.complete_connection(goal_id);
        }
        if let Some(drag) = self.zone.dragging() {
            return Err(InteractionError::GestureInProgress {
                active: drag.goal_id,
            }
            .into());
        }
        let node_position = self.require_active(goal_id)?.position;
        self.node.press(goal_id, pointer, node_position)?;
        self.selected = Some(goal_id);
        Ok(BoardEvent::DragStarted(goal_id))
    }

    /// Moves the dragged node locally; nothing is persisted yet.
    pub fn update_drag(&mut self, pointer: Position) -> BoardEvent {
        match self.node.drag_to(pointer) {
            Some((goal_id, position)) => {
                self.state.patch_position(goal_id, position);
                BoardEvent::DragTracked { goal_id, position }
            }
            None => BoardEvent::Unchanged,
        }
    }

    /// Releases the dragged node: archive, open details, or persist the move.
    pub fn end_drag(&mut self, pointer: Position) -> BoardResult<BoardEvent> {
        match self.node.release(pointer, &self.zone) {
            None => Ok(BoardEvent::Unchanged),
            Some(NodeRelease::Archive { goal_id }) => self.archive(goal_id),
            Some(NodeRelease::Click { goal_id, origin }) => {
                self.state.patch_position(goal_id, origin);
                self.details = Some(goal_id);
                Ok(BoardEvent::DetailsOpened(goal_id))
            }
            Some(NodeRelease::Moved { goal_id, position }) => self
                .mutate("goal_move", |store| {
                    store.update_goal(goal_id, &GoalPatch::position(position))
                })
                .map(BoardEvent::GoalMoved),
        }
    }

    pub fn start_connection(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        self.require_active(goal_id)?;
        self.connection.start(goal_id)?;
        self.selected = Some(goal_id);
        Ok(BoardEvent::ConnectionPending(goal_id))
    }

    /// Completes the pending connection on `target`.
    ///
    /// The controller is `Inert` afterwards whatever the outcome, including
    /// a `Conflict` from the store.
    pub fn complete_connection(&mut self, target: GoalId) -> BoardResult<BoardEvent> {
        match self.connection.resolve(target) {
            ConnectionResolution::NotPending => Ok(BoardEvent::Unchanged),
            ConnectionResolution::Cancelled { source_id } => {
                debug!("event=connection_cancel module=board status=ok source_id={source_id}");
                Ok(BoardEvent::ConnectionCancelled)
            }
            ConnectionResolution::Create {
                source_id,
                target_id,
            } => {
                self.require_active(target_id)?;
                self.mutate("connection_create", |store| {
                    store.create_connection(source_id, target_id)
                })
                .map(BoardEvent::ConnectionCreated)
            }
        }
    }

    pub fn cancel_connection(&mut self) -> BoardEvent {
        match self.connection.cancel() {
            Some(_) => BoardEvent::ConnectionCancelled,
            None => BoardEvent::Unchanged,
        }
    }

    /// Background click: drop any pending connection and the selection.
    pub fn board_click(&mut self) -> BoardEvent {
        self.connection.cancel();
        self.selected = None;
        BoardEvent::SelectionCleared
    }

    /// Deletes a connection. An already-missing id is a benign no-op.
    pub fn delete_connection(&mut self, id: ConnectionId) -> BoardResult<BoardEvent> {
        match self.mutate("connection_delete", |store| store.delete_connection(id)) {
            Ok(()) => Ok(BoardEvent::ConnectionDeleted(id)),
            Err(BoardError::Store(StoreError::NotFound(_))) => Ok(BoardEvent::Unchanged),
            Err(err) => Err(err),
        }
    }

    /// Flips the completed flag. Toggling the goal shown in the detail view
    /// closes that view.
    pub fn toggle_complete(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        let completed = self.require_active(goal_id)?.completed;
        let goal = self.mutate("goal_toggle_complete", |store| {
            store.update_goal(goal_id, &GoalPatch::completed(!completed))
        })?;
        if self.details == Some(goal_id) {
            self.details = None;
        }
        Ok(BoardEvent::GoalUpdated(goal))
    }

    /// Sends an active goal into the archive zone.
    pub fn archive(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        self.require_active(goal_id)?;
        self.mutate("goal_archive", |store| {
            store.update_goal(goal_id, &GoalPatch::archived(true))
        })?;
        Ok(BoardEvent::GoalArchived(goal_id))
    }

    /// Restores an archived goal at a fresh random spawn-area position.
    pub fn restore(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        let archived_at = self.require_archived(goal_id)?.position;
        let spawn_area = self.config.spawn_area;
        let mut position = spawn_area.random_position()?;
        for _ in 0..RESTORE_PLACEMENT_ATTEMPTS {
            if position != archived_at {
                break;
            }
            position = spawn_area.random_position()?;
        }
        self.restore_at(goal_id, position)
    }

    /// Restores an archived goal at `position`.
    pub fn restore_at(&mut self, goal_id: GoalId, position: Position) -> BoardResult<BoardEvent> {
        self.require_archived(goal_id)?;
        let result = self.mutate("goal_restore", |store| {
            store.update_goal(goal_id, &GoalPatch::restore_at(position))
        });
        self.close_archive_if_empty();
        result.map(BoardEvent::GoalRestored)
    }

    /// Removes a goal record for good. Its connections become orphans.
    pub fn delete_permanently(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        let result = self.mutate("goal_delete", |store| store.delete_goal(goal_id));
        self.close_archive_if_empty();
        match result {
            Ok(()) => Ok(BoardEvent::GoalDeleted(goal_id)),
            Err(BoardError::Store(StoreError::NotFound(_))) => Ok(BoardEvent::Unchanged),
            Err(err) => Err(err),
        }
    }

    pub fn open_details(&mut self, goal_id: GoalId) -> BoardResult<BoardEvent> {
        self.require_active(goal_id)?;
        self.details = Some(goal_id);
        Ok(BoardEvent::DetailsOpened(goal_id))
    }

    pub fn close_details(&mut self) -> BoardEvent {
        match self.details.take() {
            Some(_) => BoardEvent::DetailsClosed,
            None => BoardEvent::Unchanged,
        }
    }

    fn press_archived(&mut self, goal_id: GoalId, pointer: Position) -> BoardResult<BoardEvent> {
        if let Some(active) = self.node.active_goal() {
            return Err(InteractionError::GestureInProgress { active }.into());
        }
        self.require_archived(goal_id)?;
        self.zone.press_item(goal_id, pointer)?;
        Ok(BoardEvent::ArchivedDragStarted(goal_id))
    }

    fn release_archived(&mut self, pointer: Position) -> BoardResult<BoardEvent> {
        match self.zone.release_item(pointer) {
            None => Ok(BoardEvent::Unchanged),
            Some(ArchiveRelease::Abandoned { goal_id }) => {
                Ok(BoardEvent::ArchivedDragAbandoned(goal_id))
            }
            Some(ArchiveRelease::RestoreAt { goal_id, position }) => {
                self.restore_at(goal_id, position)
            }
        }
    }

    /// Runs one store mutation, then reloads whatever the outcome.
    fn mutate<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(&S) -> StoreResult<T>,
    ) -> BoardResult<T> {
        let started_at = Instant::now();
        let result = apply(&self.store);
        let reloaded = self.reload();

        match result {
            Ok(value) => {
                info!(
                    "event={op} module=board status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                reloaded?;
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event={op} module=board status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                if let Err(reload_err) = reloaded {
                    error!(
                        "event=board_reload module=board status=error after_op={op} error={reload_err}"
                    );
                }
                Err(err.into())
            }
        }
    }

    fn require_active(&self, goal_id: GoalId) -> Result<&Goal, InteractionError> {
        self.state
            .goal(goal_id)
            .ok_or(InteractionError::UnknownGoal(goal_id))
    }

    fn require_archived(&self, goal_id: GoalId) -> Result<&Goal, InteractionError> {
        self.state
            .archived_goal(goal_id)
            .ok_or(InteractionError::UnknownGoal(goal_id))
    }

    fn close_archive_if_empty(&mut self) {
        if self.state.archived_goals.is_empty() {
            self.zone.close();
        }
    }

    fn drop_stale_references(&mut self) {
        if let Some(id) = self.selected {
            if self.state.goal(id).is_none() {
                self.selected = None;
            }
        }
        if let Some(id) = self.details {
            if self.state.goal(id).is_none() {
                self.details = None;
            }
        }
        if let Some(id) = self.connection.pending_source() {
            if self.state.goal(id).is_none() {
                self.connection.cancel();
            }
        }
        if let Some(id) = self.node.active_goal() {
            if self.state.goal(id).is_none() {
                self.node.abort();
            }
        }
    }
}
