use starboard_core::db::open_db_in_memory;
use starboard_core::{
    sqlite_store, BoardCommand, BoardConfig, BoardError, BoardEvent, BoardService, ConfigError,
    Connection, ConnectionId, CreateGoalRequest, Goal, GoalId, GoalListQuery, GoalPatch,
    GoalStore, GoalValidationError, InteractionError, Position, Rect, SpawnArea,
    SqliteGoalStore, StoreError, StoreResult,
};
use std::cell::Cell;

const ARCHIVE_CENTER: Position = Position::new(1000.0, 700.0);

fn config() -> BoardConfig {
    BoardConfig {
        archive_center: ARCHIVE_CENTER,
        ..BoardConfig::default()
    }
}

fn open_board(conn: &rusqlite::Connection) -> BoardService<SqliteGoalStore<'_>> {
    let store = sqlite_store(conn, &config()).unwrap();
    BoardService::open(store, config()).unwrap()
}

fn add_goal<S: GoalStore>(board: &mut BoardService<S>, title: &str, position: Position) -> Goal {
    board
        .create_goal(&CreateGoalRequest {
            position: Some(position),
            ..CreateGoalRequest::titled(title)
        })
        .unwrap()
}

fn drag<S: GoalStore>(
    board: &mut BoardService<S>,
    goal_id: GoalId,
    from: Position,
    to: Position,
) -> Result<BoardEvent, BoardError> {
    board.dispatch(BoardCommand::StartDrag {
        goal_id,
        pointer: from,
    })?;
    board.dispatch(BoardCommand::UpdateDrag { pointer: to })?;
    board.dispatch(BoardCommand::EndDrag { pointer: to })
}

fn list_archived<S: GoalStore>(board: &BoardService<S>) -> Vec<GoalId> {
    board
        .store()
        .list_goals(&GoalListQuery::archived())
        .unwrap()
        .into_iter()
        .map(|goal| goal.id)
        .collect()
}

#[test]
fn created_goal_appears_on_board_after_reload() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);

    let event = board
        .dispatch(BoardCommand::CreateGoal(CreateGoalRequest::titled("Learn X")))
        .unwrap();

    let BoardEvent::GoalCreated(goal) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert!(SpawnArea::default().contains(goal.position));
    assert_eq!(board.state().goals, vec![goal]);
}

#[test]
fn blank_title_is_rejected_without_touching_the_board() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);

    let err = board
        .dispatch(BoardCommand::CreateGoal(CreateGoalRequest::titled("  ")))
        .unwrap_err();

    assert!(matches!(
        err,
        BoardError::Store(StoreError::Validation(GoalValidationError::EmptyTitle))
    ));
    assert!(board.state().goals.is_empty());
}

#[test]
fn long_drag_persists_position_and_keeps_details_closed() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Move me", Position::new(300.0, 300.0));

    let event = drag(
        &mut board,
        goal.id,
        Position::new(305.0, 302.0),
        Position::new(405.0, 352.0),
    )
    .unwrap();

    let BoardEvent::GoalMoved(moved) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert_eq!(moved.position, Position::new(400.0, 350.0));
    assert_eq!(
        board.store().get_goal(goal.id).unwrap().unwrap().position,
        Position::new(400.0, 350.0)
    );
    assert!(board.details().is_none());
    assert_eq!(board.selected(), Some(goal.id));
}

#[test]
fn short_press_opens_details_and_keeps_stored_position() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Click me", Position::new(300.0, 300.0));

    let event = drag(
        &mut board,
        goal.id,
        Position::new(300.0, 300.0),
        Position::new(302.0, 303.0),
    )
    .unwrap();

    assert_eq!(event, BoardEvent::DetailsOpened(goal.id));
    assert_eq!(board.details().map(|details| details.id), Some(goal.id));
    assert_eq!(
        board.state().goal(goal.id).unwrap().position,
        Position::new(300.0, 300.0)
    );
    let stored = board.store().get_goal(goal.id).unwrap().unwrap();
    assert_eq!(stored.position, Position::new(300.0, 300.0));
    assert_eq!(stored.updated_at, goal.updated_at);

    assert_eq!(board.close_details(), BoardEvent::DetailsClosed);
    assert!(board.details().is_none());
}

#[test]
fn drag_updates_local_state_before_store_confirmation() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Optimistic", Position::new(300.0, 300.0));

    board.start_drag(goal.id, Position::new(300.0, 300.0)).unwrap();
    assert!(board.is_dragging());
    let event = board.update_drag(Position::new(350.0, 320.0));

    assert_eq!(
        event,
        BoardEvent::DragTracked {
            goal_id: goal.id,
            position: Position::new(350.0, 320.0),
        }
    );
    assert_eq!(
        board.state().goal(goal.id).unwrap().position,
        Position::new(350.0, 320.0)
    );
    assert_eq!(
        board.store().get_goal(goal.id).unwrap().unwrap().position,
        Position::new(300.0, 300.0)
    );
}

#[test]
fn release_inside_capture_region_archives() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Into the void", Position::new(300.0, 300.0));

    let event = drag(
        &mut board,
        goal.id,
        Position::new(300.0, 300.0),
        Position::new(ARCHIVE_CENTER.x + 30.0, ARCHIVE_CENTER.y - 20.0),
    )
    .unwrap();

    assert_eq!(event, BoardEvent::GoalArchived(goal.id));
    assert!(board.state().goal(goal.id).is_none());
    assert!(board.state().archived_goal(goal.id).is_some());
    assert_eq!(list_archived(&board), vec![goal.id]);
    assert!(!board.is_dragging());
    assert_eq!(board.selected(), None);
}

#[test]
fn release_on_capture_boundary_does_not_archive() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Near miss", Position::new(300.0, 300.0));

    let event = drag(
        &mut board,
        goal.id,
        Position::new(300.0, 300.0),
        Position::new(ARCHIVE_CENTER.x - 50.0, ARCHIVE_CENTER.y),
    )
    .unwrap();

    assert!(matches!(event, BoardEvent::GoalMoved(_)));
    assert!(board.state().goal(goal.id).is_some());
    assert!(list_archived(&board).is_empty());
}

#[test]
fn press_on_second_goal_during_drag_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));

    board.start_drag(a.id, Position::new(250.0, 250.0)).unwrap();
    board.update_drag(Position::new(280.0, 260.0));

    let err = board
        .start_drag(b.id, Position::new(450.0, 250.0))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Interaction(InteractionError::GestureInProgress { active }) if active == a.id
    ));
    assert_eq!(board.selected(), Some(a.id));
}

#[test]
fn release_without_press_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    add_goal(&mut board, "Idle", Position::new(300.0, 300.0));

    let event = board
        .dispatch(BoardCommand::EndDrag {
            pointer: ARCHIVE_CENTER,
        })
        .unwrap();
    assert_eq!(event, BoardEvent::Unchanged);
    assert!(list_archived(&board).is_empty());
}

#[test]
fn connecting_two_goals_creates_one_connection() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));

    board.dispatch(BoardCommand::StartConnection(a.id)).unwrap();
    assert_eq!(board.pending_connection(), Some(a.id));
    assert_eq!(board.selected(), Some(a.id));

    let event = board
        .dispatch(BoardCommand::CompleteConnection(b.id))
        .unwrap();
    let BoardEvent::ConnectionCreated(connection) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert_eq!((connection.source_id, connection.target_id), (a.id, b.id));
    assert_eq!(board.pending_connection(), None);
    assert_eq!(board.state().connections, vec![connection]);
}

#[test]
fn pressing_a_node_while_pending_completes_instead_of_dragging() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));

    board.start_connection(a.id).unwrap();
    let event = board.start_drag(b.id, Position::new(450.0, 250.0)).unwrap();

    assert!(matches!(event, BoardEvent::ConnectionCreated(_)));
    assert!(!board.is_dragging());
}

#[test]
fn clicking_pending_source_cancels_without_creating() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));

    board.start_connection(a.id).unwrap();
    let event = board.complete_connection(a.id).unwrap();

    assert_eq!(event, BoardEvent::ConnectionCancelled);
    assert_eq!(board.pending_connection(), None);
    assert!(board.store().list_connections().unwrap().is_empty());
}

#[test]
fn duplicate_connection_surfaces_conflict_and_keeps_one_record() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));

    board.start_connection(a.id).unwrap();
    board.complete_connection(b.id).unwrap();
    board.start_connection(a.id).unwrap();
    let err = board.complete_connection(b.id).unwrap_err();

    assert!(matches!(err, BoardError::Store(StoreError::Conflict { .. })));
    assert_eq!(board.pending_connection(), None);
    assert_eq!(board.state().connections.len(), 1);
}

#[test]
fn second_pending_connection_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));

    board.start_connection(a.id).unwrap();
    let err = board.start_connection(b.id).unwrap_err();

    assert!(matches!(
        err,
        BoardError::Interaction(InteractionError::ConnectionPending { source }) if source == a.id
    ));
    assert_eq!(board.pending_connection(), Some(a.id));
}

#[test]
fn background_click_cancels_pending_and_clears_selection() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));

    board.start_connection(a.id).unwrap();
    let event = board.dispatch(BoardCommand::BoardClick).unwrap();

    assert_eq!(event, BoardEvent::SelectionCleared);
    assert_eq!(board.pending_connection(), None);
    assert_eq!(board.selected(), None);
}

#[test]
fn guide_line_runs_from_source_to_pointer() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));

    board.start_connection(a.id).unwrap();
    board
        .dispatch(BoardCommand::PointerMoved {
            pointer: Position::new(600.0, 420.0),
        })
        .unwrap();

    let line = board.guide_line().unwrap();
    assert_eq!(line.from, Position::new(250.0, 250.0));
    assert_eq!(line.to, Position::new(600.0, 420.0));

    board.cancel_connection();
    assert!(board.guide_line().is_none());
}

#[test]
fn toggle_complete_flips_flag() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Finish", Position::new(300.0, 300.0));

    board.dispatch(BoardCommand::ToggleComplete(goal.id)).unwrap();
    assert!(board.state().goal(goal.id).unwrap().completed);

    board.dispatch(BoardCommand::ToggleComplete(goal.id)).unwrap();
    assert!(!board.state().goal(goal.id).unwrap().completed);
}

#[test]
fn toggle_from_detail_view_closes_it() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let shown = add_goal(&mut board, "Shown", Position::new(300.0, 300.0));
    let other = add_goal(&mut board, "Other", Position::new(400.0, 300.0));

    board.dispatch(BoardCommand::OpenDetails(shown.id)).unwrap();
    board.dispatch(BoardCommand::ToggleComplete(other.id)).unwrap();
    assert_eq!(board.details().map(|details| details.id), Some(shown.id));

    let event = board
        .dispatch(BoardCommand::ToggleComplete(shown.id))
        .unwrap();

    let BoardEvent::GoalUpdated(updated) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert!(updated.completed);
    assert!(board.details().is_none());
}

#[test]
fn selection_is_exclusive() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));

    assert_eq!(
        board.dispatch(BoardCommand::Select(a.id)).unwrap(),
        BoardEvent::Selected(a.id)
    );
    assert_eq!(board.selected(), Some(a.id));

    assert_eq!(
        board.dispatch(BoardCommand::Select(b.id)).unwrap(),
        BoardEvent::Selected(b.id)
    );
    assert_eq!(board.selected(), Some(b.id));
}

#[test]
fn selecting_archived_goal_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let kept = add_goal(&mut board, "Kept", Position::new(250.0, 250.0));
    let gone = add_goal(&mut board, "Gone", Position::new(450.0, 250.0));
    board.archive(gone.id).unwrap();
    board.dispatch(BoardCommand::Select(kept.id)).unwrap();

    let err = board
        .dispatch(BoardCommand::Select(gone.id))
        .unwrap_err();

    assert!(matches!(
        err,
        BoardError::Interaction(InteractionError::UnknownGoal(id)) if id == gone.id
    ));
    assert_eq!(board.selected(), Some(kept.id));
}

#[test]
fn details_open_and_close_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Read me", Position::new(300.0, 300.0));

    assert_eq!(
        board.dispatch(BoardCommand::CloseDetails).unwrap(),
        BoardEvent::Unchanged
    );

    assert_eq!(
        board.dispatch(BoardCommand::OpenDetails(goal.id)).unwrap(),
        BoardEvent::DetailsOpened(goal.id)
    );
    assert_eq!(board.details().map(|details| details.title.as_str()), Some("Read me"));

    assert_eq!(
        board.dispatch(BoardCommand::CloseDetails).unwrap(),
        BoardEvent::DetailsClosed
    );
    assert!(board.details().is_none());
    assert_eq!(
        board.dispatch(BoardCommand::CloseDetails).unwrap(),
        BoardEvent::Unchanged
    );
}

#[test]
fn details_for_archived_goal_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Gone", Position::new(300.0, 300.0));
    board.archive(goal.id).unwrap();

    let err = board
        .dispatch(BoardCommand::OpenDetails(goal.id))
        .unwrap_err();

    assert!(matches!(
        err,
        BoardError::Interaction(InteractionError::UnknownGoal(id)) if id == goal.id
    ));
    assert!(board.details().is_none());
}

#[test]
fn board_with_unusable_spawn_area_fails_to_open() {
    let conn = open_db_in_memory().unwrap();
    let store = sqlite_store(&conn, &config()).unwrap();
    let broken = BoardConfig {
        spawn_area: SpawnArea {
            min_x: 600.0,
            max_x: 200.0,
            ..SpawnArea::default()
        },
        ..config()
    };

    let result = BoardService::open(store, broken);

    assert!(matches!(
        result,
        Err(BoardError::Config(ConfigError::EmptySpawnArea))
    ));
}

#[test]
fn restore_uses_fresh_spawn_position_and_closes_empty_archive() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Comeback", Position::new(300.0, 300.0));
    board.archive(goal.id).unwrap();
    board
        .dispatch(BoardCommand::OpenArchive {
            bounds: Rect::from_origin_size(400.0, 100.0, 400.0, 500.0),
        })
        .unwrap();

    let event = board.dispatch(BoardCommand::Restore(goal.id)).unwrap();

    let BoardEvent::GoalRestored(restored) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert!(!restored.archived);
    assert_ne!(restored.position, Position::new(300.0, 300.0));
    assert!(SpawnArea::default().contains(restored.position));
    assert!(board.state().goal(goal.id).is_some());
    assert!(!board.archive_zone().is_open());
}

#[test]
fn restore_requires_an_archived_goal() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Active", Position::new(300.0, 300.0));

    let err = board.restore(goal.id).unwrap_err();
    assert!(matches!(
        err,
        BoardError::Interaction(InteractionError::UnknownGoal(id)) if id == goal.id
    ));
}

#[test]
fn dragging_archived_item_out_of_list_restores_at_release_point() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Rescued", Position::new(300.0, 300.0));
    let other = add_goal(&mut board, "Still gone", Position::new(320.0, 300.0));
    board.archive(goal.id).unwrap();
    board.archive(other.id).unwrap();

    board
        .dispatch(BoardCommand::OpenArchive {
            bounds: Rect::from_origin_size(400.0, 100.0, 400.0, 500.0),
        })
        .unwrap();
    board
        .dispatch(BoardCommand::PressArchived {
            goal_id: goal.id,
            pointer: Position::new(500.0, 200.0),
        })
        .unwrap();
    board
        .dispatch(BoardCommand::DragArchived {
            pointer: Position::new(200.0, 150.0),
        })
        .unwrap();
    let event = board
        .dispatch(BoardCommand::ReleaseArchived {
            pointer: Position::new(150.0, 150.0),
        })
        .unwrap();

    let BoardEvent::GoalRestored(restored) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert_eq!(restored.position, Position::new(150.0, 150.0));
    assert!(board.state().goal(goal.id).is_some());
    assert_eq!(list_archived(&board), vec![other.id]);
    assert!(!board.archive_zone().is_open());
}

#[test]
fn dropping_archived_item_inside_list_is_abandoned() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Stays", Position::new(300.0, 300.0));
    board.archive(goal.id).unwrap();

    board
        .dispatch(BoardCommand::OpenArchive {
            bounds: Rect::from_origin_size(400.0, 100.0, 400.0, 500.0),
        })
        .unwrap();
    board
        .dispatch(BoardCommand::PressArchived {
            goal_id: goal.id,
            pointer: Position::new(500.0, 200.0),
        })
        .unwrap();
    assert_eq!(
        board.dispatch(BoardCommand::CloseArchive).unwrap(),
        BoardEvent::Unchanged
    );
    let event = board
        .dispatch(BoardCommand::ReleaseArchived {
            pointer: Position::new(600.0, 300.0),
        })
        .unwrap();

    assert_eq!(event, BoardEvent::ArchivedDragAbandoned(goal.id));
    assert_eq!(list_archived(&board), vec![goal.id]);
    assert!(board.archive_zone().is_open());
}

#[test]
fn archived_drag_requires_open_list() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Closed", Position::new(300.0, 300.0));
    board.archive(goal.id).unwrap();

    let err = board
        .dispatch(BoardCommand::PressArchived {
            goal_id: goal.id,
            pointer: Position::new(500.0, 200.0),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Interaction(InteractionError::ArchiveListClosed)
    ));
}

#[test]
fn permanent_delete_leaves_orphan_filtered_from_render() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));
    board.start_connection(a.id).unwrap();
    board.complete_connection(b.id).unwrap();
    assert_eq!(board.state().renderable_connections().len(), 1);

    let event = board
        .dispatch(BoardCommand::DeletePermanently(b.id))
        .unwrap();

    assert_eq!(event, BoardEvent::GoalDeleted(b.id));
    assert_eq!(board.store().list_connections().unwrap().len(), 1);
    assert_eq!(board.state().connections.len(), 1);
    assert!(board.state().renderable_connections().is_empty());
}

#[test]
fn deleting_already_deleted_goal_is_benign() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let goal = add_goal(&mut board, "Raced", Position::new(300.0, 300.0));
    board.open_details(goal.id).unwrap();

    board.store().delete_goal(goal.id).unwrap();
    let event = board.delete_permanently(goal.id).unwrap();

    assert_eq!(event, BoardEvent::Unchanged);
    assert!(board.state().goal(goal.id).is_none());
    assert!(board.details().is_none());
}

#[test]
fn deleting_connection_twice_is_benign() {
    let conn = open_db_in_memory().unwrap();
    let mut board = open_board(&conn);
    let a = add_goal(&mut board, "A", Position::new(250.0, 250.0));
    let b = add_goal(&mut board, "B", Position::new(450.0, 250.0));
    board.start_connection(a.id).unwrap();
    let BoardEvent::ConnectionCreated(connection) = board.complete_connection(b.id).unwrap()
    else {
        panic!("connection should be created");
    };

    assert_eq!(
        board
            .dispatch(BoardCommand::DeleteConnection(connection.id))
            .unwrap(),
        BoardEvent::ConnectionDeleted(connection.id)
    );
    assert_eq!(
        board
            .dispatch(BoardCommand::DeleteConnection(connection.id))
            .unwrap(),
        BoardEvent::Unchanged
    );
    assert!(board.state().connections.is_empty());
}

/// Store wrapper that fails goal updates on demand.
struct FlakyStore<S> {
    inner: S,
    fail_updates: Cell<bool>,
}

impl<S: GoalStore> GoalStore for FlakyStore<S> {
    fn list_goals(&self, query: &GoalListQuery) -> StoreResult<Vec<Goal>> {
        self.inner.list_goals(query)
    }

    fn list_connections(&self) -> StoreResult<Vec<Connection>> {
        self.inner.list_connections()
    }

    fn create_goal(&self, request: &CreateGoalRequest) -> StoreResult<Goal> {
        self.inner.create_goal(request)
    }

    fn update_goal(&self, id: GoalId, patch: &GoalPatch) -> StoreResult<Goal> {
        if self.fail_updates.get() {
            return Err(StoreError::InconsistentState("injected update failure"));
        }
        self.inner.update_goal(id, patch)
    }

    fn delete_goal(&self, id: GoalId) -> StoreResult<()> {
        self.inner.delete_goal(id)
    }

    fn create_connection(&self, source_id: GoalId, target_id: GoalId) -> StoreResult<Connection> {
        self.inner.create_connection(source_id, target_id)
    }

    fn delete_connection(&self, id: ConnectionId) -> StoreResult<()> {
        self.inner.delete_connection(id)
    }
}

#[test]
fn failed_move_reloads_instead_of_keeping_optimistic_patch() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore {
        inner: sqlite_store(&conn, &config()).unwrap(),
        fail_updates: Cell::new(false),
    };
    let mut board = BoardService::open(store, config()).unwrap();
    let goal = add_goal(&mut board, "Fragile", Position::new(300.0, 300.0));

    board.start_drag(goal.id, Position::new(300.0, 300.0)).unwrap();
    board.update_drag(Position::new(420.0, 380.0));
    assert_eq!(
        board.state().goal(goal.id).unwrap().position,
        Position::new(420.0, 380.0)
    );

    board.store().fail_updates.set(true);
    let err = board.end_drag(Position::new(420.0, 380.0)).unwrap_err();

    assert!(matches!(
        err,
        BoardError::Store(StoreError::InconsistentState(_))
    ));
    assert_eq!(
        board.state().goal(goal.id).unwrap().position,
        Position::new(300.0, 300.0)
    );
    assert!(!board.is_dragging());
}
