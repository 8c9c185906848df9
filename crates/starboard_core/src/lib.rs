//! Core domain logic for the starboard goal board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{BoardConfig, ConfigError, SpawnArea};
pub use interaction::{
    ArchiveRelease, ArchiveZone, ArchivedDrag, ConnectionController, ConnectionResolution,
    GuideLine, InteractionError, NodeInteractionController, NodeRelease, Rect,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::BoardState;
pub use model::connection::{Connection, ConnectionId};
pub use model::goal::{Goal, GoalId, GoalPatch, GoalValidationError, Position};
pub use repo::connection_repo::{ConnectionRepository, SqliteConnectionRepository};
pub use repo::goal_repo::{
    GoalListQuery, GoalRepository, RepoError, RepoResult, SqliteGoalRepository,
};
pub use service::board_service::{
    BoardCommand, BoardError, BoardEvent, BoardResult, BoardService,
};
pub use service::goal_service::{
    CreateGoalRequest, GoalService, GoalStore, StoreError, StoreResult,
};

/// SQLite-backed store borrowing one open connection.
pub type SqliteGoalStore<'conn> =
    GoalService<SqliteGoalRepository<'conn>, SqliteConnectionRepository<'conn>>;

/// Builds a `GoalStore` over a migrated connection, placing new goals in
/// `config.spawn_area`.
///
/// Pass the same `config` to `BoardService::open` so goal creation and
/// randomized restore share one spawn area.
pub fn sqlite_store<'conn>(
    conn: &'conn rusqlite::Connection,
    config: &BoardConfig,
) -> StoreResult<SqliteGoalStore<'conn>> {
    config.validate()?;
    Ok(GoalService::with_spawn_area(
        SqliteGoalRepository::try_new(conn)?,
        SqliteConnectionRepository::try_new(conn)?,
        config.spawn_area,
    ))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
