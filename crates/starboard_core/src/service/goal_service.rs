//! Goal store use-case service.
//!
//! # Responsibility
//! - Expose the board's data-access contract (`GoalStore`).
//! - Implement it over goal/connection repositories with input
//!   normalization and read-back after every write.
//!
//! # Invariants
//! - Blank titles are rejected before any SQL runs.
//! - Goals created without a position land inside the spawn area.
//! - Duplicate ordered connection pairs fail with `StoreError::Conflict`.

use crate::config::{ConfigError, SpawnArea};
use crate::model::connection::{Connection, ConnectionId};
use crate::model::goal::{
    normalize_optional_text, validate_due_date, Goal, GoalId, GoalPatch, GoalValidationError,
    Position,
};
use crate::repo::connection_repo::ConnectionRepository;
use crate::repo::goal_repo::{GoalListQuery, GoalRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by `GoalStore` operations.
#[derive(Debug)]
pub enum StoreError {
    /// Referenced goal or connection does not exist (any more).
    NotFound(Uuid),
    /// A connection for this ordered pair already exists.
    Conflict {
        source_id: GoalId,
        target_id: GoalId,
    },
    /// Input failed goal validation.
    Validation(GoalValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Board configuration cannot serve the request (e.g. empty spawn area).
    Config(ConfigError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::Conflict {
                source_id,
                target_id,
            } => write!(f, "connection already exists: {source_id} -> {target_id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Conflict {
                source_id,
                target_id,
            } => Self::Conflict {
                source_id,
                target_id,
            },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<GoalValidationError> for StoreError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input for creating a goal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`; blank is treated as absent.
    pub due_date: Option<String>,
    /// Random spawn-area position when `None`; an unusable spawn area then
    /// fails with `StoreError::Config`.
    pub position: Option<Position>,
}

impl CreateGoalRequest {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Data-access contract consumed by the board orchestrator.
pub trait GoalStore {
    /// Lists goals in creation order, optionally filtered by archived flag.
    fn list_goals(&self, query: &GoalListQuery) -> StoreResult<Vec<Goal>>;
    /// Lists every stored connection, orphans included.
    fn list_connections(&self) -> StoreResult<Vec<Connection>>;
    fn create_goal(&self, request: &CreateGoalRequest) -> StoreResult<Goal>;
    /// Applies a partial update. Unknown id fails with `NotFound`.
    fn update_goal(&self, id: GoalId, patch: &GoalPatch) -> StoreResult<Goal>;
    /// Permanently deletes a goal. Unknown id fails with `NotFound`.
    fn delete_goal(&self, id: GoalId) -> StoreResult<()>;
    /// Duplicate ordered pair fails with `Conflict`.
    fn create_connection(&self, source_id: GoalId, target_id: GoalId)
        -> StoreResult<Connection>;
    /// Unknown id fails with `NotFound`.
    fn delete_connection(&self, id: ConnectionId) -> StoreResult<()>;
}

/// `GoalStore` backed by goal and connection repositories.
pub struct GoalService<G: GoalRepository, C: ConnectionRepository> {
    goals: G,
    connections: C,
    spawn_area: SpawnArea,
}

impl<G: GoalRepository, C: ConnectionRepository> GoalService<G, C> {
    /// Creates a service with the default spawn area.
    pub fn new(goals: G, connections: C) -> Self {
        Self::with_spawn_area(goals, connections, SpawnArea::default())
    }

    pub fn with_spawn_area(goals: G, connections: C, spawn_area: SpawnArea) -> Self {
        Self {
            goals,
            connections,
            spawn_area,
        }
    }

    pub fn spawn_area(&self) -> SpawnArea {
        self.spawn_area
    }

    /// Gets one goal by id, archived or not.
    pub fn get_goal(&self, id: GoalId) -> StoreResult<Option<Goal>> {
        Ok(self.goals.get_goal(id)?)
    }

    fn read_back(&self, id: GoalId, details: &'static str) -> StoreResult<Goal> {
        self.goals
            .get_goal(id)?
            .ok_or(StoreError::InconsistentState(details))
    }
}

impl<G: GoalRepository, C: ConnectionRepository> GoalStore for GoalService<G, C> {
    fn list_goals(&self, query: &GoalListQuery) -> StoreResult<Vec<Goal>> {
        Ok(self.goals.list_goals(query)?)
    }

    fn list_connections(&self) -> StoreResult<Vec<Connection>> {
        Ok(self.connections.list_connections()?)
    }

    fn create_goal(&self, request: &CreateGoalRequest) -> StoreResult<Goal> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation(GoalValidationError::EmptyTitle));
        }
        let due_date = normalize_optional_text(request.due_date.as_deref());
        if let Some(due_date) = due_date.as_deref() {
            validate_due_date(due_date)?;
        }

        let position = match request.position {
            Some(position) => position,
            None => self.spawn_area.random_position()?,
        };
        let mut goal = Goal::new(title, position);
        goal.description = normalize_optional_text(request.description.as_deref());
        goal.due_date = due_date;

        let id = self.goals.create_goal(&goal)?;
        self.read_back(id, "created goal not found in read-back")
    }

    fn update_goal(&self, id: GoalId, patch: &GoalPatch) -> StoreResult<Goal> {
        let mut goal = self.goals.get_goal(id)?.ok_or(StoreError::NotFound(id))?;
        patch.apply_to(&mut goal);
        self.goals.update_goal(&goal)?;
        self.read_back(id, "updated goal not found in read-back")
    }

    fn delete_goal(&self, id: GoalId) -> StoreResult<()> {
        Ok(self.goals.delete_goal(id)?)
    }

    fn create_connection(
        &self,
        source_id: GoalId,
        target_id: GoalId,
    ) -> StoreResult<Connection> {
        let connection = Connection::new(source_id, target_id);
        let id = self.connections.create_connection(&connection)?;
        self.connections
            .get_connection(id)?
            .ok_or(StoreError::InconsistentState(
                "created connection not found in read-back",
            ))
    }

    fn delete_connection(&self, id: ConnectionId) -> StoreResult<()> {
        Ok(self.connections.delete_connection(id)?)
    }
}
