//! Goal repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `goals` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Goal::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `updated_at` strictly increases on every successful update.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::goal::{Goal, GoalId, GoalValidationError, Position};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    due_date,
    completed,
    position_x,
    position_y,
    archived,
    created_at,
    updated_at
FROM goals";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for goal and connection persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(GoalValidationError),
    Db(DbError),
    /// No goal or connection row with this id.
    NotFound(Uuid),
    /// A connection for this ordered pair already exists.
    Conflict {
        source_id: GoalId,
        target_id: GoalId,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Conflict {
                source_id,
                target_id,
            } => write!(f, "connection already exists: {source_id} -> {target_id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GoalValidationError> for RepoError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalListQuery {
    /// `Some(flag)` keeps only goals with that archived flag; `None` keeps all.
    pub archived: Option<bool>,
}

impl GoalListQuery {
    pub fn active() -> Self {
        Self {
            archived: Some(false),
        }
    }

    pub fn archived() -> Self {
        Self {
            archived: Some(true),
        }
    }
}

/// Repository interface for goal CRUD operations.
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId>;
    /// Overwrites every mutable column of an existing goal.
    fn update_goal(&self, goal: &Goal) -> RepoResult<()>;
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>>;
    /// Lists goals in creation order.
    fn list_goals(&self, query: &GoalListQuery) -> RepoResult<Vec<Goal>>;
    /// Hard-deletes a goal. Connections referencing it are left in place.
    fn delete_goal(&self, id: GoalId) -> RepoResult<()>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "goals")?;
        Ok(Self { conn })
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (
                id,
                title,
                description,
                due_date,
                completed,
                position_x,
                position_y,
                archived
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                goal.id.to_string(),
                goal.title.as_str(),
                goal.description.as_deref(),
                goal.due_date.as_deref(),
                bool_to_int(goal.completed),
                goal.position.x,
                goal.position.y,
                bool_to_int(goal.archived),
            ],
        )?;

        Ok(goal.id)
    }

    fn update_goal(&self, goal: &Goal) -> RepoResult<()> {
        goal.validate()?;

        let changed = self.conn.execute(
            "UPDATE goals
             SET
                title = ?1,
                description = ?2,
                due_date = ?3,
                completed = ?4,
                position_x = ?5,
                position_y = ?6,
                archived = ?7,
                updated_at = MAX(updated_at + 1, strftime('%s', 'now') * 1000)
             WHERE id = ?8;",
            params![
                goal.title.as_str(),
                goal.description.as_deref(),
                goal.due_date.as_deref(),
                bool_to_int(goal.completed),
                goal.position.x,
                goal.position.y,
                bool_to_int(goal.archived),
                goal.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(goal.id));
        }

        Ok(())
    }

    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_goal_row(row)?));
        }

        Ok(None)
    }

    fn list_goals(&self, query: &GoalListQuery) -> RepoResult<Vec<Goal>> {
        let mut sql = format!("{GOAL_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(archived) = query.archived {
            sql.push_str(" AND archived = ?");
            bind_values.push(Value::Integer(bool_to_int(archived)));
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut goals = Vec::new();

        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }

        Ok(goals)
    }

    fn delete_goal(&self, id: GoalId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "goals.id")?;

    let goal = Goal {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date: row.get("due_date")?,
        completed: parse_flag(row.get("completed")?, "goals.completed")?,
        position: Position::new(row.get("position_x")?, row.get("position_y")?),
        archived: parse_flag(row.get("archived")?, "goals.archived")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    goal.validate()?;
    Ok(goal)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_flag(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn ensure_connection_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}
