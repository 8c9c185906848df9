//! Connection repository contracts and SQLite implementation.
//!
//! # Invariants
//! - One row per ordered `(source_id, target_id)`; duplicates are reported
//!   as `RepoError::Conflict` and never inserted.
//! - Rows are never updated.
//! - Rows are not removed when an endpoint goal is deleted.

use crate::model::connection::{Connection, ConnectionId};
use crate::model::goal::GoalId;
use crate::repo::goal_repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, ErrorCode, Row};

const CONNECTION_SELECT_SQL: &str = "SELECT
    id,
    source_id,
    target_id,
    created_at
FROM connections";

/// Repository interface for connection create/read/delete.
pub trait ConnectionRepository {
    fn create_connection(&self, connection: &Connection) -> RepoResult<ConnectionId>;
    fn get_connection(&self, id: ConnectionId) -> RepoResult<Option<Connection>>;
    fn find_connection(
        &self,
        source_id: GoalId,
        target_id: GoalId,
    ) -> RepoResult<Option<Connection>>;
    /// Lists every stored connection, orphans included, in creation order.
    fn list_connections(&self) -> RepoResult<Vec<Connection>>;
    fn delete_connection(&self, id: ConnectionId) -> RepoResult<()>;
}

/// SQLite-backed connection repository.
pub struct SqliteConnectionRepository<'conn> {
    conn: &'conn rusqlite::Connection,
}

impl<'conn> SqliteConnectionRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn rusqlite::Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "connections")?;
        Ok(Self { conn })
    }
}

impl ConnectionRepository for SqliteConnectionRepository<'_> {
    fn create_connection(&self, connection: &Connection) -> RepoResult<ConnectionId> {
        let conflict = || RepoError::Conflict {
            source_id: connection.source_id,
            target_id: connection.target_id,
        };

        if self
            .find_connection(connection.source_id, connection.target_id)?
            .is_some()
        {
            return Err(conflict());
        }

        let inserted = self.conn.execute(
            "INSERT INTO connections (id, source_id, target_id) VALUES (?1, ?2, ?3);",
            params![
                connection.id.to_string(),
                connection.source_id.to_string(),
                connection.target_id.to_string(),
            ],
        );

        match inserted {
            Ok(_) => Ok(connection.id),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(conflict())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_connection(&self, id: ConnectionId) -> RepoResult<Option<Connection>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONNECTION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_connection_row(row)?));
        }
        Ok(None)
    }

    fn find_connection(
        &self,
        source_id: GoalId,
        target_id: GoalId,
    ) -> RepoResult<Option<Connection>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONNECTION_SELECT_SQL} WHERE source_id = ?1 AND target_id = ?2;"
        ))?;
        let mut rows = stmt.query([source_id.to_string(), target_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_connection_row(row)?));
        }
        Ok(None)
    }

    fn list_connections(&self) -> RepoResult<Vec<Connection>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONNECTION_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut connections = Vec::new();
        while let Some(row) = rows.next()? {
            connections.push(parse_connection_row(row)?);
        }
        Ok(connections)
    }

    fn delete_connection(&self, id: ConnectionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM connections WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_connection_row(row: &Row<'_>) -> RepoResult<Connection> {
    let id_text: String = row.get("id")?;
    let source_text: String = row.get("source_id")?;
    let target_text: String = row.get("target_id")?;
    Ok(Connection {
        id: parse_uuid(&id_text, "connections.id")?,
        source_id: parse_uuid(&source_text, "connections.source_id")?,
        target_id: parse_uuid(&target_text, "connections.target_id")?,
        created_at: row.get("created_at")?,
    })
}
