//! Pad group store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/rename/delete APIs over `pad_groups`.
//!
//! # Invariants
//! - Listing order is `position ASC, id ASC`.
//! - New groups are appended after every existing group.
//! - Deleting a group leaves its pads in storage, ungrouped.

use crate::model::group::{GroupId, PadGroup};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for the local group store.
pub trait GroupRepository {
    fn create_group(&self, name: &str) -> RepoResult<GroupId>;
    fn get_group(&self, id: GroupId) -> RepoResult<Option<PadGroup>>;
    fn list_groups(&self) -> RepoResult<Vec<PadGroup>>;
    fn rename_group(&self, id: GroupId, name: &str) -> RepoResult<()>;
    /// Deletes a group. Returns `false` when no such group exists.
    fn delete_group(&self, id: GroupId) -> RepoResult<bool>;
}

/// SQLite-backed group store.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&self, name: &str) -> RepoResult<GroupId> {
        self.conn.execute(
            "INSERT INTO pad_groups (name, position)
             VALUES (?1, (SELECT COALESCE(MAX(position) + 1, 0) FROM pad_groups));",
            [name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<PadGroup>> {
        let group = self
            .conn
            .query_row(
                "SELECT id, name, position FROM pad_groups WHERE id = ?1;",
                [id],
                parse_group_row,
            )
            .optional()?;
        Ok(group)
    }

    fn list_groups(&self) -> RepoResult<Vec<PadGroup>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, position
             FROM pad_groups
             ORDER BY position ASC, id ASC;",
        )?;
        let groups = stmt
            .query_map([], parse_group_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn rename_group(&self, id: GroupId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pad_groups SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::GroupNotFound(id));
        }
        Ok(())
    }

    fn delete_group(&self, id: GroupId) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        // Explicit so callers holding a connection without `foreign_keys=ON`
        // still get ungrouped pads instead of dangling references.
        tx.execute("UPDATE pads SET group_id = NULL WHERE group_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM pad_groups WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(changed > 0)
    }
}

fn parse_group_row(row: &Row<'_>) -> rusqlite::Result<PadGroup> {
    Ok(PadGroup {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
    })
}
