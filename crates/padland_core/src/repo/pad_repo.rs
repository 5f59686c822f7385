//! Pad store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `pads` table.
//! - Keep list ordering stable for projection building.
//!
//! # Invariants
//! - Listing order is `last_used_at ASC, id ASC`.
//! - `delete_pad` reports whether a row was removed instead of failing
//!   on unknown ids.

use crate::model::group::GroupId;
use crate::model::pad::{NewPad, Pad, PadId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const PAD_SELECT_SQL: &str = "SELECT
    id,
    name,
    url,
    group_id,
    created_at,
    last_used_at,
    access_count
FROM pads";

/// Repository interface for the local pad store.
pub trait PadRepository {
    /// Validates and inserts a pad, returning the stored row.
    fn create_pad(&self, pad: &NewPad) -> RepoResult<Pad>;
    fn get_pad(&self, id: PadId) -> RepoResult<Option<Pad>>;
    /// Lists every pad, least recently used first.
    fn list_pads(&self) -> RepoResult<Vec<Pad>>;
    /// Lists pads of one group; `None` lists ungrouped pads.
    fn list_pads_in_group(&self, group_id: Option<GroupId>) -> RepoResult<Vec<Pad>>;
    /// Deletes a pad. Returns `false` when no such pad exists.
    fn delete_pad(&self, id: PadId) -> RepoResult<bool>;
    /// Records one open of the pad at `used_at` (epoch ms).
    fn touch_pad(&self, id: PadId, used_at: i64) -> RepoResult<()>;
    /// Moves a pad into a group, or out of every group with `None`.
    fn set_pad_group(&self, id: PadId, group_id: Option<GroupId>) -> RepoResult<()>;
    /// Moves every listed pad, or none of them when one id is unknown.
    /// Returns the number of pads moved.
    fn set_pads_group(&self, ids: &[PadId], group_id: Option<GroupId>) -> RepoResult<usize>;
}

/// SQLite-backed pad store.
pub struct SqlitePadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePadRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PadRepository for SqlitePadRepository<'_> {
    fn create_pad(&self, pad: &NewPad) -> RepoResult<Pad> {
        let pad = pad.normalized()?;
        if let Some(group_id) = pad.group_id {
            ensure_group_exists(self.conn, group_id)?;
        }

        self.conn.execute(
            "INSERT INTO pads (name, url, group_id) VALUES (?1, ?2, ?3);",
            params![pad.name, pad.url, pad.group_id],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_pad(id)?.ok_or(RepoError::PadNotFound(id))
    }

    fn get_pad(&self, id: PadId) -> RepoResult<Option<Pad>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pad_row(row)?));
        }
        Ok(None)
    }

    fn list_pads(&self) -> RepoResult<Vec<Pad>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PAD_SELECT_SQL} ORDER BY last_used_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut pads = Vec::new();
        while let Some(row) = rows.next()? {
            pads.push(parse_pad_row(row)?);
        }
        Ok(pads)
    }

    fn list_pads_in_group(&self, group_id: Option<GroupId>) -> RepoResult<Vec<Pad>> {
        let mut stmt = match group_id {
            Some(_) => self.conn.prepare(&format!(
                "{PAD_SELECT_SQL} WHERE group_id = ?1 ORDER BY last_used_at ASC, id ASC;"
            ))?,
            None => self.conn.prepare(&format!(
                "{PAD_SELECT_SQL} WHERE group_id IS NULL ORDER BY last_used_at ASC, id ASC;"
            ))?,
        };
        let mut rows = match group_id {
            Some(group_id) => stmt.query([group_id])?,
            None => stmt.query([])?,
        };

        let mut pads = Vec::new();
        while let Some(row) = rows.next()? {
            pads.push(parse_pad_row(row)?);
        }
        Ok(pads)
    }

    fn delete_pad(&self, id: PadId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM pads WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn touch_pad(&self, id: PadId, used_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pads
             SET last_used_at = ?2,
                 access_count = access_count + 1
             WHERE id = ?1;",
            params![id, used_at],
        )?;
        if changed == 0 {
            return Err(RepoError::PadNotFound(id));
        }
        Ok(())
    }

    fn set_pad_group(&self, id: PadId, group_id: Option<GroupId>) -> RepoResult<()> {
        if let Some(group_id) = group_id {
            ensure_group_exists(self.conn, group_id)?;
        }
        let changed = self.conn.execute(
            "UPDATE pads SET group_id = ?2 WHERE id = ?1;",
            params![id, group_id],
        )?;
        if changed == 0 {
            return Err(RepoError::PadNotFound(id));
        }
        Ok(())
    }

    fn set_pads_group(&self, ids: &[PadId], group_id: Option<GroupId>) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if let Some(group_id) = group_id {
            ensure_group_exists(&tx, group_id)?;
        }
        {
            let mut stmt = tx.prepare("UPDATE pads SET group_id = ?2 WHERE id = ?1;")?;
            for &id in ids {
                if stmt.execute(params![id, group_id])? == 0 {
                    // Dropping `tx` rolls back the pads already moved.
                    return Err(RepoError::PadNotFound(id));
                }
            }
        }
        tx.commit()?;
        Ok(ids.len())
    }
}

fn ensure_group_exists(conn: &Connection, group_id: GroupId) -> RepoResult<()> {
    let found = conn
        .query_row("SELECT id FROM pad_groups WHERE id = ?1;", [group_id], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::GroupNotFound(group_id)),
    }
}

fn parse_pad_row(row: &Row<'_>) -> RepoResult<Pad> {
    let access_count = row.get::<_, i64>("access_count")?;
    let access_count = u32::try_from(access_count).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid access_count value `{access_count}` in pads.access_count"
        ))
    })?;

    Ok(Pad {
        id: row.get("id")?,
        name: row.get("name")?,
        url: row.get("url")?,
        group_id: row.get("group_id")?,
        created_at: row.get("created_at")?,
        last_used_at: row.get("last_used_at")?,
        access_count,
    })
}
