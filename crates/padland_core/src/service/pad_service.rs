//! Pad use-case service.
//!
//! # Responsibility
//! - Provide create/list/delete/group/share entry points over the pad store.
//!
//! # Invariants
//! - Bulk deletes run in the requested order and never abort midway;
//!   a failed deletion is reported as not deleted.
//! - Service layer remains storage-agnostic.

use crate::model::group::GroupId;
use crate::model::pad::{NewPad, Pad, PadId};
use crate::repo::pad_repo::PadRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Per-pad outcome of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub pad_id: PadId,
    pub deleted: bool,
}

/// Use-case service wrapper for the pad store.
pub struct PadService<R: PadRepository> {
    repo: R,
}

impl<R: PadRepository> PadService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_pad(&self, pad: &NewPad) -> RepoResult<Pad> {
        self.repo.create_pad(pad)
    }

    pub fn get_pad(&self, id: PadId) -> RepoResult<Option<Pad>> {
        self.repo.get_pad(id)
    }

    /// Lists all pads, least recently used first.
    pub fn list_pads(&self) -> RepoResult<Vec<Pad>> {
        self.repo.list_pads()
    }

    /// Lists pads of one group; `None` lists ungrouped pads.
    pub fn list_group_pads(&self, group_id: Option<GroupId>) -> RepoResult<Vec<Pad>> {
        self.repo.list_pads_in_group(group_id)
    }

    /// Deletes pads one by one in the given order.
    ///
    /// # Contract
    /// - Unknown ids and storage failures yield `deleted = false`.
    /// - One outcome per requested id, in request order.
    pub fn delete_pads(&self, ids: &[PadId]) -> Vec<DeleteOutcome> {
        let outcomes = ids
            .iter()
            .map(|&pad_id| {
                let deleted = match self.repo.delete_pad(pad_id) {
                    Ok(deleted) => deleted,
                    Err(err) => {
                        warn!(
                            "event=pad_delete module=service status=error pad_id={pad_id} error={err}"
                        );
                        false
                    }
                };
                DeleteOutcome { pad_id, deleted }
            })
            .collect::<Vec<_>>();

        info!(
            "event=pad_delete module=service status=ok requested={} deleted={}",
            ids.len(),
            outcomes.iter().filter(|outcome| outcome.deleted).count()
        );
        outcomes
    }

    /// Moves every listed pad into `group_id` (or out of any group).
    /// All-or-nothing: an unknown pad or group leaves every pad in place.
    pub fn assign_group(&self, ids: &[PadId], group_id: Option<GroupId>) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let moved = self.repo.set_pads_group(ids, group_id)?;
        info!(
            "event=pad_group module=service status=ok pads={moved} grouped={}",
            group_id.is_some()
        );
        Ok(moved)
    }

    /// Records that a pad was opened at `used_at` (epoch ms).
    pub fn touch_pad(&self, id: PadId, used_at: i64) -> RepoResult<()> {
        self.repo.touch_pad(id, used_at)
    }

    /// Builds a plain-text share body for the listed pads.
    ///
    /// Each pad contributes `name` and `url` lines; pads are separated by a
    /// blank line and keep request order. Unknown ids are skipped.
    pub fn share_text(&self, ids: &[PadId]) -> RepoResult<String> {
        let mut blocks = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(pad) = self.repo.get_pad(id)? {
                blocks.push(format!("{}\n{}", pad.name, pad.url));
            }
        }
        Ok(blocks.join("\n\n"))
    }
}
