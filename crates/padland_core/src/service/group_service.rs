//! Pad group use-case service.
//!
//! # Responsibility
//! - Validate group names above the repository layer.
//! - Guard the reserved unclassified id against mutation.
//!
//! # Invariants
//! - Group names are trimmed and non-blank.
//! - `UNCLASSIFIED_GROUP_ID` (and any non-genuine id) is never deleted.

use crate::model::group::{is_genuine_group, GroupId, PadGroup};
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from group service operations.
#[derive(Debug)]
pub enum GroupServiceError {
    /// Name is blank after trim.
    InvalidGroupName,
    /// Target id is the reserved "no group" value.
    ReservedGroup(GroupId),
    GroupNotFound(GroupId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for GroupServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGroupName => write!(f, "group name must not be blank"),
            Self::ReservedGroup(id) => write!(f, "group {id} is reserved and cannot be changed"),
            Self::GroupNotFound(id) => write!(f, "pad group not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GroupServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for GroupServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::GroupNotFound(id) => Self::GroupNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Group service facade.
pub struct GroupService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a group appended after existing ones.
    pub fn create_group(&self, name: impl Into<String>) -> Result<GroupId, GroupServiceError> {
        let normalized = normalize_group_name(name.into())?;
        let id = self.repo.create_group(normalized.as_str())?;
        info!("event=group_create module=service status=ok group_id={id}");
        Ok(id)
    }

    /// Lists groups in display order.
    pub fn list_groups(&self) -> Result<Vec<PadGroup>, GroupServiceError> {
        self.repo.list_groups().map_err(Into::into)
    }

    pub fn rename_group(
        &self,
        id: GroupId,
        name: impl Into<String>,
    ) -> Result<(), GroupServiceError> {
        if !is_genuine_group(id) {
            return Err(GroupServiceError::ReservedGroup(id));
        }
        let normalized = normalize_group_name(name.into())?;
        self.repo
            .rename_group(id, normalized.as_str())
            .map_err(Into::into)
    }

    /// Deletes a genuine group. Its pads stay in storage, ungrouped.
    pub fn delete_group(&self, id: GroupId) -> Result<(), GroupServiceError> {
        if !is_genuine_group(id) {
            return Err(GroupServiceError::ReservedGroup(id));
        }
        if !self.repo.delete_group(id)? {
            return Err(GroupServiceError::GroupNotFound(id));
        }
        info!("event=group_delete module=service status=ok group_id={id}");
        Ok(())
    }
}

fn normalize_group_name(value: String) -> Result<String, GroupServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GroupServiceError::InvalidGroupName);
    }
    Ok(trimmed.to_string())
}
