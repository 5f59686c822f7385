//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the pad store and group store contracts consumed by services
//!   and the pad list screen.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Repository writes validate input before persistence.
//! - Repository APIs return semantic errors (`PadNotFound`, `GroupNotFound`)
//!   in addition to DB transport errors.

use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::group::GroupId;
use crate::model::pad::{PadId, PadValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod group_repo;
pub mod pad_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for pad/group persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PadValidationError),
    Db(DbError),
    PadNotFound(PadId),
    GroupNotFound(GroupId),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PadNotFound(id) => write!(f, "pad not found: {id}"),
            Self::GroupNotFound(id) => write!(f, "pad group not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "pad store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted pad data: {message}"),
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

impl From<PadValidationError> for RepoError {
    fn from(value: PadValidationError) -> Self {
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

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
