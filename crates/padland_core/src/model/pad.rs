//! Pad domain model.
//!
//! # Responsibility
//! - Define the locally stored reference to a hosted collaborative document.
//! - Validate user-provided name and location before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another pad.
//! - `url` uses an `http` or `https` scheme.
//! - `group_id == None` means the pad is unclassified.

use crate::model::group::GroupId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier assigned by the pad store.
pub type PadId = i64;

static PAD_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)https?://[^\s/]+(/\S*)?$").expect("pad url regex is valid"));

/// Validation errors raised before a pad is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadValidationError {
    BlankName,
    BlankUrl,
    UnsupportedUrl(String),
}

impl Display for PadValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "pad name must not be blank"),
            Self::BlankUrl => write!(f, "pad url must not be blank"),
            Self::UnsupportedUrl(url) => {
                write!(f, "pad url must be an http(s) address, got `{url}`")
            }
        }
    }
}

impl Error for PadValidationError {}

/// Locally stored pad reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    pub id: PadId,
    /// User-facing name.
    pub name: String,
    /// Location of the hosted document.
    pub url: String,
    /// Back-reference to the owning group, if any.
    pub group_id: Option<GroupId>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms of the last open. Used for list ordering only.
    pub last_used_at: i64,
    pub access_count: u32,
}

/// Input for creating a pad. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPad {
    pub name: String,
    pub url: String,
    pub group_id: Option<GroupId>,
}

impl NewPad {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            group_id: None,
        }
    }

    /// Places the new pad in a group.
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Returns a trimmed copy, or the first validation failure.
    pub fn normalized(&self) -> Result<Self, PadValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PadValidationError::BlankName);
        }
        let url = self.url.trim();
        if url.is_empty() {
            return Err(PadValidationError::BlankUrl);
        }
        if !PAD_URL_RE.is_match(url) {
            return Err(PadValidationError::UnsupportedUrl(url.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            group_id: self.group_id,
        })
    }
}
