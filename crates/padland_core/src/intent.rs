//! Inbound requests the pad list can be opened with.
//!
//! A request optionally carries an action tag with pad ids (currently only
//! `delete`) and optionally a shared plain text from another app.

use crate::model::pad::PadId;
use log::warn;

/// Action tag requesting deletion of the carried pad ids.
pub const DELETE_ACTION: &str = "delete";

/// Raw request as delivered by the platform layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    pub action: Option<String>,
    /// Pad ids as strings, the way platform extras carry them.
    pub pad_ids: Vec<String>,
    pub shared_text: Option<String>,
}

/// Parsed action of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundAction {
    Delete(Vec<PadId>),
}

impl InboundRequest {
    pub fn delete(ids: impl IntoIterator<Item = PadId>) -> Self {
        Self {
            action: Some(DELETE_ACTION.to_string()),
            pad_ids: ids.into_iter().map(|id| id.to_string()).collect(),
            shared_text: None,
        }
    }

    pub fn share_text(text: impl Into<String>) -> Self {
        Self {
            shared_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Parses the action tag and ids.
    ///
    /// Returns `None` without an action, without ids, or for unknown
    /// actions. Ids that do not parse are skipped; the remaining order is
    /// kept.
    pub fn action(&self) -> Option<InboundAction> {
        let action = self.action.as_deref()?.trim();
        if self.pad_ids.is_empty() {
            return None;
        }

        match action {
            DELETE_ACTION => Some(InboundAction::Delete(parse_pad_ids(&self.pad_ids))),
            other => {
                warn!("event=inbound_action module=intent status=ignored action={other}");
                None
            }
        }
    }

    /// Shared text to copy. Present text is copied verbatim, blank or not.
    pub fn shared_text(&self) -> Option<&str> {
        self.shared_text.as_deref()
    }
}

fn parse_pad_ids(raw: &[String]) -> Vec<PadId> {
    raw.iter()
        .filter_map(|value| match value.trim().parse::<PadId>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("event=inbound_action module=intent status=skipped reason=invalid_pad_id");
                None
            }
        })
        .collect()
}
