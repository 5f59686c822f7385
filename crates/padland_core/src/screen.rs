//! Pad list screen controller.
//!
//! # Responsibility
//! - Own the selection state, the current projection and load bookkeeping.
//! - Turn list events and dialog results into store calls and explicit
//!   effects for the platform layer (navigation, notices, clipboard,
//!   share sheet, dialogs).
//!
//! # Invariants
//! - Every reload clears the selection before the projection is replaced.
//! - Only the latest requested load is ever applied.
//! - Store failures during bulk deletes only suppress the matching notice.
//! - A failed bulk action never keeps the action mode open.

use crate::intent::{InboundAction, InboundRequest};
use crate::loader::{Delivery, LoadTicket, ProjectionLoader};
use crate::model::group::{is_genuine_group, GroupId, PadGroup};
use crate::model::pad::PadId;
use crate::projection::{MembershipMode, Projection, UNCLASSIFIED_LABEL};
use crate::repo::group_repo::GroupRepository;
use crate::repo::pad_repo::PadRepository;
use crate::repo::RepoError;
use crate::selection::{BulkAction, SelectionController, SelectionEffect, SelectionEvent};
use crate::service::group_service::{GroupService, GroupServiceError};
use crate::service::pad_service::PadService;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Toast-style user notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PadDeleted(PadId),
    TextCopied,
    GroupCreated(GroupId),
    GroupDeleted(GroupId),
    PadsGrouped { count: usize },
    /// A bulk action could not be prepared; the selection was still closed.
    ActionFailed(BulkAction),
}

/// Effect the platform layer performs on behalf of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEffect {
    ShowActionMode,
    HideActionMode,
    OpenPad(PadId),
    OpenNewPad,
    OpenNewGroupDialog,
    ToggleGroup(usize),
    ConfirmDeleteGroup(GroupId),
    /// Ask the user to confirm deleting these pads.
    AskDelete(Vec<PadId>),
    /// Ask the user which group the pads should move to.
    ChooseGroup {
        pad_ids: Vec<PadId>,
        groups: Vec<PadGroup>,
    },
    Share { text: String },
    CopyToClipboard(String),
    Notice(Notice),
    /// The projection was replaced; re-render the list.
    Refresh,
    CloseScreen,
}

/// Projection settings of one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSettings {
    pub membership: MembershipMode,
    pub unclassified_label: String,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            membership: MembershipMode::default(),
            unclassified_label: UNCLASSIFIED_LABEL.to_string(),
        }
    }
}

/// Errors surfaced by screen operations.
#[derive(Debug)]
pub enum ScreenError {
    Repo(RepoError),
    Group(GroupServiceError),
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Group(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Group(err) => Some(err),
        }
    }
}

impl From<RepoError> for ScreenError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<GroupServiceError> for ScreenError {
    fn from(value: GroupServiceError) -> Self {
        Self::Group(value)
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// Reads groups and pads and builds a fresh projection.
///
/// Free-standing so background loads can run it against their own
/// connection.
pub fn load_projection<P, G>(
    pads: &PadService<P>,
    groups: &GroupService<G>,
    settings: &ScreenSettings,
) -> ScreenResult<Projection>
where
    P: PadRepository,
    G: GroupRepository,
{
    let group_rows = groups.list_groups()?;
    let pad_rows = pads.list_pads()?;
    debug!(
        "event=projection_build module=screen groups={} pads={} membership={:?}",
        group_rows.len(),
        pad_rows.len(),
        settings.membership
    );
    Ok(Projection::build(
        &group_rows,
        &pad_rows,
        settings.membership,
        settings.unclassified_label.as_str(),
    ))
}

/// Controller of the pad list screen.
pub struct PadListScreen<P: PadRepository, G: GroupRepository> {
    pads: PadService<P>,
    groups: GroupService<G>,
    settings: ScreenSettings,
    selection: SelectionController,
    projection: Projection,
    loader: ProjectionLoader,
}

impl<P: PadRepository, G: GroupRepository> PadListScreen<P, G> {
    pub fn new(pad_repo: P, group_repo: G, settings: ScreenSettings) -> Self {
        let projection = Projection::build(
            &[],
            &[],
            settings.membership,
            settings.unclassified_label.as_str(),
        );
        Self {
            pads: PadService::new(pad_repo),
            groups: GroupService::new(group_repo),
            settings,
            selection: SelectionController::new(),
            projection,
            loader: ProjectionLoader::new(),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn settings(&self) -> &ScreenSettings {
        &self.settings
    }

    /// Handles the request the screen was opened with, then loads.
    ///
    /// A delete action runs first, so the first projection already
    /// reflects it. One `PadDeleted` notice is emitted per removed pad.
    pub fn open(&mut self, request: &InboundRequest) -> ScreenResult<Vec<ScreenEffect>> {
        let mut effects = Vec::new();

        if let Some(InboundAction::Delete(ids)) = request.action() {
            info!(
                "event=inbound_delete module=screen status=start requested={}",
                ids.len()
            );
            effects.extend(self.delete_notices(&ids));
        }

        if let Some(text) = request.shared_text() {
            effects.push(ScreenEffect::CopyToClipboard(text.to_string()));
            effects.push(ScreenEffect::Notice(Notice::TextCopied));
        }

        effects.extend(self.reload()?);
        Ok(effects)
    }

    /// Synchronously rebuilds the projection.
    pub fn reload(&mut self) -> ScreenResult<Vec<ScreenEffect>> {
        let (ticket, mut effects) = self.begin_reload();
        let projection = load_projection(&self.pads, &self.groups, &self.settings)?;
        if self.apply_load(ticket, projection) {
            effects.push(ScreenEffect::Refresh);
        }
        Ok(effects)
    }

    /// Clears the selection and issues a ticket for a load the caller runs
    /// elsewhere (see `loader::spawn_load`).
    pub fn begin_reload(&mut self) -> (LoadTicket, Vec<ScreenEffect>) {
        let effects = self
            .selection
            .handle(SelectionEvent::Reload, &self.projection)
            .into_iter()
            .filter_map(map_plain_effect)
            .collect();
        (self.loader.request(), effects)
    }

    /// Applies a finished load. Returns `false` when a newer load was
    /// requested in the meantime and the result was dropped.
    pub fn apply_load(&mut self, ticket: LoadTicket, projection: Projection) -> bool {
        match self.loader.deliver(ticket, projection) {
            Delivery::Applied(projection) => {
                self.projection = projection;
                true
            }
            Delivery::Discarded => false,
        }
    }

    /// Routes one list interaction.
    pub fn handle(&mut self, event: SelectionEvent) -> ScreenResult<Vec<ScreenEffect>> {
        let selection_effects = self.selection.handle(event, &self.projection);
        let mut effects = Vec::with_capacity(selection_effects.len());
        for effect in selection_effects {
            match effect {
                SelectionEffect::Dispatch { action, pad_ids } => {
                    match self.dispatch(action, pad_ids) {
                        Ok(effect) => effects.push(effect),
                        Err(err) => {
                            warn!(
                                "event=bulk_action module=screen status=error action={action:?} error={err}"
                            );
                            effects.push(ScreenEffect::Notice(Notice::ActionFailed(action)));
                        }
                    }
                }
                SelectionEffect::ToggleGroup(group) => {
                    self.expand_group(group)?;
                    effects.push(ScreenEffect::ToggleGroup(group));
                }
                other => effects.extend(map_plain_effect(other)),
            }
        }
        Ok(effects)
    }

    /// Fills a real group's children through a per-group query.
    ///
    /// Only meaningful in `MembershipMode::Deferred`; in `Assigned` mode
    /// children are already in place and this is a no-op.
    pub fn expand_group(&mut self, group: usize) -> ScreenResult<bool> {
        if self.settings.membership != MembershipMode::Deferred {
            return Ok(false);
        }
        let Some(group_id) = self.projection.group_id(group) else {
            return Ok(false);
        };
        let pads = self.pads.list_group_pads(Some(group_id))?;
        Ok(self.projection.populate_group(group, &pads))
    }

    /// Deletes pads after the user confirmed an `AskDelete`.
    pub fn confirm_delete(&mut self, ids: &[PadId]) -> ScreenResult<Vec<ScreenEffect>> {
        let mut effects = self.delete_notices(ids);
        effects.extend(self.reload()?);
        Ok(effects)
    }

    /// Moves pads after the user picked a group from `ChooseGroup`.
    ///
    /// All pads move or none do. The projection is reloaded either way.
    pub fn assign_group(
        &mut self,
        ids: &[PadId],
        group_id: Option<GroupId>,
    ) -> ScreenResult<Vec<ScreenEffect>> {
        let target = group_id.filter(|id| is_genuine_group(*id));
        let count = match self.pads.assign_group(ids, target) {
            Ok(count) => count,
            Err(err) => {
                self.reload()?;
                return Err(err.into());
            }
        };
        let mut effects = vec![ScreenEffect::Notice(Notice::PadsGrouped { count })];
        effects.extend(self.reload()?);
        Ok(effects)
    }

    /// Deletes a group after the user confirmed `ConfirmDeleteGroup`.
    pub fn delete_group(&mut self, id: GroupId) -> ScreenResult<Vec<ScreenEffect>> {
        self.groups.delete_group(id)?;
        let mut effects = vec![ScreenEffect::Notice(Notice::GroupDeleted(id))];
        effects.extend(self.reload()?);
        Ok(effects)
    }

    /// Creates a group from the new-group dialog.
    pub fn create_group(&mut self, name: &str) -> ScreenResult<Vec<ScreenEffect>> {
        let id = self.groups.create_group(name)?;
        let mut effects = vec![ScreenEffect::Notice(Notice::GroupCreated(id))];
        effects.extend(self.reload()?);
        Ok(effects)
    }

    /// Empty-state "new pad" button.
    pub fn new_pad(&self) -> ScreenEffect {
        ScreenEffect::OpenNewPad
    }

    /// Empty-state "new group" button.
    pub fn new_group(&self) -> ScreenEffect {
        ScreenEffect::OpenNewGroupDialog
    }

    fn dispatch(&self, action: BulkAction, pad_ids: Vec<PadId>) -> ScreenResult<ScreenEffect> {
        info!(
            "event=bulk_action module=screen action={:?} pads={}",
            action,
            pad_ids.len()
        );
        Ok(match action {
            BulkAction::Delete => ScreenEffect::AskDelete(pad_ids),
            BulkAction::Group => ScreenEffect::ChooseGroup {
                pad_ids,
                groups: self.groups.list_groups()?,
            },
            BulkAction::Share => ScreenEffect::Share {
                text: self.pads.share_text(&pad_ids)?,
            },
        })
    }

    fn delete_notices(&self, ids: &[PadId]) -> Vec<ScreenEffect> {
        self.pads
            .delete_pads(ids)
            .into_iter()
            .filter(|outcome| outcome.deleted)
            .map(|outcome| ScreenEffect::Notice(Notice::PadDeleted(outcome.pad_id)))
            .collect()
    }
}

/// Maps effects that need no store access. `Dispatch` is resolved by the
/// screen itself and yields `None` here.
fn map_plain_effect(effect: SelectionEffect) -> Option<ScreenEffect> {
    Some(match effect {
        SelectionEffect::ShowActionMode => ScreenEffect::ShowActionMode,
        SelectionEffect::HideActionMode => ScreenEffect::HideActionMode,
        SelectionEffect::OpenPad(id) => ScreenEffect::OpenPad(id),
        SelectionEffect::ToggleGroup(group) => ScreenEffect::ToggleGroup(group),
        SelectionEffect::ConfirmDeleteGroup(id) => ScreenEffect::ConfirmDeleteGroup(id),
        SelectionEffect::CloseScreen => ScreenEffect::CloseScreen,
        SelectionEffect::Dispatch { .. } => return None,
    })
}
