//! Contextual selection state machine for the pad list.
//!
//! # Responsibility
//! - Track checked pad rows and the contextual action mode lifecycle.
//! - Translate list interactions into explicit effects for the screen.
//!
//! # Invariants
//! - The controller only checks child rows that exist in the current
//!   projection; group headers are never resolved to pad ids.
//! - Leaving `Selecting` always clears every checked row and the header
//!   highlight, regardless of why the mode ended.
//! - `Selecting` is never active with zero checked rows after a tap.

use crate::model::group::{is_genuine_group, GroupId};
use crate::model::pad::PadId;
use crate::projection::{Projection, RowPosition};
use log::debug;
use std::collections::BTreeSet;

/// Contextual action mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Idle,
    Selecting,
}

/// Bulk action offered while selecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Group,
    Share,
}

/// User interaction delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Tap(RowPosition),
    LongPress(RowPosition),
    Commit(BulkAction),
    /// Explicit dismissal of the contextual action mode.
    Dismiss,
    Back,
    /// Projection is about to be rebuilt.
    Reload,
}

/// Side effect requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEffect {
    ShowActionMode,
    HideActionMode,
    OpenPad(PadId),
    ToggleGroup(usize),
    ConfirmDeleteGroup(GroupId),
    Dispatch {
        action: BulkAction,
        pad_ids: Vec<PadId>,
    },
    CloseScreen,
}

/// Selection state owned by the pad list screen.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    mode: SelectionMode,
    checked: BTreeSet<RowPosition>,
    highlighted_group: Option<usize>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        self.mode == SelectionMode::Selecting
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn is_checked(&self, position: RowPosition) -> bool {
        self.checked.contains(&position)
    }

    pub fn checked(&self) -> impl Iterator<Item = RowPosition> + '_ {
        self.checked.iter().copied()
    }

    /// Group header highlighted by the last group long-press.
    pub fn highlighted_group(&self) -> Option<usize> {
        self.highlighted_group
    }

    /// Sets a row's checked flag directly, the way a list widget restoring
    /// its own state would. Does not change the mode.
    pub fn set_checked(&mut self, position: RowPosition, checked: bool) {
        if checked {
            self.checked.insert(position);
        } else {
            self.checked.remove(&position);
        }
    }

    /// Applies one event and returns the effects to perform, in order.
    pub fn handle(&mut self, event: SelectionEvent, projection: &Projection) -> Vec<SelectionEffect> {
        debug!(
            "event=selection_event module=selection mode={:?} checked={} input={:?}",
            self.mode,
            self.checked.len(),
            event
        );
        match event {
            SelectionEvent::LongPress(position @ RowPosition::Child { .. }) => {
                self.long_press_child(position, projection)
            }
            SelectionEvent::LongPress(RowPosition::Group { group }) => {
                self.long_press_group(group, projection)
            }
            SelectionEvent::Tap(position @ RowPosition::Child { .. }) => {
                self.tap_child(position, projection)
            }
            SelectionEvent::Tap(RowPosition::Group { group }) => {
                vec![SelectionEffect::ToggleGroup(group)]
            }
            SelectionEvent::Commit(action) => self.commit(action, projection),
            SelectionEvent::Dismiss => self.finish(),
            SelectionEvent::Back => {
                let mut effects = self.finish();
                self.clear();
                effects.push(SelectionEffect::CloseScreen);
                effects
            }
            SelectionEvent::Reload => {
                let effects = self.finish();
                self.clear();
                effects
            }
        }
    }

    /// Resolves checked rows to pad ids in row order. Group headers and
    /// rows missing from `projection` are skipped.
    pub fn resolve_checked(&self, projection: &Projection) -> Vec<PadId> {
        self.checked
            .iter()
            .filter_map(|position| projection.child_id(*position))
            .collect()
    }

    fn long_press_child(
        &mut self,
        position: RowPosition,
        projection: &Projection,
    ) -> Vec<SelectionEffect> {
        if projection.child_id(position).is_none() {
            return Vec::new();
        }
        self.checked.insert(position);
        if self.is_selecting() {
            return Vec::new();
        }
        self.mode = SelectionMode::Selecting;
        vec![SelectionEffect::ShowActionMode]
    }

    fn long_press_group(&mut self, group: usize, projection: &Projection) -> Vec<SelectionEffect> {
        match projection.group_id(group) {
            Some(group_id) if is_genuine_group(group_id) => {
                self.highlighted_group = Some(group);
                vec![SelectionEffect::ConfirmDeleteGroup(group_id)]
            }
            _ => Vec::new(),
        }
    }

    fn tap_child(&mut self, position: RowPosition, projection: &Projection) -> Vec<SelectionEffect> {
        if !self.is_selecting() {
            return projection
                .child_id(position)
                .map(SelectionEffect::OpenPad)
                .into_iter()
                .collect();
        }

        if !self.checked.remove(&position) {
            if projection.child_id(position).is_none() {
                return Vec::new();
            }
            self.checked.insert(position);
        }
        if self.checked.is_empty() {
            return self.finish();
        }
        Vec::new()
    }

    fn commit(&mut self, action: BulkAction, projection: &Projection) -> Vec<SelectionEffect> {
        if !self.is_selecting() {
            return Vec::new();
        }
        let pad_ids = self.resolve_checked(projection);
        let mut effects = Vec::with_capacity(2);
        if !pad_ids.is_empty() {
            effects.push(SelectionEffect::Dispatch { action, pad_ids });
        }
        effects.extend(self.finish());
        effects
    }

    fn finish(&mut self) -> Vec<SelectionEffect> {
        if !self.is_selecting() {
            return Vec::new();
        }
        self.mode = SelectionMode::Idle;
        self.clear();
        vec![SelectionEffect::HideActionMode]
    }

    fn clear(&mut self) {
        self.checked.clear();
        self.highlighted_group = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{BulkAction, SelectionController, SelectionEffect, SelectionEvent, SelectionMode};
    use crate::model::group::PadGroup;
    use crate::model::pad::Pad;
    use crate::projection::{MembershipMode, Projection, RowPosition, UNCLASSIFIED_LABEL};

    fn projection() -> Projection {
        let groups = vec![PadGroup {
            id: 1,
            name: "Work".to_string(),
            position: 0,
        }];
        let pads = [10, 11, 12]
            .into_iter()
            .map(|id| Pad {
                id,
                name: format!("pad-{id}"),
                url: format!("https://pad.example.org/p/{id}"),
                group_id: None,
                created_at: 0,
                last_used_at: id,
                access_count: 0,
            })
            .collect::<Vec<_>>();
        Projection::build(&groups, &pads, MembershipMode::Deferred, UNCLASSIFIED_LABEL)
    }

    fn child(child: usize) -> RowPosition {
        RowPosition::Child { group: 1, child }
    }

    #[test]
    fn long_press_on_pad_enters_selecting_with_one_row() {
        let projection = projection();
        let mut controller = SelectionController::new();

        let effects = controller.handle(SelectionEvent::LongPress(child(0)), &projection);

        assert_eq!(effects, vec![SelectionEffect::ShowActionMode]);
        assert_eq!(controller.mode(), SelectionMode::Selecting);
        assert_eq!(controller.checked_count(), 1);
    }

    #[test]
    fn long_press_while_selecting_keeps_row_checked() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(SelectionEvent::LongPress(child(0)), &projection);

        let effects = controller.handle(SelectionEvent::LongPress(child(0)), &projection);
        assert!(effects.is_empty());
        assert!(controller.is_checked(child(0)));
        assert_eq!(controller.checked_count(), 1);
    }

    #[test]
    fn tap_in_idle_opens_pad_without_state_change() {
        let projection = projection();
        let mut controller = SelectionController::new();

        let effects = controller.handle(SelectionEvent::Tap(child(1)), &projection);

        assert_eq!(effects, vec![SelectionEffect::OpenPad(11)]);
        assert_eq!(controller.mode(), SelectionMode::Idle);
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn even_number_of_toggles_restores_selection() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(SelectionEvent::LongPress(child(0)), &projection);
        let before = controller.checked().collect::<Vec<_>>();

        for _ in 0..4 {
            controller.handle(SelectionEvent::Tap(child(2)), &projection);
        }

        assert_eq!(controller.checked().collect::<Vec<_>>(), before);
        assert!(controller.is_selecting());
    }

    #[test]
    fn unchecking_last_row_returns_to_idle_and_hides_action_mode() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(SelectionEvent::LongPress(child(0)), &projection);

        let effects = controller.handle(SelectionEvent::Tap(child(0)), &projection);

        assert_eq!(effects, vec![SelectionEffect::HideActionMode]);
        assert_eq!(controller.mode(), SelectionMode::Idle);
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn long_press_on_real_group_asks_for_group_delete_only() {
        let projection = projection();
        let mut controller = SelectionController::new();

        let effects = controller.handle(
            SelectionEvent::LongPress(RowPosition::Group { group: 0 }),
            &projection,
        );

        assert_eq!(effects, vec![SelectionEffect::ConfirmDeleteGroup(1)]);
        assert_eq!(controller.mode(), SelectionMode::Idle);
        assert_eq!(controller.highlighted_group(), Some(0));
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn long_press_on_unclassified_group_does_nothing() {
        let projection = projection();
        let mut controller = SelectionController::new();

        let effects = controller.handle(
            SelectionEvent::LongPress(RowPosition::Group { group: 1 }),
            &projection,
        );

        assert!(effects.is_empty());
        assert_eq!(controller.highlighted_group(), None);
    }

    #[test]
    fn commit_dispatches_resolved_ids_then_clears() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(SelectionEvent::LongPress(child(2)), &projection);
        controller.handle(SelectionEvent::Tap(child(0)), &projection);

        let effects = controller.handle(SelectionEvent::Commit(BulkAction::Share), &projection);

        assert_eq!(
            effects,
            vec![
                SelectionEffect::Dispatch {
                    action: BulkAction::Share,
                    pad_ids: vec![10, 12],
                },
                SelectionEffect::HideActionMode,
            ]
        );
        assert_eq!(controller.mode(), SelectionMode::Idle);
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn commit_while_idle_is_ignored() {
        let projection = projection();
        let mut controller = SelectionController::new();
        let effects = controller.handle(SelectionEvent::Commit(BulkAction::Delete), &projection);
        assert!(effects.is_empty());
    }

    #[test]
    fn resolve_checked_skips_group_headers() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(SelectionEvent::LongPress(child(1)), &projection);
        controller.set_checked(RowPosition::Group { group: 0 }, true);
        controller.set_checked(RowPosition::Group { group: 1 }, true);

        assert_eq!(controller.resolve_checked(&projection), vec![11]);
    }

    #[test]
    fn back_ends_mode_and_closes_screen() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(SelectionEvent::LongPress(child(1)), &projection);

        let effects = controller.handle(SelectionEvent::Back, &projection);

        assert_eq!(
            effects,
            vec![SelectionEffect::HideActionMode, SelectionEffect::CloseScreen]
        );
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn back_while_idle_drops_group_highlight_and_rows() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.handle(
            SelectionEvent::LongPress(RowPosition::Group { group: 0 }),
            &projection,
        );
        controller.set_checked(child(2), true);

        let effects = controller.handle(SelectionEvent::Back, &projection);

        assert_eq!(effects, vec![SelectionEffect::CloseScreen]);
        assert_eq!(controller.highlighted_group(), None);
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn long_press_on_missing_row_is_ignored() {
        let projection = projection();
        let mut controller = SelectionController::new();

        // The Work group has no loaded children yet.
        let unloaded = RowPosition::Child { group: 0, child: 0 };
        assert!(controller
            .handle(SelectionEvent::LongPress(unloaded), &projection)
            .is_empty());
        assert_eq!(controller.mode(), SelectionMode::Idle);
        assert_eq!(controller.checked_count(), 0);

        controller.handle(SelectionEvent::LongPress(child(0)), &projection);
        assert!(controller
            .handle(SelectionEvent::Tap(child(7)), &projection)
            .is_empty());
        assert!(!controller.is_checked(child(7)));
        assert_eq!(controller.checked_count(), 1);
    }

    #[test]
    fn reload_clears_rows_even_when_idle() {
        let projection = projection();
        let mut controller = SelectionController::new();
        controller.set_checked(child(0), true);

        let effects = controller.handle(SelectionEvent::Reload, &projection);

        assert!(effects.is_empty());
        assert_eq!(controller.checked_count(), 0);
    }

    #[test]
    fn tap_on_group_header_toggles_expansion() {
        let projection = projection();
        let mut controller = SelectionController::new();
        let effects = controller.handle(
            SelectionEvent::Tap(RowPosition::Group { group: 0 }),
            &projection,
        );
        assert_eq!(effects, vec![SelectionEffect::ToggleGroup(0)]);
    }
}
