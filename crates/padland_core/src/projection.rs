//! Group projection: the two-level group -> pads structure shown by the
//! pad list.
//!
//! # Responsibility
//! - Turn stored groups and pads into ordered list sections.
//! - Resolve packed list positions back to pad/group identity.
//!
//! # Invariants
//! - The last group is always the synthetic unclassified bucket.
//! - In `MembershipMode::Deferred` every pad appears exactly once in the
//!   unclassified bucket.
//! - In `MembershipMode::Assigned` every pad appears exactly once across
//!   the whole projection.

use crate::model::group::{GroupId, PadGroup};
use crate::model::pad::{Pad, PadId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default label of the synthetic trailing group.
pub const UNCLASSIFIED_LABEL: &str = "Unclassified";

/// How pads are distributed over group sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipMode {
    /// Group sections start empty and are filled on expand through a
    /// per-group query; the unclassified bucket lists every pad.
    #[default]
    Deferred,
    /// Pads are placed under their own group; only ungrouped pads (or pads
    /// pointing at a group that was not loaded) land in the unclassified
    /// bucket.
    Assigned,
}

/// One section of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedGroup {
    /// `None` for the synthetic unclassified bucket.
    pub group_id: Option<GroupId>,
    pub name: String,
    pub children: Vec<PadId>,
}

/// Packed position of one list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowPosition {
    Group { group: usize },
    Child { group: usize, child: usize },
}

impl RowPosition {
    pub fn group(self) -> usize {
        match self {
            Self::Group { group } | Self::Child { group, .. } => group,
        }
    }

    /// Child index inside the group; `None` for group headers.
    pub fn child(self) -> Option<usize> {
        match self {
            Self::Group { .. } => None,
            Self::Child { child, .. } => Some(child),
        }
    }
}

/// Derived, ephemeral group -> pads view. Rebuilt on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    groups: Vec<ProjectedGroup>,
    /// Pad metadata used for display and share text.
    #[serde(skip)]
    pads: HashMap<PadId, Pad>,
}

impl Default for Projection {
    fn default() -> Self {
        Self::build(&[], &[], MembershipMode::Deferred, UNCLASSIFIED_LABEL)
    }
}

impl Projection {
    /// Builds the projection from groups (display order) and pads
    /// (last-used ascending).
    pub fn build(
        groups: &[PadGroup],
        pads: &[Pad],
        mode: MembershipMode,
        unclassified_label: &str,
    ) -> Self {
        let mut sections = groups
            .iter()
            .map(|group| ProjectedGroup {
                group_id: Some(group.id),
                name: group.name.clone(),
                children: Vec::new(),
            })
            .collect::<Vec<_>>();

        let mut unclassified = Vec::with_capacity(pads.len());
        match mode {
            MembershipMode::Deferred => {
                unclassified.extend(pads.iter().map(|pad| pad.id));
            }
            MembershipMode::Assigned => {
                let section_by_group = groups
                    .iter()
                    .enumerate()
                    .map(|(index, group)| (group.id, index))
                    .collect::<HashMap<_, _>>();
                for pad in pads {
                    match pad
                        .group_id
                        .and_then(|group_id| section_by_group.get(&group_id))
                    {
                        Some(&index) => sections[index].children.push(pad.id),
                        None => unclassified.push(pad.id),
                    }
                }
            }
        }

        sections.push(ProjectedGroup {
            group_id: None,
            name: unclassified_label.to_string(),
            children: unclassified,
        });

        Self {
            groups: sections,
            pads: pads.iter().map(|pad| (pad.id, pad.clone())).collect(),
        }
    }

    pub fn groups(&self) -> &[ProjectedGroup] {
        &self.groups
    }

    pub fn group(&self, group: usize) -> Option<&ProjectedGroup> {
        self.groups.get(group)
    }

    /// Group id of a section; `None` for the unclassified bucket or an
    /// out-of-range index.
    pub fn group_id(&self, group: usize) -> Option<GroupId> {
        self.groups.get(group).and_then(|section| section.group_id)
    }

    /// Pad id at a child row. Group headers never resolve.
    pub fn child_id(&self, position: RowPosition) -> Option<PadId> {
        let child = position.child()?;
        self.groups
            .get(position.group())
            .and_then(|section| section.children.get(child))
            .copied()
    }

    pub fn pad(&self, id: PadId) -> Option<&Pad> {
        self.pads.get(&id)
    }

    /// The synthetic trailing bucket.
    pub fn unclassified(&self) -> &ProjectedGroup {
        // `build` always appends the bucket.
        &self.groups[self.groups.len() - 1]
    }

    /// Replaces the children of one real group section with the result of
    /// a per-group query. Returns `false` for the unclassified bucket or an
    /// unknown index.
    pub fn populate_group(&mut self, group: usize, pads: &[Pad]) -> bool {
        if group + 1 >= self.groups.len() {
            return false;
        }
        self.groups[group].children = pads.iter().map(|pad| pad.id).collect();
        for pad in pads {
            self.pads.entry(pad.id).or_insert_with(|| pad.clone());
        }
        true
    }

    /// Total number of pad rows across every section.
    pub fn child_count(&self) -> usize {
        self.groups.iter().map(|section| section.children.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{MembershipMode, Projection, RowPosition, UNCLASSIFIED_LABEL};
    use crate::model::group::PadGroup;
    use crate::model::pad::Pad;

    fn pad(id: i64, name: &str, group_id: Option<i64>) -> Pad {
        Pad {
            id,
            name: name.to_string(),
            url: format!("https://pad.example.org/p/{name}"),
            group_id,
            created_at: 0,
            last_used_at: id,
            access_count: 0,
        }
    }

    fn group(id: i64, name: &str) -> PadGroup {
        PadGroup {
            id,
            name: name.to_string(),
            position: id,
        }
    }

    #[test]
    fn deferred_projection_lists_every_pad_as_unclassified() {
        let groups = vec![group(1, "Work")];
        let pads = vec![pad(10, "A", None), pad(11, "B", None)];

        let projection =
            Projection::build(&groups, &pads, MembershipMode::Deferred, UNCLASSIFIED_LABEL);

        let sections = projection
            .groups()
            .iter()
            .map(|section| (section.name.as_str(), section.children.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            sections,
            vec![("Work", vec![]), ("Unclassified", vec![10, 11])]
        );
    }

    #[test]
    fn deferred_projection_keeps_grouped_pads_in_unclassified_once() {
        let groups = vec![group(1, "Work"), group(2, "Home")];
        let pads = vec![pad(10, "A", Some(1)), pad(11, "B", Some(2)), pad(12, "C", None)];

        let projection =
            Projection::build(&groups, &pads, MembershipMode::Deferred, UNCLASSIFIED_LABEL);

        assert_eq!(projection.unclassified().children, vec![10, 11, 12]);
        assert!(projection.groups()[..2]
            .iter()
            .all(|section| section.children.is_empty()));
    }

    #[test]
    fn assigned_projection_places_pads_under_their_group() {
        let groups = vec![group(1, "Work"), group(2, "Home")];
        let pads = vec![
            pad(10, "A", Some(2)),
            pad(11, "B", None),
            pad(12, "C", Some(1)),
            pad(13, "D", Some(99)),
        ];

        let projection =
            Projection::build(&groups, &pads, MembershipMode::Assigned, UNCLASSIFIED_LABEL);

        assert_eq!(projection.groups()[0].children, vec![12]);
        assert_eq!(projection.groups()[1].children, vec![10]);
        assert_eq!(projection.unclassified().children, vec![11, 13]);
        assert_eq!(projection.child_count(), pads.len());
    }

    #[test]
    fn empty_inputs_yield_only_an_empty_unclassified_bucket() {
        let projection = Projection::default();
        assert_eq!(projection.groups().len(), 1);
        assert_eq!(projection.unclassified().group_id, None);
        assert_eq!(projection.unclassified().name, UNCLASSIFIED_LABEL);
        assert!(projection.unclassified().children.is_empty());
    }

    #[test]
    fn child_id_never_resolves_group_headers() {
        let pads = vec![pad(10, "A", None)];
        let projection = Projection::build(&[], &pads, MembershipMode::Deferred, "Loose");

        assert_eq!(projection.child_id(RowPosition::Group { group: 0 }), None);
        assert_eq!(
            projection.child_id(RowPosition::Child { group: 0, child: 0 }),
            Some(10)
        );
        assert_eq!(
            projection.child_id(RowPosition::Child { group: 0, child: 1 }),
            None
        );
        assert_eq!(projection.unclassified().name, "Loose");
    }

    #[test]
    fn populate_group_refuses_the_unclassified_bucket() {
        let groups = vec![group(1, "Work")];
        let mut projection =
            Projection::build(&groups, &[], MembershipMode::Deferred, UNCLASSIFIED_LABEL);

        assert!(projection.populate_group(0, &[pad(20, "X", Some(1))]));
        assert_eq!(projection.groups()[0].children, vec![20]);
        assert_eq!(projection.pad(20).map(|pad| pad.name.as_str()), Some("X"));
        assert!(!projection.populate_group(1, &[pad(21, "Y", None)]));
    }

    #[test]
    fn serialized_projection_carries_groups_only() {
        let groups = vec![group(1, "Work")];
        let pads = vec![pad(10, "A", Some(1))];
        let projection =
            Projection::build(&groups, &pads, MembershipMode::Assigned, UNCLASSIFIED_LABEL);

        let value = serde_json::to_value(&projection).unwrap();
        assert_eq!(value["groups"][0]["group_id"], 1);
        assert_eq!(value["groups"][0]["children"][0], 10);
        assert!(value["groups"][1]["group_id"].is_null());
        assert!(value.get("pads").is_none());
    }

    #[test]
    fn membership_mode_uses_snake_case_names() {
        assert_eq!(
            serde_json::to_string(&MembershipMode::Assigned).unwrap(),
            "\"assigned\""
        );
    }
}
