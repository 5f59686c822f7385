use padland_core::db::open_db_in_memory;
use padland_core::{
    GroupRepository, GroupService, GroupServiceError, NewPad, PadRepository, PadService,
    PadValidationError, RepoError, SqliteGroupRepository, SqlitePadRepository,
    UNCLASSIFIED_GROUP_ID,
};

fn new_pad(name: &str) -> NewPad {
    NewPad::new(name, format!("https://pad.example.org/p/{name}"))
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePadRepository::try_new(&conn).unwrap();

    let created = repo.create_pad(&new_pad("minutes")).unwrap();
    let loaded = repo.get_pad(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "minutes");
    assert_eq!(loaded.group_id, None);
    assert_eq!(loaded.access_count, 0);
}

#[test]
fn create_rejects_invalid_pad() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePadRepository::try_new(&conn).unwrap();

    let err = repo
        .create_pad(&NewPad::new("notes", "file:///tmp/notes"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PadValidationError::UnsupportedUrl(_))
    ));
}

#[test]
fn list_orders_by_last_used_ascending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePadRepository::try_new(&conn).unwrap();

    let a = repo.create_pad(&new_pad("a")).unwrap();
    let b = repo.create_pad(&new_pad("b")).unwrap();
    let c = repo.create_pad(&new_pad("c")).unwrap();
    repo.touch_pad(a.id, 3_000).unwrap();
    repo.touch_pad(b.id, 1_000).unwrap();
    repo.touch_pad(c.id, 2_000).unwrap();

    let ids = repo
        .list_pads()
        .unwrap()
        .into_iter()
        .map(|pad| pad.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![b.id, c.id, a.id]);
    assert_eq!(repo.get_pad(a.id).unwrap().unwrap().access_count, 1);
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePadRepository::try_new(&conn).unwrap();
    let pad = repo.create_pad(&new_pad("gone")).unwrap();

    assert!(repo.delete_pad(pad.id).unwrap());
    assert!(!repo.delete_pad(pad.id).unwrap());
    assert!(repo.get_pad(pad.id).unwrap().is_none());
}

#[test]
fn set_pad_group_requires_existing_group() {
    let conn = open_db_in_memory().unwrap();
    let pads = SqlitePadRepository::try_new(&conn).unwrap();
    let pad = pads.create_pad(&new_pad("orphan")).unwrap();

    let err = pads.set_pad_group(pad.id, Some(42)).unwrap_err();
    assert!(matches!(err, RepoError::GroupNotFound(42)));

    let err = pads.set_pad_group(9_999, None).unwrap_err();
    assert!(matches!(err, RepoError::PadNotFound(9_999)));
}

#[test]
fn assign_group_moves_all_pads_or_none() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let work = groups.create_group("Work").unwrap();
    let service = PadService::new(SqlitePadRepository::try_new(&conn).unwrap());
    let first = service.create_pad(&new_pad("first")).unwrap();
    let second = service.create_pad(&new_pad("second")).unwrap();

    let err = service
        .assign_group(&[first.id, 9_999, second.id], Some(work))
        .unwrap_err();
    assert!(matches!(err, RepoError::PadNotFound(9_999)));
    assert!(service.list_group_pads(Some(work)).unwrap().is_empty());

    let err = service.assign_group(&[first.id], Some(42)).unwrap_err();
    assert!(matches!(err, RepoError::GroupNotFound(42)));

    assert_eq!(service.assign_group(&[first.id, second.id], Some(work)).unwrap(), 2);
    assert_eq!(service.list_group_pads(Some(work)).unwrap().len(), 2);
    assert_eq!(service.assign_group(&[], None).unwrap(), 0);
}

#[test]
fn list_pads_in_group_splits_grouped_and_ungrouped() {
    let conn = open_db_in_memory().unwrap();
    let pads = SqlitePadRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let work = groups.create_group("Work").unwrap();
    let grouped = pads.create_pad(&new_pad("plan").in_group(work)).unwrap();
    let loose = pads.create_pad(&new_pad("loose")).unwrap();

    let in_work = pads.list_pads_in_group(Some(work)).unwrap();
    assert_eq!(in_work.len(), 1);
    assert_eq!(in_work[0].id, grouped.id);

    let ungrouped = pads.list_pads_in_group(None).unwrap();
    assert_eq!(ungrouped.len(), 1);
    assert_eq!(ungrouped[0].id, loose.id);
}

#[test]
fn groups_list_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let first = groups.create_group("Work").unwrap();
    let second = groups.create_group("Home").unwrap();

    let listed = groups.list_groups().unwrap();
    assert_eq!(
        listed.iter().map(|group| group.id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert_eq!(listed[0].position, 0);
    assert_eq!(listed[1].position, 1);
}

#[test]
fn deleting_group_ungroups_its_pads() {
    let conn = open_db_in_memory().unwrap();
    let pads = SqlitePadRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let work = groups.create_group("Work").unwrap();
    let pad = pads.create_pad(&new_pad("plan").in_group(work)).unwrap();

    let service = GroupService::new(groups);
    service.delete_group(work).unwrap();

    assert_eq!(pads.get_pad(pad.id).unwrap().unwrap().group_id, None);
    assert!(matches!(
        service.delete_group(work),
        Err(GroupServiceError::GroupNotFound(id)) if id == work
    ));
}

#[test]
fn reserved_group_cannot_be_deleted_or_renamed() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.delete_group(UNCLASSIFIED_GROUP_ID),
        Err(GroupServiceError::ReservedGroup(0))
    ));
    assert!(matches!(
        service.rename_group(UNCLASSIFIED_GROUP_ID, "Other"),
        Err(GroupServiceError::ReservedGroup(0))
    ));
    assert!(matches!(
        service.create_group("   "),
        Err(GroupServiceError::InvalidGroupName)
    ));
}

#[test]
fn rename_group_trims_name() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());
    let id = service.create_group("Work").unwrap();

    service.rename_group(id, "  Office ").unwrap();
    assert_eq!(groups.get_group(id).unwrap().unwrap().name, "Office");
}

#[test]
fn bulk_delete_runs_in_order_and_reports_each_id() {
    let conn = open_db_in_memory().unwrap();
    let service = PadService::new(SqlitePadRepository::try_new(&conn).unwrap());
    let a = service.create_pad(&new_pad("a")).unwrap();
    let b = service.create_pad(&new_pad("b")).unwrap();

    let outcomes = service.delete_pads(&[b.id, 9_999, a.id]);

    let summary = outcomes
        .iter()
        .map(|outcome| (outcome.pad_id, outcome.deleted))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![(b.id, true), (9_999, false), (a.id, true)]);
    assert!(service.list_pads().unwrap().is_empty());
}

#[test]
fn share_text_lists_name_and_url_in_request_order() {
    let conn = open_db_in_memory().unwrap();
    let service = PadService::new(SqlitePadRepository::try_new(&conn).unwrap());
    let a = service.create_pad(&new_pad("alpha")).unwrap();
    let b = service.create_pad(&new_pad("beta")).unwrap();

    let text = service.share_text(&[b.id, 9_999, a.id]).unwrap();

    assert_eq!(
        text,
        "beta\nhttps://pad.example.org/p/beta\n\nalpha\nhttps://pad.example.org/p/alpha"
    );
}
