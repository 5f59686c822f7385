//! FFI use-case API for the Flutter pad list screen.
//!
//! # Responsibility
//! - Expose stable, use-case-level pad list functions to Dart via FRB.
//! - Translate core screen effects into plain envelopes the UI renders.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own connection; no state survives between calls
//!   except the resolved database path.

use log::warn;
use padland_core::db::open_db;
use padland_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BulkAction, GroupId, GroupService, InboundRequest, MembershipMode, NewPad, Notice, PadId,
    PadListConfig, PadListScreen, PadService, Projection, ScreenEffect, ScreenSettings,
    SqliteGroupRepository, SqlitePadRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;

static PAD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the pad store location before the first data call.
///
/// # FFI contract
/// - Returns empty string on success.
/// - Fails once a path has been resolved, including by an earlier data call.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    match PAD_DB_PATH.set(PathBuf::from(trimmed)) {
        Ok(()) => String::new(),
        Err(_) => format!(
            "pad store already configured at `{}`",
            resolve_db_path().display()
        ),
    }
}

/// One pad row of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadListItem {
    pub pad_id: i64,
    pub name: String,
    pub url: String,
}

/// One section of the list. `group_id` is `None` for the unclassified bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadListSection {
    pub group_id: Option<i64>,
    pub name: String,
    pub pads: Vec<PadListItem>,
}

/// Result envelope for loading or opening the pad list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadListResponse {
    pub ok: bool,
    pub sections: Vec<PadListSection>,
    /// Text to place on the clipboard, when the screen was opened by a share.
    pub clipboard_text: Option<String>,
    /// Toast messages in display order.
    pub notices: Vec<String>,
    pub message: String,
}

impl PadListResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            sections: Vec::new(),
            clipboard_text: None,
            notices: Vec::new(),
            message: message.into(),
        }
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadActionResponse {
    pub ok: bool,
    /// Created or affected id, when there is one.
    pub id: Option<i64>,
    pub message: String,
}

impl PadActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Opens the pad list, handling an optional inbound request first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `action = "delete"` with `pad_ids` deletes those pads in order and
///   adds one notice per removed pad.
/// - `shared_text` is returned in `clipboard_text` for the UI to copy.
/// - `assign_groups = true` places pads under their own group.
#[flutter_rust_bridge::frb(sync)]
pub fn pad_list_open(
    action: Option<String>,
    pad_ids: Vec<String>,
    shared_text: Option<String>,
    assign_groups: bool,
) -> PadListResponse {
    let request = InboundRequest {
        action,
        pad_ids,
        shared_text,
    };
    let conn = match open_pad_db() {
        Ok(conn) => conn,
        Err(err) => return PadListResponse::failure(format!("pad_list_open failed: {err}")),
    };

    let settings = screen_settings(assign_groups);
    let mut screen = match screen_for(&conn, settings) {
        Ok(screen) => screen,
        Err(err) => return PadListResponse::failure(format!("pad_list_open failed: {err}")),
    };

    match screen.open(&request) {
        Ok(effects) => {
            let mut response = to_list_response(screen.projection());
            for effect in effects {
                match effect {
                    ScreenEffect::CopyToClipboard(text) => response.clipboard_text = Some(text),
                    ScreenEffect::Notice(notice) => response.notices.push(notice_text(&notice)),
                    _ => {}
                }
            }
            response
        }
        Err(err) => PadListResponse::failure(format!("pad_list_open failed: {err}")),
    }
}

/// Loads the children of one group section by its group id.
#[flutter_rust_bridge::frb(sync)]
pub fn pad_list_group_children(group_id: i64) -> PadListResponse {
    let result = with_pad_service(|service| service.list_group_pads(Some(group_id)));
    match result {
        Ok(pads) => PadListResponse {
            ok: true,
            sections: vec![PadListSection {
                group_id: Some(group_id),
                name: String::new(),
                pads: pads
                    .into_iter()
                    .map(|pad| PadListItem {
                        pad_id: pad.id,
                        name: pad.name,
                        url: pad.url,
                    })
                    .collect(),
            }],
            clipboard_text: None,
            notices: Vec::new(),
            message: String::new(),
        },
        Err(err) => PadListResponse::failure(format!("pad_list_group_children failed: {err}")),
    }
}

/// Creates a pad from the new-pad screen.
#[flutter_rust_bridge::frb(sync)]
pub fn pad_create(name: String, url: String, group_id: Option<i64>) -> PadActionResponse {
    let mut new_pad = NewPad::new(name, url);
    new_pad.group_id = group_id;
    match with_pad_service(|service| service.create_pad(&new_pad)) {
        Ok(pad) => PadActionResponse::success("Pad saved.", Some(pad.id)),
        Err(err) => PadActionResponse::failure(format!("pad_create failed: {err}")),
    }
}

/// Deletes pads after the user confirmed a bulk delete.
#[flutter_rust_bridge::frb(sync)]
pub fn pads_delete(pad_ids: Vec<i64>) -> PadActionResponse {
    match with_pad_service(|service| Ok(service.delete_pads(&pad_ids))) {
        Ok(outcomes) => {
            let deleted = outcomes.iter().filter(|outcome| outcome.deleted).count();
            PadActionResponse::success(format!("{deleted} pad(s) deleted."), None)
        }
        Err(err) => PadActionResponse::failure(format!("pads_delete failed: {err}")),
    }
}

/// Moves pads into a group; `None` removes them from any group.
#[flutter_rust_bridge::frb(sync)]
pub fn pads_assign_group(pad_ids: Vec<i64>, group_id: Option<i64>) -> PadActionResponse {
    match with_pad_service(|service| service.assign_group(&pad_ids, group_id)) {
        Ok(count) => PadActionResponse::success(format!("{count} pad(s) grouped."), group_id),
        Err(err) => PadActionResponse::failure(format!("pads_assign_group failed: {err}")),
    }
}

/// Builds the share body for the selected pads.
///
/// The text is returned in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn pads_share_text(pad_ids: Vec<i64>) -> PadActionResponse {
    match with_pad_service(|service| service.share_text(&pad_ids)) {
        Ok(text) => PadActionResponse::success(text, None),
        Err(err) => PadActionResponse::failure(format!("pads_share_text failed: {err}")),
    }
}

/// Creates a group from the new-group dialog.
#[flutter_rust_bridge::frb(sync)]
pub fn group_create(name: String) -> PadActionResponse {
    match with_group_service(|service| service.create_group(name).map_err(|err| err.to_string())) {
        Ok(id) => PadActionResponse::success("Group created.", Some(id)),
        Err(err) => PadActionResponse::failure(format!("group_create failed: {err}")),
    }
}

/// Deletes a group; its pads become unclassified.
#[flutter_rust_bridge::frb(sync)]
pub fn group_delete(group_id: i64) -> PadActionResponse {
    match with_group_service(|service| {
        service
            .delete_group(group_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => PadActionResponse::success("Group deleted.", Some(group_id)),
        Err(err) => PadActionResponse::failure(format!("group_delete failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    PAD_DB_PATH
        .get_or_init(|| PadListConfig::default().resolve_db_path())
        .clone()
}

fn open_pad_db() -> Result<Connection, String> {
    let path = resolve_db_path();
    open_db(&path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("pad store open failed: {err}")
    })
}

fn screen_settings(assign_groups: bool) -> ScreenSettings {
    ScreenSettings {
        membership: if assign_groups {
            MembershipMode::Assigned
        } else {
            MembershipMode::Deferred
        },
        ..ScreenSettings::default()
    }
}

fn screen_for(
    conn: &Connection,
    settings: ScreenSettings,
) -> Result<PadListScreen<SqlitePadRepository<'_>, SqliteGroupRepository<'_>>, String> {
    let pads = SqlitePadRepository::try_new(conn).map_err(|err| err.to_string())?;
    let groups = SqliteGroupRepository::try_new(conn).map_err(|err| err.to_string())?;
    Ok(PadListScreen::new(pads, groups, settings))
}

fn with_pad_service<T>(
    f: impl FnOnce(&PadService<SqlitePadRepository<'_>>) -> padland_core::RepoResult<T>,
) -> Result<T, String> {
    let conn = open_pad_db()?;
    let repo = SqlitePadRepository::try_new(&conn)
        .map_err(|err| format!("pad repo init failed: {err}"))?;
    let service = PadService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn with_group_service<T>(
    f: impl FnOnce(&GroupService<SqliteGroupRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_pad_db()?;
    let repo = SqliteGroupRepository::try_new(&conn)
        .map_err(|err| format!("group repo init failed: {err}"))?;
    f(&GroupService::new(repo))
}

fn to_list_response(projection: &Projection) -> PadListResponse {
    let sections = projection
        .groups()
        .iter()
        .map(|section| PadListSection {
            group_id: section.group_id,
            name: section.name.clone(),
            pads: section
                .children
                .iter()
                .filter_map(|id| projection.pad(*id))
                .map(|pad| PadListItem {
                    pad_id: pad.id,
                    name: pad.name.clone(),
                    url: pad.url.clone(),
                })
                .collect(),
        })
        .collect::<Vec<_>>();
    let message = format!("Loaded {} pad(s).", projection.child_count());
    PadListResponse {
        ok: true,
        sections,
        clipboard_text: None,
        notices: Vec::new(),
        message,
    }
}

fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::PadDeleted(id) => format!("Pad {} deleted.", pad_label(*id)),
        Notice::TextCopied => "Text copied to clipboard.".to_string(),
        Notice::GroupCreated(id) => format!("Group {} created.", group_label(*id)),
        Notice::GroupDeleted(id) => format!("Group {} deleted.", group_label(*id)),
        Notice::PadsGrouped { count } => format!("{count} pad(s) grouped."),
        Notice::ActionFailed(action) => format!("Could not {} the selected pads.", verb(*action)),
    }
}

fn verb(action: BulkAction) -> &'static str {
    match action {
        BulkAction::Delete => "delete",
        BulkAction::Group => "group",
        BulkAction::Share => "share",
    }
}

fn pad_label(id: PadId) -> String {
    format!("#{id}")
}

fn group_label(id: GroupId) -> String {
    format!("#{id}")
}
