//! Core logic of the PadLand pad list.
//! This crate is the single source of truth for pad/group invariants,
//! selection behavior and the grouped list projection.

pub mod config;
pub mod db;
pub mod intent;
pub mod loader;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod screen;
pub mod selection;
pub mod service;

pub use config::{ConfigError, PadListConfig};
pub use intent::{InboundAction, InboundRequest};
pub use loader::{spawn_load, Delivery, LoadResult, LoadTicket, ProjectionLoader};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::group::{is_genuine_group, GroupId, PadGroup, UNCLASSIFIED_GROUP_ID};
pub use model::pad::{NewPad, Pad, PadId, PadValidationError};
pub use projection::{MembershipMode, ProjectedGroup, Projection, RowPosition, UNCLASSIFIED_LABEL};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::pad_repo::{PadRepository, SqlitePadRepository};
pub use repo::{RepoError, RepoResult};
pub use screen::{
    load_projection, Notice, PadListScreen, ScreenEffect, ScreenError, ScreenResult,
    ScreenSettings,
};
pub use selection::{
    BulkAction, SelectionController, SelectionEffect, SelectionEvent, SelectionMode,
};
pub use service::group_service::{GroupService, GroupServiceError};
pub use service::pad_service::{DeleteOutcome, PadService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
