//! Pad and group domain model.
//!
//! # Responsibility
//! - Define the records shared by storage, projection and screen logic.
//!
//! # Invariants
//! - Every pad is identified by a stable integer `PadId`.
//! - `UNCLASSIFIED_GROUP_ID` is reserved and never stored.

pub mod group;
pub mod pad;
