//! Flutter-facing bindings for the PadLand pad list core.

pub mod api;
