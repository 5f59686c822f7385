//! Pad list use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the screen, FFI and CLI layers decoupled from storage details.

pub mod group_service;
pub mod pad_service;
