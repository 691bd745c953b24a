//! Plan shaping and coaching workflows on top of `coach-api`.
//!
//! The backend stores flat entry lists; this crate groups them into
//! day-slots, computes nutrition totals, drives day copies and template
//! instantiation, resolves catalog items, and keeps the notification state
//! that the CLI renders.

pub mod catalog;
pub mod error;
pub mod message;
pub mod notify;
pub mod nutrition;
pub mod plan;
pub mod progress;
pub mod validation;

pub use error::CoreError;
