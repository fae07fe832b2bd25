//! # skillsync-core
//!
//! Shared vocabulary for the skillsync workspace: the skill data model and the
//! unified error type. Every other crate in the workspace depends on this one.

pub mod error;
pub mod types;

pub use error::{Result, SyncError};
pub use types::*;
