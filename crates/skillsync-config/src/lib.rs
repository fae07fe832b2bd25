//! # skillsync-config
//!
//! Configuration for skillsync. Reads from `skillsync.toml`, environment
//! variables, and CLI overrides, in that precedence order. Every setting has a
//! default, so running without a config file syncs `data/skills.yaml` with
//! `data/skills/`.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::SyncConfig;
pub use schema::{
    ConfigWarning, LoggingConfig, PathsConfig, SlugCollisionPolicy, SyncSettings,
    WarningSeverity,
};
