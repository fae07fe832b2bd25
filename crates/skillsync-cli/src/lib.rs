//! # skillsync-cli
//!
//! Command-line interface for the skillsync engine.
//!
//! ## Commands
//!
//! - `skillsync` / `skillsync sync`: Bring YAML and Markdown in step
//! - `skillsync check`: Validate both sides without writing
//! - `skillsync to-yaml`: Regenerate the YAML document from Markdown
//! - `skillsync to-markdown`: Regenerate the Markdown tree from YAML
//! - `skillsync slug <name>`: Print the filename a skill name maps to

pub mod commands;

pub use commands::{Cli, report_error};
