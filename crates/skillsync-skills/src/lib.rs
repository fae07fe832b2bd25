//! # skillsync-skills
//!
//! A skill corpus lives in two places at once: a single YAML document and a
//! tree of Markdown files, one per skill. This crate reads and writes both and
//! keeps them in step.
//!
//! ## YAML document
//!
//! ```yaml
//! skills:
//! - name: Git Basics
//!   level: Basic
//!   prerequisites: []
//!   tasks:
//!   - name: Create a repository
//!     steps:
//!     - tag: Setup
//!       text: Make a folder (1)
//!     commands:
//!     - mkdir demo
//! ```
//!
//! ## Markdown file (`basic/git-basics.md`)
//!
//! ```markdown
//! ---
//! name: Git Basics
//! level: Basic
//! _index: 0
//! prerequisites: []
//! ---
//!
//! # Git Basics
//!
//! ## Task: Create a repository
//!
//! 1. **[Setup]** Make a folder (1)
//!
//! **Commands:**
//! 1. `mkdir demo`
//! ```
//!
//! ## How a run works
//!
//! 1. Whichever side is missing is generated from the other
//! 2. When both exist, the one modified more recently wins
//! 3. When their timestamps are within the threshold, both are parsed and
//!    compared, and nothing is written

pub mod corpus;
pub mod markdown;
pub mod scalar;
pub mod slug;
pub mod sync;
pub mod validate;
pub mod yaml;

pub use slug::slugify;
pub use sync::{SkillSync, SourceState, SyncAction, SyncPlan, SyncReason, SyncReport};
pub use validate::{Discrepancy, Side, validate};
