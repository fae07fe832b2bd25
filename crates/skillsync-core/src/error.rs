use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the skillsync workspace.
#[derive(Error, Debug)]
pub enum SyncError {
    // ── Filesystem errors ──────────────────────────────────────
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Parse errors ───────────────────────────────────────────
    #[error("{reason} in {}", .path.display())]
    Markdown { path: PathBuf, reason: String },

    #[error("Missing '{field}' in frontmatter of {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("invalid YAML in {}: {source}", .path.display())]
    YamlDocument {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    // ── Corpus errors ──────────────────────────────────────────
    #[error("invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("slug collision: '{first}' and '{second}' both map to {}", .path.display())]
    SlugCollision {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("Content validation failed ({} issue(s))", .0.len())]
    Validation(Vec<String>),

    // ── Environment errors ─────────────────────────────────────
    #[error("No skill data found (looked for {} and {})", .yaml.display(), .markdown.display())]
    NoSources { yaml: PathBuf, markdown: PathBuf },

    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Discrepancies collected by the validator, if this is a validation failure.
    pub fn discrepancies(&self) -> &[String] {
        match self {
            SyncError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
