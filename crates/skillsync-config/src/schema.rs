use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration, mapped from `skillsync.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub paths: PathsConfig,
    pub sync: SyncSettings,
    pub logging: LoggingConfig,
}

// ── Paths ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The single YAML document holding every skill.
    pub yaml: PathBuf,
    /// Root of the Markdown tree (one subdirectory per level).
    pub markdown_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            yaml: PathBuf::from("data/skills.yaml"),
            markdown_dir: PathBuf::from("data/skills"),
        }
    }
}

// ── Sync behaviour ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Modification times closer than this are treated as simultaneous and
    /// trigger validation instead of regeneration.
    pub mtime_threshold_ms: u64,
    /// What to do when two skills derive the same Markdown file path.
    pub slug_collisions: SlugCollisionPolicy,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            mtime_threshold_ms: 1000,
            slug_collisions: SlugCollisionPolicy::Error,
        }
    }
}

impl SyncSettings {
    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.mtime_threshold_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugCollisionPolicy {
    /// Abort before touching the Markdown tree.
    #[default]
    Error,
    /// Log a warning and let the later skill overwrite the earlier file.
    Warn,
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

const VALID_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl SyncConfig {
    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all error messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Paths ───
        if self.paths.yaml.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                field: "paths.yaml".into(),
                message: "YAML path is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'data/skills.yaml'".into()),
            });
        }
        if self.paths.markdown_dir.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                field: "paths.markdown_dir".into(),
                message: "Markdown directory is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'data/skills'".into()),
            });
        }
        if !self.paths.yaml.as_os_str().is_empty() && self.paths.yaml == self.paths.markdown_dir {
            warnings.push(ConfigWarning {
                field: "paths.markdown_dir".into(),
                message: "Markdown directory and YAML document point at the same path".into(),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }
        if self.paths.yaml.extension().is_some_and(|e| e == "md") {
            warnings.push(ConfigWarning {
                field: "paths.yaml".into(),
                message: "YAML document has a .md extension".into(),
                severity: WarningSeverity::Error,
                hint: Some("It would be picked up as a skill file".into()),
            });
        }

        // ── Threshold ───
        if self.sync.mtime_threshold_ms == 0 {
            warnings.push(ConfigWarning {
                field: "sync.mtime_threshold_ms".into(),
                message: "threshold is 0, validation will only run on identical timestamps".into(),
                severity: WarningSeverity::Warning,
                hint: Some("The default of 1000 absorbs filesystem timestamp precision".into()),
            });
        }

        // ── Logging ───
        if !VALID_FORMATS.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", VALID_FORMATS.join(", "))),
            });
        }
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", VALID_LEVELS.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| w.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(errors.join("\n"));
        }

        Ok(warnings)
    }
}
