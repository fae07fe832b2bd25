use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::schema::SyncConfig;

const DEFAULT_CONFIG_FILE: &str = "skillsync.toml";

/// Loads the skillsync configuration for a single run.
pub struct ConfigLoader {
    config: SyncConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > SKILLSYNC_CONFIG env > ./skillsync.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        Self::resolve_path_with(explicit, |k| std::env::var(k).ok())
    }

    fn resolve_path_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Some(p) = env("SKILLSYNC_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load the config from disk, falling back to defaults when no file exists
    /// at the default location. A path given explicitly must exist.
    pub fn load(path: Option<&Path>) -> skillsync_core::Result<Self> {
        Self::load_with_env(path, |k| std::env::var(k).ok())
    }

    /// Like [`ConfigLoader::load`], reading overrides through `env` instead of
    /// the process environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> skillsync_core::Result<Self> {
        let config_path = Self::resolve_path_with(path, &env);
        let required = path.is_some() || env("SKILLSYNC_CONFIG").is_some();

        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path).map_err(|e| {
                skillsync_core::SyncError::Read {
                    path: config_path.clone(),
                    source: e,
                }
            })?;
            toml::from_str::<SyncConfig>(&raw).map_err(|e| {
                skillsync_core::SyncError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else if required {
            return Err(skillsync_core::SyncError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        } else {
            debug!(?config_path, "no config file, using defaults");
            SyncConfig::default()
        };

        let config = Self::apply_env_overrides(config, &env);

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(skillsync_core::SyncError::Config(e));
            }
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// The loaded configuration.
    pub fn get(&self) -> &SyncConfig {
        &self.config
    }

    pub fn into_config(self) -> SyncConfig {
        self.config
    }

    /// Path the configuration was resolved from (it may not exist).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (SKILLSYNC_YAML_PATH, SKILLSYNC_LOG_LEVEL, etc.)
    fn apply_env_overrides(
        mut config: SyncConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> SyncConfig {
        if let Some(v) = env("SKILLSYNC_YAML_PATH") {
            config.paths.yaml = PathBuf::from(v);
        }
        if let Some(v) = env("SKILLSYNC_MARKDOWN_DIR") {
            config.paths.markdown_dir = PathBuf::from(v);
        }
        if let Some(v) = env("SKILLSYNC_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = env("SKILLSYNC_THRESHOLD_MS") {
            match v.parse::<u64>() {
                Ok(ms) => config.sync.mtime_threshold_ms = ms,
                Err(_) => warn!(value = %v, "ignoring non-numeric SKILLSYNC_THRESHOLD_MS"),
            }
        }
        config
    }
}
