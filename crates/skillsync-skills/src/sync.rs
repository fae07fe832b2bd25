//! Decides which representation is authoritative for a run and carries it out.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

use skillsync_config::{SlugCollisionPolicy, SyncConfig};
use skillsync_core::SyncError;

use crate::{corpus, validate, yaml};

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Markdown tree → YAML document.
    GenerateYaml,
    /// YAML document → Markdown tree.
    GenerateMarkdown,
    /// Both current: compare, write nothing.
    Validate,
}

/// Why the orchestrator picked its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReason {
    YamlMissing,
    MarkdownMissing,
    MarkdownEmpty,
    YamlNewer,
    MarkdownNewer,
    Simultaneous,
    /// Chosen explicitly by the caller.
    Requested,
}

/// An action plus the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPlan {
    pub action: SyncAction,
    pub reason: SyncReason,
}

impl SyncPlan {
    fn new(action: SyncAction, reason: SyncReason) -> Self {
        Self { action, reason }
    }

    /// A plan chosen by the caller rather than by timestamps.
    pub fn requested(action: SyncAction) -> Self {
        Self::new(action, SyncReason::Requested)
    }

    /// One-line announcement printed before the work starts.
    pub fn headline(&self) -> &'static str {
        match (self.reason, self.action) {
            (SyncReason::YamlMissing, _) => "YAML missing, generating from markdown...",
            (SyncReason::MarkdownMissing, _) => "Markdown missing, generating from YAML...",
            (SyncReason::MarkdownEmpty, _) => "Markdown directory empty, generating from YAML...",
            (SyncReason::YamlNewer, _) => "YAML is newer, updating markdown...",
            (SyncReason::MarkdownNewer, _) => "Markdown is newer, updating YAML...",
            (_, SyncAction::Validate) => "Validating sync...",
            (_, SyncAction::GenerateYaml) => "Generating YAML from markdown...",
            (_, SyncAction::GenerateMarkdown) => "Generating markdown from YAML...",
        }
    }
}

/// Filesystem observations the plan is made from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceState {
    /// Modification time of the YAML document, if it exists.
    pub yaml_mtime: Option<SystemTime>,
    pub markdown_dir_exists: bool,
    /// Number of skill files in the Markdown tree.
    pub markdown_files: usize,
    /// Newest modification time among the skill files.
    pub markdown_mtime: Option<SystemTime>,
}

impl SourceState {
    /// Look at the two sources on disk.
    pub fn inspect(yaml_path: &Path, markdown_dir: &Path) -> skillsync_core::Result<Self> {
        let yaml_mtime = if yaml_path.is_file() {
            Some(modified(yaml_path)?)
        } else {
            None
        };

        let files = corpus::discover_markdown(markdown_dir)?;
        let mut markdown_mtime: Option<SystemTime> = None;
        for file in &files {
            let mtime = modified(file)?;
            markdown_mtime = Some(markdown_mtime.map_or(mtime, |m| m.max(mtime)));
        }

        Ok(Self {
            yaml_mtime,
            markdown_dir_exists: markdown_dir.is_dir(),
            markdown_files: files.len(),
            markdown_mtime,
        })
    }

    /// Pick the action for this state, or `None` when there is nothing to sync.
    pub fn plan(&self, threshold: Duration) -> Option<SyncPlan> {
        let Some(yaml_mtime) = self.yaml_mtime else {
            return (self.markdown_files > 0)
                .then(|| SyncPlan::new(SyncAction::GenerateYaml, SyncReason::YamlMissing));
        };

        let Some(md_mtime) = self.markdown_mtime.filter(|_| self.markdown_files > 0) else {
            let reason = if self.markdown_dir_exists {
                SyncReason::MarkdownEmpty
            } else {
                SyncReason::MarkdownMissing
            };
            return Some(SyncPlan::new(SyncAction::GenerateMarkdown, reason));
        };

        let delta = match yaml_mtime.duration_since(md_mtime) {
            Ok(d) => d,
            Err(e) => e.duration(),
        };
        debug!(?delta, ?threshold, "compared modification times");

        let plan = if delta < threshold {
            SyncPlan::new(SyncAction::Validate, SyncReason::Simultaneous)
        } else if yaml_mtime > md_mtime {
            SyncPlan::new(SyncAction::GenerateMarkdown, SyncReason::YamlNewer)
        } else {
            SyncPlan::new(SyncAction::GenerateYaml, SyncReason::MarkdownNewer)
        };
        Some(plan)
    }
}

fn modified(path: &Path) -> skillsync_core::Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| SyncError::Read {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub plan: SyncPlan,
    /// Skills processed (or checked, for validation).
    pub skills: usize,
    /// Files written. Empty for validation.
    pub written: Vec<PathBuf>,
}

/// The sync engine for one YAML document and one Markdown tree.
#[derive(Debug, Clone)]
pub struct SkillSync {
    yaml_path: PathBuf,
    markdown_dir: PathBuf,
    threshold: Duration,
    collisions: SlugCollisionPolicy,
}

impl SkillSync {
    pub fn new(yaml_path: impl Into<PathBuf>, markdown_dir: impl Into<PathBuf>) -> Self {
        Self {
            yaml_path: yaml_path.into(),
            markdown_dir: markdown_dir.into(),
            threshold: Duration::from_secs(1),
            collisions: SlugCollisionPolicy::Error,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.paths.yaml, &config.paths.markdown_dir)
            .with_threshold(config.sync.threshold())
            .with_collision_policy(config.sync.slug_collisions)
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_collision_policy(mut self, collisions: SlugCollisionPolicy) -> Self {
        self.collisions = collisions;
        self
    }

    pub fn yaml_path(&self) -> &Path {
        &self.yaml_path
    }

    pub fn markdown_dir(&self) -> &Path {
        &self.markdown_dir
    }

    /// Inspect the filesystem and decide what [`SkillSync::execute`] should do.
    pub fn plan(&self) -> skillsync_core::Result<SyncPlan> {
        let state = SourceState::inspect(&self.yaml_path, &self.markdown_dir)?;
        debug!(?state, "inspected sources");
        state.plan(self.threshold).ok_or_else(|| SyncError::NoSources {
            yaml: self.yaml_path.clone(),
            markdown: self.markdown_dir.clone(),
        })
    }

    /// Carry out a plan.
    pub fn execute(&self, plan: SyncPlan) -> skillsync_core::Result<SyncReport> {
        info!(action = ?plan.action, reason = ?plan.reason, "executing sync plan");
        let (skills, written) = match plan.action {
            SyncAction::GenerateYaml => self.markdown_to_yaml()?,
            SyncAction::GenerateMarkdown => self.yaml_to_markdown()?,
            SyncAction::Validate => (self.validate()?, Vec::new()),
        };
        Ok(SyncReport {
            plan,
            skills,
            written,
        })
    }

    /// Plan and execute in one step.
    pub fn run(&self) -> skillsync_core::Result<SyncReport> {
        let plan = self.plan()?;
        self.execute(plan)
    }

    /// Check both sides without writing, whatever their timestamps.
    pub fn check(&self) -> skillsync_core::Result<SyncReport> {
        if !self.yaml_path.is_file() || corpus::discover_markdown(&self.markdown_dir)?.is_empty()
        {
            return Err(SyncError::InvalidCorpus(format!(
                "check needs both {} and skill files under {}",
                self.yaml_path.display(),
                self.markdown_dir.display()
            )));
        }
        self.execute(SyncPlan::requested(SyncAction::Validate))
    }

    fn yaml_to_markdown(&self) -> skillsync_core::Result<(usize, Vec<PathBuf>)> {
        let skills = yaml::load(&self.yaml_path)?;
        let written = corpus::save_markdown_dir(&self.markdown_dir, &skills, self.collisions)?;
        Ok((skills.len(), written))
    }

    fn markdown_to_yaml(&self) -> skillsync_core::Result<(usize, Vec<PathBuf>)> {
        if corpus::discover_markdown(&self.markdown_dir)?.is_empty() {
            return Err(SyncError::InvalidCorpus(format!(
                "no skill files under {}, refusing to overwrite {}",
                self.markdown_dir.display(),
                self.yaml_path.display()
            )));
        }
        let skills = corpus::order_for_yaml(corpus::load_markdown_dir(&self.markdown_dir)?);
        yaml::save(&self.yaml_path, &skills)?;
        Ok((skills.len(), vec![self.yaml_path.clone()]))
    }

    fn validate(&self) -> skillsync_core::Result<usize> {
        let yaml_skills = yaml::load(&self.yaml_path)?;
        let md_skills = corpus::load_markdown_dir(&self.markdown_dir)?;

        let found = validate::validate(&yaml_skills, &md_skills);
        if !found.is_empty() {
            return Err(SyncError::Validation(
                found.iter().map(ToString::to_string).collect(),
            ));
        }
        Ok(yaml_skills.len())
    }
}
