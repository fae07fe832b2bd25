use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use skillsync_config::SlugCollisionPolicy;
use skillsync_core::{Level, Skill, SyncError};

use crate::markdown;
use crate::slug::{SKILL_EXTENSION, skill_filename, slugify};

/// Find every skill file under `root`, sorted by path. A missing root yields
/// an empty list.
pub fn discover_markdown(root: &Path) -> skillsync_core::Result<Vec<PathBuf>> {
    if !root.exists() {
        debug!(?root, "markdown directory does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| SyncError::Read {
            path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == SKILL_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Decode every skill file under `root`, in path order. The first file that
/// fails to parse aborts the whole load.
pub fn load_markdown_dir(root: &Path) -> skillsync_core::Result<Vec<Skill>> {
    let files = discover_markdown(root)?;
    let mut skills = Vec::with_capacity(files.len());
    for file in &files {
        let skill = markdown::from_file(file)?;
        debug!(skill = %skill.name, path = ?file, "loaded skill");
        skills.push(skill);
    }
    info!(?root, count = skills.len(), "loaded markdown corpus");
    Ok(skills)
}

/// Directory name for a level: the known levels map to their fixed names,
/// anything else is lowercased and slugified so it cannot escape the root.
pub fn level_dir_name(level: &str) -> String {
    match level.parse::<Level>() {
        Ok(level) => level.dir_name().to_string(),
        Err(_) => slugify(&level.to_lowercase()),
    }
}

/// Where a skill is written under `root`.
pub fn skill_path(root: &Path, skill: &Skill) -> PathBuf {
    root.join(level_dir_name(&skill.level))
        .join(skill_filename(&skill.name))
}

/// Delete generated skill files from the per-level subdirectories. Other
/// files and directories are left alone.
pub fn clear_generated(root: &Path) -> skillsync_core::Result<usize> {
    let mut removed = 0;
    for level in Level::ALL {
        let dir = root.join(level.dir_name());
        if !dir.is_dir() {
            continue;
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| SyncError::Read {
            path: dir.clone(),
            source: e,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|e| SyncError::Read {
                    path: dir.clone(),
                    source: e,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|e| e == SKILL_EXTENSION) {
                std::fs::remove_file(&path).map_err(|e| SyncError::Write {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }
    }
    debug!(?root, removed, "cleared generated markdown");
    Ok(removed)
}

/// Write `skills` as a Markdown tree under `root`, replacing what was there.
///
/// Each skill is stamped with its position so that [`order_for_yaml`] can
/// restore the corpus order later. Duplicate names and (under the `Error`
/// policy) slug collisions are rejected before anything on disk changes.
pub fn save_markdown_dir(
    root: &Path,
    skills: &[Skill],
    collisions: SlugCollisionPolicy,
) -> skillsync_core::Result<Vec<PathBuf>> {
    let targets = plan_targets(root, skills, collisions)?;

    clear_generated(root)?;

    let mut written = Vec::with_capacity(skills.len());
    for (index, (skill, path)) in skills.iter().zip(targets).enumerate() {
        let mut stamped = skill.clone();
        stamped.order_index = Some(index);

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| SyncError::Write {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&path, markdown::render(&stamped)).map_err(|e| SyncError::Write {
            path: path.clone(),
            source: e,
        })?;
        debug!(skill = %skill.name, path = ?path, "wrote skill");
        written.push(path);
    }

    info!(?root, count = written.len(), "wrote markdown corpus");
    Ok(written)
}

fn plan_targets(
    root: &Path,
    skills: &[Skill],
    collisions: SlugCollisionPolicy,
) -> skillsync_core::Result<Vec<PathBuf>> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut by_path: HashMap<PathBuf, &str> = HashMap::new();
    let mut targets = Vec::with_capacity(skills.len());

    for skill in skills {
        if !names.insert(skill.name.as_str()) {
            return Err(SyncError::InvalidCorpus(format!(
                "duplicate skill name '{}'",
                skill.name
            )));
        }

        let path = skill_path(root, skill);
        if let Some(first) = by_path.insert(path.clone(), skill.name.as_str()) {
            match collisions {
                SlugCollisionPolicy::Error => {
                    return Err(SyncError::SlugCollision {
                        first: first.to_string(),
                        second: skill.name.clone(),
                        path,
                    });
                }
                SlugCollisionPolicy::Warn => {
                    warn!(
                        first,
                        second = %skill.name,
                        path = ?path,
                        "slug collision, later skill overwrites"
                    );
                }
            }
        }
        targets.push(path);
    }

    Ok(targets)
}

/// Put skills decoded from Markdown back into corpus order and strip the
/// ordering index.
///
/// When any skill carries an index, sort by it (unindexed skills go last, in
/// their current order). Otherwise sort by level, then name.
pub fn order_for_yaml(mut skills: Vec<Skill>) -> Vec<Skill> {
    if skills.iter().any(|s| s.order_index.is_some()) {
        skills.sort_by_key(|s| s.order_index.unwrap_or(usize::MAX));
    } else {
        skills.sort_by(|a, b| {
            level_rank(&a.level)
                .cmp(&level_rank(&b.level))
                .then_with(|| a.name.cmp(&b.name))
        });
    }
    skills.into_iter().map(Skill::without_index).collect()
}

fn level_rank(level: &str) -> usize {
    level
        .parse::<Level>()
        .map_or(Level::ALL.len(), |l| l as usize)
}
