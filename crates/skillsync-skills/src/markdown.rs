use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

use skillsync_core::{Skill, Step, SyncError, Task};

use crate::scalar::{ends_line, format_scalar};

static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|$)(.*)$")
        .expect("frontmatter regex")
});
static TASK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Task: (.+)$").expect("task header regex"));
static STEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s+\*\*\[([^\]]+)\]\*\*\s+(.+)$").expect("step regex")
});
static COMMANDS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Commands:\*\*\s*\n((?:\d+\.\s+`.+`\s*\n?)+)").expect("commands block regex")
});
static COMMAND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+`(.+)`\s*$").expect("command regex"));

/// Frontmatter keys of a skill file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    prerequisites: Option<Vec<String>>,
    #[serde(default, rename = "_index")]
    index: Option<serde_yaml::Value>,
}

/// Read and decode one skill file.
pub fn from_file(path: &Path) -> skillsync_core::Result<Skill> {
    let content = std::fs::read_to_string(path).map_err(|e| SyncError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&content, path)
}

/// Decode a skill from Markdown. `path` is only used in error messages.
///
/// The format is:
///
/// ```text
/// ---
/// name: Git Basics
/// level: Basic
/// _index: 0
/// prerequisites: []
/// ---
///
/// # Git Basics
///
/// ## Task: Create a repository
///
/// 1. **[Setup]** Initialise the repository (1)
///
/// **Commands:**
/// 1. `git init`
/// ```
pub fn parse(content: &str, path: &Path) -> skillsync_core::Result<Skill> {
    let caps = FRONTMATTER
        .captures(content)
        .ok_or_else(|| SyncError::Markdown {
            path: path.to_path_buf(),
            reason: "Missing YAML frontmatter".into(),
        })?;
    let frontmatter = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());

    let meta = parse_frontmatter(frontmatter, path)?;
    let name = meta.name.ok_or_else(|| SyncError::MissingField {
        path: path.to_path_buf(),
        field: "name",
    })?;
    let level = meta.level.ok_or_else(|| SyncError::MissingField {
        path: path.to_path_buf(),
        field: "level",
    })?;

    Ok(Skill {
        name,
        level,
        prerequisites: meta.prerequisites.unwrap_or_default(),
        tasks: parse_tasks(body),
        order_index: meta.index.and_then(|v| order_index(&v, path)),
    })
}

/// `_index` only orders skills, so a hand-edited value that is not a
/// non-negative whole number is dropped rather than failing the file.
fn order_index(value: &serde_yaml::Value, path: &Path) -> Option<usize> {
    let index = match value {
        serde_yaml::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    if index.is_none() {
        warn!(?path, ?value, "ignoring unusable _index");
    }
    index.and_then(|i| usize::try_from(i).ok())
}

fn parse_frontmatter(yaml: &str, path: &Path) -> skillsync_core::Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| SyncError::Markdown {
        path: path.to_path_buf(),
        reason: format!("Invalid frontmatter ({e})"),
    })
}

/// Split the body on `## Task:` headers. Text before the first header (the
/// title) is ignored.
fn parse_tasks(body: &str) -> Vec<Task> {
    let headers: Vec<_> = TASK_HEADER.captures_iter(body).collect();
    let mut tasks = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(body.len(), |m| m.start());
        let chunk = &body[whole.end()..end];

        tasks.push(Task {
            name: name.as_str().trim().to_string(),
            steps: parse_steps(chunk),
            commands: parse_commands(chunk),
        });
    }

    tasks
}

fn parse_steps(chunk: &str) -> Vec<Step> {
    chunk
        .lines()
        .filter_map(|line| STEP_LINE.captures(line.trim()))
        .map(|caps| Step {
            tag: caps[1].to_string(),
            text: caps[2].to_string(),
        })
        .collect()
}

fn parse_commands(chunk: &str) -> Option<Vec<String>> {
    let block = COMMANDS_BLOCK.captures(chunk)?;
    let commands: Vec<String> = block[1]
        .lines()
        .filter_map(|line| COMMAND_LINE.captures(line.trim()))
        .map(|caps| caps[1].to_string())
        .collect();
    if commands.is_empty() { None } else { Some(commands) }
}

/// Encode a skill as Markdown. Inverse of [`parse`].
pub fn render(skill: &Skill) -> String {
    let mut md = String::from("---\n");
    push_entry(&mut md, "name", &skill.name);
    push_entry(&mut md, "level", &skill.level);
    if let Some(index) = skill.order_index {
        md.push_str(&format!("_index: {index}\n"));
    }
    if skill.prerequisites.is_empty() {
        md.push_str("prerequisites: []\n");
    } else {
        md.push_str("prerequisites:\n");
        for prereq in &skill.prerequisites {
            md.push_str(&format!("  - {}", format_scalar(prereq, 2)));
            if !ends_line(prereq) {
                md.push('\n');
            }
        }
    }
    md.push_str("---\n\n");

    md.push_str(&format!("# {}\n\n", skill.name));

    for task in &skill.tasks {
        md.push_str(&format!("## Task: {}\n\n", task.name));

        for (i, step) in task.steps.iter().enumerate() {
            md.push_str(&format!("{}. **[{}]** {}\n", i + 1, step.tag, step.text));
        }

        if !task.commands().is_empty() {
            md.push_str("\n**Commands:**\n");
            for (i, cmd) in task.commands().iter().enumerate() {
                md.push_str(&format!("{}. `{}`\n", i + 1, cmd));
            }
        }

        md.push('\n');
    }

    md
}

fn push_entry(md: &mut String, key: &str, value: &str) {
    md.push_str(&format!("{key}: {}", format_scalar(value, 0)));
    if !ends_line(value) {
        md.push('\n');
    }
}
