//! The single YAML document: `skills:` followed by a list of skill mappings.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use skillsync_core::{Skill, Step, SyncError, Task};

use crate::scalar::{ends_line, format_scalar};

/// Top-level key holding the skill list.
pub const ROOT_KEY: &str = "skills";

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    skills: Option<Vec<RawSkill>>,
}

#[derive(Debug, Deserialize)]
struct RawSkill {
    name: String,
    level: String,
    #[serde(default)]
    prerequisites: Option<Vec<String>>,
    #[serde(default)]
    tasks: Option<Vec<RawTask>>,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    name: String,
    #[serde(default)]
    steps: Option<Vec<Step>>,
    #[serde(default)]
    commands: Option<Vec<CommandEntry>>,
}

/// Shapes a `commands` item can take after generic YAML parsing.
///
/// An unquoted `Run: npm test` is a one-entry mapping to the parser, and a bare
/// `42` is a number. Both are folded back into the command string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandEntry {
    Text(String),
    Mangled(serde_yaml::Mapping),
    Scalar(serde_yaml::Value),
}

impl CommandEntry {
    fn into_command(self) -> String {
        match self {
            CommandEntry::Text(s) => s,
            CommandEntry::Mangled(map) => {
                if map.len() > 1 {
                    warn!(
                        entries = map.len(),
                        "command parsed as multi-key mapping, keeping the first entry"
                    );
                }
                match map.into_iter().next() {
                    Some((key, serde_yaml::Value::Null)) => format!("{}:", scalar_text(&key)),
                    Some((key, value)) => {
                        format!("{}: {}", scalar_text(&key), scalar_text(&value))
                    }
                    None => String::new(),
                }
            }
            CommandEntry::Scalar(value) => scalar_text(&value),
        }
    }
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<RawSkill> for Skill {
    fn from(raw: RawSkill) -> Self {
        Skill {
            name: raw.name,
            level: raw.level,
            prerequisites: raw.prerequisites.unwrap_or_default(),
            tasks: raw
                .tasks
                .unwrap_or_default()
                .into_iter()
                .map(Task::from)
                .collect(),
            order_index: None,
        }
    }
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        Task {
            name: raw.name,
            steps: raw.steps.unwrap_or_default(),
            commands: raw
                .commands
                .map(|cmds| cmds.into_iter().map(CommandEntry::into_command).collect()),
        }
    }
}

/// Parse a skills document from text. `path` is only used in error messages.
pub fn parse(content: &str, path: &Path) -> skillsync_core::Result<Vec<Skill>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: Document = serde_yaml::from_str(content).map_err(|e| SyncError::YamlDocument {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(doc
        .skills
        .unwrap_or_default()
        .into_iter()
        .map(Skill::from)
        .collect())
}

/// Read the skills document.
pub fn load(path: &Path) -> skillsync_core::Result<Vec<Skill>> {
    let content = std::fs::read_to_string(path).map_err(|e| SyncError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let skills = parse(&content, path)?;
    debug!(?path, count = skills.len(), "loaded YAML corpus");
    Ok(skills)
}

/// Write the skills document, creating the parent directory if needed.
pub fn save(path: &Path, skills: &[Skill]) -> skillsync_core::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, render(skills)).map_err(|e| SyncError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(?path, count = skills.len(), "wrote YAML corpus");
    Ok(())
}

/// Serialize skills in insertion order. Sequences are written without extra
/// indentation under their key, and the ordering index is never emitted.
pub fn render(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return format!("{ROOT_KEY}: []\n");
    }

    let mut out = format!("{ROOT_KEY}:\n");
    for skill in skills {
        out.push_str("- ");
        entry(&mut out, 2, "name", &skill.name, true);
        entry(&mut out, 2, "level", &skill.level, false);
        string_list(&mut out, 2, "prerequisites", &skill.prerequisites);

        if skill.tasks.is_empty() {
            out.push_str("  tasks: []\n");
            continue;
        }
        out.push_str("  tasks:\n");
        for task in &skill.tasks {
            out.push_str("  - ");
            entry(&mut out, 4, "name", &task.name, true);
            if task.steps.is_empty() {
                out.push_str("    steps: []\n");
            } else {
                out.push_str("    steps:\n");
                for step in &task.steps {
                    out.push_str("    - ");
                    entry(&mut out, 6, "tag", &step.tag, true);
                    entry(&mut out, 6, "text", &step.text, false);
                }
            }
            if let Some(commands) = &task.commands {
                string_list(&mut out, 4, "commands", commands);
            }
        }
    }
    out
}

/// `key: value` at `indent`. `inline` entries continue a `- ` marker already
/// written on the current line.
fn entry(out: &mut String, indent: usize, key: &str, value: &str, inline: bool) {
    if !inline {
        out.push_str(&" ".repeat(indent));
    }
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&format_scalar(value, indent));
    if !ends_line(value) {
        out.push('\n');
    }
}

fn string_list(out: &mut String, indent: usize, key: &str, items: &[String]) {
    let pad = " ".repeat(indent);
    if items.is_empty() {
        out.push_str(&format!("{pad}{key}: []\n"));
        return;
    }
    out.push_str(&format!("{pad}{key}:\n"));
    for item in items {
        out.push_str(&format!("{pad}- {}", format_scalar(item, indent)));
        if !ends_line(item) {
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsync_core::Level;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("data/skills.yaml")
    }

    fn corpus() -> Vec<Skill> {
        let mut basics = Skill::new("Git Basics", Level::Basic);
        basics.tasks = vec![Task {
            name: "Create a repository".into(),
            steps: vec![
                Step::new("Setup", "Make a folder (1)"),
                Step::new("Action", "Don't forget to init (2)"),
            ],
            commands: Some(vec!["mkdir demo".into(), "git init".into()]),
        }];

        let mut branching = Skill::new("Branching", Level::Intermediate);
        branching.prerequisites = vec!["Git Basics".into()];
        branching.tasks = vec![Task {
            name: "Merge".into(),
            steps: vec![Step::new("Action", "Resolve conflicts:\nedit, add, commit")],
            commands: None,
        }];

        vec![basics, branching]
    }

    #[test]
    fn render_layout() {
        let yaml = render(&corpus()[..1]);
        let expected = "\
skills:
- name: Git Basics
  level: Basic
  prerequisites: []
  tasks:
  - name: Create a repository
    steps:
    - tag: Setup
      text: Make a folder (1)
    - tag: Action
      text: \"Don't forget to init (2)\"
    commands:
    - mkdir demo
    - git init
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn multi_line_text_uses_literal_block() {
        let yaml = render(&corpus()[1..]);
        assert!(
            yaml.contains("      text: |-\n        Resolve conflicts:\n        edit, add, commit\n")
        );
    }

    #[test]
    fn load_inverts_save() {
        let skills = corpus();
        assert_eq!(parse(&render(&skills), &path()).unwrap(), skills);
    }

    #[test]
    fn order_is_preserved_not_sorted() {
        let mut skills = corpus();
        skills.reverse();
        let parsed = parse(&render(&skills), &path()).unwrap();
        assert_eq!(parsed[0].name, "Branching");
        assert_eq!(parsed[1].name, "Git Basics");
    }

    #[test]
    fn ordering_index_is_dropped() {
        let mut skills = corpus();
        skills[0].order_index = Some(7);
        let yaml = render(&skills);
        assert!(!yaml.contains("_index"));
        assert!(parse(&yaml, &path()).unwrap()[0].order_index.is_none());
    }

    #[test]
    fn mangled_commands_are_repaired() {
        let doc = "\
skills:
- name: Testing
  level: Basic
  tasks:
  - name: Run
    steps:
    - tag: Action
      text: Run the suite (1)
    commands:
    - Run: npm test
    - echo done
    - 42
    - note:
";
        let skills = parse(doc, &path()).unwrap();
        assert_eq!(
            skills[0].tasks[0].commands,
            Some(vec![
                "Run: npm test".to_string(),
                "echo done".to_string(),
                "42".to_string(),
                "note:".to_string(),
            ])
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc = "skills:\n- name: Bare\n  level: Advanced\n  tasks:\n  - name: Only\n";
        let skills = parse(doc, &path()).unwrap();
        assert!(skills[0].prerequisites.is_empty());
        assert!(skills[0].tasks[0].steps.is_empty());
        assert!(skills[0].tasks[0].commands.is_none());
    }

    #[test]
    fn empty_document_is_empty_corpus() {
        assert!(parse("", &path()).unwrap().is_empty());
        assert!(parse("skills: []\n", &path()).unwrap().is_empty());
        assert_eq!(render(&[]), "skills: []\n");
    }

    #[test]
    fn missing_level_is_an_error() {
        let err = parse("skills:\n- name: NoLevel\n", &path()).unwrap_err();
        assert!(matches!(err, SyncError::YamlDocument { .. }));
        assert!(err.to_string().contains("data/skills.yaml"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("skills.yaml");
        save(&file, &corpus()).unwrap();
        assert_eq!(load(&file).unwrap(), corpus());
    }
}
