//! Semantic comparison of the YAML corpus against the Markdown corpus.
//!
//! Every discrepancy is collected so the operator sees the whole list in one
//! run. The only early exit is a name-set mismatch, after which per-skill
//! comparisons have nothing to pair up.

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use skillsync_core::{Level, Skill};

static COMMAND_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("command reference regex"));

/// Which representation a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Yaml,
    Markdown,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Yaml => "YAML",
            Side::Markdown => "markdown",
        })
    }
}

/// One way the two corpora disagree, or one broken reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    MissingInMarkdown(Vec<String>),
    MissingInYaml(Vec<String>),
    DuplicateName {
        side: Side,
        name: String,
    },
    InvalidLevel {
        skill: String,
        level: String,
    },
    UnknownPrerequisite {
        skill: String,
        prerequisite: String,
        suggestion: Option<String>,
    },
    CommandOutOfRange {
        skill: String,
        task: String,
        reference: String,
        available: usize,
    },
    LevelMismatch {
        skill: String,
        yaml: String,
        markdown: String,
    },
    PrerequisitesMismatch {
        skill: String,
        only_yaml: Vec<String>,
        only_markdown: Vec<String>,
    },
    TaskCountMismatch {
        skill: String,
        yaml: usize,
        markdown: usize,
    },
    TaskNameMismatch {
        skill: String,
        yaml: String,
        markdown: String,
    },
    StepCountMismatch {
        skill: String,
        task: String,
        yaml: usize,
        markdown: usize,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::MissingInMarkdown(names) => {
                write!(f, "Skills in YAML but not markdown: {}", names.join(", "))
            }
            Discrepancy::MissingInYaml(names) => {
                write!(f, "Skills in markdown but not YAML: {}", names.join(", "))
            }
            Discrepancy::DuplicateName { side, name } => {
                write!(f, "{name}: Duplicate skill name in {side}")
            }
            Discrepancy::InvalidLevel { skill, level } => write!(
                f,
                "{skill}: Invalid level '{level}' (must be Basic, Intermediate, or Advanced)"
            ),
            Discrepancy::UnknownPrerequisite {
                skill,
                prerequisite,
                suggestion,
            } => {
                write!(f, "{skill}: Prerequisite '{prerequisite}' not found")?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean '{s}'?)")?;
                }
                Ok(())
            }
            Discrepancy::CommandOutOfRange {
                skill,
                task,
                reference,
                available,
            } => write!(
                f,
                "{skill}/{task}: Step references command ({reference}) but only {available} commands defined"
            ),
            Discrepancy::LevelMismatch {
                skill,
                yaml,
                markdown,
            } => write!(f, "{skill}: Level mismatch (YAML: {yaml}, MD: {markdown})"),
            Discrepancy::PrerequisitesMismatch {
                skill,
                only_yaml,
                only_markdown,
            } => {
                write!(f, "{skill}: Prerequisites mismatch")?;
                let mut parts = Vec::new();
                if !only_yaml.is_empty() {
                    parts.push(format!("only in YAML: {}", only_yaml.join(", ")));
                }
                if !only_markdown.is_empty() {
                    parts.push(format!("only in MD: {}", only_markdown.join(", ")));
                }
                if !parts.is_empty() {
                    write!(f, " ({})", parts.join("; "))?;
                }
                Ok(())
            }
            Discrepancy::TaskCountMismatch {
                skill,
                yaml,
                markdown,
            } => write!(f, "{skill}: Task count mismatch (YAML: {yaml}, MD: {markdown})"),
            Discrepancy::TaskNameMismatch {
                skill,
                yaml,
                markdown,
            } => write!(
                f,
                "{skill}: Task name mismatch (YAML: '{yaml}', MD: '{markdown}')"
            ),
            Discrepancy::StepCountMismatch {
                skill,
                task,
                yaml,
                markdown,
            } => write!(
                f,
                "{skill}/{task}: Step count mismatch (YAML: {yaml}, MD: {markdown})"
            ),
        }
    }
}

/// Compare two independently loaded corpora. An empty result means in sync.
pub fn validate(yaml: &[Skill], markdown: &[Skill]) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    // 1. Same skill names on both sides.
    let yaml_names: BTreeSet<&str> = yaml.iter().map(|s| s.name.as_str()).collect();
    let md_names: BTreeSet<&str> = markdown.iter().map(|s| s.name.as_str()).collect();
    if yaml_names != md_names {
        let missing_in_md: Vec<String> = yaml_names
            .difference(&md_names)
            .map(|s| s.to_string())
            .collect();
        let missing_in_yaml: Vec<String> = md_names
            .difference(&yaml_names)
            .map(|s| s.to_string())
            .collect();
        if !missing_in_md.is_empty() {
            found.push(Discrepancy::MissingInMarkdown(missing_in_md));
        }
        if !missing_in_yaml.is_empty() {
            found.push(Discrepancy::MissingInYaml(missing_in_yaml));
        }
        return found;
    }

    found.extend(duplicates(yaml, Side::Yaml));
    found.extend(duplicates(markdown, Side::Markdown));

    // 2-4. Reference checks run on the Markdown side, the one people edit.
    found.extend(check_levels(markdown));
    found.extend(check_prerequisites(markdown));
    found.extend(check_command_refs(markdown));

    // 5. Side-by-side comparison, in YAML order.
    let md_by_name: HashMap<&str, &Skill> = markdown
        .iter()
        .rev()
        .map(|s| (s.name.as_str(), s))
        .collect();
    let mut seen = HashSet::new();
    for y in yaml {
        if !seen.insert(y.name.as_str()) {
            continue;
        }
        if let Some(m) = md_by_name.get(y.name.as_str()) {
            compare(y, m, &mut found);
        }
    }

    found
}

fn duplicates(skills: &[Skill], side: Side) -> Vec<Discrepancy> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    skills
        .iter()
        .filter(|s| !seen.insert(s.name.as_str()) && reported.insert(s.name.as_str()))
        .map(|s| Discrepancy::DuplicateName {
            side,
            name: s.name.clone(),
        })
        .collect()
}

fn check_levels(skills: &[Skill]) -> Vec<Discrepancy> {
    skills
        .iter()
        .filter(|s| s.level.parse::<Level>().is_err())
        .map(|s| Discrepancy::InvalidLevel {
            skill: s.name.clone(),
            level: s.level.clone(),
        })
        .collect()
}

fn check_prerequisites(skills: &[Skill]) -> Vec<Discrepancy> {
    let names: BTreeSet<&str> = skills.iter().map(|s| s.name.as_str()).collect();
    let mut found = Vec::new();
    for skill in skills {
        for prereq in &skill.prerequisites {
            if !names.contains(prereq.as_str()) {
                found.push(Discrepancy::UnknownPrerequisite {
                    skill: skill.name.clone(),
                    prerequisite: prereq.clone(),
                    suggestion: suggest(prereq, names.iter().copied()),
                });
            }
        }
    }
    found
}

/// First known name (alphabetically) that contains `wanted` or is contained
/// in it, ignoring case.
pub fn suggest<'a>(wanted: &str, names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let wanted = wanted.to_lowercase();
    let mut candidates: Vec<&str> = names
        .into_iter()
        .filter(|name| {
            let name = name.to_lowercase();
            name.contains(&wanted) || wanted.contains(&name)
        })
        .collect();
    candidates.sort_unstable();
    candidates.first().map(|s| s.to_string())
}

fn check_command_refs(skills: &[Skill]) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    for skill in skills {
        for task in &skill.tasks {
            let available = task.commands().len();
            for step in &task.steps {
                for caps in COMMAND_REF.captures_iter(&step.text) {
                    let reference = &caps[1];
                    let in_range = reference
                        .parse::<usize>()
                        .is_ok_and(|n| (1..=available).contains(&n));
                    if !in_range {
                        found.push(Discrepancy::CommandOutOfRange {
                            skill: skill.name.clone(),
                            task: task.name.clone(),
                            reference: reference.to_string(),
                            available,
                        });
                    }
                }
            }
        }
    }
    found
}

fn compare(yaml: &Skill, md: &Skill, found: &mut Vec<Discrepancy>) {
    let name = &yaml.name;

    if yaml.level != md.level {
        found.push(Discrepancy::LevelMismatch {
            skill: name.clone(),
            yaml: yaml.level.clone(),
            markdown: md.level.clone(),
        });
    }

    let y_prereqs: BTreeSet<&String> = yaml.prerequisites.iter().collect();
    let m_prereqs: BTreeSet<&String> = md.prerequisites.iter().collect();
    if y_prereqs != m_prereqs {
        found.push(Discrepancy::PrerequisitesMismatch {
            skill: name.clone(),
            only_yaml: y_prereqs.difference(&m_prereqs).map(|s| s.to_string()).collect(),
            only_markdown: m_prereqs.difference(&y_prereqs).map(|s| s.to_string()).collect(),
        });
    }

    if yaml.tasks.len() != md.tasks.len() {
        found.push(Discrepancy::TaskCountMismatch {
            skill: name.clone(),
            yaml: yaml.tasks.len(),
            markdown: md.tasks.len(),
        });
        return;
    }

    for (y_task, m_task) in yaml.tasks.iter().zip(&md.tasks) {
        if y_task.name != m_task.name {
            found.push(Discrepancy::TaskNameMismatch {
                skill: name.clone(),
                yaml: y_task.name.clone(),
                markdown: m_task.name.clone(),
            });
        }
        if y_task.steps.len() != m_task.steps.len() {
            found.push(Discrepancy::StepCountMismatch {
                skill: name.clone(),
                task: y_task.name.clone(),
                yaml: y_task.steps.len(),
                markdown: m_task.steps.len(),
            });
        }
    }
}
