use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty level of a skill.
///
/// The set is closed and case-sensitive. Skills keep their raw level string so
/// that a corpus with a bad value can still be loaded and reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Basic,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Basic, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Basic => "Basic",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Subdirectory of the Markdown tree holding skills of this level.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Level::Basic => "basic",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(Level::Basic),
            "Intermediate" => Ok(Level::Intermediate),
            "Advanced" => Ok(Level::Advanced),
            other => Err(format!(
                "Invalid level '{other}' (must be Basic, Intermediate, or Advanced)"
            )),
        }
    }
}

/// One instructional unit: a level, prerequisites, and ordered tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Raw level string; see [`Skill::parsed_level`].
    pub level: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Position in the YAML corpus, carried through the Markdown tree only so
    /// the original order survives a round trip. Never compared.
    #[serde(skip)]
    pub order_index: Option<usize>,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level: level.as_str().to_string(),
            prerequisites: Vec::new(),
            tasks: Vec::new(),
            order_index: None,
        }
    }

    pub fn parsed_level(&self) -> Option<Level> {
        self.level.parse().ok()
    }

    /// Drop the transient ordering index.
    pub fn without_index(mut self) -> Self {
        self.order_index = None;
        self
    }
}

/// A named unit of work within a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// `None` means the task has no commands block at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            commands: None,
        }
    }

    /// Commands as a slice, empty when the block is absent.
    pub fn commands(&self) -> &[String] {
        self.commands.as_deref().unwrap_or(&[])
    }
}

/// One tagged instruction line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub tag: String,
    pub text: String,
}

impl Step {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}
