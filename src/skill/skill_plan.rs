//! The planner's output.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::language::LanguageDecision;

/// Kind of positional input a skill requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Path to an existing regular file.
    File,
    /// Path to an existing directory.
    Directory,
    /// A URL.
    Url,
    /// Free text.
    Text,
}

impl InputKind {
    /// Returns `true` if the input names a path that must exist before work starts.
    #[must_use]
    pub fn is_path(self) -> bool {
        matches!(self, Self::File | Self::Directory)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Url => "url",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// A required positional argument of the generated entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Placeholder name shown in usage text (e.g. `file`).
    pub name: String,
    /// What the argument refers to.
    pub kind: InputKind,
}

impl InputSpec {
    /// Usage placeholder such as `<file>`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.name)
    }
}

/// Everything the emitters need to know about a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPlan {
    /// Skill name, used for directory and doc titles.
    pub name: String,
    /// The task description the skill was planned from.
    pub description: String,
    /// Selected implementation language.
    pub decision: LanguageDecision,
    /// Whether the entry point needs per-OS code paths.
    pub platform_branches: bool,
    /// Required positional inputs, in order.
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
}

impl SkillPlan {
    /// Usage line for the entry point, e.g. `Usage: run.sh [-h] <file>`.
    #[must_use]
    pub fn usage_line(&self) -> String {
        let mut line = String::from("Usage: run.sh [-h]");
        for input in &self.inputs {
            line.push(' ');
            line.push_str(&input.placeholder());
        }
        line
    }
}
