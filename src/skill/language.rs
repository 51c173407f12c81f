//! Implementation language selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language a skill is implemented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Thin wrapper over system commands; logic lives in `run.sh`.
    Shell,
    /// Data, network, or string-heavy work; logic lives in `main.py`.
    Python,
}

impl Language {
    /// Returns `true` when the entry point dispatches to a separate logic module.
    #[must_use]
    pub fn has_logic_module(self) -> bool {
        matches!(self, Self::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell => f.write_str("shell"),
            Self::Python => f.write_str("python"),
        }
    }
}

/// The planner's language choice and why it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDecision {
    /// Selected implementation language.
    pub language: Language,
    /// Short human-readable rationale.
    pub rationale: String,
}
