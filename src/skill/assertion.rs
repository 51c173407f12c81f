//! Assertions that make up a test scaffold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};

/// The four fixed assertion groups, in scaffold order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionGroup {
    /// Expected, valid usage.
    HappyPath,
    /// Boundary inputs.
    EdgeCase,
    /// Invalid input and failure reporting.
    ErrorHandling,
    /// The help flag.
    Help,
}

impl AssertionGroup {
    /// All groups in the order the scaffold emits them.
    pub const ALL: [Self; 4] = [Self::HappyPath, Self::EdgeCase, Self::ErrorHandling, Self::Help];

    /// Header label printed by the scaffold (`== <label> ==`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HappyPath => "Happy path",
            Self::EdgeCase => "Edge cases",
            Self::ErrorHandling => "Error handling",
            Self::Help => "Help",
        }
    }

    /// Parses a scaffold header label back into a group.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }
}

impl fmt::Display for AssertionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How an assertion compares the invocation's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    /// Combined stdout and stderr must contain `expected` literally.
    Contains,
    /// The exit code must equal `expected` parsed as an integer.
    ExitCode,
}

/// A file written into the scaffold's work directory before an assertion runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// File name relative to `$WORKDIR`.
    pub name: String,
    /// File contents.
    pub content: String,
}

/// A single check in the test scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Group the assertion is emitted under.
    pub group: AssertionGroup,
    /// Comparison performed.
    pub kind: AssertionKind,
    /// Human-readable description printed in the trace.
    pub description: String,
    /// Shell command producing the actual value, run from the skill directory.
    pub command: String,
    /// Expected substring or exit code.
    pub expected: String,
    /// Optional input file.
    #[serde(default)]
    pub fixture: Option<Fixture>,
}

impl Assertion {
    /// Creates a substring-containment assertion.
    pub fn contains(
        group: AssertionGroup,
        description: impl Into<String>,
        command: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            group,
            kind: AssertionKind::Contains,
            description: description.into(),
            command: command.into(),
            expected: expected.into(),
            fixture: None,
        }
    }

    /// Creates an exit-code assertion.
    pub fn exit_code(
        group: AssertionGroup,
        description: impl Into<String>,
        command: impl Into<String>,
        expected: i32,
    ) -> Self {
        Self {
            group,
            kind: AssertionKind::ExitCode,
            description: description.into(),
            command: command.into(),
            expected: expected.to_string(),
            fixture: None,
        }
    }

    /// Attaches a fixture file to the assertion.
    #[must_use]
    pub fn with_fixture(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.fixture = Some(Fixture { name: name.into(), content: content.into() });
        self
    }

    /// Checks that the assertion can be rendered into a scaffold.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::InvalidAssertion`] if the description or command
    /// is empty, an exit-code expectation is not an integer, or a fixture name
    /// escapes the work directory.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| SkillError::InvalidAssertion {
            description: self.description.clone(),
            reason: reason.to_string(),
        };
        if self.description.trim().is_empty() {
            return Err(invalid("description is empty"));
        }
        if self.command.trim().is_empty() {
            return Err(invalid("command is empty"));
        }
        if self.kind == AssertionKind::ExitCode && self.expected.trim().parse::<i32>().is_err() {
            return Err(invalid("exit_code expectation must be an integer"));
        }
        if let Some(fixture) = &self.fixture {
            if !is_plain_file_name(&fixture.name) {
                return Err(invalid("fixture name may only use letters, digits, '.', '_' and '-'"));
            }
        }
        Ok(())
    }

    /// Parses a YAML list of assertions and validates each one.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or any assertion is invalid.
    pub fn parse_list(yaml: &str) -> Result<Vec<Self>> {
        let assertions: Vec<Self> = serde_yaml::from_str(yaml).map_err(|e| {
            SkillError::InvalidAssertion { description: "<file>".into(), reason: e.to_string() }
        })?;
        for assertion in &assertions {
            assertion.validate()?;
        }
        Ok(assertions)
    }
}

/// Fixture names are pasted into the scaffold unquoted, so only characters
/// the shell treats literally are allowed.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_labels_round_trip() {
        for group in AssertionGroup::ALL {
            assert_eq!(AssertionGroup::from_label(group.label()), Some(group));
        }
        assert_eq!(AssertionGroup::from_label("Nope"), None);
    }

    #[test]
    fn exit_code_expectation_must_be_numeric() {
        let mut assertion =
            Assertion::exit_code(AssertionGroup::Help, "help exits 0", "./run.sh --help", 0);
        assert!(assertion.validate().is_ok());
        assertion.expected = "zero".into();
        let err = assertion.validate().unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn fixture_name_cannot_escape_workdir() {
        let assertion = Assertion::contains(
            AssertionGroup::HappyPath,
            "reads fixture",
            "./run.sh \"$WORKDIR/x\"",
            "3",
        )
        .with_fixture("../x", "data");
        assert!(assertion.validate().is_err());
    }

    #[test]
    fn fixture_names_are_shell_literal() {
        let named = |name: &str| {
            Assertion::contains(AssertionGroup::HappyPath, "reads fixture", "./run.sh", "3")
                .with_fixture(name, "data")
        };
        for bad in ["", ".", "..", "a/b", "a\"b", "$(touch x)", "`id`", "a b", "x;y", "*.txt"] {
            assert!(named(bad).validate().is_err(), "{bad:?} accepted");
        }
        assert!(named("three-words_1.txt").validate().is_ok());
        assert!(named(".hidden").validate().is_ok());
    }

    #[test]
    fn parses_yaml_list() {
        let yaml = r#"
- group: happy_path
  kind: contains
  description: counts three words
  command: ./run.sh "$WORKDIR/three.txt"
  expected: "3"
  fixture:
    name: three.txt
    content: "one two three\n"
- group: error_handling
  kind: exit_code
  description: missing file fails
  command: ./run.sh /nonexistent
  expected: "1"
"#;
        let assertions = Assertion::parse_list(yaml).unwrap();
        assert_eq!(assertions.len(), 2);
        assert_eq!(assertions[0].group, AssertionGroup::HappyPath);
        assert_eq!(assertions[0].fixture.as_ref().unwrap().name, "three.txt");
        assert_eq!(assertions[1].kind, AssertionKind::ExitCode);
    }

    #[test]
    fn rejects_invalid_yaml_entry() {
        let yaml = "- group: help\n  kind: exit_code\n  description: bad\n  command: ./run.sh\n  expected: maybe\n";
        assert!(Assertion::parse_list(yaml).is_err());
    }
}
