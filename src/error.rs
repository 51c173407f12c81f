//! Error types for the skill authoring pipeline.

use std::path::PathBuf;

use crate::skill::ArtifactRole;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, SkillError>;

/// Errors raised while planning, emitting, testing, or documenting a skill.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// A filesystem operation failed.
    #[error("filesystem error at {path}: {message}")]
    Io {
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// A shell command could not be spawned.
    #[error("failed to run `{command}`: {message}")]
    Shell {
        /// The command that was attempted.
        command: String,
        /// Underlying error message.
        message: String,
    },

    /// The language model request failed.
    #[error("LLM request failed: {0}")]
    Llm(String),

    /// The test scaffold is the contract and cannot be replaced once written.
    #[error("test scaffold is locked once emitted")]
    ScaffoldLocked,

    /// A revision tried to touch an artifact that is not part of the implementation.
    #[error("{0} is not an implementation artifact")]
    NotImplementationRole(ArtifactRole),

    /// An artifact exceeded the size ceiling.
    #[error("{role} is {size} bytes, above the {limit} byte ceiling")]
    ArtifactTooLarge {
        /// Role of the oversized artifact.
        role: ArtifactRole,
        /// Actual size in bytes.
        size: usize,
        /// Maximum size in bytes.
        limit: usize,
    },

    /// The scaffold output could not be interpreted.
    #[error("malformed test run: {0}")]
    MalformedRun(String),

    /// Documentation was requested for an implementation without a clean test run.
    #[error("refusing to document untested behavior: {passed}/{total} passed")]
    UntestedDocs {
        /// Assertions that passed.
        passed: usize,
        /// Assertions that ran.
        total: usize,
    },

    /// The LLM response did not contain a usable revision.
    #[error("invalid revision: {0}")]
    Revision(String),

    /// An assertion definition is invalid.
    #[error("invalid assertion '{description}': {reason}")]
    InvalidAssertion {
        /// Description of the offending assertion.
        description: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A plan or manifest could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SkillError {
    /// Wraps a boxed port error as an [`SkillError::Io`] for `path`.
    pub(crate) fn io(path: &std::path::Path, err: &dyn std::fmt::Display) -> Self {
        Self::Io { path: path.to_path_buf(), message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_names_role_and_limit() {
        let err = SkillError::ArtifactTooLarge {
            role: ArtifactRole::EntryPoint,
            size: 200_000,
            limit: 102_400,
        };
        let msg = err.to_string();
        assert!(msg.contains("run.sh"));
        assert!(msg.contains("102400"));
    }

    #[test]
    fn untested_docs_reports_counts() {
        let err = SkillError::UntestedDocs { passed: 2, total: 5 };
        assert_eq!(err.to_string(), "refusing to document untested behavior: 2/5 passed");
    }
}
