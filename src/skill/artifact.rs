//! Generated artifact roles and the set that holds their contents.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};

/// Maximum size of any generated artifact (100 KB).
pub const MAX_ARTIFACT_BYTES: usize = 100 * 1024;

/// The fixed roles a file can play in a skill directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    /// The test scaffold (`test.sh`).
    TestScript,
    /// The entry point (`run.sh`).
    EntryPoint,
    /// Optional secondary logic module (`main.py`).
    LogicModule,
    /// Primary documentation (`SKILL.md`).
    PrimaryDoc,
    /// Short pointer document (`README.md`).
    PointerDoc,
    /// Version history (`CHANGELOG.md`).
    Changelog,
}

impl ArtifactRole {
    /// All roles in layout order.
    pub const ALL: [Self; 6] = [
        Self::TestScript,
        Self::EntryPoint,
        Self::LogicModule,
        Self::PrimaryDoc,
        Self::PointerDoc,
        Self::Changelog,
    ];

    /// File name of the artifact inside the skill directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::TestScript => "test.sh",
            Self::EntryPoint => "run.sh",
            Self::LogicModule => "main.py",
            Self::PrimaryDoc => "SKILL.md",
            Self::PointerDoc => "README.md",
            Self::Changelog => "CHANGELOG.md",
        }
    }

    /// Looks up a role by file name.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.file_name() == name)
    }

    /// Returns `true` for the roles a revision may rewrite.
    #[must_use]
    pub fn is_implementation(self) -> bool {
        matches!(self, Self::EntryPoint | Self::LogicModule)
    }

    /// Returns `true` for files that must be executable.
    #[must_use]
    pub fn is_executable(self) -> bool {
        matches!(self, Self::TestScript | Self::EntryPoint | Self::LogicModule)
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Contents of a skill directory, keyed by role.
///
/// The test scaffold can be inserted exactly once; afterwards only
/// implementation artifacts may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    files: BTreeMap<ArtifactRole, String>,
}

impl ArtifactSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::ScaffoldLocked`] when replacing an existing test
    /// scaffold, and [`SkillError::ArtifactTooLarge`] when `contents` exceeds
    /// [`MAX_ARTIFACT_BYTES`].
    pub fn insert(&mut self, role: ArtifactRole, contents: String) -> Result<()> {
        if role == ArtifactRole::TestScript && self.files.contains_key(&role) {
            return Err(SkillError::ScaffoldLocked);
        }
        check_size(role, &contents)?;
        self.files.insert(role, contents);
        Ok(())
    }

    /// Replaces an implementation artifact.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::NotImplementationRole`] for any role other than
    /// the entry point or logic module, or a size error.
    pub fn revise(&mut self, role: ArtifactRole, contents: String) -> Result<()> {
        if !role.is_implementation() {
            return Err(SkillError::NotImplementationRole(role));
        }
        check_size(role, &contents)?;
        self.files.insert(role, contents);
        Ok(())
    }

    /// Returns the contents for `role`, if present.
    #[must_use]
    pub fn get(&self, role: ArtifactRole) -> Option<&str> {
        self.files.get(&role).map(String::as_str)
    }

    /// Iterates artifacts in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactRole, &str)> {
        self.files.iter().map(|(role, contents)| (*role, contents.as_str()))
    }

    /// Number of artifacts present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no artifacts are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn check_size(role: ArtifactRole, contents: &str) -> Result<()> {
    if contents.len() > MAX_ARTIFACT_BYTES {
        return Err(SkillError::ArtifactTooLarge {
            role,
            size: contents.len(),
            limit: MAX_ARTIFACT_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffold_cannot_be_replaced() {
        let mut set = ArtifactSet::new();
        set.insert(ArtifactRole::TestScript, "#!/usr/bin/env bash\n".into()).unwrap();
        let err = set.insert(ArtifactRole::TestScript, "changed".into()).unwrap_err();
        assert!(matches!(err, SkillError::ScaffoldLocked));
        assert_eq!(set.get(ArtifactRole::TestScript), Some("#!/usr/bin/env bash\n"));
    }

    #[test]
    fn revise_only_touches_implementation() {
        let mut set = ArtifactSet::new();
        set.insert(ArtifactRole::EntryPoint, "v1".into()).unwrap();
        set.revise(ArtifactRole::EntryPoint, "v2".into()).unwrap();
        assert_eq!(set.get(ArtifactRole::EntryPoint), Some("v2"));

        for role in [ArtifactRole::TestScript, ArtifactRole::PrimaryDoc, ArtifactRole::Changelog] {
            let err = set.revise(role, "x".into()).unwrap_err();
            assert!(matches!(err, SkillError::NotImplementationRole(r) if r == role));
        }
    }

    #[test]
    fn rejects_oversized_artifacts() {
        let mut set = ArtifactSet::new();
        let big = "x".repeat(MAX_ARTIFACT_BYTES + 1);
        assert!(set.insert(ArtifactRole::PrimaryDoc, big.clone()).is_err());
        assert!(set.revise(ArtifactRole::LogicModule, big).is_err());
        assert!(set.is_empty());

        let exact = "x".repeat(MAX_ARTIFACT_BYTES);
        assert!(set.insert(ArtifactRole::PrimaryDoc, exact).is_ok());
    }

    #[test]
    fn file_names_map_back_to_roles() {
        for role in ArtifactRole::ALL {
            assert_eq!(ArtifactRole::from_file_name(role.file_name()), Some(role));
        }
        assert_eq!(ArtifactRole::from_file_name("other.txt"), None);
    }
}
