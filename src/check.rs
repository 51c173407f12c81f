//! Layout and quality checks for a finished skill directory.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::context::ServiceContext;
use crate::docs::parse_manifest;
use crate::error::{Result, SkillError};
use crate::skill::{ArtifactRole, MAX_ARTIFACT_BYTES};

/// A problem found in a skill directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// A required file is absent.
    Missing(ArtifactRole),
    /// A file exceeds the size ceiling.
    TooLarge {
        /// File name.
        file: String,
        /// Size in bytes.
        size: u64,
    },
    /// `SKILL.md` has no parseable frontmatter with every manifest field.
    BadManifest,
    /// A script does not start with `#!`.
    NoShebang(ArtifactRole),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(role) => write!(f, "missing {role}"),
            Self::TooLarge { file, size } => {
                write!(f, "{file} is {size} bytes (limit {MAX_ARTIFACT_BYTES})")
            }
            Self::BadManifest => {
                write!(f, "SKILL.md frontmatter must define name, description, version, license")
            }
            Self::NoShebang(role) => write!(f, "{role} has no shebang line"),
        }
    }
}

/// Checks `dir` for the files a published skill must carry.
///
/// The logic module is optional; everything else in [`ArtifactRole::ALL`] is
/// required. Every file in the directory is held to the size ceiling.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a present file
/// cannot be read.
pub fn check_skill_dir(ctx: &ServiceContext, dir: &Path) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for role in ArtifactRole::ALL {
        let path = dir.join(role.file_name());
        if !ctx.fs.exists(&path) {
            if role != ArtifactRole::LogicModule {
                findings.push(Finding::Missing(role));
            }
            continue;
        }

        if role.is_executable() {
            let contents = ctx.fs.read_to_string(&path).map_err(|e| SkillError::io(&path, &e))?;
            if !contents.starts_with("#!") {
                findings.push(Finding::NoShebang(role));
            }
        }
        if role == ArtifactRole::PrimaryDoc {
            let contents = ctx.fs.read_to_string(&path).map_err(|e| SkillError::io(&path, &e))?;
            if parse_manifest(&contents).is_none() {
                findings.push(Finding::BadManifest);
            }
        }
    }

    let mut names = ctx.fs.list_dir(dir).map_err(|e| SkillError::io(dir, &e))?;
    names.sort();
    for name in names {
        let path = dir.join(&name);
        let Ok(size) = ctx.fs.file_size(&path) else {
            continue;
        };
        if size > MAX_ARTIFACT_BYTES as u64 {
            findings.push(Finding::TooLarge { file: name, size });
        }
    }

    debug!(dir = %dir.display(), findings = findings.len(), "skill directory checked");
    Ok(findings)
}
