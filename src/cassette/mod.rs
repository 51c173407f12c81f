//! Cassette recording and replay of port interactions.
//!
//! A cassette is a YAML file holding the ordered interactions a run had
//! with its ports. Replaying a cassette makes LLM revisions and scaffold
//! runs deterministic in tests.

pub mod format;
pub mod recorder;
pub mod replayer;

use std::path::Path;

use crate::error::{Result, SkillError};
use format::Cassette;

/// Reads and parses a cassette file.
///
/// # Errors
///
/// Returns [`SkillError::Io`] if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Cassette> {
    let content = std::fs::read_to_string(path).map_err(|e| SkillError::io(path, &e))?;
    serde_yaml::from_str(&content).map_err(|e| SkillError::io(path, &e))
}
