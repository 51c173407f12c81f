//! Runtime configuration loaded from the environment.
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file in the working directory.

use std::path::PathBuf;

use tracing::warn;

use crate::adapters::live::llm::DEFAULT_ENDPOINT;
use crate::error::{Result, SkillError};

/// Hard upper bound on test/revise attempts per build.
pub const RETRY_CEILING: u32 = 3;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model used for implementation revisions.
    pub model: String,
    /// Maximum tokens requested per revision.
    pub max_tokens: u32,
    /// Attempts per build, clamped to `1..=RETRY_CEILING`.
    pub max_attempts: u32,
    /// Version stamped into generated documentation.
    pub skill_version: String,
    /// License stamped into generated documentation.
    pub license: String,
    /// API key for the live LLM client.
    pub api_key: Option<String>,
    /// Messages endpoint for the live LLM client.
    pub llm_endpoint: String,
    /// When set, port interactions are recorded to this cassette.
    pub record_path: Option<PathBuf>,
    /// When set, LLM completions are replayed from this cassette.
    pub llm_cassette: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            max_attempts: RETRY_CEILING,
            skill_version: "1.0.0".to_string(),
            license: "MIT".to_string(),
            api_key: None,
            llm_endpoint: DEFAULT_ENDPOINT.to_string(),
            record_path: None,
            llm_cassette: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::Config`] if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::Config`] if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_attempts = match get("SKILLSMITH_MAX_ATTEMPTS") {
            Some(raw) => clamp_attempts(parse_number(&raw, "SKILLSMITH_MAX_ATTEMPTS")?),
            None => defaults.max_attempts,
        };
        let max_tokens = match get("SKILLSMITH_MAX_TOKENS") {
            Some(raw) => parse_number(&raw, "SKILLSMITH_MAX_TOKENS")?,
            None => defaults.max_tokens,
        };

        Ok(Self {
            model: get("SKILLSMITH_MODEL").unwrap_or(defaults.model),
            max_tokens,
            max_attempts,
            skill_version: get("SKILLSMITH_VERSION").unwrap_or(defaults.skill_version),
            license: get("SKILLSMITH_LICENSE").unwrap_or(defaults.license),
            api_key: get("ANTHROPIC_API_KEY"),
            llm_endpoint: get("SKILLSMITH_LLM_URL").unwrap_or(defaults.llm_endpoint),
            record_path: get("SKILLSMITH_RECORD").map(PathBuf::from),
            llm_cassette: get("SKILLSMITH_LLM_CASSETTE").map(PathBuf::from),
        })
    }

    /// Returns a copy with `max_attempts` overridden (and clamped).
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = clamp_attempts(attempts);
        self
    }
}

fn parse_number(raw: &str, key: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|e| SkillError::Config(format!("{key}={raw:?} is not a positive integer: {e}")))
}

/// Clamps an attempt count to `1..=RETRY_CEILING`.
#[must_use]
pub fn clamp_attempts(attempts: u32) -> u32 {
    let clamped = attempts.clamp(1, RETRY_CEILING);
    if clamped != attempts {
        warn!(requested = attempts, using = clamped, "attempt count clamped to retry ceiling");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_attempts, RETRY_CEILING);
        assert_eq!(config.license, "MIT");
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SKILLSMITH_MODEL", "other-model"),
            ("SKILLSMITH_MAX_ATTEMPTS", "2"),
            ("SKILLSMITH_LICENSE", "Apache-2.0"),
            ("SKILLSMITH_LLM_CASSETTE", "/tmp/llm.yaml"),
            ("ANTHROPIC_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.model, "other-model");
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.license, "Apache-2.0");
        assert_eq!(config.llm_cassette, Some(PathBuf::from("/tmp/llm.yaml")));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn attempts_never_exceed_ceiling() {
        let config = config_from(&[("SKILLSMITH_MAX_ATTEMPTS", "10")]).unwrap();
        assert_eq!(config.max_attempts, RETRY_CEILING);
        assert_eq!(Config::default().with_max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn rejects_non_numeric_attempts() {
        let err = config_from(&[("SKILLSMITH_MAX_ATTEMPTS", "many")]).unwrap_err();
        assert!(err.to_string().contains("SKILLSMITH_MAX_ATTEMPTS"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("SKILLSMITH_MODEL", "  ")]).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
