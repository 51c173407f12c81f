//! Command dispatch and handlers.

pub mod build;
pub mod check;
pub mod docs;
pub mod plan;
pub mod scaffold;

use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::skill::Assertion;

/// Dispatch a parsed command to its handler.
///
/// Configuration is read from the environment (and `.env`). When
/// `SKILLSMITH_RECORD` is set, shell and LLM interactions are recorded to
/// that cassette file; the file is written when the context is dropped,
/// even if the command fails.
///
/// # Errors
///
/// Returns an error string if configuration cannot be loaded or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    let ctx = ServiceContext::from_config(&config).map_err(|e| e.to_string())?;
    dispatch_with_context(command, &ctx, &config)
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Plan { description, json } => plan::run(description, *json),
        Command::Scaffold { name, description, output, assertions, contract } => {
            let dir = skill_dir(name, output.as_deref());
            scaffold::run(ctx, name, description, &dir, assertions.as_deref(), *contract)
        }
        Command::Test { dir } => test::run(ctx, dir),
        Command::Docs { dir, description } => docs::run(ctx, config, dir, description.as_deref()),
        Command::Build { name, description, output, assertions, max_attempts } => {
            let config = match max_attempts {
                Some(n) => config.clone().with_max_attempts(*n),
                None => config.clone(),
            };
            let dir = skill_dir(name, output.as_deref());
            build::run(ctx, &config, name, description, &dir, assertions.as_deref())
        }
        Command::Check { dir } => check::run(ctx, dir),
    }
}

fn skill_dir(name: &str, output: Option<&Path>) -> PathBuf {
    output.map_or_else(|| PathBuf::from(name), Path::to_path_buf)
}

/// Reads extra assertions from a YAML file, if one was given.
fn load_assertions(ctx: &ServiceContext, path: Option<&Path>) -> Result<Vec<Assertion>, String> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let yaml = ctx
        .fs
        .read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Assertion::parse_list(&yaml).map_err(|e| format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_dir_defaults_to_name() {
        assert_eq!(skill_dir("word-count", None), PathBuf::from("word-count"));
        assert_eq!(skill_dir("x", Some(Path::new("/tmp/out"))), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn missing_assertion_file_is_reported() {
        let ctx = ServiceContext::live(&Config::default());
        let err = load_assertions(&ctx, Some(Path::new("/nonexistent/assertions.yaml")))
            .unwrap_err();
        assert!(err.contains("/nonexistent/assertions.yaml"));
        assert!(load_assertions(&ctx, None).unwrap().is_empty());
    }
}
