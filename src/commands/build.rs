//! `skillsmith build` command.

use std::path::Path;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::runner::format_report;
use crate::workflow::{BuildOutcome, BuildRequest, Workflow};

/// Execute the `build` command.
///
/// Runs the whole pipeline on a current-thread runtime. A skill that is
/// still failing at the retry ceiling is reported as an error together with
/// its last trace.
///
/// # Errors
///
/// Returns an error string if any pipeline step fails or the build ends
/// blocked.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    description: &str,
    dir: &Path,
    assertions_file: Option<&Path>,
) -> Result<(), String> {
    let request = BuildRequest {
        name: name.to_string(),
        description: description.to_string(),
        output_dir: dir.to_path_buf(),
        assertions: super::load_assertions(ctx, assertions_file)?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let outcome =
        runtime.block_on(Workflow::new(ctx, config).build(&request)).map_err(|e| e.to_string())?;

    match outcome {
        BuildOutcome::Published { result, attempts } => {
            println!("{}", format_report(&result));
            println!("Published {name} in {} after {attempts} attempt(s)", dir.display());
            Ok(())
        }
        BuildOutcome::Blocked { result, attempts } => {
            println!("{}", format_report(&result));
            Err(format!(
                "blocked after {attempts} attempt(s): {} assertion(s) still failing",
                result.failed
            ))
        }
    }
}
