//! `skillsmith check` command.

use std::path::Path;

use crate::check::check_skill_dir;
use crate::context::ServiceContext;

/// Execute the `check` command.
///
/// # Errors
///
/// Returns an error string if the directory cannot be inspected or any
/// finding is reported.
pub fn run(ctx: &ServiceContext, dir: &Path) -> Result<(), String> {
    let findings = check_skill_dir(ctx, dir).map_err(|e| e.to_string())?;
    if findings.is_empty() {
        println!("{}: ok", dir.display());
        return Ok(());
    }
    for finding in &findings {
        println!("{}: {finding}", dir.display());
    }
    Err(format!("{} problem(s) found", findings.len()))
}
