//! `skillsmith scaffold` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::planner::plan_skill;
use crate::scaffold::contract_assertions;
use crate::workflow::scaffold_skill;

/// Execute the `scaffold` command.
///
/// Writes `test.sh` and the implementation skeleton into `dir`. With
/// `contract`, the default help and input-validation assertions are included
/// ahead of any from `assertions_file`.
///
/// # Errors
///
/// Returns an error string if the assertions file is invalid, `dir` already
/// has a scaffold, or a file cannot be written.
pub fn run(
    ctx: &ServiceContext,
    name: &str,
    description: &str,
    dir: &Path,
    assertions_file: Option<&Path>,
    contract: bool,
) -> Result<(), String> {
    let plan = plan_skill(name, description);
    let mut assertions = if contract { contract_assertions(&plan) } else { Vec::new() };
    assertions.extend(super::load_assertions(ctx, assertions_file)?);

    let artifacts = scaffold_skill(ctx, &plan, dir, &assertions).map_err(|e| e.to_string())?;
    println!("Scaffolded {} ({}) in {}", plan.name, plan.decision.language, dir.display());
    for (role, _) in artifacts.iter() {
        println!("  {role}");
    }
    println!("{} assertions", assertions.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn writes_scaffold_and_skeleton_once() {
        let dir = tempfile::tempdir().unwrap();
        let skill = dir.path().join("word-count");
        let ctx = ServiceContext::live(&Config::default());

        run(&ctx, "word-count", "count words in a file", &skill, None, true).unwrap();
        for name in ["test.sh", "run.sh", "main.py"] {
            assert!(skill.join(name).exists(), "{name} missing");
        }

        let err = run(&ctx, "word-count", "count words in a file", &skill, None, true).unwrap_err();
        assert!(err.contains("locked"));
    }
}
