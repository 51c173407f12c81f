//! `skillsmith docs` command.

use std::path::Path;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::runner::{format_report, run_tests};
use crate::workflow::{publish_docs, recover_plan};

/// Execute the `docs` command.
///
/// Runs the scaffold first and writes `SKILL.md`, `README.md`, and
/// `CHANGELOG.md` only if every assertion passes. The plan is the one the
/// scaffold was generated from; `description` only changes the prose.
///
/// # Errors
///
/// Returns an error string if the tests cannot be run or do not all pass,
/// or a document cannot be written.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    dir: &Path,
    description: Option<&str>,
) -> Result<(), String> {
    let result = run_tests(ctx, dir).map_err(|e| e.to_string())?;
    println!("{}", format_report(&result));

    let plan = recover_plan(ctx, dir, &skill_name(dir), description).map_err(|e| e.to_string())?;
    publish_docs(ctx, config, &plan, dir, &[], &result).map_err(|e| e.to_string())?;
    println!("Documented {} in {}", plan.name, dir.display());
    Ok(())
}

fn skill_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| dir.file_name())
        .map_or_else(|| "skill".to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_is_named_after_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let skill = dir.path().join("word-count");
        std::fs::create_dir(&skill).unwrap();
        assert_eq!(skill_name(&skill), "word-count");
    }

    #[test]
    fn refuses_to_document_failing_skill() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("test.sh"),
            "echo '== Help =='\necho '  FAIL: help shows usage'\necho '0/1 passed'\nexit 1\n",
        )
        .unwrap();
        let ctx = ServiceContext::live(&Config::default());

        let err = run(&ctx, &Config::default(), dir.path(), Some("list open ports")).unwrap_err();
        assert!(err.contains("refusing to document untested behavior"));
        assert!(!dir.path().join("SKILL.md").exists());
    }

    #[test]
    fn documents_the_scaffolded_language() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ServiceContext::live(&Config::default());
        let plan = crate::planner::plan_skill("open-ports", "list open ports");
        let help = crate::scaffold::contract_assertions(&plan);
        crate::workflow::scaffold_skill(&ctx, &plan, dir.path(), &help).unwrap();

        run(&ctx, &Config::default(), dir.path(), Some("count words in a file")).unwrap();
        let changelog = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(changelog.contains("Initial release: count words in a file"));
        assert!(changelog.contains("Implementation: shell"));
        let skill_md = std::fs::read_to_string(dir.path().join("SKILL.md")).unwrap();
        assert!(skill_md.contains("name: open-ports"));
        assert!(skill_md.contains("uname -s"));
    }
}
