//! Implementation emission and revision.
//!
//! Every emitted entry point honours the same command-line contract: the
//! help flag prints usage to stderr and exits 0, inputs are validated before
//! any work, and invalid input prints an `Error:` line to stderr and exits 1.
//! Task logic starts as a placeholder that the revision loop replaces.

use std::fmt::Write as _;

use crate::error::Result;
use crate::revise::Revision;
use crate::skill::{ArtifactRole, ArtifactSet, InputKind, InputSpec, Language, SkillPlan};

/// Renders the implementation artifacts for `plan`.
///
/// Returns the entry point and, on the Python path, the logic module.
#[must_use]
pub fn emit_implementation(plan: &SkillPlan) -> Vec<(ArtifactRole, String)> {
    match plan.decision.language {
        Language::Shell => vec![(ArtifactRole::EntryPoint, shell_entry_point(plan))],
        Language::Python => vec![
            (ArtifactRole::EntryPoint, python_dispatcher(plan)),
            (ArtifactRole::LogicModule, python_logic(plan)),
        ],
    }
}

/// Applies a revision to the implementation artifacts in `set`.
///
/// # Errors
///
/// Returns an error if the revision targets the scaffold or documentation,
/// or a revised file exceeds the size ceiling. Nothing is applied on error.
pub fn apply_revision(set: &mut ArtifactSet, revision: &Revision) -> Result<Vec<ArtifactRole>> {
    let mut staged = set.clone();
    let mut touched = Vec::new();
    for (role, contents) in &revision.files {
        staged.revise(*role, contents.clone())?;
        touched.push(*role);
    }
    *set = staged;
    Ok(touched)
}

fn usage_block(plan: &SkillPlan) -> String {
    let mut usage = plan.usage_line();
    let _ = write!(usage, "\n\n{}\n\nOptions:\n  -h, --help    Show this help and exit\n", one_line(&plan.description));
    for input in &plan.inputs {
        let _ = writeln!(usage, "  {:<12}  {}", input.placeholder(), describe_input(input));
    }
    usage
}

fn describe_input(input: &InputSpec) -> &'static str {
    match input.kind {
        InputKind::File => "Path to an existing file",
        InputKind::Directory => "Path to an existing directory",
        InputKind::Url => "An http:// or https:// URL",
        InputKind::Text => "Text to process",
    }
}

fn shell_header(plan: &SkillPlan) -> String {
    let mut script = String::from("#!/usr/bin/env bash\n");
    let _ = writeln!(script, "# {}: {}", plan.name, one_line(&plan.description));
    script.push_str("set -euo pipefail\n\n");
    script.push_str("usage() {\n    cat >&2 <<'USAGE'\n");
    script.push_str(&usage_block(plan));
    script.push_str("USAGE\n}\n\n");
    script
}

fn shell_entry_point(plan: &SkillPlan) -> String {
    let mut script = shell_header(plan);
    script.push_str(
        "die() {\n    echo \"Error: $*\" >&2\n    exit 1\n}\n\n\
         case \"${1:-}\" in\n    -h|--help)\n        usage\n        exit 0\n        ;;\n    \
         -*)\n        usage\n        die \"unknown option: $1\"\n        ;;\nesac\n\n",
    );

    for (index, input) in plan.inputs.iter().enumerate() {
        let var = input.name.to_ascii_uppercase();
        let position = index + 1;
        let _ = writeln!(
            script,
            "[[ $# -ge {position} ]] || {{ usage; die \"missing required argument {}\"; }}",
            input.placeholder()
        );
        let _ = writeln!(script, "{var}=\"${position}\"");
        let _ = writeln!(script, "{}", shell_validation(input, &var));
    }
    if !plan.inputs.is_empty() {
        script.push('\n');
    }

    if plan.platform_branches {
        script.push_str(
            "run_linux() {\n    die \"not implemented on Linux\"\n}\n\n\
             run_macos() {\n    die \"not implemented on macOS\"\n}\n\n\
             case \"$(uname -s)\" in\n    Linux)\n        run_linux \"$@\"\n        ;;\n    \
             Darwin)\n        run_macos \"$@\"\n        ;;\n    \
             *)\n        die \"unsupported platform: $(uname -s)\"\n        ;;\nesac\n",
        );
    } else {
        script.push_str("main() {\n    die \"not implemented\"\n}\n\nmain \"$@\"\n");
    }
    script
}

fn shell_validation(input: &InputSpec, var: &str) -> String {
    match input.kind {
        InputKind::File => format!("[[ -f \"${var}\" ]] || die \"file not found: ${var}\""),
        InputKind::Directory => {
            format!("[[ -d \"${var}\" ]] || die \"directory not found: ${var}\"")
        }
        InputKind::Url => format!("[[ \"${var}\" =~ ^https?:// ]] || die \"not a URL: ${var}\""),
        InputKind::Text => format!("[[ -n \"${var}\" ]] || die \"text must not be empty\""),
    }
}

fn python_dispatcher(plan: &SkillPlan) -> String {
    let mut script = shell_header(plan);
    script.push_str(
        "SCRIPT_DIR=\"$(cd \"$(dirname \"${BASH_SOURCE[0]}\")\" && pwd)\"\n\n\
         case \"${1:-}\" in\n    -h|--help)\n        usage\n        exit 0\n        ;;\nesac\n\n\
         if ! command -v python3 >/dev/null 2>&1; then\n    \
         echo \"Error: python3 is required\" >&2\n    exit 1\nfi\n\n\
         exec python3 \"$SCRIPT_DIR/main.py\" \"$@\"\n",
    );
    script
}

fn python_logic(plan: &SkillPlan) -> String {
    let mut module = String::from("#!/usr/bin/env python3\n");
    let _ = writeln!(module, "\"\"\"{}: {}\"\"\"\n", plan.name, one_line(&plan.description).replace('"', "'"));
    module.push_str("import os\nimport sys\n\n");
    let _ = writeln!(module, "USAGE = {:?}\n\n", plan.usage_line());
    module.push_str(
        "def fail(message):\n    print(\"Error: \" + message, file=sys.stderr)\n    return 1\n\n\n",
    );

    let params: Vec<&str> = plan.inputs.iter().map(|i| i.name.as_str()).collect();
    let _ = writeln!(module, "def run({}):", params.join(", "));
    module.push_str("    return fail(\"not implemented\")\n\n\n");

    module.push_str("def main(argv):\n");
    module.push_str("    if argv and argv[0].startswith(\"-\"):\n");
    module.push_str("        print(USAGE, file=sys.stderr)\n");
    module.push_str("        return fail(\"unknown option: \" + argv[0])\n");
    if let Some(first) = plan.inputs.first() {
        let _ = writeln!(module, "    if len(argv) < {}:", plan.inputs.len());
        module.push_str("        print(USAGE, file=sys.stderr)\n");
        let _ = writeln!(
            module,
            "        return fail(\"missing required argument {}\")",
            first.placeholder()
        );
    }
    for (index, input) in plan.inputs.iter().enumerate() {
        let _ = writeln!(module, "    {} = argv[{index}]", input.name);
        module.push_str(&python_validation(input));
    }
    let _ = writeln!(module, "    return run({})\n\n", params.join(", "));
    module.push_str("if __name__ == \"__main__\":\n    sys.exit(main(sys.argv[1:]))\n");
    module
}

fn python_validation(input: &InputSpec) -> String {
    let name = &input.name;
    let (condition, message) = match input.kind {
        InputKind::File => (format!("not os.path.isfile({name})"), "file not found: "),
        InputKind::Directory => (format!("not os.path.isdir({name})"), "directory not found: "),
        InputKind::Url => (
            format!("not {name}.startswith((\"http://\", \"https://\"))"),
            "not a URL: ",
        ),
        InputKind::Text => (format!("not {name}.strip()"), "text must not be empty: "),
    };
    format!("    if {condition}:\n        return fail(\"{message}\" + {name})\n")
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::Config;
    use crate::context::ServiceContext;
    use crate::error::SkillError;
    use crate::planner::plan_skill;

    fn entry(plan: &SkillPlan) -> String {
        emit_implementation(plan).remove(0).1
    }

    #[test]
    fn python_path_emits_dispatcher_and_logic() {
        let plan = plan_skill("word-count", "count words in a file");
        let artifacts = emit_implementation(&plan);
        let roles: Vec<ArtifactRole> = artifacts.iter().map(|(r, _)| *r).collect();
        assert_eq!(roles, vec![ArtifactRole::EntryPoint, ArtifactRole::LogicModule]);

        let dispatcher = &artifacts[0].1;
        assert!(dispatcher.contains("exec python3 \"$SCRIPT_DIR/main.py\" \"$@\""));
        assert!(dispatcher.contains("Usage: run.sh [-h] <file>"));

        let logic = &artifacts[1].1;
        assert!(logic.contains("def run(file):"));
        assert!(logic.contains("os.path.isfile(file)"));
        assert!(logic.contains("USAGE = \"Usage: run.sh [-h] <file>\""));
    }

    #[test]
    fn shell_path_branches_on_platform() {
        let plan = plan_skill("open-ports", "list open ports");
        let artifacts = emit_implementation(&plan);
        assert_eq!(artifacts.len(), 1);
        let script = &artifacts[0].1;
        assert!(script.contains("case \"$(uname -s)\" in"));
        assert!(script.contains("run_linux()"));
        assert!(script.contains("run_macos()"));
        assert!(script.contains("unsupported platform"));
    }

    #[test]
    fn shell_path_without_platform_work_has_single_main() {
        let plan = plan_skill("backup", "backup a folder to a zip archive");
        let script = entry(&plan);
        assert!(!script.contains("uname"));
        assert!(script.contains("[[ -d \"$DIRECTORY\" ]] || die"));
        assert!(script.contains("main \"$@\""));
    }

    #[test]
    fn revision_cannot_touch_scaffold() {
        let plan = plan_skill("word-count", "count words in a file");
        let mut set = ArtifactSet::new();
        set.insert(ArtifactRole::TestScript, "scaffold".into()).unwrap();
        for (role, contents) in emit_implementation(&plan) {
            set.insert(role, contents).unwrap();
        }
        let before = set.clone();

        let bad = Revision {
            files: vec![
                (ArtifactRole::LogicModule, "print(3)".into()),
                (ArtifactRole::TestScript, "exit 0".into()),
            ],
        };
        let err = apply_revision(&mut set, &bad).unwrap_err();
        assert!(matches!(err, SkillError::NotImplementationRole(ArtifactRole::TestScript)));
        assert_eq!(set, before, "failed revision must not partially apply");

        let good = Revision { files: vec![(ArtifactRole::LogicModule, "print(3)".into())] };
        assert_eq!(apply_revision(&mut set, &good).unwrap(), vec![ArtifactRole::LogicModule]);
        assert_eq!(set.get(ArtifactRole::LogicModule), Some("print(3)"));
        assert_eq!(set.get(ArtifactRole::TestScript), Some("scaffold"));
    }

    fn install(dir: &Path, plan: &SkillPlan) -> ServiceContext {
        let ctx = ServiceContext::live(&Config::default());
        for (role, contents) in emit_implementation(plan) {
            let path = dir.join(role.file_name());
            ctx.fs.write(&path, &contents).unwrap();
            ctx.fs.set_executable(&path).unwrap();
        }
        ctx
    }

    #[test]
    fn shell_entry_point_honours_cli_contract() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_skill("open-ports", "list open ports");
        let ctx = install(dir.path(), &plan);

        let help = ctx.shell.run("./run.sh --help", dir.path()).unwrap();
        assert_eq!(help.exit_code, 0);
        assert!(help.stderr.contains("Usage:"));
        assert!(help.stdout.is_empty());

        let bogus = ctx.shell.run("./run.sh --bogus", dir.path()).unwrap();
        assert_eq!(bogus.exit_code, 1);
        assert!(bogus.stderr.contains("Error: unknown option: --bogus"));
    }

    #[test]
    fn shell_entry_point_validates_inputs_before_work() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_skill("backup", "backup a folder to a zip archive");
        let ctx = install(dir.path(), &plan);

        let missing = ctx.shell.run("./run.sh", dir.path()).unwrap();
        assert_eq!(missing.exit_code, 1);
        assert!(missing.stderr.contains("Error: missing required argument <directory>"));

        let absent = ctx.shell.run("./run.sh ./nope", dir.path()).unwrap();
        assert_eq!(absent.exit_code, 1);
        assert!(absent.stderr.contains("directory not found"));

        let placeholder = ctx.shell.run("./run.sh .", dir.path()).unwrap();
        assert!(placeholder.stderr.contains("Error: not implemented"));
    }
}
