//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

fn run_skillsmith(args: &[&str], cwd: &Path) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_skillsmith");
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env_remove("SKILLSMITH_RECORD")
        .env_remove("SKILLSMITH_LLM_CASSETTE")
        .env_remove("ANTHROPIC_API_KEY")
        .output()
        .expect("failed to run skillsmith binary")
}

fn run_script(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(dir.join("run.sh")).args(args).current_dir(dir).output().unwrap()
}

#[test]
fn plan_chooses_python_for_word_counting() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(&["plan", "count words in a file"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Language:  python"));
    assert!(stdout.contains("Usage: run.sh [-h] <file>"));
}

#[test]
fn plan_json_reports_platform_branches() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(&["plan", "list open ports", "--json"], dir.path());
    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["decision"]["language"], "shell");
    assert_eq!(plan["platform_branches"], true);
}

#[test]
fn scaffold_then_test_reports_the_contract() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(
        &["scaffold", "open-ports", "-d", "list open ports", "--contract"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let skill = dir.path().join("open-ports");
    let run_sh = std::fs::read_to_string(skill.join("run.sh")).unwrap();
    assert!(run_sh.contains("uname -s"));

    // The skeleton satisfies the help contract and nothing more is asserted.
    let output = run_skillsmith(&["test", "open-ports"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("== Help =="));
    assert!(stdout.contains("3/3 passed"));
}

#[test]
fn scaffolded_entry_point_honours_cli_contract() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(
        &["scaffold", "word-count", "-d", "count words in a file"],
        dir.path(),
    );
    assert!(output.status.success());
    let skill = dir.path().join("word-count");

    let help = run_script(&skill, &["--help"]);
    assert_eq!(help.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&help.stderr).contains("Usage:"));

    let missing = run_script(&skill, &[]);
    assert_ne!(missing.status.code(), Some(0));
    assert!(!missing.stderr.is_empty());
}

#[test]
fn test_fails_when_assertions_fail() {
    let dir = tempfile::tempdir().unwrap();
    let assertions = dir.path().join("assertions.yaml");
    std::fs::write(
        &assertions,
        "- group: happy_path\n  kind: contains\n  description: prints a port table\n  command: ./run.sh\n  expected: PORTS\n",
    )
    .unwrap();
    let output = run_skillsmith(
        &[
            "scaffold",
            "open-ports",
            "-d",
            "list open ports",
            "--assertions",
            assertions.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = run_skillsmith(&["test", "open-ports"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("FAIL: prints a port table"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 assertion(s) failed"));

    let output = run_skillsmith(&["docs", "open-ports", "-d", "list open ports"], dir.path());
    assert!(!output.status.success());
    assert!(!dir.path().join("open-ports/SKILL.md").exists());
}

#[test]
fn docs_then_check_on_a_passing_skill() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(
        &["scaffold", "open-ports", "-d", "list open ports", "--contract"],
        dir.path(),
    );
    assert!(output.status.success());

    let output = run_skillsmith(&["check", "open-ports"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("missing SKILL.md"));

    let output = run_skillsmith(&["docs", "open-ports"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = run_skillsmith(&["check", "open-ports"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn build_without_api_key_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let assertions = dir.path().join("assertions.yaml");
    std::fs::write(
        &assertions,
        "- group: happy_path\n  kind: contains\n  description: prints a port table\n  command: ./run.sh\n  expected: PORTS\n",
    )
    .unwrap();
    let output = run_skillsmith(
        &["build", "open-ports", "-d", "list open ports", "--assertions", assertions.to_str().unwrap()],
        dir.path(),
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ANTHROPIC_API_KEY"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(&["nonsense"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_skillsmith(&["--help"], dir.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage:"));
}
