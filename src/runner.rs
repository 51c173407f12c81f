//! Test runner: executes a skill's scaffold and interprets its trace.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::context::ServiceContext;
use crate::error::{Result, SkillError};
use crate::skill::{ArtifactRole, AssertionGroup, AssertionOutcome, TestRunResult};

/// Runs `test.sh` in `skill_dir` and parses its output.
///
/// The runner never writes to the skill directory; running it twice on an
/// unchanged implementation yields the same counts.
///
/// # Errors
///
/// Returns [`SkillError::Io`] if the scaffold is missing, [`SkillError::Shell`]
/// if it cannot be started, and [`SkillError::MalformedRun`] if its output has
/// no summary line or it failed without reporting a failed assertion.
pub fn run_tests(ctx: &ServiceContext, skill_dir: &Path) -> Result<TestRunResult> {
    let scaffold = skill_dir.join(ArtifactRole::TestScript.file_name());
    if !ctx.fs.exists(&scaffold) {
        return Err(SkillError::io(&scaffold, &"test scaffold not found"));
    }

    let command = format!("bash {}", ArtifactRole::TestScript.file_name());
    let output = ctx
        .shell
        .run(&command, skill_dir)
        .map_err(|e| SkillError::Shell { command: command.clone(), message: e.to_string() })?;
    debug!(exit_code = output.exit_code, "scaffold finished");

    let result = parse_trace(&output.stdout, output.exit_code).map_err(|err| match err {
        SkillError::MalformedRun(msg) if !output.stderr.trim().is_empty() => {
            SkillError::MalformedRun(format!("{msg}; stderr: {}", output.stderr.trim()))
        }
        other => other,
    })?;
    info!(summary = %result.summary(), dir = %skill_dir.display(), "test run complete");
    Ok(result)
}

fn summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)/(\d+) passed$").expect("valid regex"))
}

fn failure_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?) \((.*)\)$").expect("valid regex"))
}

/// Parses scaffold stdout into a [`TestRunResult`].
///
/// # Errors
///
/// Returns [`SkillError::MalformedRun`] when the summary line is missing or
/// inconsistent, or when the scaffold exited nonzero with no failures.
pub fn parse_trace(stdout: &str, exit_code: i32) -> Result<TestRunResult> {
    let mut group = None;
    let mut outcomes = Vec::new();
    let mut summary = None;

    for line in stdout.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(label) = line.strip_prefix("== ").and_then(|l| l.strip_suffix(" ==")) {
            if let Some(parsed) = AssertionGroup::from_label(label) {
                group = Some(parsed);
            }
        } else if let Some(description) = line.strip_prefix("  PASS: ") {
            outcomes.push(AssertionOutcome {
                group,
                description: description.to_string(),
                passed: true,
                detail: String::new(),
            });
        } else if let Some(rest) = line.strip_prefix("  FAIL: ") {
            let (description, detail) = match failure_re().captures(rest) {
                Some(caps) => (caps[1].to_string(), caps[2].to_string()),
                None => (rest.to_string(), String::new()),
            };
            outcomes.push(AssertionOutcome { group, description, passed: false, detail });
        } else if let Some(caps) = summary_re().captures(line) {
            summary = Some((caps[1].parse::<usize>(), caps[2].parse::<usize>()));
        }
    }

    let Some((Ok(passed), Ok(total))) = summary else {
        return Err(SkillError::MalformedRun("no '<passed>/<total> passed' summary line".into()));
    };
    if passed > total {
        return Err(SkillError::MalformedRun(format!("summary reports {passed}/{total}")));
    }
    let failed = total - passed;
    if exit_code != 0 && failed == 0 {
        return Err(SkillError::MalformedRun(format!(
            "scaffold exited {exit_code} with all {total} assertions passing"
        )));
    }

    Ok(TestRunResult { passed, failed, total, exit_code, outcomes })
}

/// Formats a result as the per-group trace the scaffold prints.
#[must_use]
pub fn format_report(result: &TestRunResult) -> String {
    let mut lines = Vec::new();
    let mut current = None;
    for outcome in &result.outcomes {
        if outcome.group != current {
            current = outcome.group;
            if let Some(group) = current {
                lines.push(format!("== {group} =="));
            }
        }
        if outcome.passed {
            lines.push(format!("  PASS: {}", outcome.description));
        } else if outcome.detail.is_empty() {
            lines.push(format!("  FAIL: {}", outcome.description));
        } else {
            lines.push(format!("  FAIL: {} ({})", outcome.description, outcome.detail));
        }
    }
    lines.push(String::new());
    lines.push(result.summary());
    lines.join("\n")
}
