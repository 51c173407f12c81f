//! Test scaffold emission.
//!
//! The scaffold is a self-contained bash script: two assertion helpers,
//! four labelled groups, and a `<passed>/<total> passed` summary. It runs
//! every assertion from the skill directory with a scoped `$WORKDIR` that is
//! removed on every exit path.

use std::fmt::Write as _;

use crate::error::{Result, SkillError};
use crate::skill::{Assertion, AssertionGroup, AssertionKind, SkillPlan};

/// Header comment carrying the plan the scaffold was generated from.
const PLAN_MARKER: &str = "# skillsmith-plan: ";

const PRELUDE: &str = r#"set -u

SCRIPT_DIR="$(cd "$(dirname "${BASH_SOURCE[0]}")" && pwd)"
cd "$SCRIPT_DIR" || exit 1

WORKDIR="$(mktemp -d)"
export WORKDIR
trap 'rm -rf "$WORKDIR"' EXIT
trap 'exit 130' INT TERM

PASSED=0
FAILED=0
TOTAL=0

assert_contains() {
    local description="$1" expected="$2" command="$3"
    local output
    TOTAL=$((TOTAL + 1))
    output="$(set +u; eval "$command" 2>&1)"
    if [[ "$output" == *"$expected"* ]]; then
        PASSED=$((PASSED + 1))
        echo "  PASS: $description"
    else
        FAILED=$((FAILED + 1))
        output="${output//$'\r'/}"
        output="${output//$'\n'/\\n}"
        echo "  FAIL: $description (expected output to contain '$expected', got '${output:0:200}')"
    fi
}

assert_exit_code() {
    local description="$1" expected="$2" command="$3"
    local actual
    TOTAL=$((TOTAL + 1))
    (set +u; eval "$command") >/dev/null 2>&1
    actual=$?
    if [[ "$actual" -eq "$expected" ]]; then
        PASSED=$((PASSED + 1))
        echo "  PASS: $description"
    else
        FAILED=$((FAILED + 1))
        echo "  FAIL: $description (expected exit $expected, got $actual)"
    fi
}
"#;

const SUMMARY: &str = r#"
echo ""
echo "$PASSED/$TOTAL passed"
if [[ "$FAILED" -ne 0 ]]; then
    exit 1
fi
exit 0
"#;

/// Renders the test scaffold for `plan` with the given assertions.
///
/// Assertions are placed under their group in the fixed group order; each
/// group also carries commented-out examples for the author to copy.
///
/// # Errors
///
/// Returns an error if any assertion fails validation.
pub fn emit_scaffold(plan: &SkillPlan, assertions: &[Assertion]) -> Result<String> {
    for assertion in assertions {
        assertion.validate()?;
    }

    let mut script = String::from("#!/usr/bin/env bash\n");
    let _ = writeln!(script, "# Test scaffold for {}: {}", plan.name, one_line(&plan.description));
    script.push_str("# Tests are the contract: change the implementation, not this file.\n");
    let embedded = serde_json::to_string(plan).map_err(|e| SkillError::Serialization(e.to_string()))?;
    let _ = writeln!(script, "{PLAN_MARKER}{embedded}");
    script.push_str(PRELUDE);

    for group in AssertionGroup::ALL {
        let _ = write!(script, "\necho \"== {} ==\"\n", group.label());
        script.push_str(example_for(group));
        for assertion in assertions.iter().filter(|a| a.group == group) {
            render_assertion(&mut script, assertion);
        }
    }

    script.push_str(SUMMARY);
    Ok(script)
}

/// Reads back the plan recorded in a scaffold's header.
///
/// Returns `None` for scaffolds without a plan line or with one that does
/// not parse.
#[must_use]
pub fn embedded_plan(script: &str) -> Option<SkillPlan> {
    script
        .lines()
        .take_while(|line| line.starts_with('#'))
        .find_map(|line| line.strip_prefix(PLAN_MARKER))
        .and_then(|json| serde_json::from_str(json).ok())
}

/// The default contract every generated entry point must satisfy.
///
/// - `--help` prints `Usage:` and exits 0.
/// - Missing required inputs exit nonzero.
/// - Path inputs that do not exist exit nonzero with an `Error` message.
#[must_use]
pub fn contract_assertions(plan: &SkillPlan) -> Vec<Assertion> {
    let mut assertions = vec![
        Assertion::contains(AssertionGroup::Help, "help shows usage", "./run.sh --help", "Usage:"),
        Assertion::exit_code(AssertionGroup::Help, "help exits 0", "./run.sh --help", 0),
        Assertion::contains(AssertionGroup::Help, "short help flag works", "./run.sh -h", "Usage:"),
    ];

    if let Some(first) = plan.inputs.first() {
        assertions.push(Assertion::exit_code(
            AssertionGroup::ErrorHandling,
            format!("missing {} fails", first.placeholder()),
            "./run.sh",
            1,
        ));
        assertions.push(Assertion::contains(
            AssertionGroup::ErrorHandling,
            format!("missing {} reports an error", first.placeholder()),
            "./run.sh",
            "Error",
        ));
    }

    for input in plan.inputs.iter().filter(|i| i.kind.is_path()) {
        let missing = format!("./run.sh \"$WORKDIR/does-not-exist-{}\"", input.name);
        assertions.push(Assertion::exit_code(
            AssertionGroup::ErrorHandling,
            format!("nonexistent {} fails", input.name),
            missing.clone(),
            1,
        ));
        assertions.push(Assertion::contains(
            AssertionGroup::ErrorHandling,
            format!("nonexistent {} reports an error", input.name),
            missing,
            "Error",
        ));
    }

    assertions
}

fn example_for(group: AssertionGroup) -> &'static str {
    match group {
        AssertionGroup::HappyPath => {
            "# assert_contains \"prints the result\" \"expected output\" './run.sh \"$WORKDIR/input.txt\"'\n"
        }
        AssertionGroup::EdgeCase => {
            "# printf '' > \"$WORKDIR/empty.txt\"\n# assert_contains \"handles empty input\" \"0\" './run.sh \"$WORKDIR/empty.txt\"'\n"
        }
        AssertionGroup::ErrorHandling => {
            "# assert_exit_code \"rejects unknown flags\" 1 './run.sh --bogus'\n"
        }
        AssertionGroup::Help => "# assert_contains \"help shows usage\" \"Usage:\" './run.sh --help'\n",
    }
}

fn render_assertion(script: &mut String, assertion: &Assertion) {
    if let Some(fixture) = &assertion.fixture {
        let _ = writeln!(
            script,
            "printf '%s' {} > \"$WORKDIR/{}\"",
            shell_quote(&fixture.content),
            fixture.name
        );
    }
    let helper = match assertion.kind {
        AssertionKind::Contains => "assert_contains",
        AssertionKind::ExitCode => "assert_exit_code",
    };
    let expected = match assertion.kind {
        AssertionKind::Contains => shell_quote(&assertion.expected),
        AssertionKind::ExitCode => assertion.expected.trim().to_string(),
    };
    let _ = writeln!(
        script,
        "{helper} {} {expected} {}",
        shell_quote(&one_line(&assertion.description)),
        shell_quote(&assertion.command)
    );
}

/// Wraps `value` in single quotes, escaping embedded single quotes.
pub(crate) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
