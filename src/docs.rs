//! Documentation emission.
//!
//! Documentation is only ever written for an implementation whose scaffold
//! ran clean, so the docs never describe untested behavior.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};
use crate::skill::{
    ArtifactRole, ArtifactSet, Assertion, AssertionGroup, InputSpec, Language, SkillPlan,
    TestRunResult,
};

/// Metadata header at the top of `SKILL.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillManifest {
    /// Skill name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Semantic version.
    pub version: String,
    /// License identifier.
    pub license: String,
}

/// Inputs to the doc emitter beyond the plan itself.
#[derive(Debug, Clone)]
pub struct DocContext<'a> {
    /// Version to stamp.
    pub version: &'a str,
    /// License to stamp.
    pub license: &'a str,
    /// Release date for the changelog entry.
    pub date: DateTime<Utc>,
    /// Assertions the scaffold was generated with (used for examples).
    pub assertions: &'a [Assertion],
}

/// Renders `SKILL.md`, `README.md`, and `CHANGELOG.md`.
///
/// # Errors
///
/// Returns [`SkillError::UntestedDocs`] unless `result` ran at least one
/// assertion and none failed.
pub fn emit_docs(
    plan: &SkillPlan,
    result: &TestRunResult,
    doc: &DocContext<'_>,
) -> Result<Vec<(ArtifactRole, String)>> {
    if !result.all_passed() || result.total == 0 {
        return Err(SkillError::UntestedDocs { passed: result.passed, total: result.total });
    }

    let mut docs = ArtifactSet::new();
    docs.insert(ArtifactRole::PrimaryDoc, primary_doc(plan, result, doc)?)?;
    docs.insert(ArtifactRole::PointerDoc, pointer_doc(plan))?;
    docs.insert(ArtifactRole::Changelog, changelog(plan, doc))?;
    Ok(docs.iter().map(|(role, contents)| (role, contents.to_string())).collect())
}

/// Splits `SKILL.md` into its manifest and body.
///
/// Returns `None` if the document has no `---` delimited frontmatter or the
/// frontmatter is not a valid manifest.
#[must_use]
pub fn parse_manifest(document: &str) -> Option<SkillManifest> {
    let rest = document.strip_prefix("---\n")?;
    let end = rest.find("\n---")?;
    serde_yaml::from_str(&rest[..end]).ok()
}

fn primary_doc(plan: &SkillPlan, result: &TestRunResult, doc: &DocContext<'_>) -> Result<String> {
    let manifest = SkillManifest {
        name: plan.name.clone(),
        description: plan.description.split_whitespace().collect::<Vec<_>>().join(" "),
        version: doc.version.to_string(),
        license: doc.license.to_string(),
    };
    let frontmatter = serde_yaml::to_string(&manifest)
        .map_err(|e| SkillError::Serialization(e.to_string()))?;

    let args: String = plan.inputs.iter().map(|i| format!(" {}", i.placeholder())).collect();
    let mut md = format!("---\n{frontmatter}---\n\n# {}\n\n", plan.name);

    md.push_str("## Purpose\n\n");
    let _ = writeln!(md, "{}\n", manifest.description);
    let implementation = match plan.decision.language {
        Language::Shell => "a bash script (`run.sh`)".to_string(),
        Language::Python => "a bash entry point (`run.sh`) that dispatches to `main.py`".to_string(),
    };
    let _ = writeln!(md, "Implemented as {implementation}.");
    if plan.platform_branches {
        md.push_str("Linux and macOS use separate code paths selected by `uname -s`.\n");
    }

    md.push_str("\n## Quick start\n\n```bash\n");
    let _ = writeln!(md, "./run.sh{args}");
    md.push_str("./run.sh --help\n```\n\n");

    md.push_str("## Usage examples\n\n");
    let examples: Vec<&Assertion> =
        doc.assertions.iter().filter(|a| a.group == AssertionGroup::HappyPath).collect();
    if examples.is_empty() {
        let _ = writeln!(md, "```bash\n./run.sh{args}\n```\n");
    } else {
        for example in examples {
            let _ = writeln!(md, "{}:\n\n```bash\n{}\n```\n", example.description, example.command);
        }
    }

    md.push_str("## Options\n\n| Option | Description |\n|--------|-------------|\n");
    md.push_str("| `-h`, `--help` | Print usage to stderr and exit 0 |\n");
    for input in &plan.inputs {
        let _ = writeln!(md, "| `{}` | {} |", input.placeholder(), input_description(input));
    }

    md.push_str("\n## Exit codes\n\n| Code | Meaning |\n|------|---------|\n");
    md.push_str("| 0 | Success, or help was printed |\n");
    md.push_str("| 1 | Invalid input or failure; an `Error:` line is printed to stderr |\n");

    md.push_str("\n## Validation\n\n");
    let _ = writeln!(
        md,
        "`./test.sh` runs the contract for this skill: {}.",
        result.summary()
    );
    Ok(md)
}

fn input_description(input: &InputSpec) -> String {
    format!("Required {} argument", input.kind)
}

fn pointer_doc(plan: &SkillPlan) -> String {
    format!(
        "# {}\n\n{}\n\nSee [SKILL.md](SKILL.md) for usage, options, and exit codes.\n\
         Run `./test.sh` to verify the implementation.\n",
        plan.name,
        plan.description.split_whitespace().collect::<Vec<_>>().join(" ")
    )
}

fn changelog(plan: &SkillPlan, doc: &DocContext<'_>) -> String {
    format!(
        "# Changelog\n\n## {} - {}\n\n- Initial release: {}\n- Implementation: {} ({})\n",
        doc.version,
        doc.date.format("%Y-%m-%d"),
        plan.description.split_whitespace().collect::<Vec<_>>().join(" "),
        plan.decision.language,
        plan.decision.rationale
    )
}
