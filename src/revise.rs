//! Implementation revisions requested from the language model.
//!
//! The model sees the plan, the current implementation, the scaffold, and
//! the failing assertions, and answers with whole replacement files in
//! fenced blocks tagged with their file name:
//!
//! ````text
//! ```file:main.py
//! ...
//! ```
//! ````

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Result, SkillError};
use crate::ports::llm::CompletionRequest;
use crate::skill::{ArtifactRole, ArtifactSet, SkillPlan, TestRunResult};

/// Replacement contents for one or more implementation files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Revision {
    /// Files to replace, in the order the model returned them.
    pub files: Vec<(ArtifactRole, String)>,
}

/// Asks the LLM for a revision that makes the failing assertions pass.
///
/// # Errors
///
/// Returns [`SkillError::Llm`] if the request fails and
/// [`SkillError::Revision`] if the response has no usable file blocks or
/// tries to rewrite a non-implementation file.
pub async fn request_revision(
    ctx: &ServiceContext,
    config: &Config,
    plan: &SkillPlan,
    artifacts: &ArtifactSet,
    result: &TestRunResult,
) -> Result<Revision> {
    let request = CompletionRequest {
        model: config.model.clone(),
        prompt: build_prompt(plan, artifacts, result),
        max_tokens: config.max_tokens,
    };
    info!(failures = result.failed, model = %request.model, "requesting implementation revision");

    let response = ctx.llm.complete(&request).await.map_err(|e| SkillError::Llm(e.to_string()))?;
    debug!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "revision received"
    );
    parse_revision(&response.text)
}

/// Builds the revision prompt.
#[must_use]
pub fn build_prompt(plan: &SkillPlan, artifacts: &ArtifactSet, result: &TestRunResult) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are revising the implementation of a command-line skill named '{}'.",
        plan.name
    );
    let _ = writeln!(prompt, "Task: {}", plan.description);
    let _ = writeln!(prompt, "Language: {} ({})", plan.decision.language, plan.decision.rationale);
    if plan.platform_branches {
        prompt.push_str("Keep distinct code paths per `uname -s` value (Linux, Darwin).\n");
    }
    prompt.push_str(
        "\nRules:\n\
         - `-h`/`--help` prints text containing `Usage:` to stderr and exits 0.\n\
         - Validate inputs before doing any work.\n\
         - On invalid input print `Error: <reason>` to stderr and exit 1.\n\
         - Do not modify test.sh; it is the contract.\n\
         - Reply only with complete replacement files, each in a fenced block \
         opened with ```file:<name> (run.sh or main.py).\n",
    );

    let _ = writeln!(prompt, "\nFailing assertions ({}):", result.summary());
    for failure in result.failures() {
        let group = failure.group.map_or("-", |g| g.label());
        if failure.detail.is_empty() {
            let _ = writeln!(prompt, "- [{group}] {}", failure.description);
        } else {
            let _ = writeln!(prompt, "- [{group}] {}: {}", failure.description, failure.detail);
        }
    }

    for (role, contents) in artifacts.iter() {
        if role.is_implementation() || role == ArtifactRole::TestScript {
            let _ = write!(prompt, "\n```file:{}\n{}", role.file_name(), contents);
            if !contents.ends_with('\n') {
                prompt.push('\n');
            }
            prompt.push_str("```\n");
        }
    }
    prompt
}

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?ms)^```file:([^\s`]+)[ \t]*\r?\n(.*?)^```[ \t]*\r?$").expect("valid regex")
    })
}

/// Extracts replacement files from a model response.
///
/// # Errors
///
/// Returns [`SkillError::Revision`] if a block names an unknown or
/// non-implementation file, or if the response contains no blocks.
pub fn parse_revision(text: &str) -> Result<Revision> {
    let mut revision = Revision::default();
    for caps in block_re().captures_iter(text) {
        let name = &caps[1];
        let role = ArtifactRole::from_file_name(name)
            .ok_or_else(|| SkillError::Revision(format!("unknown file '{name}'")))?;
        if !role.is_implementation() {
            return Err(SkillError::Revision(format!("{name} cannot be revised")));
        }
        let contents = caps[2].to_string();
        match revision.files.iter_mut().find(|(r, _)| *r == role) {
            Some(existing) => existing.1 = contents,
            None => revision.files.push((role, contents)),
        }
    }
    if revision.files.is_empty() {
        return Err(SkillError::Revision("response contained no ```file:<name> blocks".into()));
    }
    Ok(revision)
}
