//! The skill-authoring pipeline.
//!
//! plan → scaffold → implementation → test, with a bounded revise-and-retest
//! loop between the last two, and documentation only after a clean run.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{clamp_attempts, Config};
use crate::context::ServiceContext;
use crate::docs::{emit_docs, DocContext};
use crate::error::{Result, SkillError};
use crate::implement::{apply_revision, emit_implementation};
use crate::planner::plan_skill;
use crate::revise::request_revision;
use crate::runner::run_tests;
use crate::scaffold::{contract_assertions, embedded_plan, emit_scaffold};
use crate::skill::{
    ArtifactRole, ArtifactSet, Assertion, Language, LanguageDecision, SkillPlan, TestRunResult,
};

/// What to build and where.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Skill name.
    pub name: String,
    /// Free-text task description.
    pub description: String,
    /// Skill directory to create.
    pub output_dir: PathBuf,
    /// Assertions to add to the default contract.
    pub assertions: Vec<Assertion>,
}

/// How a build ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Every assertion passed and documentation was written.
    Published {
        /// The clean run.
        result: TestRunResult,
        /// Test runs performed, including the clean one.
        attempts: u32,
    },
    /// The retry ceiling was reached with failures remaining.
    Blocked {
        /// The last run.
        result: TestRunResult,
        /// Test runs performed.
        attempts: u32,
    },
}

/// Drives one skill from description to published directory.
pub struct Workflow<'a> {
    ctx: &'a ServiceContext,
    config: &'a Config,
}

impl<'a> Workflow<'a> {
    /// Creates a workflow over the given ports and configuration.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a Config) -> Self {
        Self { ctx, config }
    }

    /// Runs the full pipeline.
    ///
    /// The scaffold is written once and never regenerated. Each attempt runs
    /// the tests; a clean run publishes documentation, the last attempt
    /// reports [`BuildOutcome::Blocked`], and any other failing run asks the
    /// LLM for a revision of the implementation files.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaffold already exists, an artifact cannot be
    /// written, a test run is malformed, or the LLM request fails.
    pub async fn build(&self, request: &BuildRequest) -> Result<BuildOutcome> {
        let plan = plan_skill(&request.name, &request.description);
        info!(
            skill = %plan.name,
            language = %plan.decision.language,
            rationale = %plan.decision.rationale,
            "planned skill"
        );

        let mut assertions = contract_assertions(&plan);
        assertions.extend(request.assertions.iter().cloned());
        let dir = request.output_dir.as_path();
        let mut artifacts = scaffold_skill(self.ctx, &plan, dir, &assertions)?;

        let max_attempts = clamp_attempts(self.config.max_attempts);
        for attempt in 1..=max_attempts {
            let result = run_tests(self.ctx, dir)?;
            info!(attempt, max_attempts, summary = %result.summary(), "attempt finished");

            if result.all_passed() {
                publish_docs(self.ctx, self.config, &plan, dir, &assertions, &result)?;
                return Ok(BuildOutcome::Published { result, attempts: attempt });
            }
            if attempt == max_attempts {
                warn!(skill = %plan.name, failures = result.failed, "retry ceiling reached");
                return Ok(BuildOutcome::Blocked { result, attempts: attempt });
            }

            let revision =
                match request_revision(self.ctx, self.config, &plan, &artifacts, &result).await {
                    Ok(revision) => revision,
                    Err(SkillError::Revision(reason)) => {
                        warn!(attempt, %reason, "unusable revision; attempt consumed");
                        continue;
                    }
                    Err(other) => return Err(other),
                };
            let touched = match apply_revision(&mut artifacts, &revision) {
                Ok(touched) => touched,
                Err(err @ SkillError::ArtifactTooLarge { .. }) => {
                    warn!(attempt, %err, "revision rejected; attempt consumed");
                    continue;
                }
                Err(other) => return Err(other),
            };
            for role in touched {
                let contents = artifacts.get(role).unwrap_or_default();
                write_artifact(self.ctx, dir, role, contents)?;
            }
        }

        Err(SkillError::Config("max_attempts must be at least 1".into()))
    }
}

/// Writes the scaffold and the implementation skeleton into `dir`.
///
/// # Errors
///
/// Returns [`SkillError::ScaffoldLocked`] if `dir` already has a scaffold,
/// or an error if an assertion is invalid or a file cannot be written.
pub fn scaffold_skill(
    ctx: &ServiceContext,
    plan: &SkillPlan,
    dir: &Path,
    assertions: &[Assertion],
) -> Result<ArtifactSet> {
    if ctx.fs.exists(&dir.join(ArtifactRole::TestScript.file_name())) {
        return Err(SkillError::ScaffoldLocked);
    }

    let mut artifacts = ArtifactSet::new();
    artifacts.insert(ArtifactRole::TestScript, emit_scaffold(plan, assertions)?)?;
    for (role, contents) in emit_implementation(plan) {
        artifacts.insert(role, contents)?;
    }
    for (role, contents) in artifacts.iter() {
        write_artifact(ctx, dir, role, contents)?;
    }
    info!(dir = %dir.display(), files = artifacts.len(), "scaffold written");
    Ok(artifacts)
}

/// Recovers the plan a skill directory was scaffolded from.
///
/// The plan is read from the scaffold header. A non-empty `description`
/// replaces the recorded prose but never the language, platform handling,
/// or inputs. Scaffolds without a recorded plan are re-planned from
/// `description`, with the language taken from the files present.
///
/// # Errors
///
/// Returns [`SkillError::Io`] if the scaffold cannot be read, or if it has
/// no recorded plan and no description was given.
pub fn recover_plan(
    ctx: &ServiceContext,
    dir: &Path,
    name: &str,
    description: Option<&str>,
) -> Result<SkillPlan> {
    let scaffold = dir.join(ArtifactRole::TestScript.file_name());
    let script = ctx.fs.read_to_string(&scaffold).map_err(|e| SkillError::io(&scaffold, &e))?;
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    if let Some(mut plan) = embedded_plan(&script) {
        if let Some(description) = description {
            plan.description = description.to_string();
        }
        return Ok(plan);
    }

    let description = description.ok_or_else(|| {
        SkillError::io(&scaffold, &"scaffold records no plan; pass a description")
    })?;
    let mut plan = plan_skill(name, description);
    let language = if ctx.fs.exists(&dir.join(ArtifactRole::LogicModule.file_name())) {
        Language::Python
    } else {
        Language::Shell
    };
    if language != plan.decision.language {
        plan.decision = LanguageDecision {
            language,
            rationale: format!("{language}: detected from the skill directory"),
        };
    }
    let entry = dir.join(ArtifactRole::EntryPoint.file_name());
    plan.platform_branches = ctx.fs.read_to_string(&entry).is_ok_and(|s| s.contains("uname -s"));
    debug!(skill = %plan.name, language = %plan.decision.language, "plan re-derived from directory");
    Ok(plan)
}

/// Renders and writes the documentation for a clean run.
///
/// # Errors
///
/// Returns [`SkillError::UntestedDocs`] if `result` is not a clean run, or
/// an error if a file cannot be written.
pub fn publish_docs(
    ctx: &ServiceContext,
    config: &Config,
    plan: &SkillPlan,
    dir: &Path,
    assertions: &[Assertion],
    result: &TestRunResult,
) -> Result<()> {
    let doc = DocContext {
        version: &config.skill_version,
        license: &config.license,
        date: ctx.clock.now(),
        assertions,
    };
    for (role, contents) in emit_docs(plan, result, &doc)? {
        write_artifact(ctx, dir, role, &contents)?;
    }
    info!(dir = %dir.display(), "documentation written");
    Ok(())
}

/// Writes one artifact, marking scripts executable.
///
/// # Errors
///
/// Returns [`SkillError::Io`] if the file cannot be written.
pub fn write_artifact(
    ctx: &ServiceContext,
    dir: &Path,
    role: ArtifactRole,
    contents: &str,
) -> Result<()> {
    let path = dir.join(role.file_name());
    ctx.fs.write(&path, contents).map_err(|e| SkillError::io(&path, &e))?;
    if role.is_executable() {
        ctx.fs.set_executable(&path).map_err(|e| SkillError::io(&path, &e))?;
    }
    Ok(())
}
