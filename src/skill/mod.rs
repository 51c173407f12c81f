//! Skill data model.
//!
//! Types shared by the planner, emitters, runner, and doc emitter. Plans,
//! assertions, and run results serialize with serde so they can be loaded
//! from YAML or printed as JSON.

mod artifact;
mod assertion;
mod language;
mod outcome;
mod skill_plan;

pub use artifact::{ArtifactRole, ArtifactSet, MAX_ARTIFACT_BYTES};
pub use assertion::{Assertion, AssertionGroup, AssertionKind, Fixture};
pub use language::{Language, LanguageDecision};
pub use outcome::{AssertionOutcome, TestRunResult};
pub use skill_plan::{InputKind, InputSpec, SkillPlan};
