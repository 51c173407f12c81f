//! `skillsmith plan` command.

use crate::planner::{plan_skill, suggest_name};
use crate::skill::SkillPlan;

/// Execute the `plan` command.
///
/// Prints the language decision, rationale, platform handling, and inputs
/// the planner derives from `description`.
///
/// # Errors
///
/// Returns an error string if the plan cannot be serialized as JSON.
pub fn run(description: &str, json: bool) -> Result<(), String> {
    let plan = plan_skill(&suggest_name(description), description);
    if json {
        let out = serde_json::to_string_pretty(&plan).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        print!("{}", render(&plan));
    }
    Ok(())
}

fn render(plan: &SkillPlan) -> String {
    let inputs = if plan.inputs.is_empty() {
        "none".to_string()
    } else {
        plan.inputs.iter().map(|i| format!("{} ({})", i.placeholder(), i.kind)).collect::<Vec<_>>().join(", ")
    };
    let platform = if plan.platform_branches { "linux/macos branches" } else { "portable" };
    format!(
        "Skill:     {}\nLanguage:  {}\nRationale: {}\nPlatform:  {platform}\nInputs:    {inputs}\n{}\n",
        plan.name,
        plan.decision.language,
        plan.decision.rationale,
        plan.usage_line()
    )
}
