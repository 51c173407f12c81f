//! Language and interface planning for a task description.
//!
//! Classification is a keyword vote over the words of the description:
//! data, network, and string vocabulary argues for Python; system-command
//! vocabulary argues for shell. Ties (including no matches at all) go to
//! shell, the simpler option.

use crate::skill::{InputKind, InputSpec, Language, LanguageDecision, SkillPlan};

const RICH_WORDS: &[&str] = &[
    "json", "yaml", "csv", "xml", "parse", "http", "https", "api", "url", "fetch", "request",
    "download", "string", "text", "word", "words", "count", "regex", "data", "format", "convert",
    "transform", "markdown", "template", "sort", "line", "lines", "character", "characters",
];

const SHELL_WORDS: &[&str] = &[
    "list", "process", "processes", "port", "ports", "disk", "mount", "kill", "service", "uptime",
    "memory", "cpu", "network", "interface", "git", "docker", "file", "files", "directory",
    "folder", "copy", "move", "backup", "archive", "zip", "clean", "battery", "clipboard", "open",
];

/// Shell words whose commands differ between Linux and macOS.
const PLATFORM_WORDS: &[&str] = &[
    "port", "ports", "process", "processes", "disk", "mount", "memory", "cpu", "network",
    "interface", "service", "battery", "clipboard", "open", "uptime",
];

/// Plans a skill from its name and free-text description.
///
/// Never fails: ambiguous descriptions resolve to the shell path.
#[must_use]
pub fn plan_skill(name: &str, description: &str) -> SkillPlan {
    let words = tokenize(description);
    let decision = choose_language(&words);
    let platform_branches = decision.language == Language::Shell
        && words.iter().any(|w| PLATFORM_WORDS.contains(&w.as_str()));

    SkillPlan {
        name: name.to_string(),
        description: description.trim().to_string(),
        decision,
        platform_branches,
        inputs: detect_inputs(&words),
    }
}

/// Derives a kebab-case skill name from the first words of a description.
#[must_use]
pub fn suggest_name(description: &str) -> String {
    let words = tokenize(description);
    if words.is_empty() {
        return "skill".to_string();
    }
    words.into_iter().take(3).collect::<Vec<_>>().join("-")
}

/// Lower-cases and splits on anything that is not alphanumeric.
fn tokenize(description: &str) -> Vec<String> {
    description
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

fn choose_language(words: &[String]) -> LanguageDecision {
    let rich = matches(words, RICH_WORDS);
    let shell = matches(words, SHELL_WORDS);

    if rich.len() > shell.len() {
        LanguageDecision {
            language: Language::Python,
            rationale: format!("python: data/string handling ({})", rich.join(", ")),
        }
    } else if shell.is_empty() {
        LanguageDecision {
            language: Language::Shell,
            rationale: "shell: no data or network handling detected".to_string(),
        }
    } else {
        LanguageDecision {
            language: Language::Shell,
            rationale: format!("shell: system command composition ({})", shell.join(", ")),
        }
    }
}

fn matches<'a>(words: &'a [String], vocabulary: &[&str]) -> Vec<&'a str> {
    words.iter().map(String::as_str).filter(|w| vocabulary.contains(w)).collect()
}

/// The first input-bearing noun decides the single positional argument.
fn detect_inputs(words: &[String]) -> Vec<InputSpec> {
    let kind = words.iter().find_map(|w| match w.as_str() {
        "file" => Some(InputKind::File),
        "directory" | "folder" => Some(InputKind::Directory),
        "url" => Some(InputKind::Url),
        "text" | "string" => Some(InputKind::Text),
        _ => None,
    });
    kind.map(|kind| vec![InputSpec { name: kind.to_string(), kind }]).unwrap_or_default()
}
