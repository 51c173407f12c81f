//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `skillsmith`.
#[derive(Debug, Parser)]
#[command(name = "skillsmith", version, about = "Author tested command-line skills")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the language decision and inputs for a task description.
    Plan {
        /// Free-text task description.
        description: String,
        /// Print the plan as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write the test scaffold and implementation skeleton.
    Scaffold {
        /// Skill name.
        name: String,
        /// Task description.
        #[arg(short, long)]
        description: String,
        /// Skill directory (defaults to ./<NAME>).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// YAML file of extra assertions.
        #[arg(long)]
        assertions: Option<PathBuf>,
        /// Include the default help and input-validation assertions.
        #[arg(long)]
        contract: bool,
    },
    /// Run a skill's test scaffold.
    Test {
        /// Skill directory.
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Write documentation for a skill whose tests all pass.
    Docs {
        /// Skill directory.
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Task description; replaces the one recorded in the scaffold.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Plan, scaffold, implement, test, revise, and document a skill.
    Build {
        /// Skill name.
        name: String,
        /// Task description.
        #[arg(short, long)]
        description: String,
        /// Skill directory (defaults to ./<NAME>).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// YAML file of extra assertions.
        #[arg(long)]
        assertions: Option<PathBuf>,
        /// Test runs before giving up (1 to 3).
        #[arg(long)]
        max_attempts: Option<u32>,
    },
    /// Check a skill directory's layout and metadata.
    Check {
        /// Skill directory.
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}
