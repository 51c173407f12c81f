//! Shell executor port for running external commands.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// The output of a shell command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

/// Executes shell commands.
///
/// The test runner invokes generated scaffolds through this port so that
/// runs can be recorded and replayed.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command string in the system shell from `cwd` and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or fails to execute.
    fn run(
        &self,
        command: &str,
        cwd: &Path,
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>>;
}
