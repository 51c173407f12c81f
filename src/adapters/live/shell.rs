//! Live shell executor using `std::process::Command`.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Live shell executor that runs commands via the system shell.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(
        &self,
        command: &str,
        cwd: &Path,
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        debug!(command, cwd = %cwd.display(), "running shell command");
        let output = Command::new("sh").arg("-c").arg(command).current_dir(cwd).output()?;
        Ok(ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
