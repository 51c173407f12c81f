//! Replaying adapter for the `ShellExecutor` port.

use std::path::Path;

use super::{next_output, replay_result, SharedReplayer};
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Replays recorded shell command results from a cassette.
pub struct ReplayingShellExecutor {
    replayer: SharedReplayer,
}

impl ReplayingShellExecutor {
    /// Creates a new replaying shell executor from a shared replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(
        &self,
        _command: &str,
        _cwd: &Path,
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(next_output(&self.replayer, "shell", "run")?)
    }
}
