//! Recording adapter for the `ShellExecutor` port.

use std::path::Path;

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::ports::{ShellExecutor, ShellOutput};

/// Records shell interactions while delegating to an inner implementation.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    recorder: SharedRecorder,
}

impl RecordingShellExecutor {
    /// Creates a new recording shell executor wrapping the given implementation.
    pub fn new(inner: Box<dyn ShellExecutor>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CommandInput<'a> {
    command: &'a str,
    cwd: &'a Path,
}

impl ShellExecutor for RecordingShellExecutor {
    fn run(
        &self,
        command: &str,
        cwd: &Path,
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.run(command, cwd);
        record_result(&self.recorder, "shell", "run", &CommandInput { command, cwd }, &result);
        result
    }
}
