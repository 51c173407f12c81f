//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::LiveLlmClient;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::recording::{RecordingLlmClient, RecordingShellExecutor, SharedRecorder};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingLlmClient, ReplayingShellExecutor, SharedReplayer,
};
use crate::cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::Result;
use crate::ports::{Clock, FileSystem, LlmClient, ShellExecutor};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying). The filesystem is always live: skill directories
/// are real so that recorded scaffolds can be inspected after a run.
pub struct ServiceContext {
    /// Clock for dating changelog entries.
    pub clock: Box<dyn Clock>,
    /// Filesystem for reading and writing artifacts.
    pub fs: Box<dyn FileSystem>,
    /// Shell executor for running scaffolds.
    pub shell: Box<dyn ShellExecutor>,
    /// LLM client for implementation revisions.
    pub llm: Box<dyn LlmClient>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<RecordingGuard>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            shell: Box::new(LiveShellExecutor),
            llm: Box::new(LiveLlmClient::new(config.api_key.clone(), config.llm_endpoint.clone())),
            recorder: None,
        }
    }

    /// Creates the context a command should run with.
    ///
    /// Starts from [`ServiceContext::live`], replays LLM completions when
    /// `SKILLSMITH_LLM_CASSETTE` is set, and records shell and LLM
    /// interactions when `SKILLSMITH_RECORD` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM cassette cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut ctx = Self::live(config);
        if let Some(path) = &config.llm_cassette {
            info!(cassette = %path.display(), "replaying LLM completions");
            let replayer = shared_replayer(path)?;
            ctx.llm = Box::new(ReplayingLlmClient::new(replayer));
        }
        if let Some(path) = &config.record_path {
            ctx = ctx.recording_to(path);
        }
        Ok(ctx)
    }

    /// Creates a context that replays clock, shell, and LLM interactions from
    /// a single cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self> {
        let cassette = cassette::load(path)?;
        let replayer: SharedReplayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Ok(Self {
            clock: Box::new(ReplayingClock::new(Arc::clone(&replayer), cassette.recorded_at)),
            fs: Box::new(LiveFileSystem),
            shell: Box::new(ReplayingShellExecutor::new(Arc::clone(&replayer))),
            llm: Box::new(ReplayingLlmClient::new(replayer)),
            recorder: None,
        })
    }

    /// Wraps the shell and LLM ports with recorders writing to `path` on drop.
    #[must_use]
    pub fn recording_to(mut self, path: &Path) -> Self {
        info!(cassette = %path.display(), "recording port interactions");
        let recorder: SharedRecorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "skillsmith-session")));
        self.shell = Box::new(RecordingShellExecutor::new(self.shell, Arc::clone(&recorder)));
        self.llm = Box::new(RecordingLlmClient::new(self.llm, Arc::clone(&recorder)));
        self.recorder = Some(RecordingGuard(recorder));
        self
    }

    /// Replaces the LLM client.
    #[must_use]
    pub fn with_llm(mut self, llm: Box<dyn LlmClient>) -> Self {
        self.llm = llm;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

fn shared_replayer(path: &Path) -> Result<SharedReplayer> {
    let cassette = cassette::load(path)?;
    Ok(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
}

/// Writes the session cassette when the owning context is dropped.
struct RecordingGuard(SharedRecorder);

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        let Ok(mut guard) = self.0.lock() else {
            warn!("recorder lock poisoned; cassette not written");
            return;
        };
        let recorder = std::mem::replace(&mut *guard, CassetteRecorder::new("", ""));
        match recorder.finish() {
            Ok(path) => eprintln!("Recording saved to: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to write cassette: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: "2026-02-03T04:05:06Z".parse().unwrap(),
            tool_version: String::new(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn replaying_context_serves_shell_and_clock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cassette.yaml");
        write_cassette(
            &path,
            vec![Interaction {
                seq: 0,
                port: "shell".into(),
                method: "run".into(),
                input: json!({"command": "bash test.sh"}),
                output: json!({"ok": {"exit_code": 0, "stdout": "0/0 passed\n", "stderr": ""}}),
            }],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        let output = ctx.shell.run("bash test.sh", dir.path()).unwrap();
        assert_eq!(output.stdout, "0/0 passed\n");
        // No clock interactions recorded: falls back to the recording time.
        assert_eq!(ctx.clock.now().to_rfc3339(), "2026-02-03T04:05:06+00:00");
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");

        let ctx = ServiceContext::live(&Config::default()).recording_to(&path);
        ctx.shell.run("echo recorded", dir.path()).unwrap();
        drop(ctx);

        let cassette = cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].input["command"], "echo recorded");
        assert!(cassette.recorded_at <= Utc::now());
    }

    #[test]
    fn from_config_replays_llm_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm.cassette.yaml");
        write_cassette(&path, vec![]);

        let config = Config { llm_cassette: Some(path), ..Config::default() };
        assert!(ServiceContext::from_config(&config).is_ok());

        let missing = Config { llm_cassette: Some(dir.path().join("nope.yaml")), ..Config::default() };
        assert!(ServiceContext::from_config(&missing).is_err());
    }
}
