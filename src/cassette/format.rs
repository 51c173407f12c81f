//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`llm`, `shell`, `clock`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of skillsmith that produced the recording.
    #[serde(default)]
    pub tool_version: String,
    /// Ordered list of interactions.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_written_cassette_defaults_optional_fields() {
        let yaml = "name: revise-once\nrecorded_at: 2026-01-02T03:04:05Z\n";
        let cassette: Cassette = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cassette.name, "revise-once");
        assert!(cassette.tool_version.is_empty());
        assert!(cassette.interactions.is_empty());
    }

    #[test]
    fn interaction_payloads_keep_json_shape() {
        let yaml = r#"
name: shell-run
recorded_at: 2026-01-02T03:04:05Z
tool_version: 0.1.0
interactions:
  - seq: 0
    port: shell
    method: run
    input: { command: "bash test.sh", cwd: "/tmp/skill" }
    output: { ok: { exit_code: 0, stdout: "0/0 passed\n", stderr: "" } }
"#;
        let cassette: Cassette = serde_yaml::from_str(yaml).unwrap();
        let interaction = &cassette.interactions[0];
        assert_eq!(interaction.port, "shell");
        assert_eq!(interaction.output["ok"]["exit_code"], 0);
        assert_eq!(interaction.input["command"], "bash test.sh");
    }
}
