//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod llm;
pub mod shell;

pub use clock::ReplayingClock;
pub use llm::ReplayingLlmClient;
pub use shell::ReplayingShellExecutor;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// A replayer shared by every replaying adapter built from one cassette.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pulls the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &SharedReplayer,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, BoxError> {
    let mut guard = replayer.lock().map_err(|_| -> BoxError { "replayer lock poisoned".into() })?;
    guard.next_output(port, method).map_err(Into::into)
}

/// Decodes an output recorded with the `{"ok": v}` / `{"err": msg}` convention.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(output: serde_json::Value) -> Result<T, BoxError> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(|e| format!("malformed cassette output: {e}").into())
}
