//! Replaying adapter for the `Clock` port.

use chrono::{DateTime, Utc};

use super::SharedReplayer;
use crate::ports::clock::Clock;

/// Serves recorded timestamps, falling back to a fixed instant when the
/// cassette has none so replays stay deterministic.
pub struct ReplayingClock {
    replayer: SharedReplayer,
    fallback: DateTime<Utc>,
}

impl ReplayingClock {
    /// Creates a replaying clock; `fallback` is returned once recorded times run out.
    #[must_use]
    pub fn new(replayer: SharedReplayer, fallback: DateTime<Utc>) -> Self {
        Self { replayer, fallback }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        super::next_output(&self.replayer, "clock", "now")
            .ok()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    #[test]
    fn replays_then_falls_back() {
        let cassette = Cassette {
            name: "clock".into(),
            recorded_at: Utc::now(),
            tool_version: String::new(),
            interactions: vec![Interaction {
                seq: 0,
                port: "clock".into(),
                method: "now".into(),
                input: json!({}),
                output: json!("2026-03-01T12:00:00Z"),
            }],
        };
        let fallback = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let clock =
            ReplayingClock::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))), fallback);

        assert_eq!(clock.now().to_rfc3339(), "2026-03-01T12:00:00+00:00");
        assert_eq!(clock.now(), fallback);
    }
}
