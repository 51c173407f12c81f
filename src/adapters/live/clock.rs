//! Live clock using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Live clock that returns the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changelog_date_is_today() {
        let today = Utc::now().date_naive();
        let stamped = LiveClock.now().date_naive();
        // Allow for the test straddling midnight.
        assert!(stamped == today || stamped == today.succ_opt().unwrap());
    }
}
