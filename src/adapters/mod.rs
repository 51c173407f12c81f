//! Adapter implementations of the port traits.
//!
//! - `live`: real clock, disk, shell, and HTTP.
//! - `recording`: wraps live adapters and captures interactions to a cassette.
//! - `replaying`: serves interactions back from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
