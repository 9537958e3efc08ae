//! Wall-clock seam used for timestamp stamping and temporal rules.

use crate::types::{truncate_to_millis, Timestamp};

/// Source of "now" for a validation call.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the process wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        truncate_to_millis(chrono::Utc::now())
    }
}

/// Always returns the same instant. Used in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        truncate_to_millis(self.0)
    }
}
