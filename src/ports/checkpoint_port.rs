//! Checkpoint store port trait.

use crate::domain::error::PulseError;
use chrono::{DateTime, Duration, Utc};

/// Cutoff used when no usable checkpoint exists.
pub fn first_run_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(1)
}

pub trait CheckpointPort {
    /// Last processed instant. A missing or unreadable checkpoint yields
    /// [`first_run_cutoff`] rather than an error.
    fn load(&self, now: DateTime<Utc>) -> DateTime<Utc>;

    fn save(&self, timestamp: DateTime<Utc>) -> Result<(), PulseError>;
}
