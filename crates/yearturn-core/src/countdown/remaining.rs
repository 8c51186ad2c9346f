use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// The fixed instant the countdown runs to. Immutable for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Resolve a wall-clock reading in the local time zone.
    ///
    /// Ambiguous readings (DST fold) take the earlier instant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonexistentDeadline`] when the reading falls
    /// into a DST gap.
    pub fn from_local(naive: NaiveDateTime) -> Result<Self, ConfigError> {
        Self::from_naive_in(&Local, naive)
    }

    pub fn from_naive_in<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Result<Self, ConfigError> {
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|at| Self(at.with_timezone(&Utc)))
            .ok_or(ConfigError::NonexistentDeadline { naive })
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.0
    }

    /// `max(0, deadline - now)`, quantized to whole seconds.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> RemainingTime {
        let ms = (self.0 - now).num_milliseconds().max(0) as u64;
        // Half-up rounding keeps a tick landing a few ms early or late on the
        // same displayed second.
        RemainingTime::from_total_secs((ms + 500) / 1000)
    }
}

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemainingTime {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub total_secs: u64,
}

impl RemainingTime {
    pub const ZERO: RemainingTime = RemainingTime {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_secs: 0,
    };

    pub fn from_total_secs(total_secs: u64) -> Self {
        Self {
            days: total_secs / SECS_PER_DAY,
            hours: ((total_secs % SECS_PER_DAY) / SECS_PER_HOUR) as u8,
            minutes: ((total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE) as u8,
            seconds: (total_secs % SECS_PER_MINUTE) as u8,
            total_secs,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_secs == 0
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
