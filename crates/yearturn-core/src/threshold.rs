//! One-shot trigger armed by remaining time.
//!
//! In [`ThresholdMode::Exact`] the trigger fires only on a tick whose remaining
//! time equals the target. A tick sequence that skips that second (39s then
//! 37s) never fires it. [`ThresholdMode::Crossing`] fires on the first
//! non-terminal tick at or below the target instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::countdown::RemainingTime;

/// Remaining seconds at which the celebration track is cued.
pub const DEFAULT_THRESHOLD_SECS: u64 = 38;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    #[default]
    Exact,
    Crossing,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMode::Exact => f.write_str("exact"),
            ThresholdMode::Crossing => f.write_str("crossing"),
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(ThresholdMode::Exact),
            "crossing" => Ok(ThresholdMode::Crossing),
            other => Err(format!("unknown threshold mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArmState {
    Waiting,
    Fired,
}

#[derive(Debug, Clone)]
pub struct ThresholdTrigger {
    target_secs: u64,
    mode: ThresholdMode,
    state: ArmState,
}

impl ThresholdTrigger {
    pub fn new(target_secs: u64, mode: ThresholdMode) -> Self {
        Self {
            target_secs,
            mode,
            state: ArmState::Waiting,
        }
    }

    pub fn target_secs(&self) -> u64 {
        self.target_secs
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    /// The audio-ready flag. Monotonic.
    pub fn has_fired(&self) -> bool {
        self.state == ArmState::Fired
    }

    /// Observe one tick. Returns true on the single tick that arms the trigger.
    ///
    /// A zero reading is the completing tick and never arms it.
    pub fn try_arm(&mut self, remaining: &RemainingTime) -> bool {
        if self.state == ArmState::Fired || remaining.is_zero() {
            return false;
        }
        let hit = match self.mode {
            ThresholdMode::Exact => remaining.total_secs == self.target_secs,
            ThresholdMode::Crossing => remaining.total_secs <= self.target_secs,
        };
        if hit {
            self.state = ArmState::Fired;
        }
        hit
    }
}

impl Default for ThresholdTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_SECS, ThresholdMode::Exact)
    }
}
