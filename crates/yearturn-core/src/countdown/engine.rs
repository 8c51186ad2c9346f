//! Countdown engine.
//!
//! A wall-clock state machine with no internal thread. The caller (usually
//! [`crate::driver::drive`]) calls `tick()` on a short interval; each call
//! recomputes remaining time from the absolute deadline, so missed or late
//! ticks never accumulate error.
//!
//! ```text
//! Running --(remaining == 0)--> Complete   (terminal)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::remaining::{Deadline, RemainingTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownPhase {
    Running,
    Complete,
}

/// One recomputation of remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: RemainingTime,
    /// True only on the tick that moved the engine to `Complete`.
    pub completed: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CountdownEngine {
    deadline: Deadline,
    phase: CountdownPhase,
    last_remaining: Option<RemainingTime>,
}

impl CountdownEngine {
    pub fn new(deadline: Deadline) -> Self {
        Self {
            deadline,
            phase: CountdownPhase::Running,
            last_remaining: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == CountdownPhase::Complete
    }

    /// Remaining time as of the most recent tick.
    pub fn last_remaining(&self) -> Option<RemainingTime> {
        self.last_remaining
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Recompute remaining time against `now`.
    ///
    /// Returns `None` once the engine is complete: it stops ticking. The
    /// tick that first observes zero carries `completed = true`; a process
    /// resuming far past the deadline still gets exactly one such tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Tick> {
        if self.is_complete() {
            return None;
        }
        let remaining = self.deadline.remaining_at(now);
        self.last_remaining = Some(remaining);
        let completed = remaining.is_zero() && self.try_complete();
        Some(Tick {
            remaining,
            completed,
            at: now,
        })
    }

    /// Move to `Complete`. Returns whether the transition happened.
    pub fn try_complete(&mut self) -> bool {
        match self.phase {
            CountdownPhase::Running => {
                self.phase = CountdownPhase::Complete;
                true
            }
            CountdownPhase::Complete => false,
        }
    }
}
