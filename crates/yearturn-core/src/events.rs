use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::{CountdownPhase, RemainingTime};
use crate::playback::{PlaybackState, TrackId};
use crate::presentation::{ParticlePreset, PresentationVariant};

/// Every observable change in a session produces an Event.
/// Front ends render from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Tick {
        remaining: RemainingTime,
        at: DateTime<Utc>,
    },
    /// Remaining time reached the audio threshold.
    ThresholdReached {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CelebrationStarted {
        at: DateTime<Utc>,
    },
    /// A play attempt was refused. Informational only.
    PlaybackFailed {
        track: TrackId,
        reason: String,
        at: DateTime<Utc>,
    },
    AmbientToggled {
        playing: bool,
        at: DateTime<Utc>,
    },
    AmbientStopped {
        at: DateTime<Utc>,
    },
    CountdownCompleted {
        at: DateTime<Utc>,
    },
    PresentationSwapped {
        variant: PresentationVariant,
        particle_preset: ParticlePreset,
        render_epoch: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: CountdownPhase,
        remaining: RemainingTime,
        deadline: DateTime<Utc>,
        audio_ready: bool,
        playback: PlaybackState,
        variant: PresentationVariant,
        particle_preset: ParticlePreset,
        render_epoch: u64,
        message_count: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Snake-case name of the variant, as used in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Tick { .. } => "tick",
            Event::ThresholdReached { .. } => "threshold_reached",
            Event::CelebrationStarted { .. } => "celebration_started",
            Event::PlaybackFailed { .. } => "playback_failed",
            Event::AmbientToggled { .. } => "ambient_toggled",
            Event::AmbientStopped { .. } => "ambient_stopped",
            Event::CountdownCompleted { .. } => "countdown_completed",
            Event::PresentationSwapped { .. } => "presentation_swapped",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
