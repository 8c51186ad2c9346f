//! Playback controller for the two audio tracks.
//!
//! ```text
//! Idle -> AmbientPlaying <-> AmbientPaused        (manual toggle, Running only)
//! any  -> CelebrationPlaying                       (threshold, once)
//! any AMBIENT_* -> ambient stopped and rewound     (completion, once)
//! ```
//!
//! The controller is the only writer of both tracks. Starting a track can be
//! refused by the environment; such failures are logged and recorded for
//! diagnostics but never change state and are never retried.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackId {
    Ambient,
    Celebration,
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Ambient => f.write_str("ambient"),
            TrackId::Celebration => f.write_str("celebration"),
        }
    }
}

/// A loaded audio asset the controller can command.
pub trait AudioTrack {
    /// Begin or continue playback from the current position.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Seek back to position zero.
    fn rewind(&mut self);

    fn position(&self) -> Duration;

    fn is_playing(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    AmbientPlaying,
    AmbientPaused,
    CelebrationPlaying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientState {
    Idle,
    Playing,
    Paused,
    /// Stopped and rewound by completion. Terminal.
    Stopped,
}

pub struct PlaybackController {
    ambient: Box<dyn AudioTrack>,
    celebration: Box<dyn AudioTrack>,
    ambient_state: AmbientState,
    celebration_started: bool,
    countdown_complete: bool,
    last_failure: Option<PlaybackError>,
    failure_count: u32,
}

impl PlaybackController {
    pub fn new(ambient: Box<dyn AudioTrack>, celebration: Box<dyn AudioTrack>) -> Self {
        Self {
            ambient,
            celebration,
            ambient_state: AmbientState::Idle,
            celebration_started: false,
            countdown_complete: false,
            last_failure: None,
            failure_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        if self.celebration_started {
            return PlaybackState::CelebrationPlaying;
        }
        match self.ambient_state {
            AmbientState::Idle | AmbientState::Stopped => PlaybackState::Idle,
            AmbientState::Playing => PlaybackState::AmbientPlaying,
            AmbientState::Paused => PlaybackState::AmbientPaused,
        }
    }

    pub fn ambient_state(&self) -> AmbientState {
        self.ambient_state
    }

    pub fn celebration_started(&self) -> bool {
        self.celebration_started
    }

    pub fn ambient_position(&self) -> Duration {
        self.ambient.position()
    }

    /// Most recent swallowed playback failure.
    pub fn last_failure(&self) -> Option<&PlaybackError> {
        self.last_failure.as_ref()
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Manual play/pause of the ambient track.
    ///
    /// A no-op once the countdown has completed.
    pub fn toggle(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.countdown_complete {
            return None;
        }
        let playing = match self.ambient_state {
            AmbientState::Idle | AmbientState::Paused => {
                if let Err(err) = self.ambient.play() {
                    self.record_failure(err);
                }
                self.ambient_state = AmbientState::Playing;
                true
            }
            AmbientState::Playing => {
                self.ambient.pause();
                self.ambient_state = AmbientState::Paused;
                false
            }
            AmbientState::Stopped => return None,
        };
        tracing::debug!(playing, "ambient toggled");
        Some(Event::AmbientToggled { playing, at })
    }

    /// Start the celebration track. Fires at most once per session.
    pub fn on_threshold(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.celebration_started {
            return None;
        }
        self.celebration_started = true;
        match self.celebration.play() {
            Ok(()) => {
                tracing::info!("celebration track started");
                Some(Event::CelebrationStarted { at })
            }
            Err(err) => {
                let event = Event::PlaybackFailed {
                    track: err.track(),
                    reason: err.to_string(),
                    at,
                };
                self.record_failure(err);
                Some(event)
            }
        }
    }

    /// Stop and rewind the ambient track. The celebration track is left alone.
    pub fn on_complete(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.countdown_complete {
            return None;
        }
        self.countdown_complete = true;
        self.ambient.pause();
        self.ambient.rewind();
        self.ambient_state = AmbientState::Stopped;
        tracing::info!("ambient track stopped and rewound");
        Some(Event::AmbientStopped { at })
    }

    /// Release both tracks at session end.
    pub fn release(&mut self) {
        self.ambient.pause();
        self.celebration.pause();
    }

    fn record_failure(&mut self, err: PlaybackError) {
        tracing::warn!(track = %err.track(), error = %err, "playback failed");
        self.failure_count += 1;
        self.last_failure = Some(err);
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("ambient_state", &self.ambient_state)
            .field("celebration_started", &self.celebration_started)
            .field("countdown_complete", &self.countdown_complete)
            .field("last_failure", &self.last_failure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        plays: u32,
        pauses: u32,
        rewinds: u32,
        playing: bool,
        position: Duration,
    }

    struct FakeTrack {
        log: Rc<RefCell<Log>>,
        refuse: Option<PlaybackError>,
    }

    impl AudioTrack for FakeTrack {
        fn play(&mut self) -> Result<(), PlaybackError> {
            let mut log = self.log.borrow_mut();
            log.plays += 1;
            if let Some(err) = &self.refuse {
                return Err(err.clone());
            }
            log.playing = true;
            log.position += Duration::from_secs(5);
            Ok(())
        }
        fn pause(&mut self) {
            let mut log = self.log.borrow_mut();
            log.pauses += 1;
            log.playing = false;
        }
        fn rewind(&mut self) {
            let mut log = self.log.borrow_mut();
            log.rewinds += 1;
            log.position = Duration::ZERO;
        }
        fn position(&self) -> Duration {
            self.log.borrow().position
        }
        fn is_playing(&self) -> bool {
            self.log.borrow().playing
        }
    }

    fn controller(
        refuse_celebration: bool,
    ) -> (PlaybackController, Rc<RefCell<Log>>, Rc<RefCell<Log>>) {
        let ambient = Rc::new(RefCell::new(Log::default()));
        let celebration = Rc::new(RefCell::new(Log::default()));
        let refuse = refuse_celebration.then_some(PlaybackError::Blocked {
            track: TrackId::Celebration,
        });
        let ctl = PlaybackController::new(
            Box::new(FakeTrack {
                log: Rc::clone(&ambient),
                refuse: None,
            }),
            Box::new(FakeTrack {
                log: Rc::clone(&celebration),
                refuse,
            }),
        );
        (ctl, ambient, celebration)
    }

    #[test]
    fn toggle_alternates_from_idle() {
        let (mut ctl, ambient, _) = controller(false);
        assert_eq!(ctl.state(), PlaybackState::Idle);
        let expected = [
            PlaybackState::AmbientPlaying,
            PlaybackState::AmbientPaused,
            PlaybackState::AmbientPlaying,
            PlaybackState::AmbientPaused,
            PlaybackState::AmbientPlaying,
        ];
        for state in expected {
            assert!(ctl.toggle(Utc::now()).is_some());
            assert_eq!(ctl.state(), state);
        }
        assert_eq!(ambient.borrow().plays, 3);
        assert_eq!(ambient.borrow().pauses, 2);
    }

    #[test]
    fn threshold_starts_celebration_once() {
        let (mut ctl, ambient, celebration) = controller(false);
        ctl.toggle(Utc::now());
        assert!(matches!(
            ctl.on_threshold(Utc::now()),
            Some(Event::CelebrationStarted { .. })
        ));
        assert!(ctl.on_threshold(Utc::now()).is_none());
        assert_eq!(celebration.borrow().plays, 1);
        assert_eq!(ctl.state(), PlaybackState::CelebrationPlaying);
        // Ambient keeps its own state.
        assert!(ambient.borrow().playing);
    }

    #[test]
    fn refused_celebration_is_swallowed() {
        let (mut ctl, _, celebration) = controller(true);
        let event = ctl.on_threshold(Utc::now());
        assert!(matches!(
            event,
            Some(Event::PlaybackFailed {
                track: TrackId::Celebration,
                ..
            })
        ));
        assert_eq!(ctl.failure_count(), 1);
        assert!(ctl.last_failure().is_some());
        // Not retried.
        assert!(ctl.on_threshold(Utc::now()).is_none());
        assert_eq!(celebration.borrow().plays, 1);
    }

    #[test]
    fn completion_stops_and_rewinds_ambient_once() {
        let (mut ctl, ambient, celebration) = controller(false);
        ctl.toggle(Utc::now());
        ctl.on_threshold(Utc::now());
        assert!(ctl.on_complete(Utc::now()).is_some());
        assert!(ctl.on_complete(Utc::now()).is_none());

        let ambient = ambient.borrow();
        assert!(!ambient.playing);
        assert_eq!(ambient.position, Duration::ZERO);
        assert_eq!(ambient.rewinds, 1);
        assert_eq!(ctl.ambient_state(), AmbientState::Stopped);
        assert!(celebration.borrow().playing);
    }

    #[test]
    fn toggle_after_completion_is_noop() {
        let (mut ctl, ambient, _) = controller(false);
        ctl.on_complete(Utc::now());
        assert!(ctl.toggle(Utc::now()).is_none());
        assert!(ctl.toggle(Utc::now()).is_none());
        assert_eq!(ambient.borrow().plays, 0);
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }
}
