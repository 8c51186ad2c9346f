//! One countdown session: construction is page load, [`CountdownSession::close`]
//! (or drop) is page teardown.
//!
//! The session owns the clock, the four core components and the adapters
//! around the external collaborators. Every reaction runs to completion
//! inside a single `tick()` or `toggle_play_pause()` call.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::SessionSettings;
use crate::countdown::{CountdownEngine, CountdownPhase, RemainingTime};
use crate::events::Event;
use crate::playback::{AudioTrack, PlaybackController, PlaybackState};
use crate::presentation::{ParticleSettings, PresentationState};
use crate::render::{Backdrop, Marquee, ParticleRenderer, TextCycler};
use crate::threshold::ThresholdTrigger;

/// The external collaborators a session drives.
pub struct Capabilities {
    pub ambient: Box<dyn AudioTrack>,
    pub celebration: Box<dyn AudioTrack>,
    pub renderer: Box<dyn ParticleRenderer>,
    pub text: Box<dyn TextCycler>,
}

pub struct CountdownSession {
    clock: Box<dyn Clock>,
    tick_interval: Duration,
    engine: CountdownEngine,
    threshold: ThresholdTrigger,
    playback: PlaybackController,
    presentation: PresentationState,
    particles: ParticleSettings,
    backdrop: Backdrop,
    marquee: Marquee,
    closed: bool,
}

impl CountdownSession {
    /// Start a session. The backdrop and the text cycler are initialized
    /// with the PRE presentation immediately.
    pub fn start(settings: SessionSettings, clock: Box<dyn Clock>, caps: Capabilities) -> Self {
        let presentation = PresentationState::new(settings.pre_messages, settings.post_messages);
        let mut backdrop = Backdrop::new(caps.renderer);
        let mut marquee = Marquee::new(caps.text);
        backdrop.sync(&presentation.descriptor(&settings.particles));
        marquee.sync(presentation.messages());

        tracing::info!(
            deadline = %settings.deadline.at(),
            threshold_secs = settings.threshold_secs,
            threshold_mode = %settings.threshold_mode,
            "countdown session started"
        );

        Self {
            clock,
            tick_interval: settings.tick_interval,
            engine: CountdownEngine::new(settings.deadline),
            threshold: ThresholdTrigger::new(settings.threshold_secs, settings.threshold_mode),
            playback: PlaybackController::new(caps.ambient, caps.celebration),
            presentation,
            particles: settings.particles,
            backdrop,
            marquee,
            closed: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> CountdownPhase {
        self.engine.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// The audio-ready flag.
    pub fn audio_ready(&self) -> bool {
        self.threshold.has_fired()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn presentation(&self) -> &PresentationState {
        &self.presentation
    }

    /// Remaining time as of the last tick, or freshly computed before the first.
    pub fn remaining(&self) -> RemainingTime {
        self.engine
            .last_remaining()
            .unwrap_or_else(|| self.engine.deadline().remaining_at(self.clock.now()))
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            remaining: self.remaining(),
            deadline: self.engine.deadline().at(),
            audio_ready: self.audio_ready(),
            playback: self.playback_state(),
            variant: self.presentation.variant(),
            particle_preset: self.presentation.particle_preset(),
            render_epoch: self.presentation.render_epoch(),
            message_count: self.presentation.messages().len(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Recompute remaining time once and react to it.
    ///
    /// Threshold and completion are both evaluated against the same
    /// snapshot. Returns no events once the session is complete or closed.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.closed {
            return Vec::new();
        }
        let now = self.clock.now();
        let Some(tick) = self.engine.tick(now) else {
            return Vec::new();
        };
        tracing::debug!(remaining = %tick.remaining, "tick");

        let mut events = vec![Event::Tick {
            remaining: tick.remaining,
            at: now,
        }];
        if self.threshold.try_arm(&tick.remaining) {
            tracing::info!(remaining_secs = tick.remaining.total_secs, "threshold reached");
            events.push(Event::ThresholdReached {
                remaining_secs: tick.remaining.total_secs,
                at: now,
            });
            events.extend(self.playback.on_threshold(now));
        }
        if tick.completed {
            events.extend(self.complete(now));
        }
        events
    }

    /// Manual play/pause of the ambient track. `None` once complete.
    pub fn toggle_play_pause(&mut self) -> Option<Event> {
        if self.closed || self.is_complete() {
            return None;
        }
        self.playback.toggle(self.clock.now())
    }

    /// Release audio and the live background. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.playback.release();
        self.backdrop.dispose();
        tracing::info!(phase = ?self.phase(), "countdown session closed");
    }

    /// Completion handling. Single-fire: a duplicate call produces nothing.
    fn complete(&mut self, at: DateTime<Utc>) -> Vec<Event> {
        self.engine.try_complete();
        if !self.presentation.swap_to_post() {
            return Vec::new();
        }
        tracing::info!(
            render_epoch = self.presentation.render_epoch(),
            "countdown complete, presentation swapped"
        );

        let mut events = vec![Event::CountdownCompleted { at }];
        events.extend(self.playback.on_complete(at));
        self.backdrop
            .sync(&self.presentation.descriptor(&self.particles));
        self.marquee.sync(self.presentation.messages());
        events.push(Event::PresentationSwapped {
            variant: self.presentation.variant(),
            particle_preset: self.presentation.particle_preset(),
            render_epoch: self.presentation.render_epoch(),
            at,
        });
        events
    }
}

impl Drop for CountdownSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for CountdownSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownSession")
            .field("engine", &self.engine)
            .field("threshold", &self.threshold)
            .field("playback", &self.playback)
            .field("presentation", &self.presentation)
            .field("closed", &self.closed)
            .finish()
    }
}
