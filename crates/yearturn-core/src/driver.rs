//! Async tick loop for a [`CountdownSession`].
//!
//! The interval is the only periodic suspension point. User input arrives on
//! an mpsc channel and is handled between ticks, never concurrently with one.
//! Returning from [`drive`] drops the interval, so no tick stays scheduled
//! after completion or cancellation.

use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::events::Event;
use crate::session::CountdownSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The play/pause button.
    TogglePlayback,
    /// Session teardown.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// The countdown reached zero.
    Completed,
    /// A shutdown was requested or the session was closed first.
    Cancelled,
}

/// Tick `session` every `session.tick_interval()` until it completes or is
/// cancelled, handing every produced event to `observer`.
///
/// The first tick fires immediately. Ticks missed while the process was
/// suspended are skipped rather than replayed; the next one recomputes from
/// the deadline. A closed command channel only disables input.
pub async fn drive<F>(
    session: &mut CountdownSession,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut observer: F,
) -> DriveOutcome
where
    F: FnMut(&Event),
{
    let mut interval = time::interval(session.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut input_open = true;

    loop {
        let step = tokio::select! {
            _ = interval.tick() => {
                for event in session.tick() {
                    observer(&event);
                }
                if session.is_complete() {
                    ControlFlow::Break(DriveOutcome::Completed)
                } else if session.is_closed() {
                    ControlFlow::Break(DriveOutcome::Cancelled)
                } else {
                    ControlFlow::Continue(())
                }
            }
            command = commands.recv(), if input_open => match command {
                Some(Command::TogglePlayback) => {
                    if let Some(event) = session.toggle_play_pause() {
                        observer(&event);
                    }
                    ControlFlow::Continue(())
                }
                Some(Command::Shutdown) => ControlFlow::Break(DriveOutcome::Cancelled),
                None => {
                    tracing::debug!("input closed, ticking only");
                    input_open = false;
                    ControlFlow::Continue(())
                }
            },
        };
        if let ControlFlow::Break(outcome) = step {
            tracing::debug!(?outcome, "driver stopped");
            return outcome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::config::SessionSettings;
    use crate::countdown::Deadline;
    use crate::error::PlaybackError;
    use crate::playback::AudioTrack;
    use crate::presentation::ParticleDescriptor;
    use crate::render::{ParticleRenderer, RendererHandle, TextCycler};
    use crate::session::Capabilities;
    use chrono::{DateTime, Utc};
    use std::time::Duration;

    /// Wall clock derived from tokio's (pausable) clock.
    struct TokioClock {
        origin: DateTime<Utc>,
        started: time::Instant,
    }

    impl Clock for TokioClock {
        fn now(&self) -> DateTime<Utc> {
            let elapsed = time::Instant::now() - self.started;
            self.origin + chrono::Duration::from_std(elapsed).unwrap()
        }
    }

    struct Silent;

    impl AudioTrack for Silent {
        fn play(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn pause(&mut self) {}
        fn rewind(&mut self) {}
        fn position(&self) -> Duration {
            Duration::ZERO
        }
        fn is_playing(&self) -> bool {
            false
        }
    }

    impl ParticleRenderer for Silent {
        fn initialize(&mut self, descriptor: &ParticleDescriptor) -> RendererHandle {
            RendererHandle(descriptor.render_epoch)
        }
        fn dispose(&mut self, _handle: RendererHandle) {}
    }

    impl TextCycler for Silent {
        fn start(&mut self, _messages: &[String]) {}
    }

    fn session(lead_secs: i64) -> CountdownSession {
        let origin = Utc::now();
        let deadline = Deadline::new(origin + chrono::Duration::seconds(lead_secs));
        CountdownSession::start(
            SessionSettings::with_deadline(deadline),
            Box::new(TokioClock {
                origin,
                started: time::Instant::now(),
            }),
            Capabilities {
                ambient: Box::new(Silent),
                celebration: Box::new(Silent),
                renderer: Box::new(Silent),
                text: Box::new(Silent),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_once() {
        let mut session = session(40);
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut kinds = Vec::new();
        let outcome = drive(&mut session, rx, |e| kinds.push(e.kind())).await;

        assert_eq!(outcome, DriveOutcome::Completed);
        let count = |k: &str| kinds.iter().filter(|x| **x == k).count();
        assert_eq!(count("tick"), 41);
        assert_eq!(count("threshold_reached"), 1);
        assert_eq!(count("countdown_completed"), 1);
        assert_eq!(count("presentation_swapped"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toggles_between_ticks_and_stops_on_shutdown() {
        let mut session = session(600);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Command::TogglePlayback).unwrap();
        tx.send(Command::TogglePlayback).unwrap();
        tx.send(Command::Shutdown).unwrap();

        let mut toggles = Vec::new();
        let outcome = drive(&mut session, rx, |e| {
            if let Event::AmbientToggled { playing, .. } = e {
                toggles.push(*playing);
            }
        })
        .await;

        assert_eq!(outcome, DriveOutcome::Cancelled);
        assert_eq!(toggles, vec![true, false]);
        assert!(!session.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_keeps_ticking() {
        let mut session = session(3);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(tx);
        let outcome = drive(&mut session, rx, |_| {}).await;
        assert_eq!(outcome, DriveOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn past_deadline_completes_on_first_tick() {
        let mut session = session(-3600);
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut ticks = 0;
        let outcome = drive(&mut session, rx, |e| {
            if e.kind() == "tick" {
                ticks += 1;
            }
        })
        .await;
        assert_eq!(outcome, DriveOutcome::Completed);
        assert_eq!(ticks, 1);
    }
}
