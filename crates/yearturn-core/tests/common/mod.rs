//! Recording capabilities shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use yearturn_core::{
    AudioTrack, Capabilities, CountdownSession, Deadline, ManualClock, ParticleDescriptor,
    ParticleRenderer, PlaybackError, RendererHandle, SessionSettings, TextCycler, ThresholdMode,
    TrackId,
};

#[derive(Debug, Default)]
pub struct TrackLog {
    pub plays: u32,
    pub pauses: u32,
    pub rewinds: u32,
    pub playing: bool,
    pub position: Duration,
}

pub struct RecordingTrack {
    pub id: TrackId,
    pub log: Rc<RefCell<TrackLog>>,
    pub refuse: bool,
}

impl AudioTrack for RecordingTrack {
    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut log = self.log.borrow_mut();
        log.plays += 1;
        if self.refuse {
            return Err(PlaybackError::Blocked { track: self.id });
        }
        log.playing = true;
        log.position += Duration::from_secs(3);
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

#[derive(Debug, Default)]
pub struct ScreenLog {
    pub initialized: Vec<ParticleDescriptor>,
    pub disposed: Vec<RendererHandle>,
    pub text_runs: Vec<Vec<String>>,
}

pub struct RecordingScreen(pub Rc<RefCell<ScreenLog>>);

impl ParticleRenderer for RecordingScreen {
    fn initialize(&mut self, descriptor: &ParticleDescriptor) -> RendererHandle {
        let mut log = self.0.borrow_mut();
        log.initialized.push(descriptor.clone());
        RendererHandle(log.initialized.len() as u64)
    }

    fn dispose(&mut self, handle: RendererHandle) {
        self.0.borrow_mut().disposed.push(handle);
    }
}

impl TextCycler for RecordingScreen {
    fn start(&mut self, messages: &[String]) {
        self.0.borrow_mut().text_runs.push(messages.to_vec());
    }
}

pub struct Harness {
    pub session: CountdownSession,
    pub clock: Rc<ManualClock>,
    pub ambient: Rc<RefCell<TrackLog>>,
    pub celebration: Rc<RefCell<TrackLog>>,
    pub screen: Rc<RefCell<ScreenLog>>,
}

pub struct HarnessBuilder {
    lead_secs: i64,
    mode: ThresholdMode,
    refuse_celebration: bool,
}

impl HarnessBuilder {
    pub fn lead(lead_secs: i64) -> Self {
        Self {
            lead_secs,
            mode: ThresholdMode::Exact,
            refuse_celebration: false,
        }
    }

    pub fn mode(mut self, mode: ThresholdMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn refuse_celebration(mut self) -> Self {
        self.refuse_celebration = true;
        self
    }

    pub fn build(self) -> Harness {
        let start = Utc.with_ymd_and_hms(2024, 12, 31, 16, 0, 0).unwrap();
        let clock = Rc::new(ManualClock::new(start));
        let deadline = Deadline::new(start + chrono::Duration::seconds(self.lead_secs));
        let mut settings = SessionSettings::with_deadline(deadline);
        settings.threshold_mode = self.mode;

        let ambient = Rc::new(RefCell::new(TrackLog::default()));
        let celebration = Rc::new(RefCell::new(TrackLog::default()));
        let screen = Rc::new(RefCell::new(ScreenLog::default()));

        let session = CountdownSession::start(
            settings,
            Box::new(Rc::clone(&clock)),
            Capabilities {
                ambient: Box::new(RecordingTrack {
                    id: TrackId::Ambient,
                    log: Rc::clone(&ambient),
                    refuse: false,
                }),
                celebration: Box::new(RecordingTrack {
                    id: TrackId::Celebration,
                    log: Rc::clone(&celebration),
                    refuse: self.refuse_celebration,
                }),
                renderer: Box::new(RecordingScreen(Rc::clone(&screen))),
                text: Box::new(RecordingScreen(Rc::clone(&screen))),
            },
        );

        Harness {
            session,
            clock,
            ambient,
            celebration,
            screen,
        }
    }
}

impl Harness {
    /// Advance the clock by `secs` and tick once, returning the event kinds.
    pub fn step(&mut self, secs: i64) -> Vec<&'static str> {
        self.clock.advance(chrono::Duration::seconds(secs));
        self.session.tick().iter().map(|e| e.kind()).collect()
    }
}
