//! Terminal implementations of the session's external collaborators.

mod audio;
mod backdrop;
mod typewriter;

pub use audio::{AssetTrack, InteractionGate};
pub use backdrop::TerminalBackdrop;
pub use typewriter::Typewriter;

use std::path::PathBuf;

use yearturn_core::config::AudioConfig;
use yearturn_core::{Capabilities, TrackId};

/// Handles the front end keeps to read back what the session drove.
pub struct Screen {
    pub backdrop: TerminalBackdrop,
    pub typewriter: Typewriter,
    pub gate: InteractionGate,
}

impl Screen {
    pub fn line(&self) -> String {
        self.typewriter.line()
    }

    pub fn backdrop_row(&self, frame: u64) -> String {
        self.backdrop.row(frame)
    }
}

/// Build the capabilities for one session from the audio config.
pub fn capabilities(audio: &AudioConfig) -> (Capabilities, Screen) {
    let gate = InteractionGate::new(!audio.require_interaction);
    let backdrop = TerminalBackdrop::default();
    let typewriter = Typewriter::default();

    let caps = Capabilities {
        ambient: Box::new(AssetTrack::new(
            TrackId::Ambient,
            PathBuf::from(&audio.ambient),
            audio.ambient_loop,
            gate.clone(),
        )),
        celebration: Box::new(AssetTrack::new(
            TrackId::Celebration,
            PathBuf::from(&audio.celebration),
            false,
            gate.clone(),
        )),
        renderer: Box::new(backdrop.clone()),
        text: Box::new(typewriter.clone()),
    };
    let screen = Screen {
        backdrop,
        typewriter,
        gate,
    };
    (caps, screen)
}
