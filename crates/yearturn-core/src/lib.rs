//! # Yearturn Core Library
//!
//! The core of a celebratory countdown display: a wall-clock countdown to a
//! fixed deadline, a one-shot audio cue at a remaining-time threshold, a
//! two-track playback controller and a presentation state that swaps once
//! on completion.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a wall-clock state machine (`Running -> Complete`)
//!   that recomputes remaining time from the absolute deadline on every tick
//! - **Threshold Trigger**: fires once when remaining time reaches a target
//! - **Playback Controller**: sole owner of the ambient and celebration tracks
//! - **Presentation State**: message set, particle preset and render epoch
//! - **Session**: one explicit context object per page load, driven by
//!   [`driver::drive`] on a tokio interval
//!
//! Particle rendering, text animation and audio decoding are external
//! collaborators reached through the traits in [`render`] and [`playback`].

pub mod clock;
pub mod config;
pub mod countdown;
pub mod driver;
pub mod error;
pub mod events;
pub mod playback;
pub mod presentation;
pub mod render;
pub mod session;
pub mod threshold;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, SessionSettings};
pub use countdown::{CountdownEngine, CountdownPhase, Deadline, RemainingTime};
pub use driver::{drive, Command, DriveOutcome};
pub use error::{ConfigError, PlaybackError, ValidationError};
pub use events::Event;
pub use playback::{AmbientState, AudioTrack, PlaybackController, PlaybackState, TrackId};
pub use presentation::{
    BackgroundLayer, ParticleDescriptor, ParticleOptions, ParticlePreset, ParticleSettings,
    PresentationState, PresentationVariant,
};
pub use render::{ParticleRenderer, RendererHandle, TextCycler};
pub use session::{Capabilities, CountdownSession};
pub use threshold::{ThresholdMode, ThresholdTrigger};
