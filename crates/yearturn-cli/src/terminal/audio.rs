//! Audio tracks backed by asset files.
//!
//! Decoding and output are outside this program; a track verifies its asset
//! exists, keeps a play position and logs what it would emit. Like a browser,
//! it refuses to start before the user has interacted once, unless the gate
//! was opened up front.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use yearturn_core::{AudioTrack, PlaybackError, TrackId};

/// Set once the user has pressed a control.
#[derive(Debug, Clone, Default)]
pub struct InteractionGate(Arc<AtomicBool>);

impl InteractionGate {
    pub fn new(open: bool) -> Self {
        Self(Arc::new(AtomicBool::new(open)))
    }

    pub fn open(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct AssetTrack {
    id: TrackId,
    path: PathBuf,
    looped: bool,
    gate: InteractionGate,
    started: Option<Instant>,
    offset: Duration,
}

impl AssetTrack {
    pub fn new(id: TrackId, path: PathBuf, looped: bool, gate: InteractionGate) -> Self {
        Self {
            id,
            path,
            looped,
            gate,
            started: None,
            offset: Duration::ZERO,
        }
    }
}

impl AudioTrack for AssetTrack {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.started.is_some() {
            return Ok(());
        }
        if !self.gate.is_open() {
            return Err(PlaybackError::Blocked { track: self.id });
        }
        match std::fs::metadata(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlaybackError::AssetMissing {
                    track: self.id,
                    path: self.path.clone(),
                });
            }
            Ok(meta) if !meta.is_file() => {
                return Err(PlaybackError::Device {
                    track: self.id,
                    message: format!("{} is not a regular file", self.path.display()),
                });
            }
            _ => {}
        }
        if let Err(e) = std::fs::File::open(&self.path) {
            return Err(PlaybackError::Device {
                track: self.id,
                message: e.to_string(),
            });
        }
        self.started = Some(Instant::now());
        tracing::info!(
            track = %self.id,
            path = %self.path.display(),
            looped = self.looped,
            from = ?self.offset,
            "♪ playing"
        );
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.offset += started.elapsed();
            tracing::info!(track = %self.id, at = ?self.offset, "♪ paused");
        }
    }

    fn rewind(&mut self) {
        self.offset = Duration::ZERO;
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn position(&self) -> Duration {
        self.offset + self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    fn is_playing(&self) -> bool {
        self.started.is_some()
    }
}
