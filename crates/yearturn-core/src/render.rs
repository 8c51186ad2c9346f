//! Capability seams for the particle background and the text cycler.
//!
//! The core never looks inside either collaborator. [`Backdrop`] and
//! [`Marquee`] decide *when* to hand them new input: a renderer is rebuilt per
//! `render_epoch`, a cycler is restarted whenever the message slice it was
//! given is replaced.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::presentation::ParticleDescriptor;

/// Opaque handle to one live background simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RendererHandle(pub u64);

/// Draws an animated background from a descriptor.
pub trait ParticleRenderer {
    fn initialize(&mut self, descriptor: &ParticleDescriptor) -> RendererHandle;

    fn dispose(&mut self, handle: RendererHandle);
}

/// Animates a sequence of strings one at a time, once each.
pub trait TextCycler {
    fn start(&mut self, messages: &[String]);
}

/// Owns the renderer and its live handle.
pub struct Backdrop {
    renderer: Box<dyn ParticleRenderer>,
    live: Option<(u64, RendererHandle)>,
}

impl Backdrop {
    pub fn new(renderer: Box<dyn ParticleRenderer>) -> Self {
        Self {
            renderer,
            live: None,
        }
    }

    pub fn live_epoch(&self) -> Option<u64> {
        self.live.map(|(epoch, _)| epoch)
    }

    /// Rebuild the background if `descriptor` belongs to a new epoch.
    ///
    /// Returns true when a new simulation was initialized.
    pub fn sync(&mut self, descriptor: &ParticleDescriptor) -> bool {
        if self.live_epoch() == Some(descriptor.render_epoch) {
            return false;
        }
        if let Some((_, handle)) = self.live.take() {
            self.renderer.dispose(handle);
        }
        let handle = self.renderer.initialize(descriptor);
        tracing::debug!(epoch = descriptor.render_epoch, ?handle, "backdrop initialized");
        self.live = Some((descriptor.render_epoch, handle));
        true
    }

    pub fn dispose(&mut self) {
        if let Some((_, handle)) = self.live.take() {
            self.renderer.dispose(handle);
        }
    }
}

impl fmt::Debug for Backdrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backdrop").field("live", &self.live).finish()
    }
}

/// Owns the text cycler and the message slice it is currently showing.
pub struct Marquee {
    cycler: Box<dyn TextCycler>,
    shown: Option<Arc<[String]>>,
}

impl Marquee {
    pub fn new(cycler: Box<dyn TextCycler>) -> Self {
        Self {
            cycler,
            shown: None,
        }
    }

    /// Restart the cycler if `messages` is a different slice from the last one.
    pub fn sync(&mut self, messages: &Arc<[String]>) -> bool {
        if let Some(shown) = &self.shown {
            if Arc::ptr_eq(shown, messages) {
                return false;
            }
        }
        self.cycler.start(messages);
        self.shown = Some(Arc::clone(messages));
        true
    }
}

impl fmt::Debug for Marquee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marquee")
            .field("shown", &self.shown.as_ref().map(|m| m.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{ParticleSettings, PresentationState};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        initialized: Vec<u64>,
        disposed: Vec<RendererHandle>,
        started: Vec<Vec<String>>,
    }

    struct Recorder(Rc<RefCell<Calls>>);

    impl ParticleRenderer for Recorder {
        fn initialize(&mut self, descriptor: &ParticleDescriptor) -> RendererHandle {
            let mut calls = self.0.borrow_mut();
            calls.initialized.push(descriptor.render_epoch);
            RendererHandle(calls.initialized.len() as u64)
        }
        fn dispose(&mut self, handle: RendererHandle) {
            self.0.borrow_mut().disposed.push(handle);
        }
    }

    impl TextCycler for Recorder {
        fn start(&mut self, messages: &[String]) {
            self.0.borrow_mut().started.push(messages.to_vec());
        }
    }

    #[test]
    fn backdrop_rebuilds_only_on_new_epoch() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut backdrop = Backdrop::new(Box::new(Recorder(Rc::clone(&calls))));
        let settings = ParticleSettings::default();
        let mut state = PresentationState::default();

        assert!(backdrop.sync(&state.descriptor(&settings)));
        assert!(!backdrop.sync(&state.descriptor(&settings)));
        state.swap_to_post();
        assert!(backdrop.sync(&state.descriptor(&settings)));
        backdrop.dispose();
        backdrop.dispose();

        let calls = calls.borrow();
        assert_eq!(calls.initialized, vec![0, 1]);
        assert_eq!(calls.disposed, vec![RendererHandle(1), RendererHandle(2)]);
    }

    #[test]
    fn marquee_restarts_on_new_slice_only() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut marquee = Marquee::new(Box::new(Recorder(Rc::clone(&calls))));
        let mut state = PresentationState::default();

        assert!(marquee.sync(state.messages()));
        assert!(!marquee.sync(state.messages()));
        state.swap_to_post();
        assert!(marquee.sync(state.messages()));
        assert!(!marquee.sync(state.messages()));
        assert_eq!(calls.borrow().started.len(), 2);
    }
}
