//! A one-row particle field drawn with glyphs.
//!
//! Each initialization seeds a fresh field from the render epoch; the field
//! scrolls by the configured speed every frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yearturn_core::presentation::ParticleShape;
use yearturn_core::{BackgroundLayer, ParticleDescriptor, ParticleOptions, ParticleRenderer, RendererHandle};

const WIDTH: usize = 48;
/// Particle count that fills about half the row.
const FULL_COUNT: f64 = 300.0;

#[derive(Debug)]
struct Field {
    handle: RendererHandle,
    cells: Vec<char>,
    drift: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TerminalBackdrop {
    field: Rc<RefCell<Option<Field>>>,
    issued: Rc<Cell<u64>>,
}

impl TerminalBackdrop {
    pub fn row(&self, frame: u64) -> String {
        match &*self.field.borrow() {
            Some(field) => {
                let shift = (frame as usize).wrapping_mul(field.drift) % WIDTH;
                field.cells[shift..]
                    .iter()
                    .chain(&field.cells[..shift])
                    .collect()
            }
            None => " ".repeat(WIDTH),
        }
    }

    #[cfg(test)]
    fn is_live(&self) -> bool {
        self.field.borrow().is_some()
    }
}

fn layer_glyph(layer: BackgroundLayer) -> char {
    match layer {
        BackgroundLayer::Hyperspace => '-',
        BackgroundLayer::Snow => '.',
        BackgroundLayer::Stars => '+',
        BackgroundLayer::Fireworks => '✶',
    }
}

impl ParticleRenderer for TerminalBackdrop {
    fn initialize(&mut self, descriptor: &ParticleDescriptor) -> RendererHandle {
        let mut glyphs: Vec<char> = descriptor.layers.iter().copied().map(layer_glyph).collect();
        let (density, drift) = match &descriptor.options {
            ParticleOptions::Custom(settings) => {
                glyphs.extend(settings.shapes.iter().map(|shape| match shape {
                    ParticleShape::Circle => 'o',
                    ParticleShape::Star => '*',
                }));
                let density = (f64::from(settings.count) / FULL_COUNT).clamp(0.0, 1.0) * 0.5;
                (density, settings.speed.round().max(1.0) as usize)
            }
            ParticleOptions::Named { .. } => {
                glyphs.extend(['*', 'o', '·']);
                (0.35, 1)
            }
        };

        let mut rng = StdRng::seed_from_u64(descriptor.render_epoch);
        let cells = (0..WIDTH)
            .map(|_| {
                if rng.gen_bool(density) {
                    glyphs[rng.gen_range(0..glyphs.len())]
                } else {
                    ' '
                }
            })
            .collect();

        self.issued.set(self.issued.get() + 1);
        let handle = RendererHandle(self.issued.get());
        *self.field.borrow_mut() = Some(Field {
            handle,
            cells,
            drift,
        });
        handle
    }

    fn dispose(&mut self, handle: RendererHandle) {
        let mut field = self.field.borrow_mut();
        if field.as_ref().is_some_and(|f| f.handle == handle) {
            *field = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yearturn_core::{ParticlePreset, ParticleSettings};

    #[test]
    fn field_is_blank_until_initialized() {
        let backdrop = TerminalBackdrop::default();
        assert!(!backdrop.is_live());
        assert_eq!(backdrop.row(0).trim(), "");
    }

    #[test]
    fn celebration_field_uses_fireworks_glyphs() {
        let mut backdrop = TerminalBackdrop::default();
        let descriptor = ParticlePreset::Celebration.descriptor(&ParticleSettings::default(), 1);
        backdrop.initialize(&descriptor);
        let row = backdrop.row(0);
        assert_eq!(row.chars().count(), WIDTH);
        assert!(row.chars().all(|c| " ✶*o·".contains(c)));
    }

    #[test]
    fn dispose_ignores_stale_handles() {
        let mut backdrop = TerminalBackdrop::default();
        let settings = ParticleSettings::default();
        let first = backdrop.initialize(&ParticlePreset::Default.descriptor(&settings, 0));
        let second = backdrop.initialize(&ParticlePreset::Celebration.descriptor(&settings, 1));
        backdrop.dispose(first);
        assert!(backdrop.is_live());
        backdrop.dispose(second);
        assert!(!backdrop.is_live());
    }

    #[test]
    fn rows_scroll_between_frames() {
        let mut backdrop = TerminalBackdrop::default();
        backdrop.initialize(&ParticlePreset::Default.descriptor(&ParticleSettings::default(), 0));
        let a = backdrop.row(0);
        let b = backdrop.row(WIDTH as u64);
        // Speed 2 wraps back to the start after WIDTH frames.
        assert_eq!(a, b);
    }
}
