//! Presentation state: the message set and background preset on screen.
//!
//! Holds the PRE set until completion, then swaps to POST exactly once. The
//! swap bumps `render_epoch` so the particle renderer rebuilds its simulation
//! instead of morphing a live one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRE_MESSAGES: [&str; 5] = [
    "2024 is Almost Over! ⏳",
    "Goodbye 2024, Hello 2025! 👋",
    "The Final Countdown to 2025 Begins! 🎉",
    "Let’s Celebrate the End of 2024! 🥂",
    "Ready for New Beginnings in 2025! ✨",
];

pub const DEFAULT_POST_MESSAGES: [&str; 5] = [
    "🎉 Selamat Datang, Tahun Baru 2025! 🎉",
    "✨ A New Year, A New Journey! ✨",
    "Semoga Tahun 2025 Membawa Kebahagiaan, Kesuksesan, dan Kedamaian bagi Kita Semua 💖",
    "🙏 Tetap Sehat, Bersemangat, dan Selalu dalam Lindungan Tuhan 🌟",
    "🌍 Mari Bersama Menciptakan Tahun yang Luar Biasa! 🚀",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticlePreset {
    /// Layered hyperspace, snow and stars under custom particles.
    Default,
    /// Fireworks alone.
    Celebration,
}

/// A background-motion preset the renderer knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundLayer {
    Hyperspace,
    Snow,
    Stars,
    Fireworks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    Circle,
    Star,
}

/// Custom particle options for the pre-completion background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSettings {
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_shapes")]
    pub shapes: Vec<ParticleShape>,
    #[serde(default = "default_size_min")]
    pub size_min: f32,
    #[serde(default = "default_size_max")]
    pub size_max: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

fn default_count() -> u32 {
    150
}
fn default_shapes() -> Vec<ParticleShape> {
    vec![ParticleShape::Circle, ParticleShape::Star]
}
fn default_size_min() -> f32 {
    1.0
}
fn default_size_max() -> f32 {
    5.0
}
fn default_speed() -> f32 {
    2.0
}
fn default_palette() -> Vec<String> {
    vec!["#ffffff".into(), "#ffcc00".into(), "#00ffcc".into()]
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: default_count(),
            shapes: default_shapes(),
            size_min: default_size_min(),
            size_max: default_size_max(),
            speed: default_speed(),
            palette: default_palette(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParticleOptions {
    Custom(ParticleSettings),
    Named { preset: BackgroundLayer },
}

/// Everything a renderer needs to build one background simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDescriptor {
    pub layers: Vec<BackgroundLayer>,
    pub options: ParticleOptions,
    pub render_epoch: u64,
}

impl ParticlePreset {
    pub fn descriptor(self, settings: &ParticleSettings, render_epoch: u64) -> ParticleDescriptor {
        match self {
            ParticlePreset::Default => ParticleDescriptor {
                layers: vec![
                    BackgroundLayer::Hyperspace,
                    BackgroundLayer::Snow,
                    BackgroundLayer::Stars,
                ],
                options: ParticleOptions::Custom(settings.clone()),
                render_epoch,
            },
            ParticlePreset::Celebration => ParticleDescriptor {
                layers: vec![BackgroundLayer::Fireworks],
                options: ParticleOptions::Named {
                    preset: BackgroundLayer::Fireworks,
                },
                render_epoch,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationVariant {
    Pre,
    Post,
}

#[derive(Debug, Clone)]
pub struct PresentationState {
    variant: PresentationVariant,
    messages: Arc<[String]>,
    post_messages: Arc<[String]>,
    particle_preset: ParticlePreset,
    render_epoch: u64,
}

impl PresentationState {
    pub fn new(pre: Arc<[String]>, post: Arc<[String]>) -> Self {
        Self {
            variant: PresentationVariant::Pre,
            messages: pre,
            post_messages: post,
            particle_preset: ParticlePreset::Default,
            render_epoch: 0,
        }
    }

    pub fn variant(&self) -> PresentationVariant {
        self.variant
    }

    pub fn messages(&self) -> &Arc<[String]> {
        &self.messages
    }

    pub fn particle_preset(&self) -> ParticlePreset {
        self.particle_preset
    }

    pub fn render_epoch(&self) -> u64 {
        self.render_epoch
    }

    pub fn descriptor(&self, settings: &ParticleSettings) -> ParticleDescriptor {
        self.particle_preset.descriptor(settings, self.render_epoch)
    }

    /// Replace messages and preset with the POST variant.
    ///
    /// Returns false if the swap already happened.
    pub fn swap_to_post(&mut self) -> bool {
        if self.variant == PresentationVariant::Post {
            return false;
        }
        self.variant = PresentationVariant::Post;
        self.messages = Arc::clone(&self.post_messages);
        self.particle_preset = ParticlePreset::Celebration;
        self.render_epoch += 1;
        true
    }
}

impl Default for PresentationState {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRE_MESSAGES.iter().map(|m| m.to_string()).collect(),
            DEFAULT_POST_MESSAGES.iter().map(|m| m.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_pre_set() {
        let state = PresentationState::default();
        assert_eq!(state.variant(), PresentationVariant::Pre);
        assert_eq!(state.messages().len(), 5);
        assert_eq!(state.messages()[0], DEFAULT_PRE_MESSAGES[0]);
        assert_eq!(state.particle_preset(), ParticlePreset::Default);
        assert_eq!(state.render_epoch(), 0);
    }

    #[test]
    fn swap_happens_once() {
        let mut state = PresentationState::default();
        assert!(state.swap_to_post());
        let after_first = Arc::clone(state.messages());
        assert!(!state.swap_to_post());

        assert_eq!(state.render_epoch(), 1);
        assert_eq!(state.messages().len(), 5);
        assert!(Arc::ptr_eq(state.messages(), &after_first));
        assert_eq!(state.messages()[4], DEFAULT_POST_MESSAGES[4]);
        assert_eq!(state.particle_preset(), ParticlePreset::Celebration);
    }

    #[test]
    fn default_descriptor_layers_presets_under_custom_particles() {
        let state = PresentationState::default();
        let descriptor = state.descriptor(&ParticleSettings::default());
        assert_eq!(descriptor.layers.len(), 3);
        match descriptor.options {
            ParticleOptions::Custom(settings) => {
                assert_eq!(settings.count, 150);
                assert_eq!(settings.palette.len(), 3);
            }
            other => panic!("unexpected options: {other:?}"),
        }
    }

    #[test]
    fn celebration_descriptor_replaces_composite() {
        let mut state = PresentationState::default();
        state.swap_to_post();
        let descriptor = state.descriptor(&ParticleSettings::default());
        assert_eq!(descriptor.layers, vec![BackgroundLayer::Fireworks]);
        assert_eq!(
            descriptor.options,
            ParticleOptions::Named {
                preset: BackgroundLayer::Fireworks
            }
        );
        assert_eq!(descriptor.render_epoch, 1);
    }
}
