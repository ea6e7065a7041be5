//! Display preferences
//!
//! Affect only presentation and the particle budget, never gameplay rules.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }

    /// Whether to draw the background grid
    pub fn grid_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Canvas shadow blur used for the neon glow (0 disables it)
    pub fn glow_blur(&self) -> f64 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 10.0,
            QualityPreset::High => 20.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions)
    pub particles: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (no glow, no bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles || self.reduced_motion {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective glow (respects reduced_motion)
    pub fn glow_blur(&self) -> f64 {
        if self.reduced_motion {
            0.0
        } else {
            self.quality.glow_blur()
        }
    }

    /// Push presentation limits into a session's tuning
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.particles.max_particles = self.max_particles();
    }
}
