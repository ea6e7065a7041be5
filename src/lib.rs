//! Neon Swarm - A neon arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `renderer`: Render sink (sprite list + Canvas2D painter on web)
//! - `platform`: Browser input translated into per-tick intents
//! - `settings`: Quality preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena dimensions (desktop canvas)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Palette (0xRRGGBB)
    pub const COLOR_AVATAR: u32 = 0xFF00FF;
    pub const COLOR_HOSTILE: u32 = 0xFF0000;
    pub const COLOR_PROJECTILE: u32 = 0x00FFFF;
    /// Burst when a projectile kills a hostile
    pub const COLOR_KILL_BURST: u32 = 0x00FFFF;
    /// Burst when a hostile rams the avatar
    pub const COLOR_HIT_BURST: u32 = 0xFF0000;
    /// Burst at the arena centre on level completion
    pub const COLOR_LEVEL_BURST: u32 = 0x00FFCC;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let len = delta.length();
    if len > 0.0 && len.is_finite() {
        Some(delta / len)
    } else {
        None
    }
}

/// Move `from` toward `to` by at most `step`, never overshooting.
///
/// Coincident points return `from` unchanged.
pub fn seek_step(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let Some(dir) = direction_to(from, to) else {
        return from;
    };
    let remaining = distance(from, to);
    if step >= remaining {
        to
    } else {
        from + dir * step
    }
}

/// Clamp a centre position so a body of `half` extent stays inside `bounds`.
///
/// A body wider than the arena is pinned to the arena centre on that axis.
pub fn clamp_to_arena(pos: Vec2, half: f32, bounds: Vec2) -> Vec2 {
    let clamp_axis = |v: f32, dim: f32| {
        if dim <= half * 2.0 {
            dim / 2.0
        } else {
            v.clamp(half, dim - half)
        }
    };
    Vec2::new(clamp_axis(pos.x, bounds.x), clamp_axis(pos.y, bounds.y))
}

/// True when `pos` is strictly inside the arena rectangle `(0,0)..bounds`
#[inline]
pub fn in_arena(pos: Vec2, bounds: Vec2) -> bool {
    pos.x > 0.0 && pos.x < bounds.x && pos.y > 0.0 && pos.y < bounds.y
}
