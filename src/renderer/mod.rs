//! Render sink
//!
//! The simulation never draws. `sprites` flattens a `GameState` into a
//! back-to-front draw list; platform painters only consume that list.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::consts::*;
use crate::sim::GameState;

/// What a sprite depicts (painters pick the shape from this)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Avatar,
    Hostile,
    Projectile,
    Particle,
}

/// One drawable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
    /// Radians
    pub rotation: f32,
}

/// Draw list, back to front: particles, projectiles, hostiles, avatar
pub fn sprites(state: &GameState) -> Vec<Sprite> {
    let mut out = Vec::with_capacity(
        state.particles.len() + state.projectiles.len() + state.hostiles.len() + 1,
    );

    out.extend(state.particles.iter().map(|p| Sprite {
        kind: SpriteKind::Particle,
        pos: p.pos,
        // Particle size is a radius
        size: p.size * 2.0,
        color: p.color,
        alpha: p.alpha.clamp(0.0, 1.0),
        rotation: 0.0,
    }));
    out.extend(state.projectiles.iter().map(|p| Sprite {
        kind: SpriteKind::Projectile,
        pos: p.pos,
        size: p.size,
        color: COLOR_PROJECTILE,
        alpha: 1.0,
        rotation: p.vel.y.atan2(p.vel.x),
    }));
    out.extend(state.hostiles.iter().map(|h| Sprite {
        kind: SpriteKind::Hostile,
        pos: h.pos,
        size: h.size,
        color: COLOR_HOSTILE,
        alpha: 1.0,
        rotation: h.rotation,
    }));
    out.push(Sprite {
        kind: SpriteKind::Avatar,
        pos: state.avatar.pos,
        size: state.avatar.size,
        color: COLOR_AVATAR,
        alpha: 1.0,
        rotation: 0.0,
    });

    out
}

/// `0xRRGGBB` as a CSS hex string
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xFF_FFFF)
}
