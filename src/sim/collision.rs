//! Collision detection and response
//!
//! Every body is a circle whose diameter is its `size`. Checks are all-pairs;
//! entity counts stay small enough that no spatial index is needed. Hits only
//! clear alive flags here, pruning happens in the tick afterwards.

use glam::Vec2;

use super::particles::spawn_burst;
use super::state::{Avatar, GameEvent, GameState, Hostile, Projectile};
use crate::consts::{COLOR_HIT_BURST, COLOR_KILL_BURST};
use crate::distance;

/// A circular collider
pub trait Body {
    fn center(&self) -> Vec2;
    /// Diameter
    fn size(&self) -> f32;

    fn overlaps<B: Body>(&self, other: &B) -> bool {
        circles_overlap(self.center(), self.size(), other.center(), other.size())
    }
}

impl Body for Avatar {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

impl Body for Hostile {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

impl Body for Projectile {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

/// Circles overlap iff the centre distance is below the summed radii
#[inline]
pub fn circles_overlap(a: Vec2, size_a: f32, b: Vec2, size_b: f32) -> bool {
    distance(a, b) < (size_a + size_b) / 2.0
}

/// What the resolver did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Hostiles destroyed by projectiles
    pub kills: u32,
    /// Hostiles that rammed the avatar
    pub contacts: u32,
    /// The avatar's health reached zero during this pass
    pub avatar_destroyed: bool,
}

impl CollisionReport {
    /// Nothing was hit this pass
    pub fn is_empty(&self) -> bool {
        self.kills == 0 && self.contacts == 0
    }
}

/// Projectile vs hostile, then hostile vs avatar.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    // Projectiles vs hostiles: one hostile per projectile
    let mut kill_sites: Vec<(u32, Vec2)> = Vec::new();
    for projectile in state.projectiles.iter_mut().filter(|p| p.alive) {
        if let Some(hostile) = state
            .hostiles
            .iter_mut()
            .find(|h| h.alive && projectile.overlaps(&**h))
        {
            projectile.alive = false;
            hostile.alive = false;
            kill_sites.push((hostile.id, hostile.pos));
        }
    }

    for &(id, pos) in &kill_sites {
        state.score += state.tuning.level.kill_reward;
        state.kills_this_level += 1;
        state.kills_total += 1;
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            pos,
            COLOR_KILL_BURST,
            &state.tuning.particles,
        );
        state.events.push(GameEvent::HostileDestroyed { id, pos });
    }
    report.kills = kill_sites.len() as u32;

    // Hostiles vs avatar
    if state.avatar.is_dead() {
        return report;
    }
    let damage = state.tuning.hostile.contact_damage;
    let mut contact_sites: Vec<(Vec2, u32)> = Vec::new();
    for hostile in state.hostiles.iter_mut().filter(|h| h.alive) {
        if !hostile.overlaps(&state.avatar) {
            continue;
        }
        hostile.alive = false;
        let fatal = state.avatar.take_damage(damage);
        contact_sites.push((hostile.pos, state.avatar.health));
        if fatal {
            report.avatar_destroyed = true;
            break;
        }
    }

    for &(pos, health) in &contact_sites {
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            pos,
            COLOR_HIT_BURST,
            &state.tuning.particles,
        );
        state.events.push(GameEvent::AvatarHit { damage, health });
    }
    report.contacts = contact_sites.len() as u32;

    if report.avatar_destroyed {
        state.enter_game_over();
    }

    report
}
