//! Hostile spawn scheduling
//!
//! One hostile per elapsed interval, placed just outside a random arena edge.
//! Skipped ticks never cause catch-up spawns.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Hostile, uniform};
use crate::tuning::SpawnTuning;

/// Spawn timing gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Clock time of the last spawn (or of the last reset)
    pub last_spawn: f64,
    /// Seconds between spawns at the current difficulty
    pub interval: f32,
}

impl SpawnScheduler {
    pub fn new(level: u32, now: f64, tuning: &SpawnTuning) -> Self {
        Self {
            last_spawn: now,
            interval: interval_for_level(level, tuning),
        }
    }

    /// Re-arm for `level`, restarting the interval from `now`
    pub fn prepare_level(&mut self, level: u32, now: f64, tuning: &SpawnTuning) {
        self.last_spawn = now;
        self.interval = interval_for_level(level, tuning);
    }

    /// True (and resets the gate) if strictly more than one interval passed
    pub fn poll(&mut self, now: f64) -> bool {
        if now - self.last_spawn > f64::from(self.interval) {
            self.last_spawn = now;
            true
        } else {
            false
        }
    }
}

/// `max(floor, base - level * step)`
pub fn interval_for_level(level: u32, tuning: &SpawnTuning) -> f32 {
    (tuning.base_interval - level as f32 * tuning.step).max(tuning.floor_interval)
}

/// Random point one `offset` outside a random edge of the arena
pub fn edge_position(rng: &mut Pcg32, bounds: Vec2, offset: f32) -> Vec2 {
    let along_x = uniform(rng, 0.0, bounds.x);
    let along_y = uniform(rng, 0.0, bounds.y);
    match rng.random_range(0..4u32) {
        0 => Vec2::new(along_x, -offset),
        1 => Vec2::new(bounds.x + offset, along_y),
        2 => Vec2::new(along_x, bounds.y + offset),
        _ => Vec2::new(-offset, along_y),
    }
}

/// Run the scheduler for this tick; spawns at most one hostile.
pub fn run_scheduler(state: &mut GameState) -> bool {
    if !state.spawner.poll(state.clock) {
        return false;
    }

    let bounds = state.bounds();
    let size = state.tuning.hostile.size;
    let speed = state.hostile_speed()
        + uniform(&mut state.rng, 0.0, state.tuning.hostile.speed_variance);
    let max_spin = state.tuning.hostile.max_spin;
    let spin = uniform(&mut state.rng, -max_spin, max_spin);
    let pos = edge_position(&mut state.rng, bounds, size);

    let id = state.next_entity_id();
    state.hostiles.push(Hostile {
        id,
        pos,
        size,
        speed,
        rotation: 0.0,
        spin,
        alive: true,
    });
    state.events.push(GameEvent::HostileSpawned { id });
    log::debug!(
        "Spawned hostile {} at ({:.0}, {:.0}) speed={:.1}",
        id,
        pos.x,
        pos.y,
        speed
    );
    true
}
