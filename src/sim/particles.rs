//! Explosion bursts (cosmetic only)

use glam::Vec2;
use rand_pcg::Pcg32;

use super::state::{Particle, uniform};
use crate::tuning::ParticleTuning;

/// Emit a ring of particles evenly spaced around `origin`.
///
/// Particles beyond `max_particles` are dropped.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    origin: Vec2,
    color: u32,
    tuning: &ParticleTuning,
) {
    let count = tuning.count.max(1);
    for i in 0..count {
        if particles.len() >= tuning.max_particles {
            break;
        }
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let speed = uniform(rng, tuning.speed_min, tuning.speed_max);
        let size = uniform(rng, tuning.size_min, tuning.size_max);
        particles.push(Particle {
            pos: origin,
            vel: Vec2::from_angle(angle) * speed,
            color,
            alpha: 1.0,
            size,
            alive: true,
        });
    }
}

/// Advance every particle and prune the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32, tuning: &ParticleTuning) {
    for particle in particles.iter_mut() {
        particle.update(dt, tuning);
    }
    particles.retain(|p| p.alive);
}
