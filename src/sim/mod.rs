//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only from the `dt` passed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Body, CollisionReport, circles_overlap, resolve_collisions};
pub use particles::{spawn_burst, update_particles};
pub use spawn::{SpawnScheduler, interval_for_level};
pub use state::{Avatar, GameEvent, GamePhase, GameState, Hostile, Hud, Particle, Projectile};
pub use tick::{TickInput, tick};
