//! Game state and core simulation types
//!
//! Everything the simulation touches is owned by `GameState`; the host holds
//! one instance and drives it through `tick`, `next_level` and `restart`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::spawn_burst;
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::tuning::{AvatarTuning, ParticleTuning, Tuning};
use crate::{clamp_to_arena, in_arena, seek_step};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// User pause
    Paused,
    /// Kill target reached, waiting for `next_level`
    LevelComplete,
    /// Avatar destroyed, waiting for `restart`
    GameOver,
}

/// Notable things that happened during the last tick (for UI/audio sinks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { count: u32 },
    HostileSpawned { id: u32 },
    HostileDestroyed { id: u32, pos: Vec2 },
    AvatarHit { damage: u32, health: u32 },
    LevelComplete { level: u32, bonus: u64 },
    GameOver { score: u64, level: u32 },
}

/// The player-controlled sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// Pixels per second along each active axis
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
}

impl Avatar {
    pub fn new(pos: Vec2, tuning: &AvatarTuning) -> Self {
        Self {
            pos,
            size: tuning.size,
            speed: tuning.speed,
            health: tuning.max_health,
            max_health: tuning.max_health,
        }
    }

    /// Displace by `speed * dt` along each axis of `axis` (components in
    /// -1..=1), then clamp inside the arena.
    pub fn update(&mut self, axis: Vec2, dt: f32, bounds: Vec2) {
        self.pos += axis * self.speed * dt;
        self.pos = clamp_to_arena(self.pos, self.size / 2.0, bounds);
    }

    /// Apply damage, saturating at zero. Returns true if this hit was fatal.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        was_alive && self.health == 0
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// An enemy that seeks the avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Render rotation (radians)
    pub rotation: f32,
    /// Radians per second
    pub spin: f32,
    pub alive: bool,
}

impl Hostile {
    /// Seek `target`, spin, and die if drifted too far outside the arena
    pub fn update(&mut self, dt: f32, target: Vec2, bounds: Vec2, cull_margin: f32) {
        self.pos = seek_step(self.pos, target, self.speed * dt);
        self.rotation += self.spin * dt;

        // Spawned hostiles sit one size outside the edge; never cull those
        let margin = cull_margin.max(self.size * 2.0);
        if self.pos.x < -margin
            || self.pos.y < -margin
            || self.pos.x > bounds.x + margin
            || self.pos.y > bounds.y + margin
        {
            self.alive = false;
        }
    }
}

/// A shot fired by the avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alive: bool,
}

impl Projectile {
    /// Straight-line motion; dies as soon as it leaves the arena
    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        self.pos += self.vel * dt;
        if !in_arena(self.pos, bounds) {
            self.alive = false;
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at birth, dead at 0
    pub alpha: f32,
    pub size: f32,
    pub alive: bool,
}

impl Particle {
    pub fn update(&mut self, dt: f32, tuning: &ParticleTuning) {
        self.pos += self.vel * dt;
        self.vel *= tuning.friction.powf(dt);
        self.alpha -= tuning.alpha_decay * dt;
        self.size *= tuning.shrink_per_second.powf(dt);

        if self.alpha <= 0.0 || self.size <= tuning.min_size {
            self.alpha = self.alpha.max(0.0);
            self.alive = false;
        }
    }
}

/// Values the HUD displays each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub kills_this_level: u32,
    pub kill_target: u32,
    pub kills_total: u32,
    pub phase: GamePhase,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub score: u64,
    /// 1-based
    pub level: u32,
    pub kills_this_level: u32,
    pub kills_total: u32,
    pub phase: GamePhase,
    /// Simulation clock in seconds; advances only while running
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub avatar: Avatar,
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub spawner: SpawnScheduler,
    /// Clock time of the last volley
    pub last_shot: Option<f64>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let bounds = Vec2::new(tuning.arena.width, tuning.arena.height);
        let avatar = Avatar::new(bounds / 2.0, &tuning.avatar);
        let spawner = SpawnScheduler::new(1, 0.0, &tuning.spawn);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            score: 0,
            level: 1,
            kills_this_level: 0,
            kills_total: 0,
            phase: GamePhase::Running,
            clock: 0.0,
            time_ticks: 0,
            avatar,
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            spawner,
            last_shot: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Arena size as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.arena.width, self.tuning.arena.height)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Kills required to clear the current level
    pub fn kill_target(&self) -> u32 {
        self.tuning.level.target_for(self.level)
    }

    /// Speed of a hostile spawned at the current level, before variance
    pub fn hostile_speed(&self) -> f32 {
        let h = &self.tuning.hostile;
        h.base_speed + h.speed_per_level * self.level.saturating_sub(1) as f32
    }

    /// Fire one volley from the avatar if the cooldown allows.
    ///
    /// Returns the number of projectiles created.
    pub fn try_fire(&mut self) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let cooldown = f64::from(self.tuning.projectile.cooldown);
        if self
            .last_shot
            .is_some_and(|last| self.clock - last < cooldown)
        {
            return 0;
        }
        self.last_shot = Some(self.clock);

        let speed = self.tuning.projectile.speed;
        let size = self.tuning.projectile.size;
        let origin = self.avatar.pos;
        let mut count = 0;
        for &(dx, dy) in self.tuning.projectile.pattern.directions() {
            let id = self.next_entity_id();
            self.projectiles.push(Projectile {
                id,
                pos: origin,
                vel: Vec2::new(dx, dy) * speed,
                size,
                alive: true,
            });
            count += 1;
        }
        self.events.push(GameEvent::Fired { count });
        count
    }

    /// Running <-> Paused. Returns false when the current phase can't pause.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                true
            }
            GamePhase::LevelComplete | GamePhase::GameOver => false,
        }
    }

    /// Running -> LevelComplete: award the bonus and arm the next difficulty
    pub(crate) fn complete_level(&mut self) {
        let bonus = self.tuning.level.completion_bonus;
        self.score += bonus;
        self.phase = GamePhase::LevelComplete;
        self.spawner
            .prepare_level(self.level + 1, self.clock, &self.tuning.spawn);

        let centre = self.bounds() / 2.0;
        spawn_burst(
            &mut self.particles,
            &mut self.rng,
            centre,
            COLOR_LEVEL_BURST,
            &self.tuning.particles,
        );
        self.events.push(GameEvent::LevelComplete {
            level: self.level,
            bonus,
        });
        log::info!(
            "Level {} complete: score={} kills={}",
            self.level,
            self.score,
            self.kills_total
        );
    }

    /// Running -> GameOver (terminal until restart)
    pub(crate) fn enter_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
        log::info!(
            "Game over at level {}: score={} kills={}",
            self.level,
            self.score,
            self.kills_total
        );
    }

    /// LevelComplete -> Running. Returns false if no level is complete.
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.level += 1;
        self.kills_this_level = 0;
        self.hostiles.clear();
        self.projectiles.clear();
        self.avatar.heal(self.tuning.avatar.heal_on_level);
        self.spawner
            .prepare_level(self.level, self.clock, &self.tuning.spawn);
        self.phase = GamePhase::Running;
        log::info!(
            "Level {} start: target={} spawn_interval={:.2}s",
            self.level,
            self.kill_target(),
            self.spawner.interval
        );
        true
    }

    /// Start a fresh session from any phase. Seed, RNG stream, tuning and
    /// the monotonic clock carry over.
    pub fn restart(&mut self) {
        let bounds = self.bounds();
        self.score = 0;
        self.level = 1;
        self.kills_this_level = 0;
        self.kills_total = 0;
        self.avatar = Avatar::new(bounds / 2.0, &self.tuning.avatar);
        self.hostiles.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.events.clear();
        self.last_shot = None;
        self.spawner = SpawnScheduler::new(1, self.clock, &self.tuning.spawn);
        self.phase = GamePhase::Running;
        log::info!("Game restarted (seed {})", self.seed);
    }

    /// Change the arena size (canvas resize) and keep the avatar inside it
    pub fn resize(&mut self, width: f32, height: f32) {
        self.tuning.arena.width = width;
        self.tuning.arena.height = height;
        let bounds = self.bounds();
        self.avatar.pos = clamp_to_arena(self.avatar.pos, self.avatar.size / 2.0, bounds);
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            level: self.level,
            health: self.avatar.health,
            max_health: self.avatar.max_health,
            kills_this_level: self.kills_this_level,
            kill_target: self.kill_target(),
            kills_total: self.kills_total,
            phase: self.phase,
        }
    }
}

/// Uniform sample in `lo..hi`; returns `lo` for an empty range
pub(crate) fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_damage_saturates() {
        let mut avatar = Avatar::new(Vec2::ZERO, &AvatarTuning::default());
        assert!(!avatar.take_damage(90));
        assert!(avatar.take_damage(25));
        assert_eq!(avatar.health, 0);
        // Already dead: not fatal a second time
        assert!(!avatar.take_damage(10));
        assert!(avatar.is_dead());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut avatar = Avatar::new(Vec2::ZERO, &AvatarTuning::default());
        avatar.take_damage(20);
        avatar.heal(30);
        assert_eq!(avatar.health, avatar.max_health);
    }

    #[test]
    fn test_hostile_culled_far_outside() {
        let bounds = Vec2::new(800.0, 600.0);
        let mut hostile = Hostile {
            id: 1,
            pos: Vec2::new(400.0, 900.0),
            size: 25.0,
            speed: 0.0,
            rotation: 0.0,
            spin: 1.0,
            alive: true,
        };
        hostile.update(0.5, Vec2::new(400.0, 300.0), bounds, 50.0);
        assert!(!hostile.alive);
        assert_eq!(hostile.rotation, 0.5);

        // Freshly spawned just past the edge: kept
        let mut fresh = Hostile {
            pos: Vec2::new(400.0, -25.0),
            alive: true,
            ..hostile
        };
        fresh.update(0.0, Vec2::new(400.0, 300.0), bounds, 50.0);
        assert!(fresh.alive);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut state = GameState::new(1);
        let cooldown = f64::from(state.tuning.projectile.cooldown);

        assert_eq!(state.try_fire(), 1);
        state.clock += cooldown * 0.5;
        assert_eq!(state.try_fire(), 0);
        assert_eq!(state.projectiles.len(), 1);

        state.clock += cooldown;
        assert_eq!(state.try_fire(), 1);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_fire_cooldown_late_in_session() {
        let mut state = GameState::new(1);
        state.clock = 1_000_000.0;
        assert_eq!(state.try_fire(), 1);

        for _ in 0..29 {
            state.clock += f64::from(crate::consts::SIM_DT);
        }
        assert_eq!(state.try_fire(), 0);
        state.clock += f64::from(crate::consts::SIM_DT);
        assert_eq!(state.try_fire(), 1);
    }

    #[test]
    fn test_four_way_volley() {
        let mut tuning = Tuning::default();
        tuning.projectile.pattern = crate::tuning::FirePattern::FourWay;
        let mut state = GameState::with_tuning(1, tuning);

        assert_eq!(state.try_fire(), 4);
        let total: Vec2 = state.projectiles.iter().map(|p| p.vel).sum();
        assert!(total.length() < 1e-3);
    }

    #[test]
    fn test_projectile_dies_outside_arena() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut p = Projectile {
            id: 1,
            pos: Vec2::new(50.0, 10.0),
            vel: Vec2::new(0.0, -480.0),
            size: 5.0,
            alive: true,
        };
        // 4px per step: 6.0, then 2.0, then -2.0
        p.update(1.0 / 120.0, bounds);
        p.update(1.0 / 120.0, bounds);
        assert!(p.alive);
        assert!((p.pos.y - 2.0).abs() < 1e-4);
        p.update(1.0 / 120.0, bounds);
        assert!(!p.alive);
    }

    #[test]
    fn test_pause_toggle_only_while_playing() {
        let mut state = GameState::new(1);
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Running);

        state.phase = GamePhase::GameOver;
        assert!(!state.toggle_pause());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_next_level_requires_level_complete() {
        let mut state = GameState::new(1);
        assert!(!state.next_level());
        assert_eq!(state.level, 1);

        state.avatar.take_damage(50);
        state.kills_this_level = 10;
        state.hostiles.push(Hostile {
            id: 99,
            pos: Vec2::ZERO,
            size: 25.0,
            speed: 90.0,
            rotation: 0.0,
            spin: 0.0,
            alive: true,
        });
        state.complete_level();
        assert!(state.next_level());
        assert_eq!(state.level, 2);
        assert_eq!(state.kills_this_level, 0);
        assert!(state.hostiles.is_empty());
        assert_eq!(state.avatar.health, 80);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_resize_reclamps_avatar() {
        let mut state = GameState::new(1);
        state.avatar.pos = Vec2::new(790.0, 590.0);
        state.resize(400.0, 300.0);
        assert_eq!(state.avatar.pos, Vec2::new(385.0, 285.0));
    }
}
