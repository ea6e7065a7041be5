//! Data-driven game balance
//!
//! Every per-kind constant lives here so the same entity models can be
//! re-skinned into the faster or slower variants of the game. All speeds are
//! in pixels per second, all times in seconds.

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Direction layout of a single fire action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirePattern {
    /// One projectile straight up
    #[default]
    Single,
    /// One projectile in each cardinal direction
    FourWay,
}

impl FirePattern {
    /// Unit directions for one volley (screen coordinates, +y is down)
    pub fn directions(&self) -> &'static [(f32, f32)] {
        match self {
            FirePattern::Single => &[(0.0, -1.0)],
            FirePattern::FourWay => &[(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarTuning {
    pub size: f32,
    pub speed: f32,
    pub max_health: u32,
    /// Health restored when advancing to the next level
    pub heal_on_level: u32,
}

impl Default for AvatarTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            speed: 300.0,
            max_health: 100,
            heal_on_level: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileTuning {
    pub size: f32,
    pub base_speed: f32,
    /// Added once per level above the first
    pub speed_per_level: f32,
    /// Random extra speed in `0..speed_variance`
    pub speed_variance: f32,
    /// Maximum cosmetic spin (radians/sec, either direction)
    pub max_spin: f32,
    /// Damage dealt to the avatar on contact
    pub contact_damage: u32,
    /// Distance outside the arena after which a hostile is culled
    pub cull_margin: f32,
}

impl Default for HostileTuning {
    fn default() -> Self {
        Self {
            size: 25.0,
            base_speed: 90.0,
            speed_per_level: 18.0,
            speed_variance: 0.0,
            max_spin: 1.0,
            contact_damage: 10,
            cull_margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub size: f32,
    pub speed: f32,
    /// Minimum time between two volleys
    pub cooldown: f32,
    pub pattern: FirePattern,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            size: 5.0,
            speed: 480.0,
            cooldown: 0.25,
            pattern: FirePattern::Single,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub base_interval: f32,
    /// Interval reduction per level
    pub step: f32,
    /// Interval never drops below this
    pub floor_interval: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval: 2.0,
            step: 0.1,
            floor_interval: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Kills needed to clear level 1
    pub kill_target: u32,
    /// Extra kills required per level after the first
    pub kill_target_growth: u32,
    pub kill_reward: u64,
    pub completion_bonus: u64,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            kill_target: 10,
            kill_target_growth: 0,
            kill_reward: 10,
            completion_bonus: 100,
        }
    }
}

impl LevelTuning {
    /// Kill target for a 1-based level
    pub fn target_for(&self, level: u32) -> u32 {
        self.kill_target + self.kill_target_growth * level.saturating_sub(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub count: u32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Alpha lost per second
    pub alpha_decay: f32,
    /// Fraction of size remaining after one second
    pub shrink_per_second: f32,
    /// Fraction of velocity remaining after one second (1.0 = no drag)
    pub friction: f32,
    /// Particles at or below this size are dead
    pub min_size: f32,
    pub max_particles: usize,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            count: 15,
            speed_min: 120.0,
            speed_max: 300.0,
            size_min: 2.0,
            size_max: 5.0,
            alpha_decay: 1.2,
            // 0.95 per frame at 60 fps
            shrink_per_second: 0.046,
            friction: 1.0,
            min_size: 0.1,
            max_particles: 256,
        }
    }
}

/// Complete balance sheet for one game session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub avatar: AvatarTuning,
    pub hostile: HostileTuning,
    pub projectile: ProjectileTuning,
    pub spawn: SpawnTuning,
    pub level: LevelTuning,
    pub particles: ParticleTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document; missing fields take defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The faster "classic" variant: rapid fire from the hip, swarm with
    /// speed variance, longer levels.
    pub fn classic() -> Self {
        let mut tuning = Self::default();
        tuning.avatar.speed = 250.0;
        tuning.avatar.heal_on_level = 0;
        tuning.hostile.size = 30.0;
        tuning.hostile.base_speed = 80.0;
        tuning.hostile.speed_per_level = 0.0;
        tuning.hostile.speed_variance = 40.0;
        tuning.hostile.contact_damage = 20;
        tuning.projectile.speed = 400.0;
        tuning.projectile.cooldown = 0.15;
        tuning.spawn.step = 0.2;
        tuning.spawn.floor_interval = 0.8;
        tuning.level.kill_target_growth = 5;
        tuning.level.completion_bonus = 0;
        tuning.particles.count = 10;
        tuning.particles.speed_min = 100.0;
        tuning.particles.speed_max = 200.0;
        tuning.particles.alpha_decay = 2.0;
        tuning.particles.shrink_per_second = 1.0;
        tuning.particles.friction = 0.3;
        tuning
    }
}
