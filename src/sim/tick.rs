//! Per-frame simulation tick
//!
//! Advances the game by one timestep. Every motion is scaled by `dt`
//! (seconds), so the host can use a fixed step or the measured frame delta.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::particles::update_particles;
use super::spawn::run_scheduler;
use super::state::{GamePhase, GameState};

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire (held; the cooldown limits the rate)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

impl TickInput {
    /// Movement axis with opposite intents cancelling (no diagonal normalization)
    pub fn axis(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        state.toggle_pause();
    }

    // Nothing moves unless running
    if state.phase != GamePhase::Running {
        return;
    }

    state.clock += f64::from(dt);
    state.time_ticks += 1;
    let bounds = state.bounds();

    state.avatar.update(input.axis(), dt, bounds);
    if input.fire {
        state.try_fire();
    }

    for projectile in &mut state.projectiles {
        projectile.update(dt, bounds);
    }
    state.projectiles.retain(|p| p.alive);

    let target = state.avatar.pos;
    let cull_margin = state.tuning.hostile.cull_margin;
    for hostile in &mut state.hostiles {
        hostile.update(dt, target, bounds, cull_margin);
    }
    state.hostiles.retain(|h| h.alive);

    run_scheduler(state);

    let report = resolve_collisions(state);
    if !report.is_empty() {
        state.hostiles.retain(|h| h.alive);
        state.projectiles.retain(|p| p.alive);
    }

    update_particles(&mut state.particles, dt, &state.tuning.particles);

    if state.phase == GamePhase::Running && state.kills_this_level >= state.kill_target() {
        state.complete_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{GameEvent, Hostile, Projectile};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn hostile_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.hostiles.push(Hostile {
            id,
            pos,
            size: state.tuning.hostile.size,
            speed: 0.0,
            rotation: 0.0,
            spin: 0.0,
            alive: true,
        });
    }

    fn projectile_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: Vec2::ZERO,
            size: state.tuning.projectile.size,
            alive: true,
        });
    }

    #[test]
    fn test_axis_cancels_opposites() {
        let input = TickInput {
            up: true,
            down: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(input.axis(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused: clock and entities frozen
        let clock = state.clock;
        hostile_at(&mut state, Vec2::new(100.0, 100.0));
        state.hostiles[0].speed = 90.0;
        let held = TickInput {
            right: true,
            ..Default::default()
        };
        let avatar_pos = state.avatar.pos;
        tick(&mut state, &held, SIM_DT);
        assert_eq!(state.clock, clock);
        assert_eq!(state.avatar.pos, avatar_pos);
        assert_eq!(state.hostiles[0].pos, Vec2::new(100.0, 100.0));

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_hostiles_seek_avatar() {
        let mut state = GameState::new(1);
        hostile_at(&mut state, Vec2::new(100.0, 300.0));
        state.hostiles[0].speed = 120.0;
        tick(&mut state, &TickInput::default(), 0.5);
        assert!((state.hostiles[0].pos - Vec2::new(160.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn test_fire_twice_within_cooldown() {
        let mut state = GameState::new(1);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);

        let cooldown = state.tuning.projectile.cooldown;
        tick(&mut state, &fire, cooldown);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut state = GameState::new(5);
        let interval = state.spawner.interval;
        tick(&mut state, &TickInput::default(), interval * 0.5);
        assert!(state.hostiles.is_empty());
        tick(&mut state, &TickInput::default(), interval);
        assert_eq!(state.hostiles.len(), 1);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::HostileSpawned { .. }))
        );
    }

    #[test]
    fn test_clock_keeps_advancing_late_in_session() {
        let mut state = GameState::new(5);
        let start = 1_000_000.0;
        state.clock = start;
        state.spawner.last_spawn = start;

        // Ten seconds of idle play
        for _ in 0..1200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!((state.clock - start - 10.0).abs() < 1e-3);
        assert!(state.spawner.last_spawn > start + 1.0);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_kills_complete_level_once() {
        let mut state = GameState::new(7);
        let target = state.kill_target();
        let reward = state.tuning.level.kill_reward;
        let bonus = state.tuning.level.completion_bonus;

        // One short of the target
        for i in 0..target - 1 {
            let pos = Vec2::new(50.0 + i as f32 * 40.0, 60.0);
            hostile_at(&mut state, pos);
            projectile_at(&mut state, pos);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.kills_this_level, target - 1);
        assert_eq!(state.score, (target - 1) as u64 * reward);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.hostiles.is_empty() && state.projectiles.is_empty());

        // Two more in the same tick: still exactly one completion
        for pos in [Vec2::new(100.0, 500.0), Vec2::new(200.0, 500.0)] {
            hostile_at(&mut state, pos);
            projectile_at(&mut state, pos);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.score, (target + 1) as u64 * reward + bonus);
        let completions = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
            .count();
        assert_eq!(completions, 1);

        // Idle while LevelComplete: no further bonus
        let score = state.score;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, score);

        assert!(state.next_level());
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.spawner.interval < 1.9);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = GameState::new(9);
        state.avatar.health = state.tuning.hostile.contact_damage * 2;
        let at = state.avatar.pos;
        for _ in 0..4 {
            hostile_at(&mut state, at);
        }

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.avatar.health, 0);
        let score = state.score;

        // Survivors still overlap the avatar but nothing updates
        hostile_at(&mut state, at);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.events.is_empty());
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.avatar.health, 0);
        assert_eq!(state.score, score);

        // Pause does nothing either
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(11);
        state.score = 500;
        state.level = 4;
        state.kills_this_level = 3;
        state.kills_total = 33;
        state.avatar.health = 0;
        state.phase = GamePhase::GameOver;
        hostile_at(&mut state, Vec2::new(10.0, 10.0));
        projectile_at(&mut state, Vec2::new(20.0, 20.0));
        state.particles.push(crate::sim::Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: 0,
            alpha: 1.0,
            size: 3.0,
            alive: true,
        });

        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.kills_this_level, 0);
        assert_eq!(state.kills_total, 0);
        assert_eq!(state.avatar.health, state.avatar.max_health);
        assert_eq!(state.avatar.pos, state.bounds() / 2.0);
        assert!(state.hostiles.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_collections_hold_only_alive_after_tick() {
        let mut state = GameState::new(13);
        let fire = TickInput {
            fire: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state, &fire, SIM_DT);
            assert!(state.hostiles.iter().all(|h| h.alive));
            assert!(state.projectiles.iter().all(|p| p.alive));
            assert!(state.particles.iter().all(|p| p.alive));
            if state.phase == GamePhase::LevelComplete {
                state.next_level();
            }
        }
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                fire: true,
                left: true,
                ..Default::default()
            },
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        let run = || {
            let mut state = GameState::with_tuning(99999, Tuning::classic());
            for i in 0..1500 {
                tick(&mut state, &inputs[i % inputs.len()], SIM_DT);
            }
            state
        };
        let (a, b) = (run(), run());
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.hostiles.len(), b.hostiles.len());
        for (ha, hb) in a.hostiles.iter().zip(&b.hostiles) {
            assert_eq!(ha.pos, hb.pos);
        }
    }

    fn any_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(up, down, left, right)| TickInput {
                up,
                down,
                left,
                right,
                ..Default::default()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_avatar_stays_in_bounds(
            inputs in prop::collection::vec(any_input(), 1..400),
            dt in 0.001f32..0.1,
        ) {
            let mut state = GameState::new(1);
            let half = state.avatar.size / 2.0;
            let bounds = state.bounds();
            for input in &inputs {
                tick(&mut state, input, dt);
                let p = state.avatar.pos;
                prop_assert!(p.x >= half && p.x <= bounds.x - half);
                prop_assert!(p.y >= half && p.y <= bounds.y - half);
            }
        }

        #[test]
        fn prop_seek_never_nan(
            x in -100.0f32..900.0,
            y in -100.0f32..700.0,
            dt in 0.0f32..0.1,
        ) {
            let mut state = GameState::new(1);
            state.avatar.pos = Vec2::new(x, y);
            let mut hostile = Hostile {
                id: 1,
                pos: Vec2::new(x, y),
                size: 25.0,
                speed: 90.0,
                rotation: 0.0,
                spin: 0.0,
                alive: true,
            };
            hostile.update(dt, state.avatar.pos, state.bounds(), 50.0);
            prop_assert!(!hostile.pos.is_nan());
            prop_assert_eq!(hostile.pos, Vec2::new(x, y));
        }
    }
}
