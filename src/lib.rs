//! Space Runner - endless-runner arcade shooter core
//!
//! Core modules:
//! - `sim`: Entity pools, per-frame physics, spawning, collisions, game state
//! - `tuning`: Data-driven game balance
//! - `highscores`: Persisted single high score

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreError, HighScoreStore, JsonFileStore, MemoryStore};
pub use tuning::{Tuning, TuningError};

use glam::Vec3;
use rand::Rng;

/// Default balance constants (overridable through [`Tuning`])
pub mod consts {
    /// Largest frame delta accepted by a tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_COLLISION_RADIUS: f32 = 1.0;
    pub const PLAYER_INVINCIBLE_DURATION: f32 = 2.0;
    pub const PLAYER_START_LIVES: u8 = 3;
    /// Where the player is assumed to be before the host reports a position
    pub const PLAYER_DEFAULT_POSITION: [f32; 3] = [0.0, 2.0, 0.0];
    /// Camera shake intensity requested when the player is hit
    pub const PLAYER_HIT_SHAKE: f32 = 0.8;

    /// Projectile defaults
    pub const BULLET_RADIUS: f32 = 0.3;
    pub const BULLET_SPEED: f32 = 80.0;
    pub const BULLET_MAX_DISTANCE: f32 = 200.0;
    pub const SHOOT_COOLDOWN: f32 = 0.15;

    /// Obstacle spawn curve
    pub const OBSTACLE_BASE_SPAWN_INTERVAL: f32 = 2.0;
    pub const OBSTACLE_MIN_SPAWN_INTERVAL: f32 = 0.4;
    pub const OBSTACLE_SPAWN_INTERVAL_DECAY: f32 = 0.15;
    pub const OBSTACLE_BASE_COUNT: u32 = 2;
    pub const OBSTACLE_COUNT_PER_LEVEL: f32 = 0.5;
    pub const OBSTACLE_BASE_SPEED: f32 = 8.0;
    pub const OBSTACLE_SPEED_PER_LEVEL: f32 = 2.0;
    pub const OBSTACLE_MIN_RADIUS: f32 = 0.5;
    pub const OBSTACLE_MAX_RADIUS: f32 = 2.5;
    pub const OBSTACLE_SPAWN_DISTANCE: f32 = 120.0;
    pub const OBSTACLE_DESPAWN_DISTANCE: f32 = 20.0;

    /// Ammo and reload rings
    pub const AMMO_START: u32 = 30;
    pub const AMMO_MAX: u32 = 30;
    pub const LOW_AMMO_THRESHOLD: f32 = 0.35;
    pub const RING_COUNT: usize = 5;
    pub const RING_SPACING: f32 = 150.0;
    pub const RING_COLLECT_RADIUS: f32 = 5.0;
    pub const RING_RELOAD_AMOUNT: u32 = 15;
    pub const RING_RECYCLE_MARGIN: f32 = 40.0;

    /// Explosion effects
    pub const EXPLOSION_DURATION: f32 = 1.0;
    pub const EXPLOSION_PARTICLES: u32 = 20;
    pub const MAX_PARTICLES: usize = 500;
    /// Particle velocity retained per 1/60 s
    pub const PARTICLE_DRAG: f32 = 0.96;

    /// Progression
    pub const LEVEL_BASE_THRESHOLD: u32 = 20;
    pub const LEVEL_THRESHOLD_STEP: u32 = 5;
}

/// Linear extrapolation of a position over `dt`
#[inline]
pub fn integrate(position: Vec3, velocity: Vec3, dt: f32) -> Vec3 {
    position + velocity * dt
}

/// Uniform sample in `[min, max)`; degenerate ranges return `min`
#[inline]
pub fn random_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Wrap each Euler angle to [0, 2π)
#[inline]
pub fn wrap_angles(angles: Vec3) -> Vec3 {
    use std::f32::consts::TAU;
    Vec3::new(
        angles.x.rem_euclid(TAU),
        angles.y.rem_euclid(TAU),
        angles.z.rem_euclid(TAU),
    )
}
