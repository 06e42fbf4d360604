//! Asteroid-style obstacles and the difficulty-driven spawn director

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::pool::{EntityPool, PoolHandle};
use crate::tuning::ObstacleTuning;
use crate::{integrate, random_range, wrap_angles};

/// A tumbling obstacle; larger ones take more hits and score less
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
    /// Fixed at spawn
    pub radius: f32,
    pub health: u8,
}

impl Obstacle {
    /// Obstacle at rest with health derived from its radius
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            rotation_speed: Vec3::ZERO,
            radius,
            health: Self::health_for_radius(radius),
        }
    }

    /// Hits needed to destroy an obstacle of this size
    pub fn health_for_radius(radius: f32) -> u8 {
        if radius > 1.8 {
            3
        } else if radius > 1.0 {
            2
        } else {
            1
        }
    }

    /// Points for destroying an obstacle of this size (smaller is worth more)
    pub fn points_for_radius(radius: f32) -> u64 {
        if radius > 1.8 {
            100
        } else if radius > 1.0 {
            200
        } else {
            300
        }
    }

    pub fn points(&self) -> u64 {
        Self::points_for_radius(self.radius)
    }
}

/// Spawn timing and per-level parameter curve
#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    /// Seconds until the next wave; starts at zero so the first tick spawns
    timer: f32,
}

impl SpawnDirector {
    pub fn interval(level: u32, tuning: &ObstacleTuning) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (tuning.base_spawn_interval - steps * tuning.spawn_interval_decay)
            .max(tuning.min_spawn_interval)
    }

    pub fn count(level: u32, tuning: &ObstacleTuning) -> u32 {
        let steps = level.saturating_sub(1) as f32;
        tuning.base_count + (steps * tuning.count_per_level).floor() as u32
    }

    pub fn speed(level: u32, tuning: &ObstacleTuning) -> f32 {
        tuning.base_speed + level.saturating_sub(1) as f32 * tuning.speed_per_level
    }

    /// Advance the timer; returns how many obstacles to spawn this tick
    pub fn advance(&mut self, dt: f32, level: u32, tuning: &ObstacleTuning) -> u32 {
        self.timer -= dt;
        if self.timer > 0.0 {
            return 0;
        }
        self.timer = Self::interval(level, tuning);
        Self::count(level, tuning)
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Roll one obstacle ahead of the player
    pub fn roll<R: Rng>(
        rng: &mut R,
        level: u32,
        player_z: f32,
        tuning: &ObstacleTuning,
    ) -> Obstacle {
        let radius = random_range(rng, tuning.min_radius, tuning.max_radius);
        let speed = Self::speed(level, tuning);
        let half_width = tuning.spawn_half_width;
        let (min_y, max_y) = tuning.spawn_height;

        let position = Vec3::new(
            random_range(rng, -half_width, half_width),
            random_range(rng, min_y, max_y),
            player_z - tuning.spawn_distance + random_range(rng, -tuning.spawn_depth_jitter, 0.0),
        );
        let velocity = Vec3::new(
            random_range(rng, -2.0, 2.0),
            random_range(rng, -1.0, 1.0),
            speed * random_range(rng, 0.7, 1.3),
        );
        let rotation = Vec3::new(
            rng.random::<f32>() * TAU,
            rng.random::<f32>() * TAU,
            rng.random::<f32>() * TAU,
        );
        let rotation_speed = Vec3::new(
            random_range(rng, -2.0, 2.0),
            random_range(rng, -2.0, 2.0),
            random_range(rng, -2.0, 2.0),
        );

        Obstacle {
            position,
            velocity,
            rotation,
            rotation_speed,
            radius,
            health: Obstacle::health_for_radius(radius),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObstacleSystem {
    pub pool: EntityPool<Obstacle>,
    pub director: SpawnDirector,
}

impl ObstacleSystem {
    pub fn new() -> Self {
        Self {
            pool: EntityPool::with_capacity(100),
            director: SpawnDirector::default(),
        }
    }

    pub fn spawn(&mut self, obstacle: Obstacle) -> PoolHandle {
        self.pool.acquire(obstacle)
    }

    /// Spawn due obstacles, integrate every active one, and cull those that
    /// fell behind the player. Returns the number spawned.
    pub fn step<R: Rng>(
        &mut self,
        dt: f32,
        level: u32,
        player_z: f32,
        rng: &mut R,
        tuning: &ObstacleTuning,
    ) -> u32 {
        let count = self.director.advance(dt, level, tuning);
        for _ in 0..count {
            let obstacle = SpawnDirector::roll(rng, level, player_z, tuning);
            self.pool.acquire(obstacle);
        }
        if count > 0 {
            log::debug!(
                "Spawned {} obstacles at level {} ({} active)",
                count,
                level,
                self.pool.active_count()
            );
        }

        let cutoff = player_z + tuning.despawn_distance;
        self.pool.retain(|obstacle| {
            obstacle.position = integrate(obstacle.position, obstacle.velocity, dt);
            obstacle.rotation = wrap_angles(obstacle.rotation + obstacle.rotation_speed * dt);
            obstacle.position.z <= cutoff
        });

        count
    }

    pub fn reset(&mut self) {
        self.pool.reset();
        self.director.reset();
    }
}
