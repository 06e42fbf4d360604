//! Player bullets
//!
//! Straight-line motion only; hits are resolved by the collision pass.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pool::{EntityPool, PoolHandle};
use super::state::ProgressionState;
use crate::integrate;
use crate::tuning::ProjectileTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectileSystem {
    pub pool: EntityPool<Projectile>,
    /// Seconds until the next shot is allowed
    cooldown: f32,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self {
            pool: EntityPool::with_capacity(64),
            cooldown: 0.0,
        }
    }

    pub fn spawn(&mut self, position: Vec3, velocity: Vec3) -> PoolHandle {
        self.pool.acquire(Projectile { position, velocity })
    }

    pub fn cool_down(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Fire from `origin` if the cooldown has elapsed and a round is available
    pub fn fire(
        &mut self,
        origin: Vec3,
        progression: &mut ProgressionState,
        tuning: &ProjectileTuning,
    ) -> Option<PoolHandle> {
        if self.cooldown > 0.0 || !progression.consume_ammo() {
            return None;
        }
        self.cooldown = tuning.cooldown;
        Some(self.spawn(origin, Vec3::new(0.0, 0.0, -tuning.speed)))
    }

    /// Advance bullets and drop the ones that ran too far ahead
    pub fn step(&mut self, dt: f32, player_z: f32, tuning: &ProjectileTuning) {
        let cutoff = player_z - tuning.max_distance;
        self.pool.retain(|bullet| {
            bullet.position = integrate(bullet.position, bullet.velocity, dt);
            bullet.position.z >= cutoff
        });
    }

    pub fn reset(&mut self) {
        self.pool.reset();
        self.cooldown = 0.0;
    }
}
