//! Explosion bursts
//!
//! Purely visual: nothing here feeds back into gameplay. Each burst also
//! sprays a handful of particles; once the particle pool is full, new sprays
//! are simply thinner.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::pool::{EntityPool, PoolHandle};
use crate::tuning::EffectTuning;
use crate::{integrate, random_range};

/// An explosion anchored where an obstacle died
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub position: Vec3,
    /// Effect clock time at spawn (seconds)
    pub start_time: f32,
    pub scale: f32,
}

impl Effect {
    /// Normalized age in [0, 1] for animation
    pub fn progress(&self, now: f32, duration: f32) -> f32 {
        ((now - self.start_time) / duration).clamp(0.0, 1.0)
    }
}

/// A debris particle thrown out by an explosion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub start_time: f32,
    pub base_scale: f32,
}

impl Particle {
    /// Shrinks linearly to nothing over the effect duration
    pub fn scale_at(&self, now: f32, duration: f32) -> f32 {
        let t = (now - self.start_time) / duration;
        (self.base_scale * (1.0 - t)).max(0.01)
    }
}

#[derive(Debug, Clone)]
pub struct EffectSystem {
    pub effects: EntityPool<Effect>,
    pub particles: EntityPool<Particle>,
    /// Seconds of simulated time seen by this system
    clock: f32,
}

impl EffectSystem {
    pub fn new(tuning: &EffectTuning) -> Self {
        Self {
            effects: EntityPool::with_capacity(32),
            particles: EntityPool::with_limit(tuning.max_particles),
            clock: 0.0,
        }
    }

    pub fn now(&self) -> f32 {
        self.clock
    }

    /// Start an explosion at `position`; returns the effect handle
    pub fn spawn_burst<R: Rng>(
        &mut self,
        position: Vec3,
        scale: f32,
        rng: &mut R,
        tuning: &EffectTuning,
    ) -> PoolHandle {
        let now = self.clock;
        let handle = self.effects.acquire(Effect {
            position,
            start_time: now,
            scale,
        });

        let (min_speed, max_speed) = tuning.particle_speed;
        for _ in 0..tuning.particles_per_explosion {
            let theta = rng.random::<f32>() * TAU;
            let phi = rng.random::<f32>() * PI;
            let speed = random_range(rng, min_speed, max_speed);
            let direction = Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );
            let particle = Particle {
                position,
                velocity: direction * speed,
                start_time: now,
                base_scale: scale * random_range(rng, 0.1, 0.25),
            };
            if self.particles.try_acquire(particle).is_none() {
                break;
            }
        }

        handle
    }

    /// Advance the clock, move particles, and retire expired bursts
    pub fn step(&mut self, dt: f32, tuning: &EffectTuning) {
        self.clock += dt;
        let now = self.clock;
        let duration = tuning.explosion_duration;

        self.effects.retain(|effect| now - effect.start_time <= duration);

        let drag = tuning.particle_drag.powf(dt * 60.0);
        self.particles.retain(|particle| {
            if now - particle.start_time > duration {
                return false;
            }
            particle.position = integrate(particle.position, particle.velocity, dt);
            particle.velocity *= drag;
            true
        });
    }

    pub fn reset(&mut self) {
        self.effects.reset();
        self.particles.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_spawns_effect_and_particles() {
        let tuning = EffectTuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut system = EffectSystem::new(&tuning);

        let h = system.spawn_burst(Vec3::new(0.0, 0.0, -10.0), 1.5, &mut rng, &tuning);
        let effect = system.effects.get(h).unwrap();
        assert_eq!(effect.position, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(effect.scale, 1.5);
        assert_eq!(
            system.particles.active_count(),
            tuning.particles_per_explosion as usize
        );
    }

    #[test]
    fn test_effect_expires_after_duration() {
        let tuning = EffectTuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut system = EffectSystem::new(&tuning);
        let h = system.spawn_burst(Vec3::ZERO, 1.0, &mut rng, &tuning);

        system.step(0.5, &tuning);
        assert!(system.effects.is_active(h));
        assert!((system.effects.get(h).unwrap().progress(system.now(), 1.0) - 0.5).abs() < 1e-6);

        system.step(0.6, &tuning);
        assert!(!system.effects.is_active(h));
        assert!(system.particles.is_empty());
    }

    #[test]
    fn test_particles_capped() {
        let tuning = EffectTuning {
            max_particles: 30,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut system = EffectSystem::new(&tuning);
        system.spawn_burst(Vec3::ZERO, 1.0, &mut rng, &tuning);
        system.spawn_burst(Vec3::ZERO, 1.0, &mut rng, &tuning);

        assert_eq!(system.particles.active_count(), 30);
        assert_eq!(system.particles.slot_count(), 30);
        assert_eq!(system.effects.active_count(), 2);
    }

    #[test]
    fn test_particles_slow_down() {
        let tuning = EffectTuning::default();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut system = EffectSystem::new(&tuning);
        system.spawn_burst(Vec3::ZERO, 1.0, &mut rng, &tuning);

        let before: Vec<f32> = system.particles.iter_active().map(|(_, p)| p.velocity.length()).collect();
        system.step(1.0 / 60.0, &tuning);
        let after: Vec<f32> = system.particles.iter_active().map(|(_, p)| p.velocity.length()).collect();

        for (b, a) in before.iter().zip(&after) {
            assert!((a - b * 0.96).abs() < 1e-3);
        }
    }

    #[test]
    fn test_particle_scale_shrinks() {
        let p = Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            start_time: 0.0,
            base_scale: 0.2,
        };
        assert!((p.scale_at(0.0, 1.0) - 0.2).abs() < 1e-6);
        assert!((p.scale_at(0.5, 1.0) - 0.1).abs() < 1e-6);
        assert!((p.scale_at(1.0, 1.0) - 0.01).abs() < 1e-6);
    }
}
