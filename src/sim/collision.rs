//! Narrow-phase collision and its gameplay consequences
//!
//! Brute-force sphere checks in pool order. Entity counts stay in the low
//! hundreds, so no broad phase is used.

use glam::Vec3;
use rand::Rng;

use super::effects::EffectSystem;
use super::obstacles::{Obstacle, ObstacleSystem};
use super::projectiles::ProjectileSystem;
use super::state::{GameEvent, ProgressionState};
use crate::tuning::Tuning;

/// Sphere overlap without a square root: `|a - b|² < (ra + rb)²`
#[inline]
pub fn spheres_intersect(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Totals from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub projectile_hits: u32,
    pub obstacles_destroyed: u32,
    pub points: u64,
    pub level_ups: u32,
    pub player_hit: bool,
    pub game_over: bool,
}

/// Holds the player's post-hit invincibility window
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    /// Seconds of invincibility left
    invincibility: f32,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invincibility(&self) -> f32 {
        self.invincibility
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn reset(&mut self) {
        self.invincibility = 0.0;
    }

    /// Resolve projectile and player hits for this tick.
    ///
    /// Does nothing unless the game is playing. Each projectile destroys at
    /// most one obstacle and the player takes at most one hit; in both cases
    /// the first overlap in pool order wins.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve<R: Rng>(
        &mut self,
        dt: f32,
        player: Option<Vec3>,
        projectiles: &mut ProjectileSystem,
        obstacles: &mut ObstacleSystem,
        effects: &mut EffectSystem,
        progression: &mut ProgressionState,
        events: &mut Vec<GameEvent>,
        rng: &mut R,
        tuning: &Tuning,
    ) -> CollisionOutcome {
        let mut outcome = CollisionOutcome::default();
        if !progression.is_playing() {
            return outcome;
        }

        // --- PROJECTILES VS OBSTACLES ---
        let bullet_radius = tuning.projectiles.radius;
        projectiles.pool.retain(|bullet| {
            let mut hit: Option<Obstacle> = None;
            obstacles.pool.retain(|obstacle| {
                if hit.is_some()
                    || !spheres_intersect(
                        bullet.position,
                        bullet_radius,
                        obstacle.position,
                        obstacle.radius,
                    )
                {
                    return true;
                }
                obstacle.health = obstacle.health.saturating_sub(1);
                hit = Some(*obstacle);
                obstacle.health > 0
            });

            let Some(obstacle) = hit else {
                return true;
            };
            outcome.projectile_hits += 1;

            if obstacle.health == 0 {
                let points = obstacle.points();
                effects.spawn_burst(obstacle.position, obstacle.radius, rng, &tuning.effects);
                progression.add_score(points);
                outcome.obstacles_destroyed += 1;
                outcome.points += points;
                events.push(GameEvent::ObstacleDestroyed {
                    position: obstacle.position,
                    radius: obstacle.radius,
                    points,
                });
                if progression.add_destroyed() {
                    outcome.level_ups += 1;
                    events.push(GameEvent::LevelUp {
                        level: progression.level,
                    });
                }
            }
            false
        });

        // --- PLAYER VS OBSTACLES ---
        self.invincibility -= dt;
        let Some(player) = player else {
            return outcome;
        };
        if self.invincibility > 0.0 {
            return outcome;
        }

        let player_radius = tuning.player.collision_radius;
        let mut hit: Option<Obstacle> = None;
        obstacles.pool.retain(|obstacle| {
            if hit.is_none()
                && spheres_intersect(player, player_radius, obstacle.position, obstacle.radius)
            {
                hit = Some(*obstacle);
                return false;
            }
            true
        });

        if let Some(obstacle) = hit {
            effects.spawn_burst(obstacle.position, obstacle.radius, rng, &tuning.effects);
            outcome.player_hit = true;
            self.invincibility = tuning.player.invincible_duration;
            let previous_record = progression.high_score;
            let game_over = progression.lose_life();
            log::info!("Player hit, {} lives left", progression.lives);
            events.push(GameEvent::PlayerHit {
                position: player,
                lives: progression.lives,
                shake: tuning.player.hit_shake,
            });
            if game_over {
                outcome.game_over = true;
                events.push(GameEvent::GameOver {
                    score: progression.score,
                    high_score: progression.high_score,
                    new_record: progression.score > previous_record,
                });
            }
        }

        outcome
    }
}
