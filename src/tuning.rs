//! Data-driven game balance
//!
//! Every section deserializes with `#[serde(default)]`, so a tuning file only
//! needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning load/validation errors
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON was malformed or had the wrong shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Player collision and hit response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub collision_radius: f32,
    /// Grace period after a hit (seconds)
    pub invincible_duration: f32,
    pub start_lives: u8,
    pub default_position: [f32; 3],
    pub hit_shake: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            collision_radius: PLAYER_COLLISION_RADIUS,
            invincible_duration: PLAYER_INVINCIBLE_DURATION,
            start_lives: PLAYER_START_LIVES,
            default_position: PLAYER_DEFAULT_POSITION,
            hit_shake: PLAYER_HIT_SHAKE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub radius: f32,
    pub speed: f32,
    /// Distance ahead of the player after which a bullet is culled
    pub max_distance: f32,
    /// Minimum time between shots (seconds)
    pub cooldown: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            radius: BULLET_RADIUS,
            speed: BULLET_SPEED,
            max_distance: BULLET_MAX_DISTANCE,
            cooldown: SHOOT_COOLDOWN,
        }
    }
}

/// Spawn curve and shape ranges for obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub base_spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub spawn_interval_decay: f32,
    pub base_count: u32,
    pub count_per_level: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub spawn_distance: f32,
    pub despawn_distance: f32,
    /// Lateral spawn half-width
    pub spawn_half_width: f32,
    /// Vertical spawn band (min, max)
    pub spawn_height: (f32, f32),
    /// Extra distance ahead added on top of `spawn_distance`
    pub spawn_depth_jitter: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            base_spawn_interval: OBSTACLE_BASE_SPAWN_INTERVAL,
            min_spawn_interval: OBSTACLE_MIN_SPAWN_INTERVAL,
            spawn_interval_decay: OBSTACLE_SPAWN_INTERVAL_DECAY,
            base_count: OBSTACLE_BASE_COUNT,
            count_per_level: OBSTACLE_COUNT_PER_LEVEL,
            base_speed: OBSTACLE_BASE_SPEED,
            speed_per_level: OBSTACLE_SPEED_PER_LEVEL,
            min_radius: OBSTACLE_MIN_RADIUS,
            max_radius: OBSTACLE_MAX_RADIUS,
            spawn_distance: OBSTACLE_SPAWN_DISTANCE,
            despawn_distance: OBSTACLE_DESPAWN_DISTANCE,
            spawn_half_width: 15.0,
            spawn_height: (0.0, 10.0),
            spawn_depth_jitter: 20.0,
        }
    }
}

/// Which idle ring lights up when ammo runs low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingSelection {
    /// Closest ring still in front of the player
    #[default]
    NearestAhead,
    /// Ring with the most negative Z relative to the player
    FurthestAhead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub ring_count: usize,
    pub ring_spacing: f32,
    pub collect_radius: f32,
    pub reload_amount: u32,
    /// Ammo fraction below which a ring is lit
    pub low_ammo_threshold: f32,
    /// How far behind the player a ring may fall before recycling
    pub recycle_margin: f32,
    pub lateral_half_width: f32,
    pub height: (f32, f32),
    pub selection: RingSelection,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            ring_count: RING_COUNT,
            ring_spacing: RING_SPACING,
            collect_radius: RING_COLLECT_RADIUS,
            reload_amount: RING_RELOAD_AMOUNT,
            low_ammo_threshold: LOW_AMMO_THRESHOLD,
            recycle_margin: RING_RECYCLE_MARGIN,
            lateral_half_width: 8.0,
            height: (3.0, 7.0),
            selection: RingSelection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub explosion_duration: f32,
    pub particles_per_explosion: u32,
    pub max_particles: usize,
    pub particle_drag: f32,
    /// Particle speed range (min, max)
    pub particle_speed: (f32, f32),
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            explosion_duration: EXPLOSION_DURATION,
            particles_per_explosion: EXPLOSION_PARTICLES,
            max_particles: MAX_PARTICLES,
            particle_drag: PARTICLE_DRAG,
            particle_speed: (5.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub start_ammo: u32,
    pub max_ammo: u32,
    /// Destructions needed to leave level 1
    pub level_base_threshold: u32,
    /// Extra destructions needed per level
    pub level_threshold_step: u32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            start_ammo: AMMO_START,
            max_ammo: AMMO_MAX,
            level_base_threshold: LEVEL_BASE_THRESHOLD,
            level_threshold_step: LEVEL_THRESHOLD_STEP,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub projectiles: ProjectileTuning,
    pub obstacles: ObstacleTuning,
    pub pickups: PickupTuning,
    pub effects: EffectTuning,
    pub progression: ProgressionTuning,
    /// Upper clamp on per-tick delta time (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            projectiles: ProjectileTuning::default(),
            obstacles: ObstacleTuning::default(),
            pickups: PickupTuning::default(),
            effects: EffectTuning::default(),
            progression: ProgressionTuning::default(),
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Write the tuning as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TuningError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason })
            }
        }

        check(
            self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0,
            "max_frame_dt",
            "must be positive",
        )?;
        check(
            self.player.collision_radius > 0.0,
            "player.collision_radius",
            "must be positive",
        )?;
        check(self.player.start_lives > 0, "player.start_lives", "must be at least 1")?;
        check(
            self.projectiles.radius > 0.0,
            "projectiles.radius",
            "must be positive",
        )?;
        check(
            self.projectiles.max_distance > 0.0,
            "projectiles.max_distance",
            "must be positive",
        )?;
        check(
            self.obstacles.min_radius > 0.0,
            "obstacles.min_radius",
            "must be positive",
        )?;
        check(
            self.obstacles.max_radius >= self.obstacles.min_radius,
            "obstacles.max_radius",
            "must not be below min_radius",
        )?;
        check(
            self.obstacles.min_spawn_interval > 0.0,
            "obstacles.min_spawn_interval",
            "must be positive",
        )?;
        check(
            self.obstacles.base_spawn_interval >= self.obstacles.min_spawn_interval,
            "obstacles.base_spawn_interval",
            "must not be below min_spawn_interval",
        )?;
        check(
            self.obstacles.spawn_height.0 <= self.obstacles.spawn_height.1,
            "obstacles.spawn_height",
            "min must not exceed max",
        )?;
        check(self.pickups.ring_count > 0, "pickups.ring_count", "must be at least 1")?;
        check(
            self.pickups.ring_spacing > 0.0,
            "pickups.ring_spacing",
            "must be positive",
        )?;
        check(
            self.pickups.height.0 <= self.pickups.height.1,
            "pickups.height",
            "min must not exceed max",
        )?;
        check(
            self.effects.explosion_duration > 0.0,
            "effects.explosion_duration",
            "must be positive",
        )?;
        check(
            (0.0..=1.0).contains(&self.effects.particle_drag),
            "effects.particle_drag",
            "must be within 0..=1",
        )?;
        check(
            self.progression.max_ammo > 0,
            "progression.max_ammo",
            "must be positive",
        )?;
        check(
            self.progression.start_ammo <= self.progression.max_ammo,
            "progression.start_ammo",
            "must not exceed max_ammo",
        )?;
        check(
            self.progression.level_base_threshold > 0,
            "progression.level_base_threshold",
            "must be at least 1",
        )?;
        Ok(())
    }
}
