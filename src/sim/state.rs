//! Game state and progression
//!
//! `GameState` owns every system and pool; `ProgressionState` is the
//! authoritative score/lives/level/ammo record that the host's HUD reads.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionSystem;
use super::effects::EffectSystem;
use super::obstacles::ObstacleSystem;
use super::pickups::PickupSystem;
use super::projectiles::ProjectileSystem;
use crate::tuning::{ProgressionTuning, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Frozen; every system skips the tick
    Paused,
    /// Run ended, high score committed
    GameOver,
}

/// Something the presentation layer may want to react to.
///
/// Collected per tick in `GameState::events`; cleared at the start of the next
/// tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    Paused,
    Resumed,
    ShotFired { position: Vec3 },
    ObstacleDestroyed { position: Vec3, radius: f32, points: u64 },
    /// Player collided with an obstacle; `shake` is the requested camera shake
    PlayerHit { position: Vec3, lives: u8, shake: f32 },
    LevelUp { level: u32 },
    AmmoCollected { amount: u32, ammo: u32 },
    GameOver { score: u64, high_score: u64, new_record: bool },
}

/// Score, lives, level and ammo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub high_score: u64,
    /// Destructions since the last level up
    pub destroyed_count: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    start_lives: u8,
    start_ammo: u32,
    level_base_threshold: u32,
    level_threshold_step: u32,
}

impl ProgressionState {
    /// Fresh state in the `Start` phase with a previously persisted high score
    pub fn new(high_score: u64, start_lives: u8, tuning: &ProgressionTuning) -> Self {
        let max_ammo = tuning.max_ammo.max(1);
        let start_ammo = tuning.start_ammo.min(max_ammo);
        Self {
            phase: GamePhase::Start,
            score: 0,
            lives: start_lives,
            level: 1,
            high_score,
            destroyed_count: 0,
            ammo: start_ammo,
            max_ammo,
            start_lives,
            start_ammo,
            level_base_threshold: tuning.level_base_threshold,
            level_threshold_step: tuning.level_threshold_step,
        }
    }

    /// Reset the run counters and enter `Playing`
    pub fn start_game(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.start_lives;
        self.level = 1;
        self.destroyed_count = 0;
        self.ammo = self.start_ammo;
        log::info!("Run started (high score {})", self.high_score);
    }

    /// Commit the high score and enter `GameOver`; returns true on a new record
    pub fn end_game(&mut self) -> bool {
        let new_record = self.score > self.high_score;
        self.high_score = self.high_score.max(self.score);
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {} level {} (high score {})",
            self.score,
            self.level,
            self.high_score
        );
        new_record
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Flip between `Playing` and `Paused`; returns the resulting event, if any
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            GamePhase::Playing => {
                self.pause();
                Some(GameEvent::Paused)
            }
            GamePhase::Paused => {
                self.resume();
                Some(GameEvent::Resumed)
            }
            _ => None,
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Destructions required to leave the current level
    pub fn level_threshold(&self) -> u32 {
        self.level_base_threshold + self.level.saturating_sub(1) * self.level_threshold_step
    }

    /// Count one destruction; returns true when it triggered a level up
    pub fn add_destroyed(&mut self) -> bool {
        let count = self.destroyed_count + 1;
        if count >= self.level_threshold() {
            self.next_level();
            true
        } else {
            self.destroyed_count = count;
            false
        }
    }

    pub fn next_level(&mut self) {
        self.level += 1;
        self.destroyed_count = 0;
        log::info!("Level up: {}", self.level);
    }

    /// Take one round; `false` means the magazine is empty and no shot happens
    pub fn consume_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    /// Add ammo, never exceeding `max_ammo`
    pub fn reload_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
    }

    pub fn ammo_fraction(&self) -> f32 {
        self.ammo as f32 / self.max_ammo as f32
    }

    /// Lose one life; returns true when this ended the game
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.end_game();
            true
        } else {
            false
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

/// Complete simulation world
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub progression: ProgressionState,
    pub projectiles: ProjectileSystem,
    pub obstacles: ObstacleSystem,
    pub pickups: PickupSystem,
    pub effects: EffectSystem,
    pub collisions: CollisionSystem,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter (playing ticks only)
    pub time_ticks: u64,
    /// Last position reported by the host
    pub player_position: Vec3,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a world in the `Start` phase
    pub fn new(seed: u64, tuning: Tuning, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let progression =
            ProgressionState::new(high_score, tuning.player.start_lives, &tuning.progression);
        let pickups = PickupSystem::new(&tuning.pickups, &mut rng);
        let effects = EffectSystem::new(&tuning.effects);
        Self {
            seed,
            progression,
            projectiles: ProjectileSystem::new(),
            obstacles: ObstacleSystem::new(),
            pickups,
            effects,
            collisions: CollisionSystem::new(),
            events: Vec::with_capacity(32),
            time_ticks: 0,
            player_position: Vec3::from_array(tuning.player.default_position),
            rng,
            tuning,
        }
    }

    /// Deactivate every pooled entity and rewind system timers
    pub fn reset_entities(&mut self) {
        self.projectiles.reset();
        self.obstacles.reset();
        self.effects.reset();
        self.collisions.reset();
        self.pickups.reset(&self.tuning.pickups, &mut self.rng);
        self.player_position = Vec3::from_array(self.tuning.player.default_position);
    }

    /// Clear the world and begin a new run
    pub fn restart(&mut self) {
        self.reset_entities();
        self.progression.start_game();
        self.time_ticks = 0;
    }
}
