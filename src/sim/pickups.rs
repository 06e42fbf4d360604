//! Ammo reload rings
//!
//! A fixed set of rings leapfrogs ahead of the player. Rings stay dark until
//! ammo runs low; then exactly one lights up and can be flown through for a
//! reload.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::ProgressionState;
use crate::random_range;
use crate::tuning::{PickupTuning, RingSelection};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupRing {
    pub world_z: f32,
    pub x: f32,
    pub y: f32,
    /// Flown through since the last recycle
    pub collected: bool,
    /// Lit as the current reload target
    pub active: bool,
}

impl PickupRing {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.world_z)
    }

    /// Lit and not yet collected
    pub fn is_visible(&self) -> bool {
        self.active && !self.collected
    }

    fn randomize_offset<R: Rng>(&mut self, rng: &mut R, tuning: &PickupTuning) {
        self.x = random_range(rng, -tuning.lateral_half_width, tuning.lateral_half_width);
        self.y = random_range(rng, tuning.height.0, tuning.height.1);
    }
}

#[derive(Debug, Clone)]
pub struct PickupSystem {
    pub rings: Vec<PickupRing>,
    /// Rings get re-anchored to the player's Z on the first evaluation
    aligned: bool,
}

impl PickupSystem {
    pub fn new<R: Rng>(tuning: &PickupTuning, rng: &mut R) -> Self {
        let mut system = Self {
            rings: Vec::with_capacity(tuning.ring_count),
            aligned: false,
        };
        system.reset(tuning, rng);
        system
    }

    /// Lay the rings out again at fixed spacing ahead of the origin
    pub fn reset<R: Rng>(&mut self, tuning: &PickupTuning, rng: &mut R) {
        self.rings.clear();
        for i in 0..tuning.ring_count {
            let mut ring = PickupRing {
                world_z: -((i + 1) as f32) * tuning.ring_spacing,
                x: 0.0,
                y: 0.0,
                collected: false,
                active: false,
            };
            ring.randomize_offset(rng, tuning);
            self.rings.push(ring);
        }
        self.aligned = false;
    }

    /// The ring currently offered to the player, if any
    pub fn visible_ring(&self) -> Option<&PickupRing> {
        self.rings.iter().find(|r| r.is_visible())
    }

    /// Light a ring when ammo is low, collect rings the player flies through,
    /// and recycle rings left behind. Returns the ammo granted this tick.
    ///
    /// `player` is `None` while the host has no position; collection is then
    /// skipped and `player_z` (last known) drives placement.
    pub fn step<R: Rng>(
        &mut self,
        player: Option<Vec3>,
        player_z: f32,
        progression: &mut ProgressionState,
        rng: &mut R,
        tuning: &PickupTuning,
    ) -> Option<u32> {
        if !self.aligned {
            for (i, ring) in self.rings.iter_mut().enumerate() {
                ring.world_z = player_z - (i + 1) as f32 * tuning.ring_spacing;
            }
            self.aligned = true;
        }

        let low_ammo = progression.ammo_fraction() < tuning.low_ammo_threshold;
        if low_ammo && self.visible_ring().is_none() {
            if let Some(index) = self.select_ring(player_z, tuning.selection) {
                self.rings[index].active = true;
                log::debug!("Reload ring lit at z={:.1}", self.rings[index].world_z);
            }
        }

        let mut granted = None;
        let collect_sq = tuning.collect_radius * tuning.collect_radius;
        for i in 0..self.rings.len() {
            let ring = &mut self.rings[i];
            if let Some(player) = player {
                if ring.is_visible() && player.distance_squared(ring.position()) < collect_sq {
                    ring.collected = true;
                    let before = progression.ammo;
                    progression.reload_ammo(tuning.reload_amount);
                    let amount = progression.ammo - before;
                    granted = Some(granted.unwrap_or(0) + amount);
                }
            }

            if self.rings[i].world_z > player_z + tuning.recycle_margin {
                let min_z = self
                    .rings
                    .iter()
                    .map(|r| r.world_z)
                    .fold(player_z, f32::min);
                let ring = &mut self.rings[i];
                ring.world_z = min_z - tuning.ring_spacing;
                ring.randomize_offset(rng, tuning);
                ring.collected = false;
                ring.active = false;
            }
        }

        granted
    }

    /// Pick an idle ring (neither lit nor collected) to light
    fn select_ring(&self, player_z: f32, selection: RingSelection) -> Option<usize> {
        let idle = self
            .rings
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.collected && !r.active);

        match selection {
            // Greatest Z that is still in front (-Z) of the player
            RingSelection::NearestAhead => idle
                .filter(|(_, r)| r.world_z < player_z)
                .fold(None, |best: Option<(usize, f32)>, (i, r)| match best {
                    Some((_, z)) if z >= r.world_z => best,
                    _ => Some((i, r.world_z)),
                })
                .map(|(i, _)| i),
            // Most negative Z relative to the player
            RingSelection::FurthestAhead => idle
                .fold(None, |best: Option<(usize, f32)>, (i, r)| match best {
                    Some((_, z)) if z <= r.world_z => best,
                    _ => Some((i, r.world_z)),
                })
                .map(|(i, _)| i),
        }
    }
}
