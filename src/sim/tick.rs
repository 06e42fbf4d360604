//! Per-frame simulation step
//!
//! Advances every system in a fixed order so a seed plus an input sequence
//! always reproduces the same run.

use glam::Vec3;

use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player position reported by the host; `None` keeps the last known one
    pub player_position: Option<Vec3>,
    /// Fire intent (held trigger)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a run from the title or game-over screen
    pub start: bool,
}

/// Clamp a host-supplied frame delta into `[0, max_dt]`
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        log::debug!("Rejected frame dt {dt}, using 0");
        return 0.0;
    }
    if dt > max_dt {
        log::debug!("Clamped frame dt {dt:.4} to {max_dt:.4}");
        return max_dt;
    }
    dt
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    let dt = sanitize_dt(dt, state.tuning.max_frame_dt);

    if input.pause {
        if let Some(event) = state.progression.toggle_pause() {
            state.events.push(event);
        }
    }

    if input.start
        && matches!(
            state.progression.phase,
            GamePhase::Start | GamePhase::GameOver
        )
    {
        state.restart();
        state.events.push(GameEvent::GameStarted);
    }

    if !state.progression.is_playing() {
        return;
    }

    state.time_ticks += 1;
    if let Some(position) = input.player_position {
        state.player_position = position;
    }
    let player = state.player_position;
    let player_z = player.z;

    // Fire
    state.projectiles.cool_down(dt);
    if input.fire
        && state
            .projectiles
            .fire(player, &mut state.progression, &state.tuning.projectiles)
            .is_some()
    {
        state.events.push(GameEvent::ShotFired { position: player });
    }

    state.obstacles.step(
        dt,
        state.progression.level,
        player_z,
        &mut state.rng,
        &state.tuning.obstacles,
    );
    state
        .projectiles
        .step(dt, player_z, &state.tuning.projectiles);

    if let Some(amount) = state.pickups.step(
        input.player_position,
        player_z,
        &mut state.progression,
        &mut state.rng,
        &state.tuning.pickups,
    ) {
        log::debug!("Reload ring collected: +{amount} ammo");
        state.events.push(GameEvent::AmmoCollected {
            amount,
            ammo: state.progression.ammo,
        });
    }

    state.collisions.resolve(
        dt,
        input.player_position,
        &mut state.projectiles,
        &mut state.obstacles,
        &mut state.effects,
        &mut state.progression,
        &mut state.events,
        &mut state.rng,
        &state.tuning,
    );

    state.effects.step(dt, &state.tuning.effects);
}
