//! Multi-tick scenarios through the public API

use glam::Vec3;
use space_runner::sim::{GameEvent, GamePhase, GameState, Obstacle, TickInput, tick};
use space_runner::{HighScoreStore, MemoryStore, Tuning};

const DT: f32 = 1.0 / 60.0;

fn start(state: &mut GameState) {
    let input = TickInput {
        start: true,
        ..Default::default()
    };
    tick(state, &input, DT);
}

/// Tuning with the spawn director effectively switched off
fn quiet_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.obstacles.base_count = 0;
    tuning.obstacles.count_per_level = 0.0;
    tuning
}

#[test]
fn test_shot_destroys_obstacle_ahead() {
    let mut state = GameState::new(1, quiet_tuning(), 0);
    start(&mut state);

    let player = Vec3::new(0.0, 2.0, 0.0);
    state.obstacles.spawn(Obstacle::new(Vec3::new(0.0, 2.0, -10.0), 1.0));

    let fire = TickInput {
        player_position: Some(player),
        fire: true,
        ..Default::default()
    };
    let mut destroyed = None;
    for _ in 0..30 {
        tick(&mut state, &fire, DT);
        if let Some(event) = state
            .events
            .iter()
            .find(|e| matches!(e, GameEvent::ObstacleDestroyed { .. }))
        {
            destroyed = Some(*event);
            break;
        }
    }

    let Some(GameEvent::ObstacleDestroyed { points, .. }) = destroyed else {
        panic!("obstacle was never destroyed");
    };
    assert_eq!(points, 300);
    assert_eq!(state.progression.score, 300);
    assert_eq!(state.progression.destroyed_count, 1);
    assert!(state.obstacles.pool.is_empty());
    assert_eq!(state.effects.effects.active_count(), 1);
}

#[test]
fn test_three_hits_end_the_run() {
    let mut tuning = quiet_tuning();
    tuning.player.invincible_duration = 0.0;
    let mut state = GameState::new(2, tuning, 1_000);
    start(&mut state);

    let player = Vec3::new(0.0, 2.0, -30.0);
    let input = TickInput {
        player_position: Some(player),
        ..Default::default()
    };
    let mut hits = 0;
    let mut game_over = None;
    for _ in 0..3 {
        state.obstacles.spawn(Obstacle::new(player, 1.0));
        tick(&mut state, &input, DT);
        for event in &state.events {
            match *event {
                GameEvent::PlayerHit { shake, .. } => {
                    hits += 1;
                    assert!(shake > 0.0);
                }
                GameEvent::GameOver { .. } => game_over = Some(*event),
                _ => {}
            }
        }
    }

    assert_eq!(hits, 3);
    assert_eq!(state.progression.lives, 0);
    assert_eq!(state.progression.phase, GamePhase::GameOver);
    assert_eq!(
        game_over,
        Some(GameEvent::GameOver {
            score: 0,
            high_score: 1_000,
            new_record: false,
        })
    );

    // Frozen until the host restarts
    let obstacles = state.obstacles.pool.active_count();
    state.obstacles.spawn(Obstacle::new(player, 1.0));
    tick(&mut state, &input, DT);
    assert_eq!(state.obstacles.pool.active_count(), obstacles + 1);
    assert!(state.events.is_empty());
}

#[test]
fn test_host_persists_new_record() {
    let mut store = MemoryStore::new(100);
    let mut state = GameState::new(3, quiet_tuning(), store.load().unwrap());
    start(&mut state);
    state.progression.add_score(450);
    state.progression.lives = 1;

    let player = Vec3::new(0.0, 2.0, 0.0);
    state.obstacles.spawn(Obstacle::new(player, 1.0));
    let input = TickInput {
        player_position: Some(player),
        ..Default::default()
    };
    tick(&mut state, &input, DT);

    for event in &state.events {
        if let GameEvent::GameOver {
            high_score,
            new_record: true,
            ..
        } = *event
        {
            store.save(high_score).unwrap();
        }
    }
    assert_eq!(store.load().unwrap(), 450);
}

#[test]
fn test_low_ammo_ring_reloads_player() {
    let mut state = GameState::new(4, quiet_tuning(), 0);
    start(&mut state);
    state.progression.ammo = 3;

    let mut input = TickInput {
        player_position: Some(Vec3::new(0.0, 2.0, 0.0)),
        ..Default::default()
    };
    tick(&mut state, &input, DT);
    let ring = state
        .pickups
        .visible_ring()
        .copied()
        .expect("a ring lights up when ammo is low");

    input.player_position = Some(ring.position());
    tick(&mut state, &input, DT);

    let reload = state.tuning.pickups.reload_amount;
    assert!(state.events.contains(&GameEvent::AmmoCollected {
        amount: reload,
        ammo: 3 + reload,
    }));
    assert_eq!(state.progression.ammo, 3 + reload);
    assert!(state.pickups.visible_ring().is_none());
}

#[test]
fn test_difficulty_rises_with_level() {
    let tuning = Tuning::default();
    let mut state = GameState::new(5, tuning, 0);
    start(&mut state);
    let first_wave = state.obstacles.pool.active_count();
    assert_eq!(first_wave, 2);

    let mut leveled = GameState::new(5, Tuning::default(), 0);
    start(&mut leveled);
    leveled.obstacles.reset();
    for _ in 0..4 {
        leveled.progression.next_level();
    }
    tick(&mut leveled, &TickInput::default(), DT);
    assert_eq!(leveled.obstacles.pool.active_count(), 4);
}

#[test]
fn test_long_run_keeps_pools_consistent() {
    let mut state = GameState::new(6, Tuning::default(), 0);
    start(&mut state);

    for i in 0..3_000 {
        let t = i as f32 * DT;
        let input = TickInput {
            player_position: Some(Vec3::new(5.0 * (t * 0.5).sin(), 2.0, -20.0 * t)),
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        if state.progression.phase == GamePhase::GameOver {
            break;
        }

        let active = state.obstacles.pool.iter_active().count();
        assert_eq!(active, state.obstacles.pool.active_count());
        assert!(state.effects.particles.active_count() <= state.tuning.effects.max_particles);
        assert!(state.progression.ammo <= state.progression.max_ammo);
        assert!(state.pickups.rings.iter().filter(|r| r.is_visible()).count() <= 1);
    }
}
