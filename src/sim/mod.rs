//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (pool slot order)
//! - No rendering, audio or input-device dependencies
//!
//! The host calls [`tick`] once per frame and reads pools, progression and
//! events between ticks.

pub mod collision;
pub mod effects;
pub mod obstacles;
pub mod pickups;
pub mod pool;
pub mod projectiles;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, CollisionSystem, spheres_intersect};
pub use effects::{Effect, EffectSystem, Particle};
pub use obstacles::{Obstacle, ObstacleSystem, SpawnDirector};
pub use pickups::{PickupRing, PickupSystem};
pub use pool::{EntityPool, PoolHandle};
pub use projectiles::{Projectile, ProjectileSystem};
pub use state::{GameEvent, GamePhase, GameState, ProgressionState};
pub use tick::{TickInput, sanitize_dt, tick};
