//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies
//! - No timers: the host calls the entry points when its schedules fire

pub mod bounds;
pub mod collision;
pub mod movement;
pub mod random;
pub mod rect;
pub mod scene;
pub mod state;
pub mod tick;
pub mod train;

pub use bounds::reflect_at_bounds;
pub use collision::{penalty_hits, pickup_hits};
pub use movement::{compute_velocity, integrate_position, rotate_toward};
pub use random::{random_point_in, random_range};
pub use rect::Rect;
pub use scene::{Scene, SceneFlow};
pub use state::{
    Entity, EntityKind, GameEvent, GameSession, GameState, Scatter, SceneKind, SoundEffect,
    SpawnKind, playable_area,
};
pub use tick::FrameClock;
pub use train::{Follower, FollowerStep, TrainChain};
