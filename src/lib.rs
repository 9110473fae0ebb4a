//! Zombie Conga - gameplay core for a conga-line arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, follower train, game state)
//! - `settings`: Data-driven game tuning
//! - `error`: Error taxonomy for contract violations and config loading
//!
//! Rendering, audio playback, input delivery and scene visuals live outside this
//! crate. They drive the simulation through the `GameSession` entry points and
//! consume the `GameEvent`s it queues.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use settings::Settings;

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Frame rate the headless driver runs at
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Widest aspect ratio the playable area is designed for
    pub const MAX_ASPECT_RATIO: f32 = 16.0 / 9.0;

    /// Scene dimensions (world units)
    pub const SCENE_WIDTH: f32 = 2048.0;
    pub const SCENE_HEIGHT: f32 = 1536.0;

    /// Player movement
    pub const PLAYER_SPEED: f32 = 480.0;
    /// 4π radians per second
    pub const PLAYER_ROTATION_SPEED: f32 = 4.0 * std::f32::consts::PI;

    /// Session rules
    pub const START_LIVES: u32 = 5;
    pub const MAX_CHAIN_LENGTH: usize = 15;
    pub const INVINCIBILITY_SECS: f32 = 3.0;
    pub const FOLLOWERS_LOST_PER_HIT: usize = 2;

    /// Penalty hitboxes shrink by this much on each side
    pub const PENALTY_INSET: f32 = 20.0;

    /// Follower steps run at a fixed duration regardless of frame dt
    pub const FOLLOWER_STEP_SECS: f32 = 0.3;
    /// Scattered followers land within ±this of their last position
    pub const SCATTER_RADIUS: f32 = 100.0;

    /// Camera scroll speed (units/s)
    pub const CAMERA_SPEED: f32 = 200.0;

    /// Spawn cadence and lifetimes (seconds)
    pub const PICKUP_SPAWN_INTERVAL: f32 = 1.0;
    pub const PENALTY_SPAWN_INTERVAL: f32 = 2.0;
    pub const PICKUP_LIFETIME: f32 = 11.0;
    pub const PENALTY_CROSS_TIME: f32 = 2.0;

    /// Scene flow delays (seconds)
    pub const GAME_OVER_DELAY: f32 = 0.0;
    pub const RESULTS_DURATION: f32 = 3.0;
}

/// Shortest signed rotation from `from` to `to`, wrapped into (-π, π]
#[inline]
pub fn shortest_angle_between(from: f32, to: f32) -> f32 {
    let mut angle = (to - from) % TAU;
    if angle > PI {
        angle -= TAU;
    }
    if angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Heading of a vector (atan2)
#[inline]
pub fn angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Sign that treats zero as positive
#[inline]
pub fn sign(x: f32) -> f32 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

/// Unit vector in the direction of `v`
///
/// Fails on zero-length (or non-finite) input; callers moving toward a target
/// treat a zero offset as "already arrived" instead of calling this.
pub fn normalize(v: Vec2) -> Result<Vec2, SimError> {
    v.try_normalize().ok_or(SimError::DegenerateVector)
}
