//! Game tuning and session options
//!
//! Loaded from a JSON file by the host. Missing fields fall back to defaults.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for spawn positions and scatter offsets
    pub seed: u64,
    /// Start each session in `Paused` until the first input (otherwise `Running`)
    pub start_paused: bool,

    // === Scene ===
    pub scene_width: f32,
    pub scene_height: f32,
    /// Horizontal scroll speed of the playable area (0 disables scrolling)
    pub camera_speed: f32,

    // === Player ===
    /// Movement speed (units/s), shared by followers
    pub player_speed: f32,
    /// Rotation speed (radians/s)
    pub rotation_speed: f32,
    pub player_size: Vec2,

    // === Rules ===
    pub start_lives: u32,
    pub max_chain_length: usize,
    pub invincibility_secs: f32,
    pub followers_lost_per_hit: usize,
    pub penalty_inset: f32,

    // === Followers ===
    pub follower_step_secs: f32,
    pub scatter_radius: f32,

    // === Spawning ===
    pub pickup_size: Vec2,
    pub penalty_size: Vec2,
    pub pickup_spawn_interval: f32,
    pub penalty_spawn_interval: f32,
    pub pickup_lifetime: f32,
    pub penalty_cross_time: f32,

    // === Scene flow ===
    /// Delay between game over and leaving the session
    pub game_over_delay: f32,
    /// How long the results screen stays up before returning to the menu
    pub results_duration: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            start_paused: true,

            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            camera_speed: CAMERA_SPEED,

            player_speed: PLAYER_SPEED,
            rotation_speed: PLAYER_ROTATION_SPEED,
            player_size: Vec2::new(160.0, 110.0),

            start_lives: START_LIVES,
            max_chain_length: MAX_CHAIN_LENGTH,
            invincibility_secs: INVINCIBILITY_SECS,
            followers_lost_per_hit: FOLLOWERS_LOST_PER_HIT,
            penalty_inset: PENALTY_INSET,

            follower_step_secs: FOLLOWER_STEP_SECS,
            scatter_radius: SCATTER_RADIUS,

            pickup_size: Vec2::new(90.0, 90.0),
            penalty_size: Vec2::new(120.0, 160.0),
            pickup_spawn_interval: PICKUP_SPAWN_INTERVAL,
            penalty_spawn_interval: PENALTY_SPAWN_INTERVAL,
            pickup_lifetime: PICKUP_LIFETIME,
            penalty_cross_time: PENALTY_CROSS_TIME,

            game_over_delay: GAME_OVER_DELAY,
            results_duration: RESULTS_DURATION,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject tunings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scene_width", self.scene_width),
            ("scene_height", self.scene_height),
            ("player_speed", self.player_speed),
            ("rotation_speed", self.rotation_speed),
            ("follower_step_secs", self.follower_step_secs),
            ("pickup_lifetime", self.pickup_lifetime),
            ("penalty_cross_time", self.penalty_cross_time),
            ("pickup_spawn_interval", self.pickup_spawn_interval),
            ("penalty_spawn_interval", self.penalty_spawn_interval),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("camera_speed", self.camera_speed),
            ("invincibility_secs", self.invincibility_secs),
            ("penalty_inset", self.penalty_inset),
            ("scatter_radius", self.scatter_radius),
            ("game_over_delay", self.game_over_delay),
            ("results_duration", self.results_duration),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        for (name, size) in [
            ("player_size", self.player_size),
            ("pickup_size", self.pickup_size),
            ("penalty_size", self.penalty_size),
        ] {
            if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must have positive extents, got {size}"
                )));
            }
        }

        if self.start_lives == 0 {
            return Err(ConfigError::Validation("start_lives must be at least 1".into()));
        }
        if self.max_chain_length == 0 {
            return Err(ConfigError::Validation(
                "max_chain_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Distance the player covers in one follower step
    pub fn follower_step_distance(&self) -> f32 {
        self.player_speed * self.follower_step_secs
    }
}
