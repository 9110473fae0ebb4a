//! Per-frame simulation driver
//!
//! Entry points the host calls: `on_frame` once per rendered frame,
//! `on_collision_check_phase` after the frame settles, `on_player_input` on
//! touches, `on_spawn_tick` from the spawn scheduler, and `on_session_timeout`
//! once the game-over delay has elapsed.

use glam::Vec2;

use super::bounds::reflect_at_bounds;
use super::movement::{head_toward, steer};
use super::random::{random_point_in, random_range};
use super::state::{Entity, EntityKind, GameEvent, GameSession, GameState, SceneKind, SpawnKind};

/// Turns host timestamps into frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; 0 on the first call.
    /// Clocks running backwards or non-finite timestamps also yield 0.
    pub fn advance(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            return 0.0;
        }
        let dt = match self.last {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl GameSession {
    /// Advance movement, bounds, spawned entities and the train by `dt` seconds
    pub fn on_frame(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if !self.state.is_running() {
            return;
        }
        self.elapsed += dt;

        if self.invincible_secs > 0.0 {
            self.invincible_secs = (self.invincible_secs - dt).max(0.0);
            if self.invincible_secs == 0.0 {
                self.emit(GameEvent::InvincibilityEnded);
            }
        }

        self.camera_travel += self.settings.camera_speed * dt;

        steer(
            &mut self.player,
            &mut self.player_target,
            self.settings.player_speed,
            self.settings.rotation_speed,
            dt,
        );
        let bounds = self.camera_rect();
        let (position, velocity) =
            reflect_at_bounds(self.player.position, self.player.velocity, &bounds);
        self.player.position = position;
        self.player.velocity = velocity;

        for entity in &mut self.entities {
            entity.position += entity.velocity * dt;
            if let Some(ttl) = entity.ttl.as_mut() {
                *ttl -= dt;
            }
        }
        self.entities.retain(|e| match e.ttl {
            Some(ttl) if ttl <= 0.0 => {
                log::debug!("{:?} {} despawned", e.kind, e.id);
                false
            }
            _ => true,
        });

        self.chain.update(
            self.player.position,
            self.settings.follower_step_distance(),
            self.settings.follower_step_secs,
            dt,
        );
    }

    /// Steer the player toward `target` (world space); the first input starts a paused session
    pub fn on_player_input(&mut self, target: Vec2) {
        match self.state {
            GameState::GameOver { .. } => return,
            GameState::Paused => {
                log::info!("First input, session running");
                self.state = GameState::Running;
            }
            GameState::Running => {}
        }

        if head_toward(&mut self.player, target, self.settings.player_speed) {
            self.player_target = Some(target);
        } else {
            self.player_target = None;
        }
    }

    /// Spawn one entity; returns its ID, or None when the session is not running
    pub fn on_spawn_tick(&mut self, kind: SpawnKind) -> Option<u32> {
        if !self.state.is_running() {
            return None;
        }
        let id = self.next_entity_id();
        let camera = self.camera_rect();

        let entity = match kind {
            SpawnKind::Pickup => {
                let position = random_point_in(&mut self.rng, &camera);
                let mut entity =
                    Entity::new(id, EntityKind::Pickup, position, self.settings.pickup_size);
                entity.ttl = Some(self.settings.pickup_lifetime);
                entity
            }
            SpawnKind::Penalty => {
                let size = self.settings.penalty_size;
                let y = random_range(
                    &mut self.rng,
                    camera.min_y() + size.y / 2.0,
                    camera.max_y() - size.y / 2.0,
                );
                let position = Vec2::new(camera.max_x() + size.x / 2.0, y);
                let mut entity = Entity::new(id, EntityKind::Penalty, position, size);
                let crossing = self.settings.scene_width + size.x;
                entity.velocity = Vec2::new(-crossing / self.settings.penalty_cross_time, 0.0);
                entity.ttl = Some(self.settings.penalty_cross_time);
                entity
            }
        };

        log::debug!("spawned {:?} {} at {}", kind, id, entity.position);
        self.entities.push(entity);
        Some(id)
    }

    /// Called by the host after the game-over delay. Asks for the results
    /// scene and reports the outcome; a no-op outside `GameOver`.
    pub fn on_session_timeout(&mut self) -> Option<bool> {
        match self.state {
            GameState::GameOver { won } => {
                self.emit(GameEvent::PresentScene(SceneKind::Results { won }));
                Some(won)
            }
            _ => None,
        }
    }
}
