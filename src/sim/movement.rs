//! Entity movement model
//!
//! Velocity toward a target, explicit Euler integration, and bounded turning.

use glam::Vec2;

use super::state::Entity;
use crate::error::SimError;
use crate::{angle, normalize, shortest_angle_between, sign};

/// Velocity of magnitude `speed` pointing from `current` to `target`.
///
/// Fails when `target == current`; callers treat that case as arrived.
pub fn compute_velocity(current: Vec2, target: Vec2, speed: f32) -> Result<Vec2, SimError> {
    Ok(normalize(target - current)? * speed)
}

#[inline]
pub fn integrate_position(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
    position + velocity * dt
}

/// Turn `current` toward `desired` by at most `angular_speed * dt`, never overshooting
pub fn rotate_toward(current: f32, desired: f32, angular_speed: f32, dt: f32) -> f32 {
    let diff = shortest_angle_between(current, desired);
    let step = (angular_speed * dt).max(0.0).min(diff.abs());
    current + step * sign(diff)
}

/// Point `entity` at `target` with the given speed.
///
/// Returns `false` (and leaves the entity still) when it already stands on the target.
pub fn head_toward(entity: &mut Entity, target: Vec2, speed: f32) -> bool {
    match compute_velocity(entity.position, target, speed) {
        Ok(velocity) => {
            entity.velocity = velocity;
            true
        }
        Err(_) => {
            entity.velocity = Vec2::ZERO;
            false
        }
    }
}

/// Advance a steered entity by one frame.
///
/// If the remaining distance to `target` fits inside this frame's travel the
/// entity snaps onto it, stops, and the target is cleared. Otherwise it moves
/// along its velocity and turns toward its direction of travel.
pub fn steer(
    entity: &mut Entity,
    target: &mut Option<Vec2>,
    speed: f32,
    rotation_speed: f32,
    dt: f32,
) {
    if dt <= 0.0 {
        return;
    }

    if let Some(goal) = *target {
        if entity.position.distance(goal) <= speed * dt {
            entity.position = goal;
            entity.velocity = Vec2::ZERO;
            *target = None;
            return;
        }
    }

    entity.position = integrate_position(entity.position, entity.velocity, dt);
    if entity.velocity != Vec2::ZERO {
        entity.heading = rotate_toward(entity.heading, angle(entity.velocity), rotation_speed, dt);
    }
}
