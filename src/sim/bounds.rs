//! Boundary reflection for the controlled entity
//!
//! Each axis is handled independently, so a corner contact reflects both.

use glam::Vec2;

use super::rect::Rect;

/// Clamp `position` into `bounds`, negating the velocity component of any
/// axis where the position touched or crossed an edge.
pub fn reflect_at_bounds(position: Vec2, velocity: Vec2, bounds: &Rect) -> (Vec2, Vec2) {
    let (x, vx) = reflect_axis(position.x, velocity.x, bounds.min_x(), bounds.max_x());
    let (y, vy) = reflect_axis(position.y, velocity.y, bounds.min_y(), bounds.max_y());
    (Vec2::new(x, y), Vec2::new(vx, vy))
}

fn reflect_axis(mut pos: f32, mut vel: f32, min: f32, max: f32) -> (f32, f32) {
    if pos <= min {
        pos = min;
        vel = -vel;
    }
    if pos >= max {
        pos = max;
        vel = -vel;
    }
    (pos, vel)
}
