//! Axis-aligned rectangle geometry
//!
//! Used for the playable area, spawn ranges and entity bounding boxes.
//! Origin is the minimum corner; the y axis points up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.x / 2.0
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn mid_y(&self) -> f32 {
        self.origin.y + self.size.y / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.mid_x(), self.mid_y())
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    /// Over-shrinking collapses to a zero-size rect at the center.
    pub fn inset_by(&self, dx: f32, dy: f32) -> Self {
        let size = (self.size - Vec2::new(dx, dy) * 2.0).max(Vec2::ZERO);
        Self::from_center(self.center(), size)
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            origin: self.origin + offset,
            size: self.size,
        }
    }

    /// True when the rectangles overlap with non-zero area.
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Point containment, edges inclusive
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}
