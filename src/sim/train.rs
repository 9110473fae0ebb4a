//! The follower train
//!
//! Followers move in fixed-duration steps. At the start of each update every
//! follower is handed the position the entity ahead of it held before the
//! update began, so the train trails the leader by one step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind};
use crate::{angle, shortest_angle_between};

/// An in-flight follower step, interpolated linearly over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowerStep {
    pub start: Vec2,
    pub displacement: Vec2,
    pub start_heading: f32,
    pub heading_delta: f32,
    pub elapsed: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follower {
    pub entity: Entity,
    pub step: Option<FollowerStep>,
}

impl Follower {
    /// Re-tag a captured entity as a follower, reset its pose
    pub fn capture(mut entity: Entity) -> Self {
        entity.kind = EntityKind::Follower;
        entity.heading = 0.0;
        entity.velocity = Vec2::ZERO;
        entity.ttl = None;
        Self { entity, step: None }
    }

    pub fn is_moving(&self) -> bool {
        self.step.is_some()
    }

    /// Start a step of length `travel` toward `target` unless one is already
    /// running or the target is closer than a full step.
    fn plan_step(&mut self, target: Vec2, travel: f32, step_secs: f32) {
        if self.step.is_some() {
            return;
        }
        let offset = target - self.entity.position;
        if offset.length() <= travel {
            return;
        }
        // offset is longer than a positive step, so it cannot be zero
        let direction = offset / offset.length();
        self.step = Some(FollowerStep {
            start: self.entity.position,
            displacement: direction * travel,
            start_heading: self.entity.heading,
            heading_delta: shortest_angle_between(self.entity.heading, angle(direction)),
            elapsed: 0.0,
            duration: step_secs,
        });
    }

    fn advance(&mut self, dt: f32) {
        let Some(step) = self.step.as_mut() else {
            return;
        };
        step.elapsed = (step.elapsed + dt).min(step.duration);
        let t = step.elapsed / step.duration;
        self.entity.position = step.start + step.displacement * t;
        self.entity.heading = step.start_heading + step.heading_delta * t;
        if step.elapsed >= step.duration {
            self.step = None;
        }
    }
}

/// Ordered followers, head first; capped at `max_len`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainChain {
    followers: Vec<Follower>,
    max_len: usize,
}

impl TrainChain {
    pub fn new(max_len: usize) -> Self {
        Self {
            followers: Vec::new(),
            max_len,
        }
    }

    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.followers.len() >= self.max_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn iter(&self) -> impl Iterator<Item = &Follower> {
        self.followers.iter()
    }

    /// Append a captured entity at the tail. A full train rejects it.
    pub fn push(&mut self, entity: Entity) -> Result<usize, Entity> {
        if self.is_full() {
            return Err(entity);
        }
        self.followers.push(Follower::capture(entity));
        Ok(self.followers.len())
    }

    /// Remove up to `count` followers from the tail, newest first
    pub fn detach_tail(&mut self, count: usize) -> Vec<Follower> {
        let keep = self.followers.len().saturating_sub(count);
        let mut detached = self.followers.split_off(keep);
        detached.reverse();
        detached
    }

    /// Advance the train by one frame behind `leader`.
    ///
    /// `travel` is the distance of one step, covered in `step_secs`.
    pub fn update(&mut self, leader: Vec2, travel: f32, step_secs: f32, dt: f32) {
        let mut target = leader;
        for follower in &mut self.followers {
            let before = follower.entity.position;
            follower.plan_step(target, travel, step_secs);
            follower.advance(dt);
            target = before;
        }
    }
}
