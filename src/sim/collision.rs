//! Collision and pickup resolution
//!
//! Runs once per frame after positions are final. Hits are gathered before
//! anything is mutated; pickups resolve before penalties.

use super::random::random_range;
use super::rect::Rect;
use super::state::{Entity, EntityKind, GameEvent, GameSession, Scatter, SoundEffect};

/// IDs of pickups touching `player`, in spawn order
pub fn pickup_hits(player: &Rect, entities: &[Entity]) -> Vec<u32> {
    entities
        .iter()
        .filter(|e| e.kind == EntityKind::Pickup && e.frame().intersects(player))
        .map(|e| e.id)
        .collect()
}

/// IDs of penalties whose hitbox, shrunk by `inset` per side, touches `player`
pub fn penalty_hits(player: &Rect, entities: &[Entity], inset: f32) -> Vec<u32> {
    entities
        .iter()
        .filter(|e| {
            e.kind == EntityKind::Penalty && e.frame().inset_by(inset, inset).intersects(player)
        })
        .map(|e| e.id)
        .collect()
}

impl GameSession {
    /// Resolve this frame's contacts between the player and spawned entities
    pub fn on_collision_check_phase(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let player = self.player.frame();

        for id in pickup_hits(&player, &self.entities) {
            if !self.state.is_running() {
                break;
            }
            self.collect_pickup(id);
        }

        if self.is_invincible() {
            return;
        }
        for id in penalty_hits(&player, &self.entities, self.settings.penalty_inset) {
            if !self.state.is_running() {
                break;
            }
            self.take_penalty_hit(id);
        }
    }

    fn remove_entity(&mut self, id: u32) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    fn collect_pickup(&mut self, id: u32) {
        let Some(pickup) = self.remove_entity(id) else {
            return;
        };
        let chain_len = match self.chain.push(pickup) {
            Ok(len) => len,
            Err(rejected) => {
                log::warn!("train already full, dropping pickup {}", rejected.id);
                return;
            }
        };
        self.score += 1;
        log::debug!("pickup {id} joined the train ({chain_len})");
        self.emit(GameEvent::PlaySound(SoundEffect::HitPickup));
        self.emit(GameEvent::PickupCollected { id, chain_len });

        if chain_len >= self.settings.max_chain_length {
            self.finish(true);
        }
    }

    fn take_penalty_hit(&mut self, id: u32) {
        if self.remove_entity(id).is_none() {
            return;
        }
        self.emit(GameEvent::PlaySound(SoundEffect::HitPenalty));

        if self.lives == 0 {
            log::warn!("penalty hit with no lives left, clamping at 0");
        }
        self.lives = self.lives.saturating_sub(1);

        let lost = self.chain.detach_tail(self.settings.followers_lost_per_hit);
        if !lost.is_empty() {
            let radius = self.settings.scatter_radius;
            let scattered: Vec<Scatter> = lost
                .iter()
                .map(|f| {
                    let from = f.entity.position;
                    let dx = random_range(&mut self.rng, -radius, radius);
                    let dy = random_range(&mut self.rng, -radius, radius);
                    Scatter {
                        id: f.entity.id,
                        from,
                        to: from + glam::Vec2::new(dx, dy),
                    }
                })
                .collect();
            self.emit(GameEvent::FollowersScattered(scattered));
        }
        log::debug!(
            "penalty {id} hit: lives={}, lost {} followers",
            self.lives,
            lost.len()
        );
        self.emit(GameEvent::PenaltyHit {
            id,
            lives: self.lives,
        });

        if !self.is_invincible() && self.settings.invincibility_secs > 0.0 {
            self.invincible_secs = self.settings.invincibility_secs;
            self.emit(GameEvent::InvincibilityStarted);
        }

        if self.lives == 0 {
            self.finish(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::GameState;
    use glam::Vec2;

    fn running_session() -> GameSession {
        let mut session = GameSession::new(Settings {
            start_paused: false,
            ..Default::default()
        });
        session.drain_events();
        session
    }

    fn place(session: &mut GameSession, kind: EntityKind, offset: Vec2) -> u32 {
        let id = session.next_entity_id();
        let size = match kind {
            EntityKind::Penalty => session.settings.penalty_size,
            _ => session.settings.pickup_size,
        };
        let position = session.player.position + offset;
        session.entities.push(Entity::new(id, kind, position, size));
        id
    }

    #[test]
    fn test_pickup_joins_train() {
        let mut session = running_session();
        let id = place(&mut session, EntityKind::Pickup, Vec2::new(10.0, 0.0));

        session.on_collision_check_phase();

        assert_eq!(session.chain_len(), 1);
        assert_eq!(session.score(), 1);
        assert!(session.entities().is_empty());
        let follower = session.followers().next().unwrap();
        assert_eq!(follower.id, id);
        assert_eq!(follower.kind, EntityKind::Follower);
        assert!(session
            .drain_events()
            .contains(&GameEvent::PickupCollected { id, chain_len: 1 }));
    }

    #[test]
    fn test_distant_entities_ignored() {
        let mut session = running_session();
        place(&mut session, EntityKind::Pickup, Vec2::new(600.0, 0.0));
        place(&mut session, EntityKind::Penalty, Vec2::new(0.0, 600.0));

        session.on_collision_check_phase();

        assert_eq!(session.chain_len(), 0);
        assert_eq!(session.lives(), Settings::default().start_lives);
        assert_eq!(session.entities().len(), 2);
    }

    #[test]
    fn test_last_pickup_wins() {
        let mut session = running_session();
        let max = session.settings.max_chain_length;
        for id in 0..(max as u32 - 1) {
            let e = Entity::new(100 + id, EntityKind::Pickup, Vec2::ZERO, Vec2::ONE);
            session.chain.push(e).unwrap();
        }
        place(&mut session, EntityKind::Pickup, Vec2::ZERO);

        session.on_collision_check_phase();

        assert_eq!(session.chain_len(), max);
        assert_eq!(session.state(), GameState::GameOver { won: true });
        assert!(session.check_invariants().is_ok());
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GameOver { won: true }));
        assert!(events.contains(&GameEvent::StopBackgroundMusic));
    }

    #[test]
    fn test_simultaneous_pickups_past_threshold_stop_at_max() {
        let mut session = GameSession::new(Settings {
            start_paused: false,
            max_chain_length: 3,
            ..Default::default()
        });
        for i in 0..5 {
            place(&mut session, EntityKind::Pickup, Vec2::new(i as f32, 0.0));
        }

        session.on_collision_check_phase();

        assert_eq!(session.chain_len(), 3);
        assert_eq!(session.state(), GameState::GameOver { won: true });
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn test_pickup_order_does_not_change_outcome() {
        let offsets = [
            Vec2::new(-20.0, 0.0),
            Vec2::new(0.0, 15.0),
            Vec2::new(30.0, -10.0),
        ];
        let mut forward = running_session();
        let mut backward = running_session();
        for offset in offsets {
            place(&mut forward, EntityKind::Pickup, offset);
        }
        for offset in offsets.iter().rev() {
            place(&mut backward, EntityKind::Pickup, *offset);
        }

        forward.on_collision_check_phase();
        backward.on_collision_check_phase();

        assert_eq!(forward.chain_len(), 3);
        assert_eq!(backward.chain_len(), 3);
        assert_eq!(forward.state(), GameState::Running);
        assert_eq!(backward.state(), GameState::Running);
    }

    #[test]
    fn test_penalty_costs_life_and_followers() {
        let mut session = running_session();
        for id in 0..3 {
            let e = Entity::new(100 + id, EntityKind::Pickup, Vec2::ZERO, Vec2::ONE);
            session.chain.push(e).unwrap();
        }
        let id = place(&mut session, EntityKind::Penalty, Vec2::ZERO);

        session.on_collision_check_phase();

        assert_eq!(session.lives(), Settings::default().start_lives - 1);
        assert_eq!(session.chain_len(), 1);
        assert!(session.is_invincible());
        assert!(session.entities().is_empty());

        let events = session.drain_events();
        let scattered = events
            .iter()
            .find_map(|e| match e {
                GameEvent::FollowersScattered(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            scattered.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![102, 101]
        );
        for s in &scattered {
            assert!((s.to - s.from).abs().max_element() <= 100.0);
        }
        assert!(events.contains(&GameEvent::PenaltyHit {
            id,
            lives: Settings::default().start_lives - 1
        }));
        assert!(events.contains(&GameEvent::InvincibilityStarted));
    }

    #[test]
    fn test_last_life_loses() {
        let mut session = running_session();
        session.lives = 1;
        for id in 0..3 {
            let e = Entity::new(100 + id, EntityKind::Pickup, Vec2::ZERO, Vec2::ONE);
            session.chain.push(e).unwrap();
        }
        place(&mut session, EntityKind::Penalty, Vec2::ZERO);

        session.on_collision_check_phase();

        assert_eq!(session.lives(), 0);
        assert_eq!(session.state(), GameState::GameOver { won: false });
        assert_eq!(session.chain_len(), 1);
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn test_invincible_ignores_penalties() {
        let mut session = running_session();
        session.chain.push(Entity::new(100, EntityKind::Pickup, Vec2::ZERO, Vec2::ONE)).unwrap();
        session.invincible_secs = 1.5;
        place(&mut session, EntityKind::Penalty, Vec2::ZERO);

        session.on_collision_check_phase();

        assert_eq!(session.lives(), Settings::default().start_lives);
        assert_eq!(session.chain_len(), 1);
        assert_eq!(session.entities().len(), 1);
    }

    #[test]
    fn test_penalty_inset_shrinks_hitbox() {
        let mut session = running_session();
        let player = session.player.frame();
        let penalty = session.settings.penalty_size;
        // Overlap the player's right edge by 10 units: inside the raw box,
        // outside the box shrunk by 20 per side
        let offset = Vec2::new(player.width() / 2.0 + penalty.x / 2.0 - 10.0, 0.0);
        place(&mut session, EntityKind::Penalty, offset);

        session.on_collision_check_phase();

        assert_eq!(session.lives(), Settings::default().start_lives);
        assert_eq!(session.entities().len(), 1);
    }

    #[test]
    fn test_pickup_hitbox_is_exact() {
        let mut session = running_session();
        let player = session.player.frame();
        let pickup = session.settings.pickup_size;
        let offset = Vec2::new(player.width() / 2.0 + pickup.x / 2.0 - 10.0, 0.0);
        place(&mut session, EntityKind::Pickup, offset);

        session.on_collision_check_phase();

        assert_eq!(session.chain_len(), 1);
    }

    #[test]
    fn test_pickups_resolve_before_penalties() {
        let mut session = running_session();
        session.lives = 1;
        let pickup = place(&mut session, EntityKind::Pickup, Vec2::ZERO);
        place(&mut session, EntityKind::Penalty, Vec2::ZERO);

        session.on_collision_check_phase();

        // The pickup joined, then the penalty knocked it straight back out
        assert_eq!(session.score(), 1);
        assert_eq!(session.chain_len(), 0);
        assert_eq!(session.state(), GameState::GameOver { won: false });
        let events = session.drain_events();
        let collected = events
            .iter()
            .position(|e| matches!(e, GameEvent::PickupCollected { id, .. } if *id == pickup));
        let hit = events
            .iter()
            .position(|e| matches!(e, GameEvent::PenaltyHit { .. }));
        assert!(collected.unwrap() < hit.unwrap());
    }

    #[test]
    fn test_nothing_resolves_when_not_running() {
        let mut session = GameSession::new(Settings::default());
        place(&mut session, EntityKind::Pickup, Vec2::ZERO);
        session.on_collision_check_phase();
        assert_eq!(session.chain_len(), 0);

        session.state = GameState::GameOver { won: false };
        session.on_collision_check_phase();
        assert_eq!(session.chain_len(), 0);
    }

    #[test]
    fn test_rotated_player_narrows_sideways() {
        let mut session = running_session();
        session.player.heading = std::f32::consts::FRAC_PI_2;
        // Half-widths 55 + 45 = 100 once the player faces up
        place(&mut session, EntityKind::Pickup, Vec2::new(120.0, 0.0));
        session.on_collision_check_phase();
        assert_eq!(session.chain_len(), 0);
        assert_eq!(session.entities().len(), 1);
    }

    #[test]
    fn test_rotated_player_reaches_further_up() {
        let mut session = running_session();
        // Half-heights 55 + 45 = 100 unrotated, 80 + 45 = 125 rotated
        place(&mut session, EntityKind::Pickup, Vec2::new(0.0, 115.0));
        session.on_collision_check_phase();
        assert_eq!(session.chain_len(), 0);

        session.player.heading = std::f32::consts::FRAC_PI_2;
        session.on_collision_check_phase();
        assert_eq!(session.chain_len(), 1);
    }

}
