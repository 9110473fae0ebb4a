//! Session state and core simulation types
//!
//! A `GameSession` owns everything one play-through needs: the controlled
//! entity, spawned pickups and penalties, the follower train, lives, and the
//! outgoing event queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::train::{Follower, TrainChain};
use crate::consts::MAX_ASPECT_RATIO;
use crate::error::SimError;
use crate::settings::Settings;

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the first input
    Paused,
    /// Active gameplay
    Running,
    /// Session ended; `won` is true when the train filled up
    GameOver { won: bool },
}

impl GameState {
    pub fn is_running(&self) -> bool {
        matches!(self, GameState::Running)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameState::GameOver { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    /// Joins the train on contact
    Pickup,
    /// Costs a life on contact
    Penalty,
    /// Member of the train
    Follower,
}

/// Spawnable entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Pickup,
    Penalty,
}

impl From<SpawnKind> for EntityKind {
    fn from(kind: SpawnKind) -> Self {
        match kind {
            SpawnKind::Pickup => EntityKind::Pickup,
            SpawnKind::Penalty => EntityKind::Penalty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub position: Vec2,
    /// Radians, 0 = facing +x
    pub heading: f32,
    pub velocity: Vec2,
    /// Bounding box extents, centered on `position`
    pub size: Vec2,
    /// Seconds until despawn (None = lives until removed)
    pub ttl: Option<f32>,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            heading: 0.0,
            velocity: Vec2::ZERO,
            size,
            ttl: None,
        }
    }

    /// Axis-aligned bounding box of the rotated sprite, in world space
    pub fn frame(&self) -> Rect {
        let (sin, cos) = self.heading.sin_cos();
        let (w, h) = (self.size.x, self.size.y);
        let extent = Vec2::new(
            (w * cos).abs() + (h * sin).abs(),
            (w * sin).abs() + (h * cos).abs(),
        );
        Rect::from_center(self.position, extent)
    }
}

/// Sounds the presentation layer should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    HitPickup,
    HitPenalty,
    Win,
    Lose,
}

/// Scenes the presentation layer can be asked to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    MainMenu,
    Game,
    Results { won: bool },
}

/// A follower knocked out of the train, flying from `from` toward `to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scatter {
    pub id: u32,
    pub from: Vec2,
    pub to: Vec2,
}

/// Side effects for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlaySound(SoundEffect),
    StartBackgroundMusic,
    StopBackgroundMusic,
    PickupCollected { id: u32, chain_len: usize },
    PenaltyHit { id: u32, lives: u32 },
    FollowersScattered(Vec<Scatter>),
    InvincibilityStarted,
    InvincibilityEnded,
    GameOver { won: bool },
    PresentScene(SceneKind),
}

/// Playable area for a scene, letterboxed to the widest supported aspect ratio
pub fn playable_area(scene_width: f32, scene_height: f32) -> Rect {
    let playable_height = scene_width / MAX_ASPECT_RATIO;
    let margin = (scene_height - playable_height) / 2.0;
    Rect::new(0.0, margin, scene_width, playable_height)
}

/// One play-through
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) settings: Settings,
    pub(crate) state: GameState,
    pub(crate) lives: u32,
    /// Pickups collected over the whole session
    pub(crate) score: u32,
    pub(crate) chain: TrainChain,
    pub(crate) playable_area: Rect,
    /// Horizontal distance the camera has scrolled
    pub(crate) camera_travel: f32,
    pub(crate) player: Entity,
    /// Last commanded destination, cleared on arrival
    pub(crate) player_target: Option<Vec2>,
    /// Live pickups and penalties in spawn order
    pub(crate) entities: Vec<Entity>,
    /// Seconds of invincibility left (0 = vulnerable)
    pub(crate) invincible_secs: f32,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    /// Seconds spent running
    pub(crate) elapsed: f32,
    next_id: u32,
}

impl GameSession {
    /// Start a session; settings are assumed validated
    pub fn new(settings: Settings) -> Self {
        let playable_area = playable_area(settings.scene_width, settings.scene_height);
        let state = if settings.start_paused {
            GameState::Paused
        } else {
            GameState::Running
        };
        let player = Entity::new(
            1,
            EntityKind::Player,
            Vec2::new(200.0, playable_area.min_y() + 200.0),
            settings.player_size,
        );

        log::info!(
            "New session: seed={}, lives={}, max_chain={}, state={:?}",
            settings.seed,
            settings.start_lives,
            settings.max_chain_length,
            state
        );

        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            state,
            lives: settings.start_lives,
            score: 0,
            chain: TrainChain::new(settings.max_chain_length),
            playable_area,
            camera_travel: 0.0,
            player,
            player_target: None,
            entities: Vec::new(),
            invincible_secs: 0.0,
            events: vec![GameEvent::StartBackgroundMusic],
            elapsed: 0.0,
            next_id: 2,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {event:?}");
        self.events.push(event);
    }

    /// Take all queued side effects
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter `GameOver`. Later calls are ignored so the first outcome sticks.
    pub(crate) fn finish(&mut self, won: bool) {
        if self.state.is_game_over() {
            return;
        }
        log::info!(
            "Game over ({}): lives={}, chain={}, score={}",
            if won { "won" } else { "lost" },
            self.lives,
            self.chain.len(),
            self.score
        );
        self.state = GameState::GameOver { won };
        self.invincible_secs = 0.0;
        self.emit(GameEvent::StopBackgroundMusic);
        self.emit(GameEvent::GameOver { won });
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_target(&self) -> Option<Vec2> {
        self.player_target
    }

    /// Live pickups and penalties
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Train members, head first
    pub fn followers(&self) -> impl Iterator<Item = &Entity> {
        self.chain.iter().map(|f: &Follower| &f.entity)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_secs > 0.0
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Unscrolled playable area
    pub fn playable_area(&self) -> Rect {
        self.playable_area
    }

    /// Playable area at the current camera position; bounds the player and spawns
    pub fn camera_rect(&self) -> Rect {
        self.playable_area
            .translated(Vec2::new(self.camera_travel, 0.0))
    }

    /// Verify the session-level invariants
    pub fn check_invariants(&self) -> Result<(), SimError> {
        if self.chain.len() > self.chain.max_len() {
            return Err(SimError::InvariantViolation(format!(
                "chain length {} exceeds max {}",
                self.chain.len(),
                self.chain.max_len()
            )));
        }
        if self.chain.is_full()
            && self.state != (GameState::GameOver { won: true })
        {
            return Err(SimError::InvariantViolation(
                "full train without a win".to_string(),
            ));
        }
        if self.lives == 0 && !self.state.is_game_over() {
            return Err(SimError::InvariantViolation(
                "no lives left but session still active".to_string(),
            ));
        }
        if self.invincible_secs < 0.0 {
            return Err(SimError::InvariantViolation(
                "negative invincibility time".to_string(),
            ));
        }
        Ok(())
    }
}
