//! Zombie Conga headless driver
//!
//! Stands in for the host engine: a fixed 60 Hz clock, interval spawners and
//! a scripted finger that chases the nearest pickup. Plays one full
//! menu → game → results → menu loop and logs every event along the way.
//!
//! Usage: `zombie-conga [settings.json]`

use std::process;

use glam::Vec2;
use zombie_conga::consts::FRAME_DT;
use zombie_conga::settings::Settings;
use zombie_conga::sim::{
    EntityKind, FrameClock, GameEvent, GameSession, SceneFlow, SceneKind, SpawnKind,
};

/// Give up after five minutes of simulated time
const MAX_FRAMES: u32 = 60 * 60 * 5;
/// How often the scripted finger re-aims
const TAP_INTERVAL: f32 = 0.5;

/// Fires every `interval` seconds of accumulated time
struct Repeater {
    interval: f32,
    accumulator: f32,
}

impl Repeater {
    fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Number of times the repeater fired during `dt`
    fn tick(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut fired = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            fired += 1;
        }
        fired
    }

    fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// One-shot timer armed by scene events
#[derive(Default)]
struct Countdown(Option<f32>);

impl Countdown {
    fn arm(&mut self, secs: f32) {
        self.0 = Some(secs);
    }

    fn expired(&mut self, dt: f32) -> bool {
        match self.0.as_mut() {
            Some(left) => {
                *left -= dt;
                if *left <= 0.0 {
                    self.0 = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

struct Driver {
    flow: SceneFlow,
    clock: FrameClock,
    time: f64,
    pickup_spawner: Repeater,
    penalty_spawner: Repeater,
    finger: Repeater,
    session_timeout: Countdown,
    results_timeout: Countdown,
    game_over_delay: f32,
    results_duration: f32,
    games_finished: u32,
}

impl Driver {
    fn new(settings: Settings) -> Self {
        Self {
            clock: FrameClock::new(),
            time: 0.0,
            pickup_spawner: Repeater::new(settings.pickup_spawn_interval),
            penalty_spawner: Repeater::new(settings.penalty_spawn_interval),
            finger: Repeater::new(TAP_INTERVAL),
            session_timeout: Countdown::default(),
            results_timeout: Countdown::default(),
            game_over_delay: settings.game_over_delay,
            results_duration: settings.results_duration,
            games_finished: 0,
            flow: SceneFlow::new(settings),
        }
    }

    /// Where the scripted finger taps: the nearest pickup, or ahead of the camera
    fn aim(session: &GameSession) -> Vec2 {
        let player = session.player().position;
        session
            .entities()
            .iter()
            .filter(|e| e.kind == EntityKind::Pickup)
            .min_by(|a, b| {
                a.position
                    .distance_squared(player)
                    .partial_cmp(&b.position.distance_squared(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.position)
            .unwrap_or_else(|| session.camera_rect().center())
    }

    fn frame(&mut self) {
        self.time += FRAME_DT as f64;
        let dt = self.clock.advance(self.time);

        if self.flow.kind() == SceneKind::MainMenu && self.games_finished == 0 {
            self.flow.on_tap(Vec2::ZERO);
        }

        if let Some(session) = self.flow.session_mut() {
            for _ in 0..self.pickup_spawner.tick(dt) {
                session.on_spawn_tick(SpawnKind::Pickup);
            }
            for _ in 0..self.penalty_spawner.tick(dt) {
                session.on_spawn_tick(SpawnKind::Penalty);
            }
            if session.state().is_running() {
                session.on_frame(dt);
                session.on_collision_check_phase();
            }
            if self.finger.tick(dt) > 0 || !session.state().is_running() {
                let target = Self::aim(session);
                session.on_player_input(target);
            }
        }

        if self.session_timeout.expired(dt) {
            self.flow.on_session_timeout();
        }
        if self.results_timeout.expired(dt) {
            self.flow.on_results_timeout();
        }

        for event in self.flow.drain_events() {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: GameEvent) {
        match &event {
            GameEvent::PresentScene(SceneKind::Game) => {
                // A fresh scene has no frame history
                self.clock.reset();
                self.pickup_spawner.reset();
                self.penalty_spawner.reset();
                self.finger.reset();
            }
            GameEvent::GameOver { .. } => self.session_timeout.arm(self.game_over_delay),
            GameEvent::PresentScene(SceneKind::Results { .. }) => {
                self.results_timeout.arm(self.results_duration)
            }
            GameEvent::PresentScene(SceneKind::MainMenu) => self.games_finished += 1,
            _ => {}
        }

        match event {
            GameEvent::PickupCollected { .. }
            | GameEvent::PenaltyHit { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::PresentScene(_) => log::info!("[{:>7.2}s] {:?}", self.time, event),
            _ => log::debug!("[{:>7.2}s] {:?}", self.time, event),
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Zombie Conga (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {path}: {e}");
                process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut driver = Driver::new(settings);
    for _ in 0..MAX_FRAMES {
        driver.frame();
        if driver.games_finished > 0 {
            break;
        }
    }

    match driver.games_finished {
        0 => log::warn!("Stopped after {} frames without finishing a game", MAX_FRAMES),
        n => log::info!("Finished {} game(s) in {:.1}s of simulated time", n, driver.time),
    }
}
