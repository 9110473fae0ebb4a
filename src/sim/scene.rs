//! Scene flow: main menu → game → results → main menu
//!
//! Only the transitions are modeled. The host shows the scene named by each
//! `PresentScene` event and schedules the two timeouts.

use glam::Vec2;

use super::state::{GameEvent, GameSession, SceneKind, SoundEffect};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub enum Scene {
    MainMenu,
    Game(Box<GameSession>),
    Results { won: bool },
}

#[derive(Debug, Clone)]
pub struct SceneFlow {
    settings: Settings,
    scene: Scene,
    sessions_started: u64,
    events: Vec<GameEvent>,
}

impl SceneFlow {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            scene: Scene::MainMenu,
            sessions_started: 0,
            events: Vec::new(),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self.scene {
            Scene::MainMenu => SceneKind::MainMenu,
            Scene::Game(_) => SceneKind::Game,
            Scene::Results { won } => SceneKind::Results { won },
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.scene {
            Scene::Game(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        match &mut self.scene {
            Scene::Game(session) => Some(session.as_mut()),
            _ => None,
        }
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// A tap starts a game from the menu and steers the player in game
    pub fn on_tap(&mut self, location: Vec2) {
        match &mut self.scene {
            Scene::Game(session) => session.on_player_input(location),
            Scene::Results { .. } => {}
            Scene::MainMenu => self.start_session(),
        }
    }

    fn start_session(&mut self) {
        // Each session gets its own spawn sequence
        let settings = Settings {
            seed: self.settings.seed.wrapping_add(self.sessions_started),
            ..self.settings.clone()
        };
        self.sessions_started += 1;
        log::info!("Starting session #{}", self.sessions_started);
        self.scene = Scene::Game(Box::new(GameSession::new(settings)));
        self.events.push(GameEvent::PresentScene(SceneKind::Game));
    }

    /// Leave a finished session for the results screen
    pub fn on_session_timeout(&mut self) {
        let Scene::Game(session) = &mut self.scene else {
            return;
        };
        let Some(won) = session.on_session_timeout() else {
            return;
        };
        self.events.extend(session.drain_events());
        self.events.push(GameEvent::PlaySound(if won {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
        log::info!("Session ended, showing results (won={won})");
        self.scene = Scene::Results { won };
    }

    /// Return from the results screen to the menu
    pub fn on_results_timeout(&mut self) {
        if let Scene::Results { .. } = self.scene {
            self.scene = Scene::MainMenu;
            self.events.push(GameEvent::PresentScene(SceneKind::MainMenu));
        }
    }

    /// Scene-level events followed by the active session's
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.events);
        if let Scene::Game(session) = &mut self.scene {
            events.extend(session.drain_events());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;

    #[test]
    fn test_full_loop() {
        let mut flow = SceneFlow::new(Settings::default());
        assert_eq!(flow.kind(), SceneKind::MainMenu);
        assert!(flow.session().is_none());

        flow.on_tap(Vec2::ZERO);
        assert_eq!(flow.kind(), SceneKind::Game);
        let events = flow.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PresentScene(SceneKind::Game),
                GameEvent::StartBackgroundMusic
            ]
        );

        // Session not over yet
        flow.on_session_timeout();
        assert_eq!(flow.kind(), SceneKind::Game);

        flow.on_tap(Vec2::new(800.0, 600.0));
        let session = flow.session_mut().unwrap();
        assert_eq!(session.state(), GameState::Running);
        session.finish(false);

        flow.on_session_timeout();
        assert_eq!(flow.kind(), SceneKind::Results { won: false });
        let events = flow.drain_events();
        assert!(events.contains(&GameEvent::GameOver { won: false }));
        assert!(events.contains(&GameEvent::PresentScene(SceneKind::Results { won: false })));
        assert_eq!(events.last(), Some(&GameEvent::PlaySound(SoundEffect::Lose)));

        // Taps on the results screen are ignored
        flow.on_tap(Vec2::ZERO);
        assert_eq!(flow.kind(), SceneKind::Results { won: false });

        flow.on_results_timeout();
        assert_eq!(flow.kind(), SceneKind::MainMenu);
        assert_eq!(
            flow.drain_events(),
            vec![GameEvent::PresentScene(SceneKind::MainMenu)]
        );
    }

    #[test]
    fn test_new_session_each_play() {
        let mut flow = SceneFlow::new(Settings::default());
        flow.on_tap(Vec2::ZERO);
        let first_seed = flow.session().unwrap().settings().seed;
        flow.session_mut().unwrap().finish(true);
        flow.on_session_timeout();
        flow.on_results_timeout();
        flow.on_tap(Vec2::ZERO);

        assert_eq!(flow.sessions_started(), 2);
        let session = flow.session().unwrap();
        assert_ne!(session.settings().seed, first_seed);
        assert_eq!(session.chain_len(), 0);
        assert_eq!(session.state(), GameState::Paused);
    }

    #[test]
    fn test_results_timeout_outside_results_is_ignored() {
        let mut flow = SceneFlow::new(Settings::default());
        flow.on_results_timeout();
        assert_eq!(flow.kind(), SceneKind::MainMenu);
        assert!(flow.drain_events().is_empty());
    }
}
