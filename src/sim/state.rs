//! Session state: phase, score, lives and the live world
//!
//! Everything the orchestrator mutates lives in [`GameState`]; there are no
//! ambient globals. Edge-triggered actions (start, restart, pause) are
//! methods here and are called from the input boundary, never from `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::LevelError;
use super::level::Level;
use super::levelgen::{GeneratedLevels, LevelSource};
use super::player::{Player, PowerUpKind};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run frozen; frames are still acknowledged
    Paused,
    /// Run ended
    GameOver,
}

/// Horizontal scroll window into the level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    /// Center on `target_x`, clamped to `[0, level_width - viewport]`
    pub fn follow(&mut self, target_x: f32, level_width: f32) {
        let max_x = (level_width - VIEWPORT_WIDTH).max(0.0);
        self.x = (target_x - VIEWPORT_WIDTH / 2.0).clamp(0.0, max_x);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The level being played and the player inside it
#[derive(Debug, Clone)]
pub struct World {
    pub level: Level,
    pub player: Player,
}

/// Notifications for the HUD and audio, drained by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    FireballShot,
    CoinCollected,
    PoweredUp(PowerUpKind),
    EnemyDefeated { points: u32 },
    ShellKicked,
    PlayerHurt,
    PlayerDied { lives_left: u32 },
    LevelStarted(u32),
    GameOver { score: u64, new_high_score: bool },
}

/// Complete session state
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub coins: u32,
    /// 1-based level number
    pub level_number: u32,
    pub camera: Camera,
    /// Best score seen so far, persisted by the front end
    pub high_score: u64,
    /// Present exactly while a run is in progress
    pub world: Option<World>,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    source: Box<dyn LevelSource>,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("coins", &self.coins)
            .field("level_number", &self.level_number)
            .field("high_score", &self.high_score)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// New session on the built-in levels
    pub fn new(seed: u64, high_score: u64) -> Self {
        Self::with_source(seed, high_score, Box::new(GeneratedLevels::new(seed)))
    }

    /// New session drawing levels from `source`
    pub fn with_source(seed: u64, high_score: u64, source: Box<dyn LevelSource>) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: STARTING_LIVES,
            coins: 0,
            level_number: 1,
            camera: Camera::default(),
            high_score,
            world: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            source,
            events: Vec::new(),
        }
    }

    /// Menu -> Playing
    pub fn start_game(&mut self) {
        if self.phase == GamePhase::Menu {
            self.begin_run();
        }
    }

    /// GameOver -> Playing
    pub fn restart(&mut self) {
        if self.phase == GamePhase::GameOver {
            self.begin_run();
        }
    }

    /// Playing <-> Paused; ignored in any other phase
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
        log::debug!("Pause toggled, phase now {:?}", self.phase);
    }

    fn begin_run(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.coins = 0;
        self.level_number = 1;
        self.time_ticks = 0;
        match self.load_level(1) {
            Ok(()) => self.phase = GamePhase::Playing,
            Err(e) => {
                log::error!("Failed to load level 1: {}", e);
                self.game_over();
            }
        }
    }

    /// Replace the world with level `number` and spawn a fresh player
    pub fn load_level(&mut self, number: u32) -> Result<(), LevelError> {
        let data = self.source.load(number)?;
        let level = Level::from_data(data)?;
        let player = Player::new(level.start.x, level.start.y);
        log::info!(
            "Level {} loaded: {}x{} tiles, {} enemies",
            number,
            level.grid.width(),
            level.grid.height(),
            level.enemies.len()
        );

        self.level_number = number;
        self.world = Some(World { level, player });
        self.camera.reset();
        self.events.push(GameEvent::LevelStarted(number));
        Ok(())
    }

    /// Advance to the following level; a failing source ends the run
    pub fn next_level(&mut self) {
        let next = self.level_number + 1;
        if let Err(e) = self.load_level(next) {
            log::error!("Failed to load level {}: {}", next, e);
            self.game_over();
        }
    }

    /// Lose a life; respawn or end the run
    pub fn player_die(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerDied {
            lives_left: self.lives,
        });
        log::info!("Player died, {} lives left", self.lives);

        if self.lives == 0 {
            self.game_over();
        } else {
            if let Some(world) = &mut self.world {
                world.player.reset();
            }
            self.camera.reset();
        }
    }

    /// End the run and record the high score
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.world = None;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        log::info!(
            "Game over: score {} (best {}){}",
            self.score,
            self.high_score,
            if new_high_score { ", new high score" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levelgen::LevelPack;
    use crate::sim::level::LevelData;

    fn single_level_state() -> GameState {
        let mut data = LevelData::from_rows(&["....", "....", "gggg"]).expect("valid rows");
        data.start_x = Some(10.0);
        data.start_y = Some(20.0);
        let pack = LevelPack { levels: vec![data] };
        GameState::with_source(7, 0, Box::new(pack))
    }

    #[test]
    fn test_start_from_menu() {
        let mut state = GameState::new(1, 0);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.world.is_none());

        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.world.is_some());
        assert_eq!(state.take_events(), vec![GameEvent::LevelStarted(1)]);
        assert!(state.take_events().is_empty());

        // Start is a no-op once playing
        state.score = 10;
        state.start_game();
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = GameState::new(1, 0);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Menu);

        state.start_game();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.is_running());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_camera_clamp() {
        let mut camera = Camera::default();
        camera.follow(1000.0, 1600.0);
        assert_eq!(camera.x, 600.0);
        camera.follow(100.0, 1600.0);
        assert_eq!(camera.x, 0.0);
        camera.follow(1500.0, 1600.0);
        assert_eq!(camera.x, 800.0);
        // Level narrower than the viewport
        camera.follow(300.0, 400.0);
        assert_eq!(camera.x, 0.0);
    }

    #[test]
    fn test_death_respawns_then_ends_run() {
        let mut state = single_level_state();
        state.start_game();
        state.score = 250;

        if let Some(world) = &mut state.world {
            world.player.pos.x = 90.0;
        }
        state.camera.x = 40.0;
        state.player_die();
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.camera.x, 0.0);
        let player = &state.world.as_ref().expect("world").player;
        assert_eq!((player.pos.x, player.pos.y), (10.0, 20.0));

        state.player_die();
        state.player_die();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.world.is_none());
        assert_eq!(state.high_score, 250);
        assert!(state.take_events().contains(&GameEvent::GameOver {
            score: 250,
            new_high_score: true
        }));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = single_level_state();
        state.start_game();
        state.score = 40;
        state.coins = 3;
        state.game_over();

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.coins, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.level_number, 1);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_exhausted_source_ends_run() {
        let mut state = single_level_state();
        state.start_game();
        state.next_level();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.level_number, 1);
    }
}
