//! Tile Dash - A tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (physics, tiles, entities, game state)
//! - `renderer`: Canvas 2D drawing of the post-tick world
//! - `platform`: Keyboard mapping for the browser front end
//! - `audio`: Procedural sound effects
//! - `highscores`: Persisted best score
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to the accumulator (avoids spiral of death)
    pub const MAX_FRAME_DT: f32 = 2.0 * SIM_DT;
    /// Integration step handed to entity physics, in ticks
    pub const TICK: f32 = 1.0;

    /// World geometry
    pub const TILE_SIZE: f32 = 32.0;
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Physics
    pub const GRAVITY: f32 = 0.8;
    pub const FRICTION: f32 = 0.85;
    /// Below this horizontal speed friction snaps to a standstill
    pub const FRICTION_CUTOFF: f32 = 0.1;

    /// Player
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_SMALL_HEIGHT: f32 = 32.0;
    pub const PLAYER_BIG_HEIGHT: f32 = 48.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const JUMP_IMPULSE: f32 = -15.0;
    pub const STOMP_BOUNCE: f32 = -8.0;
    pub const INVULNERABLE_TICKS: u32 = 120;
    pub const SHOOT_COOLDOWN_TICKS: u32 = 20;
    pub const STARTING_LIVES: u32 = 3;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 32.0;
    pub const SHELL_HEIGHT: f32 = 16.0;
    pub const GOOMBA_SPEED: f32 = 1.5;
    pub const KOOPA_SPEED: f32 = 2.0;
    pub const SHELL_KICK_SPEED: f32 = 5.0;
    pub const SHELL_TIMEOUT_TICKS: u32 = 300;
    pub const DEATH_TICKS: u32 = 10;
    pub const DEATH_HOP: f32 = -5.0;

    /// Fireballs
    pub const FIREBALL_SIZE: f32 = 12.0;
    pub const FIREBALL_SPEED: f32 = 8.0;
    pub const FIREBALL_LIFT: f32 = -2.0;
    pub const FIREBALL_GRAVITY: f32 = 0.5;
    pub const FIREBALL_BOUNCE: f32 = -5.0;
    pub const FIREBALL_MAX_BOUNCES: u32 = 3;
    /// How far past a world edge a fireball may travel before it is dropped
    pub const FIREBALL_CULL_MARGIN: f32 = 100.0;

    /// Pickups
    pub const PICKUP_PROBE: f32 = 16.0;
    pub const MUSHROOM_DRIFT: f32 = 1.0;

    /// Scoring
    pub const COIN_POINTS: u64 = 100;
    pub const POWER_UP_POINTS: u64 = 500;
    pub const STOMP_POINTS: u32 = 100;
    pub const SHELL_HIT_POINTS: u32 = 200;
}
