//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod clock;
pub mod enemy;
pub mod error;
pub mod level;
pub mod levelgen;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;

pub use clock::FixedTimestep;
pub use enemy::{Enemy, EnemyKind, EnemyType, Shell, SideHit, Status};
pub use error::LevelError;
pub use level::{Collectible, CollectibleKind, Level, LevelData, PowerUp};
pub use levelgen::{GeneratedLevels, LevelPack, LevelSource, generate_level};
pub use physics::{
    Collider, Kinematic, Rect, Side, apply_friction, apply_gravity, check_collision,
    collision_side, resolve_collision,
};
pub use player::{Damage, Fireball, Player, PlayerActions, PowerTier, PowerUpKind, TickInput};
pub use state::{Camera, GameEvent, GamePhase, GameState, World};
pub use tick::tick;
pub use tile::{Tile, TileGrid};
