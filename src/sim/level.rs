//! Level instance: tile grid plus the enemies and pickups placed in it

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyType};
use super::error::LevelError;
use super::physics::{Collider, Kinematic, Rect, apply_gravity, check_collision, tile_coord};
use super::player::PowerUpKind;
use super::tile::{Tile, TileGrid};
use crate::consts::*;

/// Default spawn point when level data omits one
pub const DEFAULT_START: Vec2 = Vec2::new(50.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    #[default]
    Coin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: EnemyType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleSpec {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: CollectibleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpSpec {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: PowerUpKind,
}

/// Raw level description as produced by a level source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Tile>>,
    #[serde(default)]
    pub start_x: Option<f32>,
    #[serde(default)]
    pub start_y: Option<f32>,
    #[serde(default)]
    pub end_x: Option<f32>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpec>,
    #[serde(default)]
    pub power_ups: Vec<PowerUpSpec>,
}

impl LevelData {
    /// Empty level of the given size
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::Empty; width]; height],
            start_x: None,
            start_y: None,
            end_x: None,
            enemies: Vec::new(),
            collectibles: Vec::new(),
            power_ups: Vec::new(),
        }
    }

    /// Parse ASCII rows, one character per tile
    pub fn from_rows(rows: &[&str]) -> Result<Self, LevelError> {
        let tiles = rows
            .iter()
            .map(|row| row.chars().map(Tile::from_char).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        let height = tiles.len();
        let width = tiles.first().map(Vec::len).unwrap_or(0);
        Ok(Self {
            width,
            height,
            tiles,
            ..Self::blank(0, 0)
        })
    }

    pub fn set_tile(&mut self, tx: usize, ty: usize, tile: Tile) {
        if let Some(cell) = self.tiles.get_mut(ty).and_then(|row| row.get_mut(tx)) {
            *cell = tile;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    pub pos: Vec2,
    pub kind: CollectibleKind,
    pub collected: bool,
    /// Bob animation phase in radians (cosmetic)
    pub phase: f32,
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
    pub active: bool,
}

impl PowerUp {
    pub fn is_available(&self) -> bool {
        self.active && !self.collected
    }
}

impl Collider for PowerUp {
    fn bounds(&self) -> Rect {
        pickup_probe(self.pos)
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }
}

impl Kinematic for PowerUp {
    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.vel
    }
}

/// Fixed-size box used for all pickup overlap tests
#[inline]
pub fn pickup_probe(pos: Vec2) -> Rect {
    Rect::new(pos.x, pos.y, PICKUP_PROBE, PICKUP_PROBE)
}

#[derive(Debug, Clone)]
pub struct Level {
    pub grid: TileGrid,
    pub start: Vec2,
    pub end_x: f32,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub power_ups: Vec<PowerUp>,
}

impl Level {
    /// Validate level data once and build the live level
    pub fn from_data(data: LevelData) -> Result<Self, LevelError> {
        let declared = (data.width, data.height);
        let grid = TileGrid::from_rows(data.tiles)?;
        if declared != (grid.width(), grid.height()) {
            return Err(LevelError::SizeMismatch {
                declared_width: declared.0,
                declared_height: declared.1,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let start = Vec2::new(
            data.start_x.unwrap_or(DEFAULT_START.x),
            data.start_y.unwrap_or(DEFAULT_START.y),
        );
        let end_x = data.end_x.unwrap_or(grid.pixel_width() - 50.0);

        let enemies = data
            .enemies
            .iter()
            .map(|spec| Enemy::new(spec.kind, spec.x, spec.y))
            .collect();
        let collectibles = data
            .collectibles
            .iter()
            .map(|spec| Collectible {
                pos: Vec2::new(spec.x, spec.y),
                kind: spec.kind,
                collected: false,
                phase: 0.0,
            })
            .collect();
        let power_ups = data
            .power_ups
            .iter()
            .map(|spec| PowerUp {
                pos: Vec2::new(spec.x, spec.y),
                vel: Vec2::ZERO,
                kind: spec.kind,
                collected: false,
                active: true,
            })
            .collect();

        Ok(Self {
            grid,
            start,
            end_x,
            enemies,
            collectibles,
            power_ups,
        })
    }

    /// Bounds-checked tile lookup
    #[inline]
    pub fn tile(&self, tx: i32, ty: i32) -> Option<Tile> {
        self.grid.get(tx, ty)
    }

    pub fn pixel_width(&self) -> f32 {
        self.grid.pixel_width()
    }

    pub fn pixel_height(&self) -> f32 {
        self.grid.pixel_height()
    }

    /// Advance enemies, drifting mushrooms and collectible animation
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32) {
        for enemy in self.enemies.iter_mut().filter(|e| e.is_active()) {
            enemy.update(&self.grid, rng, dt);
        }

        let world_width = self.grid.pixel_width();
        let world_height = self.grid.pixel_height();
        for power_up in &mut self.power_ups {
            if !power_up.is_available() || power_up.kind != PowerUpKind::Mushroom {
                continue;
            }

            apply_gravity(power_up, dt);
            power_up.pos.y += power_up.vel.y;
            power_up.pos.x += MUSHROOM_DRIFT;

            let tx = tile_coord(power_up.pos.x);
            let ty = tile_coord(power_up.pos.y);
            if self.grid.is_solid(tx, ty) {
                power_up.vel.y = 0.0;
                power_up.pos.y = ty as f32 * TILE_SIZE - PICKUP_PROBE;
            }

            if power_up.pos.x < 0.0 || power_up.pos.x > world_width || power_up.pos.y > world_height
            {
                power_up.active = false;
            }
        }

        for collectible in self.collectibles.iter_mut().filter(|c| !c.collected) {
            collectible.phase = (collectible.phase + 0.1) % std::f32::consts::TAU;
        }
    }

    /// Mark every coin touching `bounds` as collected. Returns how many.
    pub fn collect_coins(&mut self, bounds: &Rect) -> u32 {
        let mut count = 0;
        for collectible in self.collectibles.iter_mut().filter(|c| !c.collected) {
            if check_collision(bounds, &pickup_probe(collectible.pos)) {
                collectible.collected = true;
                count += 1;
            }
        }
        count
    }

    /// Mark every power-up touching `bounds` as collected and return their kinds
    pub fn collect_power_ups(&mut self, bounds: &Rect) -> Vec<PowerUpKind> {
        self.power_ups
            .iter_mut()
            .filter(|p| p.is_available())
            .filter(|p| check_collision(bounds, &pickup_probe(p.pos)))
            .map(|p| {
                p.collected = true;
                p.kind
            })
            .collect()
    }

    /// Enemies still taking part in the game
    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_active())
    }
}
