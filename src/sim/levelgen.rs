//! Level sources
//!
//! The simulation only asks "give me level N". Levels 1 and 2 are hand-laid;
//! from level 3 on the layout is rolled from the session RNG.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyType;
use super::error::LevelError;
use super::level::{CollectibleKind, CollectibleSpec, EnemySpec, LevelData, PowerUpSpec};
use super::player::PowerUpKind;
use super::tile::Tile;
use crate::consts::TILE_SIZE;

/// Generated level width in tiles
pub const LEVEL_WIDTH: usize = 50;
/// Generated level height in tiles
pub const LEVEL_HEIGHT: usize = 20;
/// Row holding the top of the three-tile-deep floor
pub const GROUND_ROW: usize = LEVEL_HEIGHT - 3;

/// Anything that can hand out level data by number (1-based)
pub trait LevelSource {
    fn load(&mut self, number: u32) -> Result<LevelData, LevelError>;
}

/// Built-in layouts plus procedural levels
#[derive(Debug, Clone)]
pub struct GeneratedLevels {
    rng: Pcg32,
}

impl GeneratedLevels {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl LevelSource for GeneratedLevels {
    fn load(&mut self, number: u32) -> Result<LevelData, LevelError> {
        Ok(generate_level(number, &mut self.rng))
    }
}

/// An ordered set of hand-authored levels, usually loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<LevelData>,
}

impl LevelPack {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let pack: LevelPack = serde_json::from_str(json)?;
        log::info!("Loaded level pack with {} levels", pack.levels.len());
        Ok(pack)
    }
}

impl LevelSource for LevelPack {
    fn load(&mut self, number: u32) -> Result<LevelData, LevelError> {
        number
            .checked_sub(1)
            .and_then(|index| self.levels.get(index as usize))
            .cloned()
            .ok_or(LevelError::NoSuchLevel(number))
    }
}

/// World y of the top of tile row `row`
#[inline]
fn row_y(row: usize) -> f32 {
    row as f32 * TILE_SIZE
}

/// Blank level with the shared floor, spawn point and exit
fn base_level() -> LevelData {
    let mut data = LevelData::blank(LEVEL_WIDTH, LEVEL_HEIGHT);
    for row in GROUND_ROW..LEVEL_HEIGHT {
        for x in 0..LEVEL_WIDTH {
            data.set_tile(x, row, Tile::Ground);
        }
    }
    data.start_x = Some(50.0);
    data.start_y = Some(row_y(GROUND_ROW - 1));
    data.end_x = Some((LEVEL_WIDTH - 2) as f32 * TILE_SIZE);
    data
}

fn platform(data: &mut LevelData, row: usize, columns: std::ops::Range<usize>, tile: Tile) {
    for x in columns {
        data.set_tile(x, row, tile);
    }
}

fn enemy(x: f32, row: usize, kind: EnemyType) -> EnemySpec {
    EnemySpec {
        x,
        y: row_y(row),
        kind,
    }
}

fn coin(x: f32, row: usize) -> CollectibleSpec {
    CollectibleSpec {
        x,
        y: row_y(row),
        kind: CollectibleKind::Coin,
    }
}

fn power_up(column: usize, row: usize, kind: PowerUpKind) -> PowerUpSpec {
    PowerUpSpec {
        x: column as f32 * TILE_SIZE,
        y: row_y(row),
        kind,
    }
}

/// Produce level data for a 1-based level number
pub fn generate_level<R: Rng + ?Sized>(number: u32, rng: &mut R) -> LevelData {
    let g = GROUND_ROW;
    let mut data = base_level();

    match number {
        0 | 1 => {
            platform(&mut data, g - 3, 10..15, Tile::Brick);
            platform(&mut data, g - 5, 20..25, Tile::Brick);
            platform(&mut data, g - 3, 30..35, Tile::Brick);
            data.set_tile(12, g - 3, Tile::Question);
            data.set_tile(22, g - 5, Tile::Question);

            data.enemies = vec![
                enemy(200.0, g - 1, EnemyType::Goomba),
                enemy(400.0, g - 1, EnemyType::Goomba),
                enemy(600.0, g - 1, EnemyType::Goomba),
                enemy(800.0, g - 6, EnemyType::Koopa),
            ];
            data.collectibles = vec![coin(350.0, g - 4), coin(450.0, g - 6), coin(550.0, g - 4)];
            data.power_ups = vec![
                power_up(12, g - 4, PowerUpKind::Mushroom),
                power_up(22, g - 6, PowerUpKind::Fire),
            ];
        }
        2 => {
            platform(&mut data, g - 4, 8..12, Tile::Brick);
            platform(&mut data, g - 6, 18..24, Tile::Brick);
            platform(&mut data, g - 4, 28..32, Tile::Brick);
            platform(&mut data, g - 7, 38..42, Tile::Brick);
            data.set_tile(10, g - 4, Tile::Question);
            data.set_tile(20, g - 6, Tile::Question);
            data.set_tile(40, g - 7, Tile::Question);

            data.enemies = vec![
                enemy(250.0, g - 1, EnemyType::Goomba),
                enemy(450.0, g - 1, EnemyType::Goomba),
                enemy(500.0, g - 7, EnemyType::Koopa),
                enemy(700.0, g - 1, EnemyType::Goomba),
                enemy(900.0, g - 1, EnemyType::Koopa),
            ];
            data.collectibles = vec![
                coin(300.0, g - 5),
                coin(400.0, g - 7),
                coin(500.0, g - 5),
                coin(600.0, g - 5),
                coin(800.0, g - 8),
            ];
            data.power_ups = vec![
                power_up(10, g - 5, PowerUpKind::Mushroom),
                power_up(20, g - 7, PowerUpKind::Fire),
            ];
        }
        _ => {
            for i in 0..8 {
                let x = 5 + i * 6;
                let rise = rng.random_range(3..7);
                let len = rng.random_range(3..6);
                let end = (x + len).min(LEVEL_WIDTH);
                platform(&mut data, g - rise, x..end, Tile::Brick);
                if rng.random_bool(0.5) && x + 1 < LEVEL_WIDTH {
                    data.set_tile(x + 1, g - rise - 1, Tile::Question);
                }
            }

            data.enemies = (0..8 + number as usize)
                .map(|i| {
                    let kind = if rng.random_bool(0.4) {
                        EnemyType::Koopa
                    } else {
                        EnemyType::Goomba
                    };
                    enemy(200.0 + i as f32 * 150.0, g - 1, kind)
                })
                .collect();
            data.collectibles = (0..10)
                .map(|i| coin(300.0 + i as f32 * 120.0, g - 4 - rng.random_range(0..3)))
                .collect();
            data.power_ups = vec![power_up(15, g - 4, PowerUpKind::Mushroom)];
        }
    }

    log::info!(
        "Generated level {}: {} enemies, {} coins, {} power-ups",
        number,
        data.enemies.len(),
        data.collectibles.len(),
        data.power_ups.len()
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;

    #[test]
    fn test_fixed_levels_are_well_formed() {
        let mut source = GeneratedLevels::new(1);
        for number in 1..=2 {
            let level = Level::from_data(source.load(number).expect("generated")).expect("valid");
            assert_eq!(level.grid.width(), LEVEL_WIDTH);
            assert_eq!(level.grid.height(), LEVEL_HEIGHT);
            assert!(level.grid.is_solid(0, GROUND_ROW as i32));
            assert!(!level.enemies.is_empty());
        }
    }

    #[test]
    fn test_level_one_layout() {
        let mut rng = Pcg32::seed_from_u64(0);
        let data = generate_level(1, &mut rng);
        let level = Level::from_data(data).expect("valid");
        let g = GROUND_ROW as i32;

        assert_eq!(level.tile(12, g - 3), Some(Tile::Question));
        assert_eq!(level.tile(11, g - 3), Some(Tile::Brick));
        assert_eq!(level.enemies.len(), 4);
        assert_eq!(level.end_x, 48.0 * TILE_SIZE);
        assert_eq!(level.start.y, (GROUND_ROW - 1) as f32 * TILE_SIZE);
    }

    #[test]
    fn test_procedural_level_scales_enemies() {
        let mut source = GeneratedLevels::new(42);
        let data = source.load(5).expect("generated");
        assert_eq!(data.enemies.len(), 13);
        assert_eq!(data.collectibles.len(), 10);
        let level = Level::from_data(data).expect("valid");
        assert!(level.grid.is_solid(LEVEL_WIDTH as i32 - 1, GROUND_ROW as i32));
    }

    #[test]
    fn test_level_pack() {
        let json = r#"{ "levels": [
            { "width": 2, "height": 2, "tiles": [[0, 0], [1, 1]] }
        ] }"#;
        let mut pack = LevelPack::from_json(json).expect("valid pack");
        assert!(pack.load(1).is_ok());
        assert!(matches!(pack.load(2), Err(LevelError::NoSuchLevel(2))));
        assert!(matches!(pack.load(0), Err(LevelError::NoSuchLevel(0))));
        assert!(matches!(
            LevelPack::from_json("{"),
            Err(LevelError::Json(_))
        ));
    }
}
