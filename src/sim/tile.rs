//! Tile kinds and the rectangular tile grid
//!
//! Level files mix numeric and character tile codes. Both are normalized into
//! [`Tile`] at load time; nothing downstream ever sees a raw code.

use serde::{Deserialize, Serialize};

use super::error::LevelError;
use crate::consts::TILE_SIZE;

/// A single terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "TileCode", into = "TileCode")]
pub enum Tile {
    #[default]
    Empty,
    Ground,
    Brick,
    Question,
    Pipe,
    /// Coin spawn marker (never solid)
    CoinMarker,
    /// Mushroom spawn marker (never solid)
    MushroomMarker,
    /// Fire flower spawn marker (never solid)
    FireMarker,
}

impl Tile {
    /// Solid tiles block movement; empty cells and spawn markers do not
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Ground | Tile::Brick | Tile::Question | Tile::Pipe)
    }

    #[inline]
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            Tile::CoinMarker | Tile::MushroomMarker | Tile::FireMarker
        )
    }

    pub fn from_char(c: char) -> Result<Self, LevelError> {
        match c {
            '0' | '.' => Ok(Tile::Empty),
            '1' | 'g' => Ok(Tile::Ground),
            '2' | 'b' => Ok(Tile::Brick),
            '3' | 'q' => Ok(Tile::Question),
            '4' | 'p' => Ok(Tile::Pipe),
            'c' => Ok(Tile::CoinMarker),
            'm' => Ok(Tile::MushroomMarker),
            'f' => Ok(Tile::FireMarker),
            other => Err(LevelError::UnknownTile(other.to_string())),
        }
    }

    pub fn from_number(n: u64) -> Result<Self, LevelError> {
        match n {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Ground),
            2 => Ok(Tile::Brick),
            3 => Ok(Tile::Question),
            4 => Ok(Tile::Pipe),
            other => Err(LevelError::UnknownTile(other.to_string())),
        }
    }

    /// Canonical single-character code
    pub fn as_char(self) -> char {
        match self {
            Tile::Empty => '0',
            Tile::Ground => 'g',
            Tile::Brick => 'b',
            Tile::Question => 'q',
            Tile::Pipe => 'p',
            Tile::CoinMarker => 'c',
            Tile::MushroomMarker => 'm',
            Tile::FireMarker => 'f',
        }
    }
}

/// Raw tile code as it appears in level files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileCode {
    Number(u64),
    Text(String),
}

impl TryFrom<TileCode> for Tile {
    type Error = LevelError;

    fn try_from(code: TileCode) -> Result<Self, Self::Error> {
        match code {
            TileCode::Number(n) => Tile::from_number(n),
            TileCode::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Tile::from_char(c),
                    _ => Err(LevelError::UnknownTile(s)),
                }
            }
        }
    }
}

impl From<Tile> for TileCode {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Empty => TileCode::Number(0),
            Tile::Ground => TileCode::Number(1),
            Tile::Brick => TileCode::Number(2),
            Tile::Question => TileCode::Number(3),
            Tile::Pipe => TileCode::Number(4),
            marker => TileCode::Text(marker.as_char().to_string()),
        }
    }
}

/// Row-major rectangular grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid of empty tiles
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    /// Build from rows, rejecting empty or ragged input
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, LevelError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(LevelError::RaggedRow {
                    row: row_index,
                    actual: row.len(),
                    expected: width,
                });
            }
            tiles.extend(row);
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    #[inline]
    pub fn in_bounds(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && (tx as usize) < self.width && (ty as usize) < self.height
    }

    /// Tile at grid coordinates, `None` outside the grid
    #[inline]
    pub fn get(&self, tx: i32, ty: i32) -> Option<Tile> {
        if self.in_bounds(tx, ty) {
            Some(self.tiles[ty as usize * self.width + tx as usize])
        } else {
            None
        }
    }

    /// Out-of-range cells are never solid
    #[inline]
    pub fn is_solid(&self, tx: i32, ty: i32) -> bool {
        self.get(tx, ty).is_some_and(Tile::is_solid)
    }

    pub fn set(&mut self, tx: i32, ty: i32, tile: Tile) {
        if self.in_bounds(tx, ty) {
            self.tiles[ty as usize * self.width + tx as usize] = tile;
        }
    }
}
