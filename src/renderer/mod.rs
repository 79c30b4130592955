//! Canvas 2D rendering
//!
//! Rendering is a read-only view of the post-tick state. The helpers here are
//! pure so culling and blink timing can be tested natively; the actual drawing
//! lives in [`canvas`] and only builds for wasm32.
//!
//! The drawing surface is always `VIEWPORT_WIDTH` x `VIEWPORT_HEIGHT` pixels,
//! the same window the camera clamps against. Page layout scales it with CSS.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Camera, Player, Tile, TileGrid};

/// Half-open range of tile columns and rows to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
}

impl TileWindow {
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| (x, y)))
    }
}

/// Size of the drawing surface in pixels
pub const VIEWPORT: Vec2 = Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

/// Tiles overlapping the viewport, padded by one tile on each side
pub fn visible_tiles(camera: &Camera, grid: &TileGrid) -> TileWindow {
    let viewport = VIEWPORT;
    let x0 = ((camera.x / TILE_SIZE).floor() as i32 - 1).max(0);
    let x1 = (((camera.x + viewport.x) / TILE_SIZE).ceil() as i32 + 1).min(grid.width() as i32);
    let y0 = ((camera.y / TILE_SIZE).floor() as i32 - 1).max(0);
    let y1 = (((camera.y + viewport.y) / TILE_SIZE).ceil() as i32 + 1).min(grid.height() as i32);
    TileWindow { x0, x1, y0, y1 }
}

/// World to screen coordinates
#[inline]
pub fn to_screen(pos: Vec2, camera: &Camera) -> Vec2 {
    pos - Vec2::new(camera.x, camera.y)
}

/// Fill and accent colors for a drawn tile; markers and empty cells are invisible
pub fn tile_colors(tile: Tile) -> Option<(&'static str, &'static str)> {
    if tile == Tile::Empty || tile.is_marker() {
        return None;
    }
    match tile {
        Tile::Ground => Some(("#8B4513", "#90EE90")),
        Tile::Brick => Some(("#CD5C5C", "#8B0000")),
        Tile::Question => Some(("#FFD700", "#FFA500")),
        _ => Some(("#228B22", "#32CD32")),
    }
}

/// Invulnerable players blink in 5-tick phases
pub fn player_visible(player: &Player, reduced_motion: bool) -> bool {
    !player.is_invulnerable() || reduced_motion || (player.invulnerable_ticks / 5) % 2 == 0
}

/// Vertical coin bob in pixels
pub fn bob_offset(phase: f32, reduced_motion: bool) -> f32 {
    if reduced_motion { 0.0 } else { phase.sin() * 3.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_window_is_padded_and_clamped() {
        let grid = TileGrid::new(50, 20);

        let window = visible_tiles(&Camera::default(), &grid);
        assert_eq!(window, TileWindow { x0: 0, x1: 26, y0: 0, y1: 20 });

        let camera = Camera { x: 600.0, y: 0.0 };
        let window = visible_tiles(&camera, &grid);
        assert_eq!((window.x0, window.x1), (17, 45));

        let camera = Camera { x: 800.0, y: 0.0 };
        assert_eq!(visible_tiles(&camera, &grid).x1, 50);
        assert_eq!(window.iter().count(), 28 * 20);
    }

    #[test]
    fn test_view_never_passes_level_edge() {
        // 100 tiles = 3200px; player near the far end
        let grid = TileGrid::new(100, 20);
        let mut camera = Camera::default();
        camera.follow(3100.0, grid.pixel_width());
        assert_eq!(camera.x, 2400.0);
        assert_eq!(camera.x + VIEWPORT.x, grid.pixel_width());
        assert_eq!(visible_tiles(&camera, &grid).x1, 100);

        // Player in the middle sits at the horizontal center of the surface
        camera.follow(1000.0, grid.pixel_width());
        let screen = to_screen(Vec2::new(1000.0, 0.0), &camera);
        assert_eq!(screen.x, VIEWPORT.x / 2.0);
    }

    #[test]
    fn test_markers_not_drawn() {
        assert!(tile_colors(Tile::Pipe).is_some());
        assert!(tile_colors(Tile::MushroomMarker).is_none());
        assert!(tile_colors(Tile::Ground).is_some());
        assert!(tile_colors(Tile::CoinMarker).is_none());
        assert!(tile_colors(Tile::Empty).is_none());
    }

    #[test]
    fn test_invulnerability_blink() {
        let mut player = Player::new(0.0, 0.0);
        assert!(player_visible(&player, false));
        player.invulnerable_ticks = 119;
        assert!(!player_visible(&player, false));
        assert!(player_visible(&player, true));
        player.invulnerable_ticks = 114;
        assert!(player_visible(&player, false));
    }

    #[test]
    fn test_screen_space() {
        let camera = Camera { x: 600.0, y: 0.0 };
        assert_eq!(to_screen(Vec2::new(1000.0, 50.0), &camera), Vec2::new(400.0, 50.0));
        assert_eq!(bob_offset(1.0, true), 0.0);
        assert!(bob_offset(std::f32::consts::FRAC_PI_2, false) > 2.99);
    }
}
