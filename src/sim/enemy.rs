//! Walking enemies: Goombas and shell-carrying Koopas

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::{
    Collider, Kinematic, Rect, Side, apply_gravity, check_collision, collision_side,
    resolve_collision, tile_coord, tile_rect,
};
use super::tile::TileGrid;
use crate::consts::*;

/// Which enemy to spawn (level data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyType {
    #[default]
    Goomba,
    Koopa,
}

/// Koopa shell sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// Walking normally
    Out,
    /// Retracted and stationary, counting toward re-emergence
    Idle { ticks: u32 },
    /// Retracted and sliding
    Kicked,
}

/// Enemy variant with its kind-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Goomba,
    Koopa { shell: Shell },
}

/// Lifecycle of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Alive,
    /// Defeated; purged once the timer runs out
    Dying { ticks_left: u32 },
    /// Tombstoned, never updated, drawn or collided again
    Removed,
}

/// Result of the player touching an enemy from the side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideHit {
    /// A sliding shell was knocked out of play
    Bonus(u32),
    /// The player gets hurt
    HurtsPlayer,
    /// Idle shell: nothing happens
    Harmless,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    pub status: Status,
    /// Walk-cycle frame (cosmetic)
    pub anim_frame: u8,
    anim_ticks: u32,
}

impl Enemy {
    pub fn new(kind: EnemyType, x: f32, y: f32) -> Self {
        let (kind, speed) = match kind {
            EnemyType::Goomba => (EnemyKind::Goomba, GOOMBA_SPEED),
            EnemyType::Koopa => (EnemyKind::Koopa { shell: Shell::Out }, KOOPA_SPEED),
        };
        Self {
            kind,
            pos: Vec2::new(x, y),
            vel: Vec2::new(-speed, 0.0),
            size: Vec2::splat(ENEMY_SIZE),
            on_ground: false,
            status: Status::Alive,
            anim_frame: 0,
            anim_ticks: 0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status != Status::Removed
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self.status, Status::Dying { .. })
    }

    /// Can currently interact with the player and fireballs
    #[inline]
    pub fn is_hittable(&self) -> bool {
        self.status == Status::Alive
    }

    pub fn shell(&self) -> Option<Shell> {
        match self.kind {
            EnemyKind::Koopa { shell } => Some(shell),
            EnemyKind::Goomba => None,
        }
    }

    pub fn in_shell(&self) -> bool {
        matches!(self.shell(), Some(Shell::Idle { .. } | Shell::Kicked))
    }

    /// Advance one tick against the tile grid
    pub fn update<R: Rng + ?Sized>(&mut self, grid: &TileGrid, rng: &mut R, dt: f32) {
        match self.status {
            Status::Removed => return,
            Status::Dying { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                self.status = if ticks_left == 0 {
                    Status::Removed
                } else {
                    Status::Dying { ticks_left }
                };
                return;
            }
            Status::Alive => {}
        }

        apply_gravity(self, dt);
        self.pos += self.vel;

        self.on_ground = false;
        self.collide_with_tiles(grid);

        if self.on_ground {
            self.check_ledge(grid);
        }

        // Stay inside the world horizontally
        if self.pos.x < 0.0 {
            self.vel.x = self.vel.x.abs();
        }
        if self.pos.x + self.size.x > grid.pixel_width() {
            self.vel.x = -self.vel.x.abs();
        }

        self.anim_ticks += 1;
        if self.anim_ticks >= 12 {
            self.anim_frame = (self.anim_frame + 1) % 2;
            self.anim_ticks = 0;
        }

        self.tick_shell(rng);
    }

    /// Scan the 4x4 tile neighborhood and push out of anything solid
    fn collide_with_tiles(&mut self, grid: &TileGrid) {
        let base_x = tile_coord(self.pos.x);
        let base_y = tile_coord(self.pos.y);

        for dy in -1..=2 {
            for dx in -1..=2 {
                let (tx, ty) = (base_x + dx, base_y + dy);
                if !grid.is_solid(tx, ty) {
                    continue;
                }
                let tile = tile_rect(tx, ty);
                let bounds = self.bounds();
                if !check_collision(&bounds, &tile) {
                    continue;
                }

                let side = collision_side(&bounds, &tile);
                // Turn around at walls: capture the heading before resolution zeroes it
                let heading = self.vel.x;
                resolve_collision(self, &tile);
                match side {
                    Side::Top => self.on_ground = true,
                    Side::Bottom => {}
                    Side::Left | Side::Right => self.vel.x = -heading,
                }
            }
        }
    }

    /// Reverse before walking off the end of a platform
    fn check_ledge(&mut self, grid: &TileGrid) {
        let probe_x = if self.vel.x > 0.0 {
            self.pos.x + self.size.x + 5.0
        } else {
            self.pos.x - 5.0
        };
        let ahead_x = tile_coord(probe_x);
        let below_y = tile_coord(self.pos.y + self.size.y + 1.0);

        if !grid.is_solid(ahead_x, below_y) {
            self.vel.x = -self.vel.x;
        }
    }

    fn tick_shell<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let EnemyKind::Koopa { shell } = &mut self.kind else {
            return;
        };
        if let Shell::Idle { ticks } = shell {
            *ticks += 1;
            if *ticks > SHELL_TIMEOUT_TICKS {
                *shell = Shell::Out;
                self.size.y = ENEMY_SIZE;
                self.vel.x = if rng.random_bool(0.5) {
                    KOOPA_SPEED
                } else {
                    -KOOPA_SPEED
                };
            }
        }
    }

    /// Stomped (or struck by a fireball). Returns points earned.
    pub fn hit_from_above(&mut self) -> u32 {
        match &mut self.kind {
            EnemyKind::Koopa { shell } if *shell == Shell::Out => {
                *shell = Shell::Idle { ticks: 0 };
                self.size.y = SHELL_HEIGHT;
                self.vel.x = 0.0;
                STOMP_POINTS
            }
            EnemyKind::Koopa { shell } if matches!(shell, Shell::Idle { .. }) => {
                *shell = Shell::Kicked;
                self.vel.x = SHELL_KICK_SPEED;
                0
            }
            _ => {
                self.status = Status::Dying {
                    ticks_left: DEATH_TICKS,
                };
                self.vel = Vec2::new(0.0, DEATH_HOP);
                STOMP_POINTS
            }
        }
    }

    /// Touched from the side by the player
    pub fn hit_from_side(&mut self) -> SideHit {
        match self.shell() {
            Some(Shell::Kicked) => {
                self.status = Status::Removed;
                SideHit::Bonus(SHELL_HIT_POINTS)
            }
            Some(Shell::Idle { .. }) => SideHit::Harmless,
            Some(Shell::Out) | None => SideHit::HurtsPlayer,
        }
    }
}

impl Collider for Enemy {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }
}

impl Kinematic for Enemy {
    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::Tile;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// 10x6 grid with a solid floor on row 5
    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::new(10, 6);
        for x in 0..10 {
            grid.set(x, 5, Tile::Ground);
        }
        grid
    }

    fn standing(kind: EnemyType, tx: i32) -> Enemy {
        Enemy::new(kind, tx as f32 * TILE_SIZE, 4.0 * TILE_SIZE)
    }

    #[test]
    fn test_goomba_stomp() {
        let mut goomba = standing(EnemyType::Goomba, 3);
        assert_eq!(goomba.hit_from_above(), 100);
        assert!(goomba.is_dead());
        assert_eq!(goomba.vel.y, DEATH_HOP);
        assert_eq!(goomba.hit_from_side(), SideHit::HurtsPlayer);
    }

    #[test]
    fn test_koopa_stomp_then_kick() {
        let mut koopa = standing(EnemyType::Koopa, 3);
        assert_eq!(koopa.hit_from_above(), 100);
        assert_eq!(koopa.shell(), Some(Shell::Idle { ticks: 0 }));
        assert_eq!(koopa.vel.x, 0.0);
        assert_eq!(koopa.size.y, SHELL_HEIGHT);
        assert_eq!(koopa.hit_from_side(), SideHit::Harmless);

        assert_eq!(koopa.hit_from_above(), 0);
        assert_eq!(koopa.shell(), Some(Shell::Kicked));
        assert!(koopa.vel.x > 0.0);
        assert!(!koopa.is_dead());
    }

    #[test]
    fn test_kicked_shell_side_hit_removes() {
        let mut koopa = standing(EnemyType::Koopa, 3);
        koopa.hit_from_above();
        koopa.hit_from_above();
        assert_eq!(koopa.hit_from_side(), SideHit::Bonus(200));
        assert!(!koopa.is_active());
    }

    #[test]
    fn test_dead_enemy_purged_after_timer() {
        let grid = floor_grid();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut goomba = standing(EnemyType::Goomba, 3);
        goomba.hit_from_above();
        let pos = goomba.pos;

        for _ in 0..DEATH_TICKS - 1 {
            goomba.update(&grid, &mut rng, TICK);
            assert!(goomba.is_active());
        }
        // Inert while dying
        assert_eq!(goomba.pos, pos);
        goomba.update(&grid, &mut rng, TICK);
        assert!(!goomba.is_active());
    }

    #[test]
    fn test_lands_on_floor() {
        let grid = floor_grid();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut goomba = Enemy::new(EnemyType::Goomba, 96.0, 100.0);

        for _ in 0..30 {
            goomba.update(&grid, &mut rng, TICK);
        }
        assert!(goomba.on_ground);
        assert_eq!(goomba.pos.y + goomba.size.y, 5.0 * TILE_SIZE);
        assert_eq!(goomba.vel.y, 0.0);
    }

    #[test]
    fn test_turns_at_wall() {
        let mut grid = floor_grid();
        grid.set(2, 4, Tile::Pipe);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut goomba = standing(EnemyType::Goomba, 3);
        goomba.pos.x = 3.0 * TILE_SIZE + 1.0;

        for _ in 0..4 {
            goomba.update(&grid, &mut rng, TICK);
        }
        assert!(goomba.vel.x > 0.0, "should have turned around: {:?}", goomba.vel);
        assert!(goomba.pos.x >= 3.0 * TILE_SIZE);
    }

    #[test]
    fn test_turns_at_ledge() {
        // Floor only under columns 2..=5
        let mut grid = TileGrid::new(10, 6);
        for x in 2..=5 {
            grid.set(x, 5, Tile::Ground);
        }
        let mut rng = Pcg32::seed_from_u64(1);
        let mut goomba = standing(EnemyType::Goomba, 2);

        for _ in 0..200 {
            goomba.update(&grid, &mut rng, TICK);
            assert!(goomba.pos.y <= 4.0 * TILE_SIZE + 1.0, "fell off the ledge");
        }
        assert!(goomba.pos.x >= 2.0 * TILE_SIZE - 6.0);
        assert!(goomba.pos.x <= 6.0 * TILE_SIZE - goomba.size.x + 6.0);
    }

    #[test]
    fn test_shell_times_out() {
        let grid = floor_grid();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut koopa = standing(EnemyType::Koopa, 4);
        koopa.hit_from_above();

        for _ in 0..SHELL_TIMEOUT_TICKS {
            koopa.update(&grid, &mut rng, TICK);
        }
        assert!(koopa.in_shell());
        assert_eq!(koopa.vel.x, 0.0);

        koopa.update(&grid, &mut rng, TICK);
        assert_eq!(koopa.shell(), Some(Shell::Out));
        assert_eq!(koopa.size.y, ENEMY_SIZE);
        assert_eq!(koopa.vel.x.abs(), KOOPA_SPEED);
    }

    #[test]
    fn test_removed_enemy_is_inert() {
        let grid = floor_grid();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut goomba = standing(EnemyType::Goomba, 3);
        goomba.status = Status::Removed;
        let before = goomba.pos;
        goomba.update(&grid, &mut rng, TICK);
        assert_eq!(goomba.pos, before);
        assert!(!goomba.is_hittable());
    }
}
