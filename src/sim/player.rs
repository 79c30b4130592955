//! The player character and the fireballs it owns

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{
    Collider, Kinematic, Rect, Side, apply_friction, apply_gravity, check_collision,
    collision_side, resolve_collision, tile_coord, tile_rect,
};
use super::tile::TileGrid;
use crate::consts::*;

/// Player upgrade tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerTier {
    #[default]
    Small,
    Big,
    Fire,
}

impl PowerTier {
    /// Collider height for this tier
    pub fn height(self) -> f32 {
        match self {
            PowerTier::Small => PLAYER_SMALL_HEIGHT,
            PowerTier::Big | PowerTier::Fire => PLAYER_BIG_HEIGHT,
        }
    }
}

/// Collectible upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    #[default]
    Mushroom,
    #[serde(alias = "fireflower")]
    Fire,
}

/// Outcome of [`Player::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    /// Invulnerable, nothing happened
    Ignored,
    /// Lost a tier but survived
    Downgraded,
    /// Small player was hit
    Fatal,
}

impl Damage {
    pub fn is_fatal(self) -> bool {
        self == Damage::Fatal
    }
}

/// Held controls, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
}

/// What the player did this tick (for sound cues)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerActions {
    pub jumped: bool,
    pub fired: bool,
}

#[derive(Debug, Clone)]
pub struct Fireball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    pub bounce_count: u32,
}

impl Fireball {
    pub fn new(x: f32, y: f32, direction: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(direction * FIREBALL_SPEED, FIREBALL_LIFT),
            active: true,
            bounce_count: 0,
        }
    }

    /// Move, then fall under fireball gravity
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += FIREBALL_GRAVITY;
    }

    /// Burn out inside solid terrain; bounce off the ground up to the cap
    pub fn collide_with_tiles(&mut self, grid: &TileGrid) {
        if grid.is_solid(tile_coord(self.pos.x), tile_coord(self.pos.y)) {
            self.active = false;
        }

        if self.vel.y > 0.0 && self.bounce_count < FIREBALL_MAX_BOUNCES {
            let ground_x = tile_coord(self.pos.x);
            let ground_y = tile_coord(self.pos.y + FIREBALL_SIZE);
            if grid.is_solid(ground_x, ground_y) {
                self.vel.y = FIREBALL_BOUNCE;
                self.bounce_count += 1;
            }
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, FIREBALL_SIZE, FIREBALL_SIZE)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub spawn: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub tier: PowerTier,
    pub on_ground: bool,
    pub facing_right: bool,
    pub invulnerable_ticks: u32,
    pub shoot_cooldown: u32,
    pub fireballs: Vec<Fireball>,
    /// Walk-cycle frame (cosmetic)
    pub anim_frame: u8,
    anim_ticks: u32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            spawn: Vec2::new(x, y),
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_SMALL_HEIGHT),
            tier: PowerTier::Small,
            on_ground: false,
            facing_right: true,
            invulnerable_ticks: 0,
            shoot_cooldown: 0,
            fireballs: Vec::new(),
            anim_frame: 0,
            anim_ticks: 0,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Full per-tick update: input, integration, terrain, timers, fireballs
    pub fn update(&mut self, input: &TickInput, grid: &TileGrid, dt: f32) -> PlayerActions {
        let actions = self.apply_input(input);

        apply_gravity(self, dt);
        self.pos += self.vel;

        self.on_ground = false;
        self.collide_with_tiles(grid);

        // Keep inside the world horizontally
        let max_x = grid.pixel_width() - self.size.x;
        self.pos.x = self.pos.x.clamp(0.0, max_x.max(0.0));

        self.animate(input.left || input.right);

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);

        let world_width = grid.pixel_width();
        self.fireballs.retain_mut(|fireball| {
            fireball.update();
            fireball.active
                && fireball.pos.x > -FIREBALL_CULL_MARGIN
                && fireball.pos.x < world_width + FIREBALL_CULL_MARGIN
        });

        actions
    }

    /// Turn held controls into velocity and fireballs
    pub fn apply_input(&mut self, input: &TickInput) -> PlayerActions {
        let mut actions = PlayerActions::default();

        if input.left {
            self.vel.x = -PLAYER_SPEED;
            self.facing_right = false;
        } else if input.right {
            self.vel.x = PLAYER_SPEED;
            self.facing_right = true;
        } else {
            apply_friction(self);
        }

        if input.jump && self.on_ground {
            self.vel.y = JUMP_IMPULSE;
            self.on_ground = false;
            actions.jumped = true;
        }

        if input.fire && self.tier == PowerTier::Fire && self.shoot_cooldown == 0 {
            self.shoot_fireball();
            self.shoot_cooldown = SHOOT_COOLDOWN_TICKS;
            actions.fired = true;
        }
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);

        actions
    }

    fn shoot_fireball(&mut self) {
        let (x, direction) = if self.facing_right {
            (self.pos.x + self.size.x, 1.0)
        } else {
            (self.pos.x, -1.0)
        };
        self.fireballs
            .push(Fireball::new(x, self.pos.y + self.size.y / 2.0, direction));
    }

    /// Same 4x4 neighborhood scan as enemies, but walls just stop the player
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
                if collision_side(&bounds, &tile) == Side::Top {
                    self.on_ground = true;
                }
                resolve_collision(self, &tile);
            }
        }
    }

    fn animate(&mut self, moving: bool) {
        if moving {
            self.anim_ticks += 1;
            if self.anim_ticks >= 9 {
                self.anim_frame = (self.anim_frame + 1) % 4;
                self.anim_ticks = 0;
            }
        } else {
            self.anim_frame = 0;
            self.anim_ticks = 0;
        }
    }

    /// Switch tier, keeping the feet where they are
    fn set_tier(&mut self, tier: PowerTier) {
        let height = tier.height();
        self.pos.y += self.size.y - height;
        self.size.y = height;
        self.tier = tier;
    }

    /// Hit by an enemy
    pub fn take_damage(&mut self) -> Damage {
        if self.is_invulnerable() {
            return Damage::Ignored;
        }
        match self.tier {
            PowerTier::Fire => self.set_tier(PowerTier::Big),
            PowerTier::Big => self.set_tier(PowerTier::Small),
            PowerTier::Small => return Damage::Fatal,
        }
        self.invulnerable_ticks = INVULNERABLE_TICKS;
        Damage::Downgraded
    }

    /// Apply a pickup. Returns true if the tier changed.
    pub fn power_up(&mut self, kind: PowerUpKind) -> bool {
        match (kind, self.tier) {
            (PowerUpKind::Mushroom, PowerTier::Small) => self.set_tier(PowerTier::Big),
            (PowerUpKind::Fire, PowerTier::Small | PowerTier::Big) => {
                self.set_tier(PowerTier::Fire)
            }
            _ => return false,
        }
        true
    }

    /// Respawn at the level start as a small player
    pub fn reset(&mut self) {
        *self = Self::new(self.spawn.x, self.spawn.y);
    }
}

impl Collider for Player {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }
}

impl Kinematic for Player {
    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.vel
    }
}
