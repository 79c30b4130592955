//! Axis-aligned collision and motion integration
//!
//! Everything here is stateless. Bodies opt into velocity-dependent behavior
//! through the [`Kinematic`] trait, so gravity and friction can only be
//! applied to things that actually move.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FRICTION, FRICTION_CUTOFF, GRAVITY, TILE_SIZE};

/// Axis-aligned box in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open overlap test on both axes (touching edges do not overlap)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// World-space box covering the tile at grid coordinates (tx, ty)
#[inline]
pub fn tile_rect(tx: i32, ty: i32) -> Rect {
    Rect::new(
        tx as f32 * TILE_SIZE,
        ty as f32 * TILE_SIZE,
        TILE_SIZE,
        TILE_SIZE,
    )
}

/// Grid coordinate containing a world-space pixel coordinate
#[inline]
pub fn tile_coord(px: f32) -> i32 {
    (px / TILE_SIZE).floor() as i32
}

/// Face of the static box that the moving box struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Moving box is above (landed on it)
    Top,
    /// Moving box is below (hit it from underneath)
    Bottom,
    /// Moving box is to the left
    Left,
    /// Moving box is to the right
    Right,
}

impl Side {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Anything with a box that can be repositioned
pub trait Collider {
    fn bounds(&self) -> Rect;
    fn set_origin(&mut self, x: f32, y: f32);
}

/// A collider that also carries a velocity
pub trait Kinematic: Collider {
    fn velocity_mut(&mut self) -> &mut Vec2;
}

/// True iff the boxes overlap on both axes
#[inline]
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Classify which side of `b` was struck by `a`.
///
/// The axis with the smaller penetration wins; ties go to the vertical axis.
pub fn collision_side(a: &Rect, b: &Rect) -> Side {
    let overlap_x = (a.right() - b.x).min(b.right() - a.x);
    let overlap_y = (a.bottom() - b.y).min(b.bottom() - a.y);

    if overlap_x < overlap_y {
        if a.x < b.x { Side::Left } else { Side::Right }
    } else if a.y < b.y {
        Side::Top
    } else {
        Side::Bottom
    }
}

/// Push `moving` flush against `fixed` along the resolved side
pub fn separate(moving: &mut Rect, fixed: &Rect) -> Side {
    let side = collision_side(moving, fixed);
    match side {
        Side::Top => moving.y = fixed.y - moving.height,
        Side::Bottom => moving.y = fixed.bottom(),
        Side::Left => moving.x = fixed.x - moving.width,
        Side::Right => moving.x = fixed.right(),
    }
    side
}

/// Snap a kinematic body out of `fixed` and zero the velocity on that axis.
///
/// Only meaningful when the two boxes overlap.
pub fn resolve_collision<K: Kinematic + ?Sized>(moving: &mut K, fixed: &Rect) -> Side {
    let mut bounds = moving.bounds();
    let side = separate(&mut bounds, fixed);
    moving.set_origin(bounds.x, bounds.y);

    let vel = moving.velocity_mut();
    if side.is_horizontal() {
        vel.x = 0.0;
    } else {
        vel.y = 0.0;
    }
    side
}

/// Accelerate downward by `GRAVITY * dt`
#[inline]
pub fn apply_gravity<K: Kinematic + ?Sized>(body: &mut K, dt: f32) {
    body.velocity_mut().y += GRAVITY * dt;
}

/// Decay horizontal velocity, snapping to rest once it is negligible
pub fn apply_friction<K: Kinematic + ?Sized>(body: &mut K) {
    let vel = body.velocity_mut();
    vel.x *= FRICTION;
    if vel.x.abs() < FRICTION_CUTOFF {
        vel.x = 0.0;
    }
}
