//! Canvas 2D drawing of tiles, pickups, enemies, player and fireballs

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{VIEWPORT, bob_offset, player_visible, tile_colors, to_screen, visible_tiles};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    Camera, Enemy, EnemyKind, GameState, Level, Player, PowerTier, PowerUpKind, Tile,
};

const SKY: &str = "#87CEEB";

/// Draws the game into a 2D canvas context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Pins the canvas backing store to the camera viewport
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(VIEWPORT.x as u32);
        canvas.set_height(VIEWPORT.y as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Render the current frame
    pub fn render(&self, state: &GameState, settings: &Settings) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(SKY);
        ctx.fill_rect(0.0, 0.0, VIEWPORT.x as f64, VIEWPORT.y as f64);

        let Some(world) = &state.world else {
            return Ok(());
        };
        let camera = &state.camera;
        let reduced_motion = settings.reduced_motion;

        self.draw_tiles(&world.level, camera)?;
        self.draw_pickups(&world.level, camera, reduced_motion)?;
        for enemy in world.level.active_enemies() {
            self.draw_enemy(enemy, camera);
        }
        self.draw_player(&world.player, camera, reduced_motion)?;
        Ok(())
    }

    fn draw_tiles(&self, level: &Level, camera: &Camera) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let size = TILE_SIZE as f64;
        for (tx, ty) in visible_tiles(camera, &level.grid).iter() {
            let Some(tile) = level.tile(tx, ty) else { continue };
            let Some((fill, accent)) = tile_colors(tile) else {
                continue;
            };
            let p = to_screen(Vec2::new(tx as f32, ty as f32) * TILE_SIZE, camera);
            let (x, y) = (p.x as f64, p.y as f64);

            ctx.set_fill_style_str(fill);
            ctx.fill_rect(x, y, size, size);
            ctx.set_fill_style_str(accent);
            match tile {
                Tile::Ground => ctx.fill_rect(x, y, size, 4.0),
                Tile::Brick => {
                    ctx.fill_rect(x, y, size, 2.0);
                    ctx.fill_rect(x, y, 2.0, size);
                }
                Tile::Question => {
                    ctx.fill_rect(x + 4.0, y + 4.0, size - 8.0, size - 8.0);
                    ctx.set_fill_style_str("#000");
                    ctx.set_font("20px Arial");
                    ctx.fill_text("?", x + 10.0, y + 22.0)?;
                }
                _ => ctx.fill_rect(x + 4.0, y + 4.0, size - 8.0, size - 8.0),
            }
        }
        Ok(())
    }

    fn draw_pickups(&self, level: &Level, camera: &Camera, reduced_motion: bool) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for coin in level.collectibles.iter().filter(|c| !c.collected) {
            let p = to_screen(coin.pos, camera);
            let (x, y) = (p.x as f64, (p.y + bob_offset(coin.phase, reduced_motion)) as f64);
            ctx.set_fill_style_str("#FFD700");
            ctx.begin_path();
            ctx.ellipse(x + 8.0, y + 8.0, 8.0, 10.0, 0.0, 0.0, TAU)?;
            ctx.fill();
            ctx.set_fill_style_str("#FFA500");
            ctx.begin_path();
            ctx.ellipse(x + 8.0, y + 8.0, 6.0, 8.0, 0.0, 0.0, TAU)?;
            ctx.fill();
        }

        for power_up in level.power_ups.iter().filter(|p| p.is_available()) {
            let p = to_screen(power_up.pos, camera);
            let (x, y) = (p.x as f64, p.y as f64);
            match power_up.kind {
                PowerUpKind::Mushroom => {
                    ctx.set_fill_style_str("#FF0000");
                    ctx.fill_rect(x + 4.0, y + 12.0, 16.0, 12.0);
                    ctx.set_fill_style_str("#FFFFFF");
                    ctx.fill_rect(x + 6.0, y + 14.0, 12.0, 8.0);
                    ctx.set_fill_style_str("#FFD700");
                    ctx.begin_path();
                    ctx.ellipse(x + 12.0, y + 8.0, 10.0, 8.0, 0.0, 0.0, TAU)?;
                    ctx.fill();
                }
                PowerUpKind::Fire => {
                    ctx.set_fill_style_str("#FF4500");
                    ctx.begin_path();
                    ctx.arc(x + 12.0, y + 12.0, 10.0, 0.0, TAU)?;
                    ctx.fill();
                    ctx.set_fill_style_str("#FFD700");
                    ctx.begin_path();
                    ctx.arc(x + 12.0, y + 12.0, 6.0, 0.0, TAU)?;
                    ctx.fill();
                }
            }
        }
        Ok(())
    }

    fn draw_enemy(&self, enemy: &Enemy, camera: &Camera) {
        let ctx = &self.ctx;
        let p = to_screen(enemy.pos, camera);
        let (x, y, h) = (p.x as f64, p.y as f64, enemy.size.y as f64);

        if enemy.is_dead() {
            // Squashed
            ctx.set_fill_style_str("#8B4513");
            ctx.fill_rect(x + 8.0, y + h - 4.0, 16.0, 4.0);
            return;
        }

        if enemy.in_shell() {
            ctx.set_fill_style_str("#228B22");
            ctx.fill_rect(x + 4.0, y + h - 16.0, 24.0, 16.0);
            ctx.set_fill_style_str("#32CD32");
            ctx.fill_rect(x + 8.0, y + h - 12.0, 16.0, 8.0);
            return;
        }

        match enemy.kind {
            EnemyKind::Goomba => {
                ctx.set_fill_style_str("#8B4513");
                ctx.fill_rect(x + 4.0, y + 20.0, 24.0, 12.0);
                ctx.set_fill_style_str("#654321");
                ctx.fill_rect(x + 2.0, y + 4.0, 28.0, 18.0);
                let eye = if enemy.anim_frame == 0 { 0.0 } else { 2.0 };
                ctx.set_fill_style_str("#000");
                ctx.fill_rect(x + 10.0 + eye, y + 8.0, 4.0, 4.0);
                ctx.fill_rect(x + 18.0 + eye, y + 8.0, 4.0, 4.0);
            }
            EnemyKind::Koopa { .. } => {
                ctx.set_fill_style_str("#228B22");
                ctx.fill_rect(x + 6.0, y + 16.0, 20.0, 16.0);
                ctx.fill_rect(x + 4.0, y + 8.0, 24.0, 12.0);
                ctx.set_fill_style_str("#32CD32");
                ctx.fill_rect(x + 8.0, y + 12.0, 16.0, 12.0);
                ctx.set_fill_style_str("#000");
                ctx.fill_rect(x + 8.0, y + 10.0, 4.0, 4.0);
                ctx.fill_rect(x + 20.0, y + 10.0, 4.0, 4.0);
            }
        }
    }

    fn draw_player(&self, player: &Player, camera: &Camera, reduced_motion: bool) -> Result<(), JsValue> {
        let ctx = &self.ctx;

        for fireball in &player.fireballs {
            let p = to_screen(fireball.pos, camera);
            let r = (FIREBALL_SIZE / 2.0) as f64;
            let (cx, cy) = (p.x as f64 + r, p.y as f64 + r);
            ctx.set_fill_style_str("#FF4500");
            ctx.begin_path();
            ctx.arc(cx, cy, r, 0.0, TAU)?;
            ctx.fill();
            ctx.set_fill_style_str("#FFD700");
            ctx.begin_path();
            ctx.arc(cx, cy, (FIREBALL_SIZE / 3.0) as f64, 0.0, TAU)?;
            ctx.fill();
        }

        if !player_visible(player, reduced_motion) {
            return Ok(());
        }
        if reduced_motion && player.is_invulnerable() {
            ctx.set_global_alpha(0.5);
        }

        let p = to_screen(player.pos, camera);
        let (x, y) = (p.x as f64, p.y as f64);
        let body = if player.tier == PowerTier::Fire { "#FF4500" } else { "#FF0000" };
        ctx.set_fill_style_str(body);
        match player.tier {
            PowerTier::Small => {
                ctx.fill_rect(x + 8.0, y + 8.0, 16.0, 24.0);
                ctx.set_fill_style_str("#FFA500");
                ctx.fill_rect(x + 6.0, y, 20.0, 12.0);
                ctx.set_fill_style_str("#8B0000");
                ctx.fill_rect(x + 4.0, y + 2.0, 24.0, 6.0);
            }
            PowerTier::Big | PowerTier::Fire => {
                ctx.fill_rect(x + 6.0, y + 20.0, 20.0, 28.0);
                ctx.set_fill_style_str("#FFA500");
                ctx.fill_rect(x + 4.0, y + 8.0, 24.0, 16.0);
                ctx.set_fill_style_str("#8B0000");
                ctx.fill_rect(x + 2.0, y + 10.0, 28.0, 8.0);
            }
        }

        // Eyes follow the facing direction
        let eye_y = if player.tier == PowerTier::Small { 4.0 } else { 12.0 };
        let (near, far) = if player.facing_right { (10.0, 18.0) } else { (18.0, 10.0) };
        ctx.set_fill_style_str("#000");
        ctx.fill_rect(x + near, y + eye_y, 4.0, 4.0);
        ctx.fill_rect(x + far, y + eye_y, 4.0, 4.0);

        ctx.set_global_alpha(1.0);
        Ok(())
    }
}
