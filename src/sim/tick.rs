//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one step: entity updates first,
//! then cross-entity resolution and the score/lives/level effects.

use super::enemy::SideHit;
use super::physics::{Collider, Side, check_collision, collision_side};
use super::player::{Damage, TickInput};
use super::state::{GameEvent, GamePhase, GameState, World};
use crate::consts::*;

/// How a tick ended for the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Continue,
    PlayerDied,
    LevelComplete,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(mut world) = state.world.take() else {
        return;
    };

    state.time_ticks += 1;
    let outcome = step_world(state, &mut world, input);
    state.world = Some(world);

    match outcome {
        Outcome::Continue => {}
        Outcome::PlayerDied => state.player_die(),
        Outcome::LevelComplete => {
            log::info!("Level {} complete", state.level_number);
            state.next_level();
        }
    }
}

fn step_world(state: &mut GameState, world: &mut World, input: &TickInput) -> Outcome {
    let World { level, player } = world;

    // 1. Player
    let actions = player.update(input, &level.grid, TICK);
    if actions.jumped {
        state.push_event(GameEvent::Jumped);
    }
    if actions.fired {
        state.push_event(GameEvent::FireballShot);
    }

    // 2. Level
    level.update(&mut state.rng, TICK);

    // 3. Camera
    state.camera.follow(player.pos.x, level.pixel_width());

    // 4. Coins
    for _ in 0..level.collect_coins(&player.bounds()) {
        state.coins += 1;
        state.add_score(COIN_POINTS);
        state.push_event(GameEvent::CoinCollected);
    }

    // 5. Power-ups: score only when the tier actually changed
    for kind in level.collect_power_ups(&player.bounds()) {
        if player.power_up(kind) {
            state.add_score(POWER_UP_POINTS);
            state.push_event(GameEvent::PoweredUp(kind));
        }
    }

    // 6. Player vs enemies
    for enemy in level.enemies.iter_mut().filter(|e| e.is_hittable()) {
        let player_box = player.bounds();
        let enemy_box = enemy.bounds();
        if !check_collision(&player_box, &enemy_box) {
            continue;
        }

        if collision_side(&player_box, &enemy_box) == Side::Top && player.vel.y > 0.0 {
            let points = enemy.hit_from_above();
            if points > 0 {
                state.add_score(points as u64);
                player.vel.y = STOMP_BOUNCE;
                state.push_event(GameEvent::EnemyDefeated { points });
            } else {
                state.push_event(GameEvent::ShellKicked);
            }
        } else if !player.is_invulnerable() {
            match enemy.hit_from_side() {
                SideHit::Bonus(points) => {
                    state.add_score(points as u64);
                    state.push_event(GameEvent::EnemyDefeated { points });
                }
                SideHit::HurtsPlayer => match player.take_damage() {
                    Damage::Fatal => return Outcome::PlayerDied,
                    Damage::Downgraded => state.push_event(GameEvent::PlayerHurt),
                    Damage::Ignored => {}
                },
                SideHit::Harmless => {}
            }
        }
    }

    // 7. Fireballs vs enemies: first hit wins
    for fireball in player.fireballs.iter_mut().filter(|f| f.active) {
        let fire_box = fireball.bounds();
        if let Some(enemy) = level
            .enemies
            .iter_mut()
            .filter(|e| e.is_hittable())
            .find(|e| check_collision(&fire_box, &e.bounds()))
        {
            let points = enemy.hit_from_above();
            if points > 0 {
                state.add_score(points as u64);
                state.push_event(GameEvent::EnemyDefeated { points });
            }
            fireball.active = false;
        }
    }

    // 8. Fireballs vs terrain
    for fireball in player.fireballs.iter_mut().filter(|f| f.active) {
        fireball.collide_with_tiles(&level.grid);
    }

    // 9. Fell out of the world
    if player.pos.y > level.pixel_height() {
        return Outcome::PlayerDied;
    }

    // 10. Reached the exit
    if player.pos.x >= level.end_x {
        return Outcome::LevelComplete;
    }

    Outcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Enemy, EnemyType, Shell, Status};
    use crate::sim::level::{CollectibleKind, CollectibleSpec, LevelData, PowerUpSpec};
    use crate::sim::levelgen::LevelPack;
    use crate::sim::player::{PowerTier, PowerUpKind};

    /// 30x10 level with a floor on the bottom row, player at x=64 on the floor
    fn flat_level() -> LevelData {
        let mut data = LevelData::blank(30, 10);
        for x in 0..30 {
            data.set_tile(x, 9, crate::sim::tile::Tile::Ground);
        }
        data.start_x = Some(64.0);
        data.start_y = Some(8.0 * TILE_SIZE);
        data
    }

    fn playing(data: LevelData) -> GameState {
        let pack = LevelPack {
            levels: vec![data.clone(), data],
        };
        let mut state = GameState::with_source(11, 0, Box::new(pack));
        state.start_game();
        state.take_events();
        state
    }

    fn world(state: &mut GameState) -> &mut World {
        state.world.as_mut().expect("run in progress")
    }

    #[test]
    fn test_no_tick_outside_playing() {
        let mut state = playing(flat_level());
        state.toggle_pause();
        let before = world(&mut state).player.pos;
        world(&mut state).player.vel.x = 5.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(world(&mut state).player.pos, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_coin_pickup_scores() {
        let mut data = flat_level();
        data.collectibles.push(CollectibleSpec {
            x: 70.0,
            y: 8.0 * TILE_SIZE + 4.0,
            kind: CollectibleKind::Coin,
        });
        let mut state = playing(data);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.coins, 1);
        assert_eq!(state.score, COIN_POINTS);
        assert!(state.take_events().contains(&GameEvent::CoinCollected));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.coins, 1);
    }

    #[test]
    fn test_power_up_scores_only_on_change() {
        let mut data = flat_level();
        for _ in 0..2 {
            data.power_ups.push(PowerUpSpec {
                x: 70.0,
                y: 8.0 * TILE_SIZE + 4.0,
                kind: PowerUpKind::Fire,
            });
        }
        let mut state = playing(data);

        tick(&mut state, &TickInput::default());
        assert_eq!(world(&mut state).player.tier, PowerTier::Fire);
        assert_eq!(state.score, POWER_UP_POINTS);
    }

    #[test]
    fn test_stomp_bounces_and_scores() {
        let mut state = playing(flat_level());
        let w = world(&mut state);
        w.level.enemies.push(Enemy::new(EnemyType::Goomba, 64.0, 8.0 * TILE_SIZE));
        w.player.pos.y = 8.0 * TILE_SIZE - 30.0;
        w.player.vel.y = 6.0;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, STOMP_POINTS as u64);
        let w = world(&mut state);
        assert_eq!(w.player.vel.y, STOMP_BOUNCE);
        assert!(w.level.enemies[0].is_dead());
        assert!(
            state
                .take_events()
                .contains(&GameEvent::EnemyDefeated { points: STOMP_POINTS })
        );
    }

    #[test]
    fn test_side_contact_kills_small_player() {
        let mut state = playing(flat_level());
        let w = world(&mut state);
        w.level.enemies.push(Enemy::new(EnemyType::Goomba, 80.0, 8.0 * TILE_SIZE));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(
            state
                .take_events()
                .contains(&GameEvent::PlayerDied {
                    lives_left: STARTING_LIVES - 1
                })
        );
    }

    #[test]
    fn test_side_contact_downgrades_big_player() {
        let mut state = playing(flat_level());
        let w = world(&mut state);
        w.player.power_up(PowerUpKind::Mushroom);
        w.level.enemies.push(Enemy::new(EnemyType::Goomba, 80.0, 8.0 * TILE_SIZE));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, STARTING_LIVES);
        let w = world(&mut state);
        assert_eq!(w.player.tier, PowerTier::Small);
        assert!(w.player.is_invulnerable());
        assert!(state.take_events().contains(&GameEvent::PlayerHurt));
    }

    #[test]
    fn test_fireball_defeats_first_enemy() {
        let mut state = playing(flat_level());
        let w = world(&mut state);
        w.level.enemies.push(Enemy::new(EnemyType::Goomba, 300.0, 8.0 * TILE_SIZE));
        w.level.enemies.push(Enemy::new(EnemyType::Goomba, 300.0, 8.0 * TILE_SIZE));
        w.player.fireballs.push(crate::sim::player::Fireball::new(
            295.0,
            8.0 * TILE_SIZE + 4.0,
            1.0,
        ));

        tick(&mut state, &TickInput::default());
        let w = world(&mut state);
        assert!(w.level.enemies[0].is_dead());
        assert_eq!(w.level.enemies[1].status, Status::Alive);
        assert!(w.player.fireballs.iter().all(|f| !f.active));
        assert_eq!(state.score, STOMP_POINTS as u64);
    }

    #[test]
    fn test_fireball_shells_koopa() {
        let mut state = playing(flat_level());
        let w = world(&mut state);
        w.level.enemies.push(Enemy::new(EnemyType::Koopa, 300.0, 8.0 * TILE_SIZE));
        w.player.fireballs.push(crate::sim::player::Fireball::new(
            295.0,
            8.0 * TILE_SIZE + 4.0,
            1.0,
        ));

        tick(&mut state, &TickInput::default());
        let koopa = &world(&mut state).level.enemies[0];
        assert!(matches!(koopa.shell(), Some(Shell::Idle { .. })));
    }

    #[test]
    fn test_reaching_exit_loads_next_level() {
        let mut data = flat_level();
        data.end_x = Some(66.0);
        let mut state = playing(data);

        tick(&mut state, &TickInput {
            right: true,
            ..Default::default()
        });
        assert_eq!(state.level_number, 2);
        assert_eq!(world(&mut state).player.pos.x, 64.0);
        assert_eq!(state.take_events(), vec![GameEvent::LevelStarted(2)]);
    }

    #[test]
    fn test_jump_event() {
        let mut state = playing(flat_level());
        tick(&mut state, &TickInput::default());
        assert!(world(&mut state).player.on_ground);

        tick(&mut state, &TickInput {
            jump: true,
            ..Default::default()
        });
        assert_eq!(state.take_events(), vec![GameEvent::Jumped]);
    }
}
