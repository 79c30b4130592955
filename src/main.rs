//! Tile Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use tile_dash::audio::{AudioManager, SoundEffect};
    use tile_dash::platform::{KeyState, edge_action, is_game_key, is_mute_key};
    use tile_dash::renderer::CanvasRenderer;
    use tile_dash::sim::{FixedTimestep, GameEvent, GamePhase, GameState, tick};
    use tile_dash::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        clock: FixedTimestep,
        keys: KeyState,
        focused: bool,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let high_score = HighScore::load();
            Self {
                state: GameState::new(seed, high_score.best),
                renderer,
                audio: AudioManager::new(&settings),
                settings,
                high_score,
                clock: FixedTimestep::new(),
                keys: KeyState::new(),
                focused: true,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                let input = self.keys.tick_input();
                tick(&mut self.state, &input);
            }
            self.handle_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Play sounds and persist the high score
        fn handle_events(&mut self) {
            for event in self.state.take_events() {
                if let GameEvent::GameOver { score, .. } = event {
                    if self.high_score.submit(score) {
                        self.high_score.save();
                    }
                }
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Err(e) = self.renderer.render(&self.state, &self.settings) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Key pressed: held state plus edge-triggered session actions
        fn key_down(&mut self, key: &str) {
            self.keys.key_down(key);
            if !self.focused {
                self.focused = true;
                self.audio.apply_settings(&self.settings, true);
            }
            if is_mute_key(key) {
                self.settings.toggle_mute();
                self.settings.save();
                self.audio.apply_settings(&self.settings, self.focused);
                return;
            }
            if let Some(action) = edge_action(self.state.phase, key) {
                self.audio.resume();
                action.apply(&mut self.state);
                self.clock.reset();
                self.handle_events();
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            self.keys.clear();
            self.focused = false;
            self.audio.apply_settings(&self.settings, false);
            if self.state.phase == GamePhase::Playing {
                self.state.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let set_text = |selector: &str, text: String| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set_text("#hud-score .hud-value", self.state.score.to_string());
            set_text("#hud-coins .hud-value", self.state.coins.to_string());
            set_text("#hud-lives .hud-value", self.state.lives.to_string());
            set_text("#hud-level .hud-value", self.state.level_number.to_string());
            set_text("#hud-high .hud-value", self.high_score.best.to_string());

            set_visible("hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text("#hud-fps .hud-value", self.fps.to_string());
            }

            let phase = self.state.phase;
            set_visible("start-screen", phase == GamePhase::Menu);
            set_visible("pause-screen", phase == GamePhase::Paused);
            set_visible("game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text("#final-score", self.state.score.to_string());
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tile Dash starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let renderer = CanvasRenderer::new(&canvas)?;
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone())?;
        setup_auto_pause(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Tile Dash running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down: track by both key and code so layouts without letters still work
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if is_game_key(&key) || is_game_key(&event.code()) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.key_down(&key);
                g.keys.key_down(&event.code());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.keys.key_up(&event.key());
                g.keys.key_up(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                tile_dash::consts::SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Dash (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    log::info!("Running scripted demo of level 1...");
    demo::run(0x7113_da54, 60 * 60);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: walk right, hop periodically, log what happened
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use tile_dash::HighScore;
    use tile_dash::audio::SoundEffect;
    use tile_dash::consts::SIM_DT;
    use tile_dash::sim::{FixedTimestep, GameEvent, GameState, TickInput, tick};

    pub fn run(seed: u64, frames: u32) {
        let mut high_score = HighScore::load();
        let mut state = GameState::new(seed, high_score.best);
        let mut clock = FixedTimestep::new();
        state.start_game();

        let mut sounds = 0usize;
        let mut levels_cleared = 0u32;
        let mut ticks = 0u64;

        for _ in 0..frames {
            for _ in 0..clock.advance(SIM_DT) {
                let input = TickInput {
                    right: true,
                    jump: ticks % 45 < 20,
                    fire: ticks % 30 == 0,
                    ..Default::default()
                };
                tick(&mut state, &input);
                ticks += 1;
            }

            for event in state.take_events() {
                sounds += SoundEffect::for_event(&event).is_some() as usize;
                match event {
                    GameEvent::LevelStarted(n) if n > 1 => levels_cleared += 1,
                    GameEvent::GameOver { score, .. } => {
                        if high_score.submit(score) {
                            high_score.save();
                        }
                    }
                    _ => {}
                }
            }

            if !state.is_running() {
                break;
            }
        }

        log::info!("Demo finished after {} ticks in phase {:?}", ticks, state.phase);
        log::info!(
            "score {} | coins {} | lives {} | level {} | cleared {} | sounds {} | best {}",
            state.score,
            state.coins,
            state.lives,
            state.level_number,
            levels_cleared,
            sounds,
            high_score.best.max(state.high_score),
        );
    }
}
