//! Neon Swarm entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use neon_swarm::consts::*;
    use neon_swarm::platform::{InputState, canvas_size};
    use neon_swarm::renderer::canvas::CanvasPainter;
    use neon_swarm::sim::{GameEvent, GamePhase, GameState, tick};
    use neon_swarm::{QualityPreset, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        painter: CanvasPainter,
        canvas: HtmlCanvasElement,
        settings: Settings,
        input: InputState,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.poll();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.handle_events();
            }

            if self.settings.show_fps {
                self.track_fps(time);
            }
        }

        /// Rolling average over the last 60 frames
        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Show modals for phase transitions raised by the last tick
        fn handle_events(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for event in &self.state.events {
                match *event {
                    GameEvent::LevelComplete { .. } => {
                        let stats = format!(
                            "Score: {} | Enemies Defeated: {}",
                            self.state.score, self.state.kills_total
                        );
                        show_modal(&document, "levelComplete", "levelStats", &stats);
                    }
                    GameEvent::GameOver { score, level } => {
                        let stats = format!(
                            "Final Score: {} | Level Reached: {} | Enemies Defeated: {}",
                            score, level, self.state.kills_total
                        );
                        show_modal(&document, "gameOver", "finalStats", &stats);
                    }
                    _ => {}
                }
            }
        }

        fn render(&self) {
            if let Err(e) = self.painter.render(&self.state, &self.settings) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.state.hud();
            let mut fields = vec![
                ("score", hud.score.to_string()),
                ("level", hud.level.to_string()),
                ("health", hud.health.to_string()),
                ("enemiesKilled", hud.kills_total.to_string()),
            ];
            if self.settings.show_fps {
                fields.push(("fps", self.fps.to_string()));
            }
            for (id, value) in fields {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            }
        }

        fn next_level(&mut self) {
            if self.state.next_level() {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    hide_modal(&document, "levelComplete");
                }
            }
        }

        fn restart(&mut self) {
            self.state.restart();
            self.input.release_all();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                hide_modal(&document, "gameOver");
                hide_modal(&document, "levelComplete");
            }
        }

        /// Fit the canvas to the window and tell the simulation
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let inner = |v: Result<JsValue, JsValue>| {
                v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
            };
            let (w, h) = canvas_size(inner(window.inner_width()), inner(window.inner_height()));
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
            self.state.resize(w, h);
            log::info!("Canvas resized to {}x{}", w, h);
        }
    }

    fn show_modal(document: &Document, modal_id: &str, text_id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(text_id) {
            el.set_text_content(Some(text));
        }
        if let Some(el) = document.get_element_by_id(modal_id) {
            let _ = el.class_list().remove_1("hidden");
        }
    }

    fn hide_modal(document: &Document, modal_id: &str) {
        if let Some(el) = document.get_element_by_id(modal_id) {
            let _ = el.class_list().add_1("hidden");
        }
    }

    /// Read `?quality=`, `?variant=` and `?fps=` from the page URL
    fn query_options(window: &web_sys::Window) -> (Settings, Tuning) {
        let search = window.location().search().unwrap_or_default();
        let mut settings = Settings::default();
        let mut tuning = Tuning::default();
        let mut show_fps = false;
        for pair in search.trim_start_matches('?').split('&') {
            match pair.split_once('=') {
                Some(("quality", value)) => {
                    if let Some(preset) = QualityPreset::parse(value) {
                        settings = Settings::from_preset(preset);
                    }
                }
                Some(("fps", value)) => show_fps = value == "1" || value == "true",
                Some(("variant", "classic")) => tuning = Tuning::classic(),
                Some(("variant", "fourway")) => {
                    tuning.projectile.pattern = neon_swarm::tuning::FirePattern::FourWay;
                }
                _ => {}
            }
        }
        settings.show_fps = show_fps;
        settings.apply_to(&mut tuning);
        (settings, tuning)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Swarm starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let (settings, tuning) = query_options(&window);
        let seed = js_sys::Date::now() as u64;
        let painter = CanvasPainter::new(&canvas)?;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::with_tuning(seed, tuning),
            painter,
            canvas: canvas.clone(),
            settings,
            input: InputState::new(),
            accumulator: 0.0,
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));
        game.borrow_mut().resize();
        if game.borrow().settings.show_fps {
            if let Some(el) = document.get_element_by_id("fpsCounter") {
                el.class_list().remove_1("hidden")?;
            }
        }
        log::info!(
            "Game initialized with seed: {} (quality {})",
            seed,
            game.borrow().settings.quality.as_str()
        );

        setup_keyboard(&document, game.clone())?;
        setup_touch_controls(&document, game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_window_events(&window, game.clone())?;

        request_animation_frame(game);
        log::info!("Neon Swarm running!");
        Ok(())
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.state.phase == GamePhase::GameOver && key.eq_ignore_ascii_case("r") {
                    g.restart();
                    return;
                }
                if g.input.key_down(&key) {
                    event.prevent_default();
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            game.borrow_mut().input.key_up(&event.key());
        });
        document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let buttons = document.query_selector_all(".touch-btn")?;
        for i in 0..buttons.length() {
            let Some(btn) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(name) = btn
                .get_attribute("data-direction")
                .or_else(|| btn.get_attribute("data-action"))
            else {
                continue;
            };

            let phases = [("touchstart", true), ("touchend", false), ("touchcancel", false)];
            for (event_name, pressed) in phases {
                let game = game.clone();
                let name = name.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    if pressed {
                        g.input.touch_start(&name);
                    } else {
                        g.input.touch_end(&name);
                    }
                });
                btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("nextLevel") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().next_level();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().restart();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_window_events(
        window: &web_sys::Window,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: drop held keys, auto-pause
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.input.release_all();
            if g.state.is_running() {
                g.input.request_pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_swarm::consts::SIM_DT;
    use neon_swarm::sim::{GamePhase, GameState, TickInput, tick};
    use neon_swarm::Tuning;

    /// Seconds of simulated play
    const RUN_SECONDS: f32 = 120.0;

    /// Strafe away from the nearest hostile while holding fire
    fn autopilot(state: &GameState) -> TickInput {
        let mut input = TickInput {
            fire: true,
            ..Default::default()
        };
        let avatar = state.avatar.pos;
        let nearest = state.hostiles.iter().min_by(|a, b| {
            a.pos
                .distance_squared(avatar)
                .total_cmp(&b.pos.distance_squared(avatar))
        });
        if let Some(hostile) = nearest {
            let away = avatar - hostile.pos;
            // Line up under it horizontally, back off vertically
            input.left = hostile.pos.x < avatar.x - 4.0;
            input.right = hostile.pos.x > avatar.x + 4.0;
            input.down = away.y > 0.0 && away.length() < 150.0;
            input.up = hostile.pos.y < avatar.y && away.length() > 250.0;
        } else {
            let centre = state.bounds() / 2.0;
            let to_centre = centre - avatar;
            input.left = to_centre.x < -4.0;
            input.right = to_centre.x > 4.0;
            input.up = to_centre.y < -4.0;
            input.down = to_centre.y > 4.0;
        }
        input
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let tuning = match std::env::args().nth(1) {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Tuning::default(),
        };

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs();
        let mut state = GameState::with_tuning(seed, tuning);
        log::info!("Headless autopilot run, seed {}", seed);

        let ticks = (RUN_SECONDS / SIM_DT) as u64;
        for _ in 0..ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, SIM_DT);
            match state.phase {
                GamePhase::LevelComplete => {
                    state.next_level();
                }
                GamePhase::GameOver => break,
                GamePhase::Running | GamePhase::Paused => {}
            }
        }

        let hud = state.hud();
        log::info!(
            "Run finished after {:.1}s: phase={:?} score={} level={} kills={} health={}/{}",
            state.clock,
            hud.phase,
            hud.score,
            hud.level,
            hud.kills_total,
            hud.health,
            hud.max_health
        );
        println!(
            "score={} level={} kills={} phase={:?}",
            hud.score, hud.level, hud.kills_total, hud.phase
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Swarm (native) starting...");
    log::info!(
        "Native mode runs a headless autopilot - run with `trunk serve` for the web version"
    );

    if let Err(e) = headless::run() {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
