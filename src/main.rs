//! Vision Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlVideoElement};

    use vision_snake::app::{App, ControlMode, RenderSnapshot};
    use vision_snake::consts::GRID_SIZE;
    use vision_snake::platform::web::{MediaPipeCapability, TrackingEvent};
    use vision_snake::settings::Settings;
    use vision_snake::sim::{GameEvent, GameStatus};

    /// Game instance holding all state
    struct Game {
        app: App<MediaPipeCapability>,
        board: Option<CanvasRenderingContext2d>,
        board_px: f64,
        /// Last score written to the HUD, to skip redundant DOM writes
        shown_score: Option<u32>,
    }

    impl Game {
        fn new(seed: u64, video: HtmlVideoElement) -> Self {
            let settings = Settings::load();
            Self {
                app: App::new(seed, settings, MediaPipeCapability::new(video)),
                board: None,
                board_px: 0.0,
                shown_score: None,
            }
        }

        /// Feed camera events and run due ticks
        fn update(&mut self, now: f64) {
            for event in self.app.capability().drain_events() {
                match event {
                    TrackingEvent::Started => self.app.camera_started(),
                    TrackingEvent::Failed(err) => self.app.camera_failed(err),
                    TrackingEvent::Frame { results, now_ms } => {
                        self.app.handle_hand_results(&results, now_ms);
                    }
                }
            }

            for event in self.app.advance(now) {
                if let GameEvent::GameOver { score } = event {
                    log::info!("Final score: {}", score);
                }
            }
        }

        /// Draw the board (grid, food, snake)
        fn render(&self, snap: &RenderSnapshot) {
            let Some(ctx) = &self.board else { return };
            let size = self.board_px;
            let cell = size / GRID_SIZE as f64;

            ctx.set_fill_style_str("#111827");
            ctx.fill_rect(0.0, 0.0, size, size);

            // Food
            ctx.set_fill_style_str("#ef4444");
            ctx.begin_path();
            if let Err(e) = ctx.arc(
                (snap.food.x as f64 + 0.5) * cell,
                (snap.food.y as f64 + 0.5) * cell,
                cell * 0.35,
                0.0,
                std::f64::consts::TAU,
            ) {
                log::warn!("Food arc failed: {:?}", e);
            }
            ctx.fill();

            // Snake, head brighter
            for (i, seg) in snap.snake.iter().enumerate() {
                ctx.set_fill_style_str(if i == 0 { "#4ade80" } else { "#16a34a" });
                ctx.fill_rect(
                    (seg.x as f64 + 0.05) * cell,
                    (seg.y as f64 + 0.05) * cell,
                    cell * 0.9,
                    cell * 0.9,
                );
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document, snap: &RenderSnapshot) {
            if self.shown_score != Some(snap.score) {
                set_text(document, "hud-score", &snap.score.to_string());
                set_text(document, "final-score", &snap.score.to_string());
                self.shown_score = Some(snap.score);
            }
            set_text(document, "hud-best", &snap.high_score.to_string());
            set_text(document, "camera-status", snap.camera_message);
            set_text(
                document,
                "gesture-arrow",
                snap.detected_gesture.map(|d| d.arrow()).unwrap_or(""),
            );

            show(document, "start-overlay", snap.status == GameStatus::Idle);
            show(document, "game-over", snap.status == GameStatus::GameOver);
            show(document, "camera-retry", snap.camera_error);

            let (camera_cls, keyboard_cls) = match snap.control_mode {
                ControlMode::Camera => ("mode active", "mode"),
                ControlMode::Keyboard => ("mode", "mode active"),
            };
            if let Some(el) = document.get_element_by_id("mode-camera") {
                let _ = el.set_attribute("class", camera_cls);
            }
            if let Some(el) = document.get_element_by_id("mode-keyboard") {
                let _ = el.set_attribute("class", keyboard_cls);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Vision Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let video: HtmlVideoElement = document
            .get_element_by_id("camera-video")
            .expect("no camera video element")
            .dyn_into()
            .expect("not a video element");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, video)));

        if let Some(canvas) = document
            .get_element_by_id("board")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            let dpr = window.device_pixel_ratio();
            let px = (canvas.client_width().max(canvas.client_height()) as f64 * dpr).max(200.0);
            canvas.set_width(px as u32);
            canvas.set_height(px as u32);
            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
            let mut g = game.borrow_mut();
            g.board = ctx;
            g.board_px = px;
        } else {
            log::warn!("No #board canvas, rendering disabled");
        }

        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_teardown(game.clone());

        request_animation_frame(game);

        log::info!("Vision Snake running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            if g.app.handle_key(&event.key()) {
                event.prevent_default();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                action(&mut game.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        on_click(&document, "start-btn", game.clone(), |g| {
            g.app.start_game(js_sys::Date::now())
        });
        on_click(&document, "restart-btn", game.clone(), |g| {
            g.app.start_game(js_sys::Date::now())
        });
        on_click(&document, "mode-camera", game.clone(), |g| {
            g.app.set_control_mode(ControlMode::Camera);
            g.app.settings().save();
        });
        on_click(&document, "mode-keyboard", game.clone(), |g| {
            g.app.set_control_mode(ControlMode::Keyboard);
            g.app.settings().save();
        });
        on_click(&document, "camera-retry", game, |g| g.app.retry_camera());
    }

    /// Release the camera when the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().app.shutdown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            // Wall clock, same base as the frame timestamps from the camera
            let now = js_sys::Date::now();
            g.update(now);

            let snap = g.app.snapshot();
            g.render(&snap);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document, &snap);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vision Snake (native) starting...");
    log::info!("Native mode has no camera - run with `trunk serve` for the web version");

    // Headless demo: scripted swipes and keys until the snake crashes
    println!("\nRunning headless demo...");
    demo::run_headless();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use vision_snake::app::App;
    use vision_snake::consts::GAME_SPEED_MS;
    use vision_snake::gesture::HandResults;
    use vision_snake::platform::ScriptedCapability;
    use vision_snake::settings::Settings;
    use vision_snake::sim::GameStatus;

    /// Swipe right, then down, then left with the "finger", then hold
    /// the left arrow until the wall
    pub fn run_headless() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1);
        let mut app = App::new(seed, Settings::default(), ScriptedCapability::new());

        let mut now = 0.0;
        app.start_game(now);

        // Raw camera coordinates: x is mirrored relative to the screen
        let strokes: [[(f32, f32); 3]; 3] = [
            [(0.6, 0.5), (0.55, 0.5), (0.5, 0.5)],
            [(0.5, 0.4), (0.5, 0.45), (0.5, 0.5)],
            [(0.4, 0.5), (0.45, 0.5), (0.5, 0.5)],
        ];
        for stroke in strokes {
            for (x, y) in stroke {
                now += 33.0;
                if let Some(d) = app.handle_hand_results(&HandResults::with_fingertip(x, y), now) {
                    println!("  swipe -> {}", d.arrow());
                }
            }
            app.handle_hand_results(&HandResults::empty(), now + 1.0);
            // Let a few ticks pass, also outlasting the gesture cooldown
            for _ in 0..3 {
                now += GAME_SPEED_MS;
                app.advance(now);
            }
            let head = app.state().head();
            println!("  head at ({}, {})", head.x, head.y);
        }

        app.handle_key("ArrowLeft");
        while app.status() == GameStatus::Playing {
            now += GAME_SPEED_MS;
            app.advance(now);
        }

        let snap = app.snapshot();
        println!(
            "✓ Demo finished: score {}, best {}, length {}, camera '{}'",
            snap.score,
            snap.high_score,
            snap.snake.len(),
            snap.camera_message
        );
    }
}
