//! Neon Night Market entry point
//!
//! The browser build wires the canvas, DOM and input to the loop driver. The
//! native build runs a headless session with an autopilot and prints a
//! summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use neon_market::commentary;
    use neon_market::renderer::{RenderState, Tessellator};
    use neon_market::session::CommentaryRequest;
    use neon_market::sim::GameEvent;
    use neon_market::{Difficulty, FrameTicket, LoopDriver, Session, SessionStatus, Settings};

    /// Game instance holding all state
    struct Game {
        driver: LoopDriver,
        session: Session,
        settings: Settings,
        render_state: Option<RenderState>,
        tessellator: Tessellator,
    }

    impl Game {
        fn new(viewport: Vec2, settings: Settings) -> Self {
            let segments = settings.circle_segments();
            Self {
                driver: LoopDriver::new(viewport),
                session: Session::new(),
                settings,
                render_state: None,
                tessellator: Tessellator::new(viewport, segments),
            }
        }

        /// Redeem a frame ticket and present the result
        fn frame(&mut self, ticket: FrameTicket) -> Vec<GameEvent> {
            let viewport = self.driver.bounds();
            self.tessellator
                .begin(viewport, self.settings.circle_segments());
            let events = self
                .driver
                .run_frame(ticket, &self.settings, &mut self.tessellator);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.tessellator.vertices(), viewport) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            events
        }

        /// Feed events to the session; returns a commentary request on game over
        fn apply(&mut self, events: Vec<GameEvent>) -> Option<CommentaryRequest> {
            match self.session.apply_all(events) {
                Ok(request) => {
                    if request.is_some() {
                        self.sync_driver();
                    }
                    request
                }
                Err(e) => {
                    log::warn!("{e}");
                    None
                }
            }
        }

        fn sync_driver(&mut self) -> Vec<GameEvent> {
            let seed = js_sys::Date::now() as u64;
            self.driver
                .sync(self.session.status(), self.session.difficulty(), seed)
        }

        fn start(&mut self, difficulty: Difficulty) -> bool {
            if let Err(e) = self.session.start(difficulty) {
                log::warn!("{e}");
                return false;
            }
            let events = self.sync_driver();
            self.apply(events);
            true
        }

        fn restart(&mut self) {
            if let Err(e) = self.session.restart() {
                log::warn!("{e}");
                return;
            }
            self.sync_driver();
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Mirror the session into the page
    fn update_hud(session: &Session) {
        let Some(document) = document() else { return };
        let hud = session.hud();
        let status = session.status();

        set_visible(&document, "start-menu", status == SessionStatus::Start);
        set_visible(&document, "hud", status == SessionStatus::Playing);
        set_visible(&document, "game-over", status == SessionStatus::GameOver);

        set_text(&document, "hud-score", &hud.score.to_string());
        set_text(&document, "hud-lives", &"♥".repeat(hud.lives as usize));
        set_text(&document, "hud-stability", &format!("{}%", hud.stability_percent()));
        set_text(&document, "hud-difficulty", hud.difficulty_label());
        set_text(&document, "final-score", &hud.score.to_string());
        let line = match hud.commentary.as_deref() {
            Some(text) => format!("\"{text}\""),
            None => "Consulting the vendors...".to_string(),
        };
        set_text(&document, "commentary", &line);
    }

    /// Canvas size in CSS pixels and backing pixels
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (Vec2, (u32, u32)) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(0);
        let client_h = canvas.client_height().max(0);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Vec2::new(client_w as f32, client_h as f32), (width, height))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Night Market starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (viewport, (width, height)) = fit_canvas(&canvas);
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(viewport, settings)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_difficulty_buttons(&document, game.clone());
        setup_restart_button(&document, game.clone());
        setup_resize(canvas, game.clone());

        update_hud(&game.borrow().session);
        log::info!("Neon Night Market ready");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        for (kind, held) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let handled = game.borrow_mut().driver.handle_key(&event.key(), held);
                if handled {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_difficulty_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let Ok(buttons) = document.query_selector_all("[data-difficulty]") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(difficulty) = button
                .get_attribute("data-difficulty")
                .and_then(|d| Difficulty::from_str(&d))
            else {
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let started = game.borrow_mut().start(difficulty);
                update_hud(&game.borrow().session);
                if started {
                    request_animation_frame(game.clone());
                }
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.restart();
                update_hud(&g.session);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (viewport, (width, height)) = fit_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.driver.resize(viewport);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_commentary(game: Rc<RefCell<Game>>, request: CommentaryRequest) {
        let settings = game.borrow().settings.commentary.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result =
                commentary::fetch_commentary(&settings, request.score, request.difficulty).await;
            let mut g = game.borrow_mut();
            if g.session.resolve_commentary(request.token, result) {
                update_hud(&g.session);
            }
        });
    }

    /// Schedule the next display frame if the driver grants a ticket
    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(ticket) = game.borrow_mut().driver.schedule() else {
            return;
        };
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, ticket);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let request = {
            let mut g = game.borrow_mut();
            let events = g.frame(ticket);
            let request = g.apply(events);
            update_hud(&g.session);
            request
        };

        if let Some(request) = request {
            request_commentary(game.clone(), request);
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use neon_market::commentary::CommentaryError;
    use neon_market::renderer::Tessellator;
    use neon_market::sim::{FrameState, TickInput};
    use neon_market::{Difficulty, LoopDriver, Session, Settings};

    /// Native viewport
    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    /// Enemies closer than this make the autopilot back off
    const DANGER_RADIUS: f32 = 160.0;

    /// Fire constantly, line up under the nearest enemy, back away when close
    pub fn autopilot(frame: &FrameState) -> TickInput {
        let me = frame.player.pos;
        let mut input = TickInput {
            fire: true,
            ..TickInput::default()
        };
        let Some(nearest) = frame
            .enemies
            .iter()
            .min_by(|a, b| me.distance(a.pos).total_cmp(&me.distance(b.pos)))
        else {
            return input;
        };

        let delta = nearest.pos - me;
        if delta.length() < DANGER_RADIUS {
            input.left = delta.x > 0.0;
            input.right = delta.x <= 0.0;
            input.up = delta.y > 0.0;
            input.down = delta.y <= 0.0;
        } else if delta.x.abs() > 8.0 {
            input.left = delta.x < 0.0;
            input.right = delta.x > 0.0;
        }
        input
    }

    pub struct Summary {
        pub score: u64,
        pub frames: u64,
        pub lives: u8,
        pub commentary: String,
        pub vertices: usize,
    }

    pub fn run(difficulty: Difficulty, seed: u64) -> Summary {
        let settings = Settings::load();
        let mut session = Session::new();
        let mut driver = LoopDriver::new(VIEWPORT);
        let mut surface = Tessellator::new(VIEWPORT, settings.circle_segments());

        if let Err(e) = session.start(difficulty) {
            log::warn!("{e}");
        }
        let initial = driver.sync(session.status(), difficulty, seed);
        if let Err(e) = session.apply_all(initial) {
            log::warn!("{e}");
        }

        let mut frames = 0;
        let mut vertices = 0;
        while frames < MAX_FRAMES {
            let Some(ticket) = driver.schedule() else { break };
            if let Some(frame) = driver.frame() {
                let input = autopilot(frame);
                driver.set_input(input);
            }
            surface.begin(VIEWPORT, settings.circle_segments());
            let events = driver.run_frame(ticket, &settings, &mut surface);
            vertices = surface.vertices().len();
            frames += 1;

            match session.apply_all(events) {
                Ok(Some(request)) => {
                    driver.sync(session.status(), difficulty, seed);
                    // No HTTP client here; the session substitutes the fallback line
                    let unavailable =
                        CommentaryError::Transport("native build has no HTTP client".into());
                    session.resolve_commentary(request.token, Err(unavailable));
                }
                Ok(None) => {}
                Err(e) => log::warn!("{e}"),
            }

            if frames % 600 == 0 {
                let hud = session.hud();
                log::info!(
                    "frame {frames}: score {} lives {} stability {}%",
                    hud.score,
                    hud.lives,
                    hud.stability_percent()
                );
            }
        }
        driver.unmount();

        let hud = session.hud();
        Summary {
            score: hud.score,
            frames,
            lives: hud.lives,
            commentary: hud.commentary.clone().unwrap_or_default(),
            vertices,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_market::{Difficulty, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        None => Settings::load().default_difficulty,
        Some(arg) => match Difficulty::from_str(&arg) {
            Some(d) => d,
            None => {
                eprintln!("usage: neon-market [easy|normal|hard] [seed]");
                std::process::exit(2);
            }
        },
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64),
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            eprintln!("invalid seed: {e}");
            std::process::exit(2);
        }
    };

    log::info!("Neon Night Market (headless) on {} with seed {seed}", difficulty.as_str());
    let summary = headless::run(difficulty, seed);

    println!("\nNeon Night Market - {} ({seed})", difficulty.as_str());
    println!("  frames played : {}", summary.frames);
    println!("  final score   : {}", summary.score);
    println!("  lives left    : {}", summary.lives);
    println!("  last frame    : {} vertices", summary.vertices);
    println!("  vendor says   : \"{}\"", summary.commentary);
}
