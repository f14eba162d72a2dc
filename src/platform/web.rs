//! Browser binding
//!
//! HUD lives in the DOM (`#score`, `#lives`, `#message`), the playfield is a
//! 2D canvas, sounds are `<audio>` elements. Input listeners only write into
//! a [`TickInput`]; the animation-frame loop feeds it to the fixed-step
//! simulation and replays the queued events onto [`DomHost`].

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, KeyboardEvent,
    MouseEvent,
};

use crate::config::GameConfig;
use crate::consts::SIM_DT;
use crate::host::{PresentationHost, present};
use crate::sim::{FixedStep, GamePhase, GameplayController, SoundEffect, TickInput, run_frame};

fn js_err(msg: &str) -> JsValue {
    JsValue::from_str(msg)
}

fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xff_ffff)
}

/// DOM-backed presentation
pub struct DomHost {
    document: Document,
    canvas: HtmlCanvasElement,
}

impl DomHost {
    pub fn new(document: Document, canvas: HtmlCanvasElement) -> Self {
        Self { document, canvas }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(&self, id: &str, class: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }
}

impl PresentationHost for DomHost {
    fn set_score(&mut self, score: u64) {
        self.set_text("score", &format!("Score: {}", score));
    }

    fn set_lives(&mut self, lives: u8) {
        self.set_text("lives", &format!("Lives: {}", lives));
    }

    fn show_message(&mut self, text: &str) {
        self.set_text("message", text);
        self.set_class("message", "");
    }

    fn hide_message(&mut self) {
        self.set_class("message", "hidden");
    }

    fn play_sound(&mut self, sound: SoundEffect) {
        let src = format!("assets/{}.wav", sound.name());
        match HtmlAudioElement::new_with_src(&src) {
            Ok(audio) => {
                // Autoplay may be refused before the first click
                let _ = audio.play();
            }
            Err(e) => log::warn!("Failed to create audio for {}: {:?}", src, e),
        }
    }

    fn physics_paused(&mut self, paused: bool) {
        let opacity = if paused { "0.6" } else { "1" };
        let _ = self.canvas.style().set_property("opacity", opacity);
    }
}

/// Browser game instance
struct Game {
    ctrl: GameplayController,
    host: DomHost,
    ctx: CanvasRenderingContext2d,
    clock: FixedStep,
    input: TickInput,
    last_time: f64,
    last_phase: GamePhase,
}

impl Game {
    fn update(&mut self, dt: f32) {
        run_frame(&mut self.ctrl, &mut self.clock, &mut self.input, dt);
        present(self.ctrl.drain_events(), &mut self.host);

        let phase = self.ctrl.phase();
        if phase != self.last_phase {
            if phase.is_terminal() {
                log::info!("Final score: {}", self.ctrl.score());
            }
            self.last_phase = phase;
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let config = self.ctrl.config();
        let state = self.ctrl.state();

        ctx.set_fill_style_str("#111");
        ctx.fill_rect(0.0, 0.0, config.field_width as f64, config.field_height as f64);

        for (_, brick) in state.bricks.iter_active() {
            ctx.set_fill_style_str(&css_color(brick.color()));
            ctx.fill_rect(
                brick.pos.x as f64,
                brick.pos.y as f64,
                brick.size.x as f64,
                brick.size.y as f64,
            );
        }

        ctx.set_fill_style_str("#ffcc00");
        for powerup in state.powerups.iter().filter(|p| p.active) {
            let min = powerup.rect().min();
            let size = powerup.size as f64;
            ctx.fill_rect(min.x as f64, min.y as f64, size, size);
        }

        let paddle = state.paddle.rect();
        let min = paddle.min();
        ctx.set_fill_style_str("#eeeeee");
        ctx.fill_rect(
            min.x as f64,
            min.y as f64,
            paddle.size.x as f64,
            paddle.size.y as f64,
        );

        let ball = &state.ball;
        ctx.begin_path();
        ctx.arc(ball.pos.x as f64, ball.pos.y as f64, ball.radius as f64, 0.0, TAU)?;
        ctx.fill();

        Ok(())
    }

    /// Mouse x in canvas pixels to field x
    fn pointer_to_field(&self, offset_x: f32, client_width: f32) -> f32 {
        if client_width <= 0.0 {
            return offset_x;
        }
        offset_x * self.ctrl.config().field_width / client_width
    }
}

/// Entry point: build the game and start the frame loop
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }

    log::info!("Brick Breaker starting...");

    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let document = window.document().ok_or_else(|| js_err("no document"))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or_else(|| js_err("no canvas"))?
        .dyn_into()?;

    let config = GameConfig::load();
    // Write back so the effective config can be tweaked from devtools
    config.save();
    canvas.set_width(config.field_width as u32);
    canvas.set_height(config.field_height as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| js_err("no 2d context"))?
        .dyn_into()?;

    let seed = js_sys::Date::now() as u64;
    let ctrl = GameplayController::try_new(config, seed)
        .map_err(|e| js_err(&format!("invalid config: {}", e)))?;
    log::info!("Game initialized with seed: {}", seed);

    let last_phase = ctrl.phase();
    let game = Rc::new(RefCell::new(Game {
        ctrl,
        host: DomHost::new(document.clone(), canvas.clone()),
        ctx,
        clock: FixedStep::new(),
        input: TickInput::default(),
        last_time: 0.0,
        last_phase,
    }));

    {
        let mut g = game.borrow_mut();
        let events = g.ctrl.drain_events();
        present(events, &mut g.host);
    }

    setup_input_handlers(&canvas, game.clone())?;
    setup_auto_pause(game.clone())?;

    if let Some(loading) = document.get_element_by_id("loading") {
        let _ = loading.set_attribute("class", "hidden");
    }

    request_animation_frame(game)?;

    log::info!("Brick Breaker running!");
    Ok(())
}

fn setup_input_handlers(
    canvas: &HtmlCanvasElement,
    game: Rc<RefCell<Game>>,
) -> Result<(), JsValue> {
    // Mouse move
    {
        let game = game.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut g = game.borrow_mut();
            let client_width = canvas_clone.client_width() as f32;
            let x = g.pointer_to_field(event.offset_x() as f32, client_width);
            g.input.pointer_x = Some(x);
        });
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Mouse click - serve or restart
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().input.action = true;
        });
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;

    // Keyboard down
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" => g.input.left = true,
                "ArrowRight" => g.input.right = true,
                " " => {
                    event.prevent_default();
                    if !event.repeat() {
                        g.input.action = true;
                    }
                }
                "p" | "P" | "Escape" => {
                    if !event.repeat() {
                        g.input.pause = true;
                    }
                }
                "a" | "A" => {
                    g.input.autopilot = !g.input.autopilot;
                    log::info!("Autopilot: {}", g.input.autopilot);
                }
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard up
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" => g.input.left = false,
                "ArrowRight" => g.input.right = false,
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Pause when the window loses focus mid-rally
fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let mut g = game.borrow_mut();
        if g.ctrl.phase() == GamePhase::InPlay && !g.ctrl.is_paused() {
            g.input.pause = true;
            g.input.left = false;
            g.input.right = false;
        }
    });
    window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn request_animation_frame(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
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

        g.update(dt);
        if let Err(e) = g.render() {
            log::warn!("Render error: {:?}", e);
        }
    }

    if let Err(e) = request_animation_frame(game) {
        log::error!("Failed to schedule frame: {:?}", e);
    }
}
