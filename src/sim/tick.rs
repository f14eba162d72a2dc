//! Frame driving
//!
//! Turns one frame's worth of input into controller calls and advances the
//! simulation with a fixed timestep.

use super::controller::{GameplayController, InputEvent, Key};
use super::state::GamePhase;
use crate::consts::*;

/// Input gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in field coordinates, set when the mouse moved this frame
    pub pointer_x: Option<f32>,
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Serve/restart (click/tap/space)
    pub action: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

impl TickInput {
    /// Clear one-shot inputs after they have been processed
    pub fn clear_one_shots(&mut self) {
        self.pointer_x = None;
        self.action = false;
        self.pause = false;
    }
}

/// Advance the controller by one timestep using `input`
pub fn tick(ctrl: &mut GameplayController, input: &TickInput, dt: f32) {
    let mut input = input.clone();
    if input.autopilot {
        autopilot(ctrl, &mut input);
    }

    if input.pause {
        ctrl.handle_input(InputEvent::KeyDown(Key::Pause));
    }
    if let Some(x) = input.pointer_x {
        ctrl.handle_input(InputEvent::PointerMove { x });
    }
    for (held, key) in [(input.left, Key::Left), (input.right, Key::Right)] {
        let event = if held {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        };
        ctrl.handle_input(event);
    }
    if input.action {
        ctrl.handle_input(InputEvent::PointerDown);
    }

    ctrl.step(dt);
}

/// Steer the paddle under the ball and press the button when waiting
fn autopilot(ctrl: &GameplayController, input: &mut TickInput) {
    let state = ctrl.state();

    match state.phase {
        GamePhase::ReadyToServe | GamePhase::Won | GamePhase::GameOver => input.action = true,
        GamePhase::InPlay | GamePhase::LifeLost => {}
    }

    // Track the ball with some offset to avoid perfect vertical loops
    let ball = &state.ball;
    let wobble = (ball.pos.y * 0.05).sin() * state.paddle.width * 0.3;
    let target = ball.pos.x + wobble;

    if ctrl.config().control.uses_pointer() {
        input.pointer_x = Some(target);
    } else {
        let dead_zone = state.paddle.width * 0.1;
        input.left = target < state.paddle.x - dead_zone;
        input.right = target > state.paddle.x + dead_zone;
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time; returns how many `SIM_DT` ticks to run
    ///
    /// Long frames are capped so a stalled tab doesn't trigger a catch-up storm.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Leftover time as a fraction of a tick (for interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }
}

/// Run one rendered frame: as many fixed ticks as the elapsed time allows.
/// One-shot inputs are consumed by the first tick.
pub fn run_frame(
    ctrl: &mut GameplayController,
    clock: &mut FixedStep,
    input: &mut TickInput,
    frame_dt: f32,
) -> u32 {
    let steps = clock.advance(frame_dt);
    for _ in 0..steps {
        tick(ctrl, input, SIM_DT);
        input.clear_one_shots();
    }
    steps
}
