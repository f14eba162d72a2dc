//! Gameplay controller
//!
//! Owns the session: score, lives, phase, entities and the rules that move
//! between phases. Hosts call into it (`handle_input`, `step`, the `on_*`
//! collision handlers) and drain the events it queues for presentation.
//!
//! Every handler checks the current phase before acting, so a stale or
//! duplicated callback is a no-op rather than a bug.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Wall, ball_below_field};
use super::events::{GameEvent, Message, SoundEffect};
use super::physics::{self, Contact};
use super::rules;
use super::state::{GamePhase, GameState, PowerUp};
use crate::config::{ConfigError, GameConfig, SpeedPolicy};

/// Keys the core understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Serve / restart
    Space,
    Pause,
}

/// Discrete input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown,
    PointerMove { x: f32 },
    KeyDown(Key),
    KeyUp(Key),
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
}

/// The single authority over gameplay state
#[derive(Debug, Clone)]
pub struct GameplayController {
    config: GameConfig,
    state: GameState,
    seed: u64,
    rng: Pcg32,
    keys: HeldKeys,
    /// Latest pointer x, applied on the next step
    pointer_target: Option<f32>,
    /// Last pointer x seen; a repeat is not a move
    last_pointer_x: Option<f32>,
    paused: bool,
    /// Seconds left in LifeLost
    life_lost_timer: f32,
    /// Overlay currently shown, restored after unpausing
    message: Option<Message>,
    events: Vec<GameEvent>,
}

impl GameplayController {
    /// Start a session. The config is assumed valid; see [`Self::try_new`].
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let state = GameState::new(&config);
        let mut controller = Self {
            state,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            keys: HeldKeys::default(),
            pointer_target: None,
            last_pointer_x: None,
            paused: false,
            life_lost_timer: 0.0,
            message: None,
            events: Vec::new(),
            config,
        };

        controller.events.push(GameEvent::ScoreChanged(0));
        controller
            .events
            .push(GameEvent::LivesChanged(controller.state.lives));
        controller.show_message(Message::ClickToStart);

        log::info!(
            "New session (seed {}): {} bricks, {} lives",
            seed,
            controller.state.bricks.len(),
            controller.state.lives
        );
        controller
    }

    /// Validate the config, then start a session
    pub fn try_new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that integrate bodies themselves
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn message(&self) -> Option<Message> {
        self.message
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- INPUT ---

    /// The one persistent input listener; dispatches on the current phase
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown | InputEvent::KeyDown(Key::Space) => {
                self.primary_action();
            }
            InputEvent::PointerMove { x } => {
                if self.config.control.uses_pointer() && self.last_pointer_x != Some(x) {
                    self.last_pointer_x = Some(x);
                    self.pointer_target = Some(x);
                }
            }
            InputEvent::KeyDown(Key::Left) => self.keys.left = true,
            InputEvent::KeyDown(Key::Right) => self.keys.right = true,
            InputEvent::KeyUp(Key::Left) => self.keys.left = false,
            InputEvent::KeyUp(Key::Right) => self.keys.right = false,
            InputEvent::KeyDown(Key::Pause) => {
                self.toggle_pause();
            }
            InputEvent::KeyUp(Key::Space | Key::Pause) => {}
        }
    }

    /// Serve when ready, restart when finished, otherwise nothing.
    /// Returns whether the press did anything.
    pub fn primary_action(&mut self) -> bool {
        match self.state.phase {
            GamePhase::ReadyToServe => self.serve(),
            GamePhase::Won | GamePhase::GameOver => self.restart(),
            GamePhase::InPlay | GamePhase::LifeLost => false,
        }
    }

    /// Launch the ball. Only honoured in ReadyToServe.
    pub fn serve(&mut self) -> bool {
        if self.state.phase != GamePhase::ReadyToServe || self.paused {
            return false;
        }
        let vel = self.config.serve_velocity();
        self.state.ball.launch(vel);
        self.set_phase(GamePhase::InPlay);
        self.hide_message();
        true
    }

    /// Start over. Only honoured in Won/GameOver.
    pub fn restart(&mut self) -> bool {
        if !self.state.phase.is_terminal() {
            return false;
        }
        self.set_phase(GamePhase::ReadyToServe);
        self.state.reset(&self.config);
        self.keys = HeldKeys::default();
        self.pointer_target = None;
        self.last_pointer_x = None;
        self.paused = false;
        self.life_lost_timer = 0.0;

        self.events.push(GameEvent::ScoreChanged(self.state.score));
        self.events.push(GameEvent::LivesChanged(self.state.lives));
        self.show_message(Message::ClickToStart);
        self.events.push(GameEvent::PhysicsResumed);
        log::info!("Game restarted");
        true
    }

    /// Freeze/unfreeze the simulation. Only while serving or playing.
    pub fn toggle_pause(&mut self) -> bool {
        if !matches!(self.state.phase, GamePhase::ReadyToServe | GamePhase::InPlay) {
            return false;
        }
        self.paused = !self.paused;
        if self.paused {
            let previous = self.message;
            self.show_message(Message::Paused);
            self.message = previous;
            self.events.push(GameEvent::PhysicsPaused);
        } else {
            match self.message {
                Some(message) => self.events.push(GameEvent::ShowMessage(message)),
                None => self.events.push(GameEvent::HideMessage),
            }
            self.events.push(GameEvent::PhysicsResumed);
        }
        log::info!("Paused: {}", self.paused);
        true
    }

    // --- FRAME ---

    /// One authoritative update pass: paddle, physics and contacts, then the
    /// exit check, then phase timers
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        self.update_paddle(dt);

        match self.state.phase {
            GamePhase::ReadyToServe => {
                self.state.ball.follow(&self.state.paddle);
            }
            GamePhase::InPlay => {
                self.shrink_paddle(dt);
                let contacts = physics::step(
                    &mut self.state,
                    self.config.field_width,
                    self.config.field_height,
                    dt,
                );
                for contact in contacts {
                    self.on_contact(contact);
                }
                self.check_ball_exit();
            }
            GamePhase::LifeLost => {
                self.life_lost_timer -= dt;
                if self.life_lost_timer <= 0.0 {
                    self.respawn();
                }
            }
            GamePhase::Won | GamePhase::GameOver => {}
        }
    }

    fn update_paddle(&mut self, dt: f32) {
        let field_width = self.config.field_width;

        if let Some(x) = self.pointer_target.take() {
            self.state.paddle.set_x(x, field_width);
        }

        if self.config.control.uses_keys() {
            let dir = self.keys.right as i32 - self.keys.left as i32;
            if dir != 0 {
                let x = self.state.paddle.x + dir as f32 * self.config.paddle_key_speed * dt;
                self.state.paddle.set_x(x, field_width);
            }
        }
    }

    /// Continuous paddle shrink while the ball is in play
    fn shrink_paddle(&mut self, dt: f32) {
        let Some(powerups) = &self.config.powerups else {
            return;
        };
        let paddle = &mut self.state.paddle;
        if paddle.width > powerups.min_width {
            paddle.width = (paddle.width - powerups.shrink_rate * dt).max(powerups.min_width);
            paddle.set_x(paddle.x, self.config.field_width);
        }
    }

    // --- COLLISION HANDLERS ---

    /// Route a physics contact to its handler
    pub fn on_contact(&mut self, contact: Contact) {
        match contact {
            Contact::BallBrick(index) => {
                self.on_ball_brick(index);
            }
            Contact::BallPaddle => {
                self.on_ball_paddle();
            }
            Contact::BallWall(wall) => self.on_ball_wall(wall),
            Contact::PaddlePowerUp(index) => {
                self.on_paddle_powerup(index);
            }
        }
    }

    /// Ball hit a brick: destroy it, score, maybe drop a power-up, maybe win.
    /// Returns false when ignored (wrong phase or brick already gone).
    pub fn on_ball_brick(&mut self, index: usize) -> bool {
        if self.state.phase != GamePhase::InPlay || !self.state.bricks.deactivate(index) {
            return false;
        }

        let brick = &self.state.bricks.bricks[index];
        let (row, center) = (brick.row, brick.center());
        let points = rules::brick_points(
            row,
            self.state.bricks.rows,
            self.config.points_per_brick,
            self.config.row_bonus,
        );
        self.state.score = self.state.score.saturating_add(points);

        self.events.push(GameEvent::BrickDestroyed { index });
        self.events.push(GameEvent::ScoreChanged(self.state.score));
        self.events.push(GameEvent::Sound(SoundEffect::BrickHit));

        if self.config.speed_policy == SpeedPolicy::RampOnBrickHit {
            self.state.ball.vel = rules::ramp_speed(
                self.state.ball.vel,
                self.config.speed_ramp,
                self.config.max_speed,
            );
        }

        self.maybe_spawn_powerup(center);

        log::debug!(
            "Brick {} destroyed (+{}), {} left",
            index,
            points,
            self.state.bricks.active_count()
        );

        if self.state.bricks.is_cleared() {
            self.win();
        }
        true
    }

    /// Ball hit the paddle: reshape its outgoing velocity
    pub fn on_ball_paddle(&mut self) -> bool {
        if self.state.phase != GamePhase::InPlay {
            return false;
        }
        self.events.push(GameEvent::Sound(SoundEffect::PaddleHit));

        let mut vel = rules::paddle_bounce(
            &self.state.ball,
            &self.state.paddle,
            self.config.bounce,
            self.config.initial_speed(),
            self.config.max_speed,
            &mut self.rng,
        );
        if self.config.speed_policy == SpeedPolicy::RampOnPaddleHit {
            vel = rules::ramp_speed(vel, self.config.speed_ramp, self.config.max_speed);
        }
        self.state.ball.vel = vel;
        true
    }

    /// Ball bounced off a wall; the reflection already happened
    pub fn on_ball_wall(&mut self, wall: Wall) {
        if self.state.phase != GamePhase::InPlay {
            return;
        }
        log::debug!("Wall bounce: {:?}", wall);
        if self.config.wall_sound {
            self.events.push(GameEvent::Sound(SoundEffect::WallHit));
        }
    }

    /// Paddle caught a power-up: restore the paddle's full width
    pub fn on_paddle_powerup(&mut self, index: usize) -> bool {
        if self.state.phase != GamePhase::InPlay {
            return false;
        }
        match self.state.powerups.get_mut(index) {
            Some(powerup) if powerup.active => powerup.active = false,
            _ => return false,
        }

        let paddle = &mut self.state.paddle;
        paddle.width = paddle.base_width;
        paddle.set_x(paddle.x, self.config.field_width);

        self.events.push(GameEvent::PowerUpCollected);
        self.events.push(GameEvent::Sound(SoundEffect::PowerUp));
        true
    }

    fn maybe_spawn_powerup(&mut self, at: Vec2) {
        let Some(powerups) = &self.config.powerups else {
            return;
        };
        if self.rng.random::<f32>() >= powerups.spawn_chance {
            return;
        }
        self.state.powerups.push(PowerUp {
            pos: at,
            vel: Vec2::new(0.0, powerups.fall_speed),
            size: powerups.size,
            active: true,
        });
        let index = self.state.powerups.len() - 1;
        self.events.push(GameEvent::PowerUpSpawned { index });
    }

    // --- PHASE TRANSITIONS ---

    /// Ball left through the bottom: fires once, guarded by phase
    pub fn check_ball_exit(&mut self) -> bool {
        if self.state.phase != GamePhase::InPlay
            || !ball_below_field(self.state.ball.pos, self.config.field_height)
        {
            return false;
        }
        self.lose_life();
        true
    }

    fn lose_life(&mut self) {
        self.state.lives = self.state.lives.saturating_sub(1);
        self.events.push(GameEvent::LivesChanged(self.state.lives));
        self.events.push(GameEvent::Sound(SoundEffect::LifeLost));
        self.set_phase(GamePhase::LifeLost);

        if self.state.lives == 0 {
            self.game_over();
        } else if self.config.life_lost_delay > 0.0 {
            self.life_lost_timer = self.config.life_lost_delay;
        } else {
            self.respawn();
        }
    }

    /// Ball back on the paddle for the next serve
    fn respawn(&mut self) {
        self.life_lost_timer = 0.0;
        self.state.powerups.clear();
        self.state.ball.attach(&self.state.paddle);
        self.set_phase(GamePhase::ReadyToServe);
    }

    fn game_over(&mut self) {
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::Sound(SoundEffect::GameOver));
        self.show_message(Message::GameOver);
        self.events.push(GameEvent::PhysicsPaused);
        log::info!("Game over with score {}", self.state.score);
    }

    fn win(&mut self) {
        self.set_phase(GamePhase::Won);
        self.events.push(GameEvent::Sound(SoundEffect::Win));
        self.show_message(Message::YouWin);
        self.events.push(GameEvent::PhysicsPaused);
        log::info!("🏆 Field cleared with score {}", self.state.score);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
        log::info!("Phase {:?} -> {:?}", from, to);
    }

    fn show_message(&mut self, message: Message) {
        self.message = Some(message);
        self.events.push(GameEvent::ShowMessage(message));
    }

    fn hide_message(&mut self) {
        self.message = None;
        self.events.push(GameEvent::HideMessage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BounceModel, BrickLayout, ControlScheme, PowerUpConfig, Preset};
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn controller() -> GameplayController {
        GameplayController::new(GameConfig::default(), 42)
    }

    /// Drop the ball below the field and run one frame
    fn drop_ball(ctrl: &mut GameplayController) {
        ctrl.state_mut().ball.pos.y = 700.0;
        ctrl.step(SIM_DT);
    }

    #[test]
    fn test_initial_state_and_events() {
        let mut ctrl = controller();
        assert_eq!(ctrl.score(), 0);
        assert_eq!(ctrl.lives(), 3);
        assert_eq!(ctrl.phase(), GamePhase::ReadyToServe);
        assert_eq!(
            ctrl.drain_events(),
            vec![
                GameEvent::ScoreChanged(0),
                GameEvent::LivesChanged(3),
                GameEvent::ShowMessage(Message::ClickToStart),
            ]
        );
        assert!(ctrl.events().is_empty());
    }

    #[test]
    fn test_example_scenario() {
        let mut ctrl = controller();
        let initial = ctrl.state().bricks.active_count();

        assert!(ctrl.serve());
        assert_eq!(ctrl.state().ball.vel, Vec2::new(-75.0, -300.0));
        assert_eq!(ctrl.phase(), GamePhase::InPlay);

        for index in 0..5 {
            assert!(ctrl.on_ball_brick(index));
        }
        assert_eq!(ctrl.score(), 50);
        assert_eq!(ctrl.state().bricks.active_count(), initial - 5);

        drop_ball(&mut ctrl);
        assert_eq!(ctrl.lives(), 2);
        assert_eq!(ctrl.phase(), GamePhase::ReadyToServe);

        for _ in 0..2 {
            assert!(ctrl.serve());
            drop_ball(&mut ctrl);
        }
        assert_eq!(ctrl.lives(), 0);
        assert_eq!(ctrl.phase(), GamePhase::GameOver);

        ctrl.handle_input(InputEvent::PointerDown);
        assert_eq!(ctrl.score(), 0);
        assert_eq!(ctrl.lives(), 3);
        assert_eq!(ctrl.phase(), GamePhase::ReadyToServe);
        assert_eq!(ctrl.state().bricks.active_count(), initial);
        assert!(!ctrl.state().ball.served);
    }

    #[test]
    fn test_double_serve_is_noop() {
        let mut ctrl = controller();
        assert!(ctrl.serve());
        ctrl.state_mut().ball.vel = Vec2::new(12.0, -34.0);
        assert!(!ctrl.serve());
        ctrl.handle_input(InputEvent::KeyDown(Key::Space));
        assert_eq!(ctrl.state().ball.vel, Vec2::new(12.0, -34.0));
    }

    #[test]
    fn test_restart_ignored_outside_terminal_phases() {
        let mut ctrl = controller();
        assert!(!ctrl.restart());
        ctrl.serve();
        ctrl.on_ball_brick(0);
        assert!(!ctrl.restart());
        assert_eq!(ctrl.score(), 10);
        assert_eq!(ctrl.phase(), GamePhase::InPlay);
    }

    #[test]
    fn test_one_press_one_action() {
        let mut ctrl = controller();
        for _ in 0..3 {
            ctrl.serve();
            drop_ball(&mut ctrl);
        }
        assert_eq!(ctrl.phase(), GamePhase::GameOver);

        // A single press restarts; it must not also serve
        ctrl.handle_input(InputEvent::PointerDown);
        assert_eq!(ctrl.phase(), GamePhase::ReadyToServe);
        assert!(!ctrl.state().ball.served);
        assert_eq!(ctrl.state().ball.vel, Vec2::ZERO);

        ctrl.handle_input(InputEvent::PointerDown);
        assert_eq!(ctrl.phase(), GamePhase::InPlay);
    }

    #[test]
    fn test_life_lost_fires_once_per_exit() {
        let mut config = GameConfig::default();
        config.life_lost_delay = 0.5;
        let mut ctrl = GameplayController::new(config, 1);
        ctrl.serve();
        drop_ball(&mut ctrl);
        assert_eq!(ctrl.lives(), 2);
        assert_eq!(ctrl.phase(), GamePhase::LifeLost);

        // Ball is still below the field for a while; no further loss
        for _ in 0..30 {
            ctrl.step(SIM_DT);
        }
        assert_eq!(ctrl.lives(), 2);
        assert_eq!(ctrl.phase(), GamePhase::LifeLost);
        // Serve is not honoured during the delay
        assert!(!ctrl.serve());

        for _ in 0..40 {
            ctrl.step(SIM_DT);
        }
        assert_eq!(ctrl.phase(), GamePhase::ReadyToServe);
        assert_eq!(ctrl.lives(), 2);
        assert!(!ctrl.state().ball.served);
    }

    #[test]
    fn test_no_life_lost_when_not_in_play() {
        let mut ctrl = controller();
        drop_ball(&mut ctrl);
        assert_eq!(ctrl.lives(), 3);
        // Ball snapped back onto the paddle
        assert!(ctrl.state().ball.pos.y < 600.0);
        assert!(!ctrl.check_ball_exit());
    }

    #[test]
    fn test_last_life_goes_to_game_over_at_zero() {
        let mut config = GameConfig::default();
        config.initial_lives = 1;
        let mut ctrl = GameplayController::new(config, 1);
        ctrl.serve();
        let frozen_at = Vec2::new(123.0, 700.0);
        ctrl.state_mut().ball.pos = frozen_at;
        ctrl.drain_events();
        assert!(ctrl.check_ball_exit());
        assert_eq!(ctrl.lives(), 0);
        assert_eq!(ctrl.phase(), GamePhase::GameOver);
        let events = ctrl.drain_events();
        assert!(events.contains(&GameEvent::ShowMessage(Message::GameOver)));
        assert!(events.contains(&GameEvent::PhysicsPaused));

        // Frozen: nothing moves, nothing more is lost
        ctrl.step(SIM_DT);
        assert_eq!(ctrl.state().ball.pos, frozen_at);
        assert!(!ctrl.check_ball_exit());
        assert_eq!(ctrl.lives(), 0);
    }

    #[test]
    fn test_win_when_last_brick_destroyed() {
        let mut config = GameConfig::default();
        config.bricks = BrickLayout {
            rows: 1,
            cols: 2,
            ..Default::default()
        };
        let mut ctrl = GameplayController::new(config, 1);
        ctrl.serve();
        assert!(ctrl.on_ball_brick(0));
        assert_eq!(ctrl.phase(), GamePhase::InPlay);
        assert!(!ctrl.on_ball_brick(0));

        ctrl.drain_events();
        assert!(ctrl.on_ball_brick(1));
        assert_eq!(ctrl.phase(), GamePhase::Won);
        let events = ctrl.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Win)));
        assert!(events.contains(&GameEvent::ShowMessage(Message::YouWin)));

        // Terminal: further contacts and exits are ignored
        assert!(!ctrl.on_ball_paddle());
        drop_ball(&mut ctrl);
        assert_eq!(ctrl.lives(), 3);

        assert!(ctrl.restart());
        assert_eq!(ctrl.state().bricks.active_count(), 2);
    }

    #[test]
    fn test_pointer_moves_are_clamped() {
        let mut ctrl = controller();
        ctrl.handle_input(InputEvent::PointerMove { x: -500.0 });
        ctrl.step(SIM_DT);
        assert_eq!(ctrl.state().paddle.x, 50.0);
        // Ball on the paddle follows it
        assert_eq!(ctrl.state().ball.pos.x, 50.0);

        ctrl.handle_input(InputEvent::PointerMove { x: 5000.0 });
        ctrl.step(SIM_DT);
        assert_eq!(ctrl.state().paddle.x, 750.0);
    }

    #[test]
    fn test_keyboard_control_is_clamped() {
        let mut config = GameConfig::default();
        config.control = ControlScheme::Keyboard;
        let mut ctrl = GameplayController::new(config, 1);

        // Pointer ignored under keyboard control
        ctrl.handle_input(InputEvent::PointerMove { x: 100.0 });
        ctrl.step(SIM_DT);
        assert_eq!(ctrl.state().paddle.x, 400.0);

        ctrl.handle_input(InputEvent::KeyDown(Key::Right));
        for _ in 0..240 {
            ctrl.step(SIM_DT);
        }
        assert_eq!(ctrl.state().paddle.x, 750.0);

        ctrl.handle_input(InputEvent::KeyUp(Key::Right));
        ctrl.step(SIM_DT);
        assert_eq!(ctrl.state().paddle.x, 750.0);
    }

    #[test]
    fn test_center_paddle_hit_gets_horizontal_kick() {
        let mut ctrl = controller();
        ctrl.serve();
        let paddle_x = ctrl.state().paddle.x;
        let ball = &mut ctrl.state_mut().ball;
        ball.pos.x = paddle_x;
        ball.vel = Vec2::new(0.0, -300.0);
        assert!(ctrl.on_ball_paddle());
        let vel = ctrl.state().ball.vel;
        assert!(vel.x > 0.0 && vel.x < 10.0);
        assert_eq!(vel.y, -300.0);
    }

    #[test]
    fn test_angle_range_bounce_with_paddle_ramp() {
        let mut config = GameConfig::from_preset(Preset::Arcade);
        config.max_speed = 400.0;
        let mut ctrl = GameplayController::new(config, 9);
        ctrl.serve();
        let paddle_x = ctrl.state().paddle.x;
        for _ in 0..20 {
            let ball = &mut ctrl.state_mut().ball;
            ball.pos.x = paddle_x - 25.0;
            ctrl.on_ball_paddle();
        }
        let vel = ctrl.state().ball.vel;
        assert!((vel.length() - 400.0).abs() < 0.01);
        assert!(vel.x < 0.0 && vel.y < 0.0);
    }

    #[test]
    fn test_brick_ramp_policy() {
        let mut config = GameConfig::default();
        config.speed_policy = SpeedPolicy::RampOnBrickHit;
        config.speed_ramp = 1.5;
        config.max_speed = 400.0;
        let mut ctrl = GameplayController::new(config, 1);
        ctrl.serve();
        let start = ctrl.state().ball.speed();
        ctrl.on_ball_brick(0);
        assert!(ctrl.state().ball.speed() > start);
        ctrl.on_ball_brick(1);
        assert!((ctrl.state().ball.speed() - 400.0).abs() < 0.01);
    }

    #[test]
    fn test_constant_policy_keeps_speed_on_bricks() {
        let mut ctrl = controller();
        ctrl.serve();
        let before = ctrl.state().ball.vel;
        ctrl.on_ball_brick(0);
        assert_eq!(ctrl.state().ball.vel, before);
    }

    #[test]
    fn test_powerup_shrink_and_restore() {
        let mut config = GameConfig::from_preset(Preset::Shrinking);
        config.powerups = Some(PowerUpConfig {
            spawn_chance: 1.0,
            ..Default::default()
        });
        let mut ctrl = GameplayController::new(config, 5);
        ctrl.serve();

        assert!(ctrl.on_ball_brick(0));
        assert_eq!(ctrl.state().active_powerups(), 1);
        assert!(ctrl.events().contains(&GameEvent::PowerUpSpawned { index: 0 }));

        for _ in 0..120 {
            ctrl.step(SIM_DT);
            if ctrl.phase() != GamePhase::InPlay {
                break;
            }
        }
        let width = ctrl.state().paddle.width;
        assert!(width < 100.0 && width >= 40.0);

        assert!(ctrl.on_paddle_powerup(0));
        assert_eq!(ctrl.state().paddle.width, 100.0);
        assert!(!ctrl.on_paddle_powerup(0));
    }

    #[test]
    fn test_no_powerups_when_disabled() {
        let mut ctrl = controller();
        ctrl.serve();
        for index in 0..10 {
            ctrl.on_ball_brick(index);
        }
        assert!(ctrl.state().powerups.is_empty());
        assert_eq!(ctrl.state().paddle.width, 100.0);
    }

    #[test]
    fn test_pause_freezes_and_restores_message() {
        let mut ctrl = controller();
        assert!(ctrl.toggle_pause());
        assert!(!ctrl.serve());
        assert_eq!(ctrl.phase(), GamePhase::ReadyToServe);

        ctrl.drain_events();
        ctrl.handle_input(InputEvent::KeyDown(Key::Pause));
        assert!(!ctrl.is_paused());
        assert_eq!(
            ctrl.drain_events(),
            vec![
                GameEvent::ShowMessage(Message::ClickToStart),
                GameEvent::PhysicsResumed,
            ]
        );

        ctrl.serve();
        ctrl.toggle_pause();
        let before = ctrl.state().ball.pos;
        ctrl.step(SIM_DT);
        assert_eq!(ctrl.state().ball.pos, before);
        ctrl.toggle_pause();
        ctrl.step(SIM_DT);
        assert_ne!(ctrl.state().ball.pos, before);
    }

    #[test]
    fn test_wall_sound_only_when_enabled() {
        let mut ctrl = controller();
        ctrl.serve();
        ctrl.drain_events();
        ctrl.on_ball_wall(Wall::Left);
        assert!(ctrl.events().is_empty());

        let mut config = GameConfig::default();
        config.wall_sound = true;
        let mut ctrl = GameplayController::new(config, 1);
        ctrl.serve();
        ctrl.drain_events();
        ctrl.on_ball_wall(Wall::Top);
        assert_eq!(ctrl.events(), &[GameEvent::Sound(SoundEffect::WallHit)]);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.bounce = BounceModel::AngleRange {
            min_deg: 10.0,
            max_deg: 200.0,
        };
        assert!(GameplayController::try_new(config, 1).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Press,
        Brick(usize),
        Paddle,
        Exit,
        Pointer(f32),
        Frame,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Press),
            (0usize..60).prop_map(Op::Brick),
            Just(Op::Paddle),
            Just(Op::Exit),
            (-200.0f32..1000.0).prop_map(Op::Pointer),
            Just(Op::Frame),
        ]
    }

    proptest! {
        #[test]
        fn prop_bookkeeping_invariants(ops in prop::collection::vec(op(), 1..200)) {
            let mut ctrl = GameplayController::new(GameConfig::default(), 7);

            for op in ops {
                let prev_phase = ctrl.phase();
                let prev_score = ctrl.score();
                let prev_lives = ctrl.lives();

                let restarted = match op {
                    Op::Press => {
                        ctrl.handle_input(InputEvent::PointerDown);
                        prev_phase.is_terminal()
                    }
                    Op::Brick(i) => {
                        ctrl.on_ball_brick(i);
                        false
                    }
                    Op::Paddle => {
                        ctrl.on_ball_paddle();
                        false
                    }
                    Op::Exit => {
                        drop_ball(&mut ctrl);
                        false
                    }
                    Op::Pointer(x) => {
                        ctrl.handle_input(InputEvent::PointerMove { x });
                        ctrl.step(SIM_DT);
                        false
                    }
                    Op::Frame => {
                        ctrl.step(SIM_DT);
                        false
                    }
                };

                let state = ctrl.state();
                if restarted {
                    prop_assert_eq!(state.score, 0);
                    prop_assert_eq!(state.lives, 3);
                    prop_assert_eq!(state.phase, GamePhase::ReadyToServe);
                    prop_assert_eq!(state.bricks.active_count(), 60);
                } else {
                    prop_assert!(state.score >= prev_score);
                    prop_assert!(state.lives <= prev_lives);
                    if state.lives < prev_lives {
                        prop_assert_eq!(prev_phase, GamePhase::InPlay);
                        prop_assert_eq!(state.lives, prev_lives - 1);
                    }
                }

                prop_assert_eq!(state.score % 10, 0);
                prop_assert_eq!(state.bricks.active_count() as u64, 60 - state.score / 10);
                prop_assert_eq!(state.phase == GamePhase::Won, state.bricks.is_cleared());
                prop_assert_eq!(state.phase == GamePhase::GameOver, state.lives == 0);

                let half = state.paddle.width / 2.0;
                prop_assert!(state.paddle.x >= half && state.paddle.x <= 800.0 - half);
            }
        }
    }
}
