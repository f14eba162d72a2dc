//! Game state and core entity types
//!
//! Logical entities only; how they are drawn is the presentation layer's business.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::config::{BrickLayout, GameConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball resting on paddle, waiting for serve input
    ReadyToServe,
    /// Ball in motion, physics and collision handlers active
    InPlay,
    /// Ball fell out of the field; waiting to respawn on the paddle
    LifeLost,
    /// Every brick destroyed; waiting for restart input
    Won,
    /// No lives left; waiting for restart input
    GameOver,
}

impl GamePhase {
    /// Terminal phases only leave through a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::GameOver)
    }
}

/// Brick tint per row, top to bottom (0xRRGGBB)
pub const ROW_COLORS: [u32; 6] = [0xcc2222, 0x22cc22, 0x2222cc, 0xcccc22, 0xcc22cc, 0x22cccc];

/// Tint for a brick row (cycles when there are more rows than colours)
pub fn row_color(row: u32) -> u32 {
    ROW_COLORS[row as usize % ROW_COLORS.len()]
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre x
    pub x: f32,
    /// Centre y (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Width restored by restart and by power-up pickup
    pub base_width: f32,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.field_width / 2.0,
            y: config.paddle_y(),
            width: config.paddle_width,
            height: config.paddle_height,
            base_width: config.paddle_width,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    /// y of the top surface
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    /// Move to `x`, keeping the whole paddle inside the field
    pub fn set_x(&mut self, x: f32, field_width: f32) {
        self.x = super::rules::clamp_paddle_x(x, self.width, field_width);
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// False while the ball rests on the paddle
    pub served: bool,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            served: false,
        }
    }

    /// Put the ball back on the paddle, at rest
    pub fn attach(&mut self, paddle: &Paddle) {
        self.served = false;
        self.vel = Vec2::ZERO;
        self.follow(paddle);
    }

    /// Track the paddle while resting on it
    pub fn follow(&mut self, paddle: &Paddle) {
        if !self.served {
            self.pos = Vec2::new(paddle.x, paddle.top() - self.radius);
        }
    }

    /// Launch with the given velocity
    pub fn launch(&mut self, vel: Vec2) {
        self.served = true;
        self.vel = vel;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub row: u32,
    pub col: u32,
    pub active: bool,
}

impl Brick {
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn color(&self) -> u32 {
        row_color(self.row)
    }
}

/// The full grid of bricks for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickField {
    pub bricks: Vec<Brick>,
    pub rows: u32,
    pub cols: u32,
}

impl BrickField {
    /// Lay out a fresh, fully active grid (row-major, top row first)
    pub fn build(layout: &BrickLayout, field_width: f32) -> Self {
        let left = layout.left(field_width);
        let size = Vec2::new(layout.brick_width, layout.brick_height);
        let mut bricks = Vec::with_capacity(layout.brick_count());
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                bricks.push(Brick {
                    pos: Vec2::new(
                        left + col as f32 * layout.pitch_x(),
                        layout.top + row as f32 * layout.pitch_y(),
                    ),
                    size,
                    row,
                    col,
                    active: true,
                });
            }
        }
        Self {
            bricks,
            rows: layout.rows,
            cols: layout.cols,
        }
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Brick> {
        self.bricks.get(index)
    }

    pub fn active_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    /// Level is cleared exactly when no active brick remains
    pub fn is_cleared(&self) -> bool {
        self.active_count() == 0
    }

    /// Deactivate a brick; false if it was already gone or doesn't exist
    pub fn deactivate(&mut self, index: usize) -> bool {
        match self.bricks.get_mut(index) {
            Some(brick) if brick.active => {
                brick.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn reactivate_all(&mut self) {
        for brick in &mut self.bricks {
            brick.active = true;
        }
    }

    /// Active bricks with their indices
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Brick)> {
        self.bricks.iter().enumerate().filter(|(_, b)| b.active)
    }
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    /// Centre
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub active: bool,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// Complete gameplay state (serializable snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickField,
    pub powerups: Vec<PowerUp>,
}

impl GameState {
    /// Fresh session: full grid, paddle centred, ball on the paddle
    pub fn new(config: &GameConfig) -> Self {
        let paddle = Paddle::new(config);
        let mut ball = Ball::new(config.ball_radius);
        ball.attach(&paddle);
        Self {
            score: 0,
            lives: config.initial_lives,
            phase: GamePhase::ReadyToServe,
            paddle,
            ball,
            bricks: BrickField::build(&config.bricks, config.field_width),
            powerups: Vec::new(),
        }
    }

    /// Return to the initial session values, reusing paddle/ball/bricks
    pub fn reset(&mut self, config: &GameConfig) {
        self.score = 0;
        self.lives = config.initial_lives;
        self.phase = GamePhase::ReadyToServe;
        self.paddle.width = self.paddle.base_width;
        self.paddle.set_x(config.field_width / 2.0, config.field_width);
        self.ball.attach(&self.paddle);
        self.bricks.reactivate_all();
        self.powerups.clear();
    }

    pub fn active_powerups(&self) -> usize {
        self.powerups.iter().filter(|p| p.active).count()
    }
}
