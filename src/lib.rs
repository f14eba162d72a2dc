//! Brick Breaker - a classic Breakout/Arkanoid game
//!
//! Core modules:
//! - `sim`: Deterministic gameplay core (state machine, collision rules, arcade physics)
//! - `config`: Data-driven game tuning and policies
//! - `host`: Presentation contract the core reports into
//! - `platform`: Browser/native host bindings

pub mod config;
pub mod host;
pub mod platform;
pub mod sim;

pub use config::{BounceModel, ConfigError, ControlScheme, GameConfig, SpeedPolicy};
pub use host::{PresentationHost, present};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the fixed-step clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance of the paddle centre above the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;
    /// Paddle speed when driven by arrow keys (pixels/s)
    pub const PADDLE_KEY_SPEED: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const SERVE_VELOCITY: (f32, f32) = (-75.0, -300.0);
    pub const BALL_MAX_SPEED: f32 = 600.0;
    /// Multiplicative speed ramp for the ramping speed policies
    pub const SPEED_RAMP: f32 = 1.05;

    /// Brick grid defaults
    pub const BRICK_ROWS: u32 = 6;
    pub const BRICK_COLS: u32 = 10;
    pub const BRICK_WIDTH: f32 = 64.0;
    pub const BRICK_HEIGHT: f32 = 32.0;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BRICK_TOP: f32 = 100.0;

    /// Scoring and lives
    pub const POINTS_PER_BRICK: u64 = 10;
    pub const INITIAL_LIVES: u8 = 3;

    /// Power-up defaults
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.2;
    pub const POWERUP_FALL_SPEED: f32 = 150.0;
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const PADDLE_SHRINK_RATE: f32 = 4.0;
    pub const PADDLE_MIN_WIDTH: f32 = 40.0;
}

/// Axis-aligned rectangle described by its centre and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Build from the top-left corner
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self {
            center: top_left + size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// True when the two rectangles overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Closest point inside `rect` to `point`
#[inline]
pub fn closest_point(rect: &Rect, point: Vec2) -> Vec2 {
    point.clamp(rect.min(), rect.max())
}
