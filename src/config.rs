//! Game tuning and gameplay policies
//!
//! Everything the variants of the game disagree on lives here as data, so a
//! single gameplay core can play all of them. Persisted as JSON (LocalStorage
//! on web, a file path on native).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// How ball speed evolves during a rally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPolicy {
    /// Speed only changes through the bounce model
    #[default]
    Constant,
    /// Multiply by `speed_ramp` on every paddle hit (capped)
    RampOnPaddleHit,
    /// Multiply by `speed_ramp` on every brick destroyed (capped)
    RampOnBrickHit,
}

/// Outgoing velocity on a ball-paddle contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceModel {
    /// `vx = factor * (ball.x - paddle.x)`, vertical component untouched
    Linear { factor: f32 },
    /// Contact offset mapped linearly onto an outgoing angle (degrees, 90 = straight up)
    AngleRange { min_deg: f32, max_deg: f32 },
}

impl Default for BounceModel {
    fn default() -> Self {
        Self::Linear { factor: 10.0 }
    }
}

/// Which inputs steer the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    /// Paddle follows the pointer x
    #[default]
    Pointer,
    /// Paddle moves at a fixed speed while left/right are held
    Keyboard,
    /// Both; held keys win over the pointer
    Both,
}

impl ControlScheme {
    pub fn uses_pointer(&self) -> bool {
        matches!(self, ControlScheme::Pointer | ControlScheme::Both)
    }

    pub fn uses_keys(&self) -> bool {
        matches!(self, ControlScheme::Keyboard | ControlScheme::Both)
    }
}

/// Brick grid geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickLayout {
    pub rows: u32,
    pub cols: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub padding: f32,
    /// y of the top row's upper edge
    pub top: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            rows: BRICK_ROWS,
            cols: BRICK_COLS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            padding: BRICK_PADDING,
            top: BRICK_TOP,
        }
    }
}

impl BrickLayout {
    /// Horizontal pitch of one column (brick + padding)
    pub fn pitch_x(&self) -> f32 {
        self.brick_width + self.padding
    }

    pub fn pitch_y(&self) -> f32 {
        self.brick_height + self.padding
    }

    /// x of the left column, centring the grid in the field
    pub fn left(&self, field_width: f32) -> f32 {
        (field_width - self.cols as f32 * self.pitch_x()) / 2.0
    }

    pub fn brick_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

/// Falling power-up and paddle-shrink tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Probability [0, 1] of a power-up dropping from a destroyed brick
    pub spawn_chance: f32,
    pub fall_speed: f32,
    pub size: f32,
    /// Paddle width lost per second while the ball is in play
    pub shrink_rate: f32,
    pub min_width: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            spawn_chance: POWERUP_SPAWN_CHANCE,
            fall_speed: POWERUP_FALL_SPEED,
            size: POWERUP_SIZE,
            shrink_rate: PADDLE_SHRINK_RATE,
            min_width: PADDLE_MIN_WIDTH,
        }
    }
}

/// Named configurations matching the game's common variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Pointer control, linear deflection, constant speed
    #[default]
    Classic,
    /// Keyboard control, angle-range bounce, speed ramps on paddle hits
    Arcade,
    /// Classic plus the shrinking paddle and width-restoring power-ups
    Shrinking,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Arcade => "Arcade",
            Preset::Shrinking => "Shrinking",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Preset::Classic),
            "arcade" => Some(Preset::Arcade),
            "shrinking" | "shrink" => Some(Preset::Shrinking),
            _ => None,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_offset: f32,
    pub paddle_key_speed: f32,
    pub control: ControlScheme,

    // === Ball ===
    pub ball_radius: f32,
    pub serve_velocity: Vec2,
    /// When set, the serve velocity is normalised and scaled to this speed
    pub serve_speed: Option<f32>,
    pub max_speed: f32,
    pub speed_policy: SpeedPolicy,
    pub speed_ramp: f32,
    pub bounce: BounceModel,

    // === Bricks & scoring ===
    pub bricks: BrickLayout,
    pub points_per_brick: u64,
    /// Extra points per row above the bottom row (0 = flat scoring)
    pub row_bonus: u64,

    // === Session ===
    pub initial_lives: u8,
    /// Seconds spent in LifeLost before the ball is back on the paddle
    pub life_lost_delay: f32,
    /// Report wall bounces to the presentation layer
    pub wall_sound: bool,

    /// Power-ups; `None` disables spawning and paddle shrink
    pub powerups: Option<PowerUpConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            paddle_key_speed: PADDLE_KEY_SPEED,
            control: ControlScheme::Pointer,

            ball_radius: BALL_RADIUS,
            serve_velocity: Vec2::new(SERVE_VELOCITY.0, SERVE_VELOCITY.1),
            serve_speed: None,
            max_speed: BALL_MAX_SPEED,
            speed_policy: SpeedPolicy::Constant,
            speed_ramp: SPEED_RAMP,
            bounce: BounceModel::default(),

            bricks: BrickLayout::default(),
            points_per_brick: POINTS_PER_BRICK,
            row_bonus: 0,

            initial_lives: INITIAL_LIVES,
            life_lost_delay: 0.0,
            wall_sound: false,

            powerups: None,
        }
    }
}

impl GameConfig {
    /// Create a config from a preset (applies preset defaults)
    pub fn from_preset(preset: Preset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a preset on top of the current values
    pub fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Classic => {
                self.control = ControlScheme::Pointer;
                self.bounce = BounceModel::default();
                self.speed_policy = SpeedPolicy::Constant;
                self.serve_speed = None;
                self.powerups = None;
            }
            Preset::Arcade => {
                self.control = ControlScheme::Keyboard;
                self.bounce = BounceModel::AngleRange {
                    min_deg: 60.0,
                    max_deg: 120.0,
                };
                self.speed_policy = SpeedPolicy::RampOnPaddleHit;
                self.serve_speed = Some(320.0);
                self.wall_sound = true;
            }
            Preset::Shrinking => {
                self.control = ControlScheme::Pointer;
                self.bounce = BounceModel::default();
                self.powerups = Some(PowerUpConfig::default());
            }
        }
    }

    /// Velocity given to the ball on serve
    pub fn serve_velocity(&self) -> Vec2 {
        match self.serve_speed {
            Some(speed) => self.serve_velocity.normalize_or_zero() * speed,
            None => self.serve_velocity,
        }
    }

    /// Lower speed bound used by the angle-range bounce model
    pub fn initial_speed(&self) -> f32 {
        self.serve_velocity().length()
    }

    /// y of the paddle centre
    pub fn paddle_y(&self) -> f32 {
        self.field_height - self.paddle_bottom_offset
    }

    /// Check the config describes a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(ConfigError::invalid("field", "dimensions must be positive"));
        }
        if self.paddle_width <= 0.0 || self.paddle_width > self.field_width {
            return Err(ConfigError::invalid(
                "paddle_width",
                format!("must be in (0, {}]", self.field_width),
            ));
        }
        if self.paddle_y() <= 0.0 || self.paddle_y() >= self.field_height {
            return Err(ConfigError::invalid(
                "paddle_bottom_offset",
                "paddle must sit inside the field",
            ));
        }
        if self.ball_radius <= 0.0 {
            return Err(ConfigError::invalid("ball_radius", "must be positive"));
        }
        if self.serve_velocity.y >= 0.0 {
            return Err(ConfigError::invalid(
                "serve_velocity",
                "must point up the field (negative y)",
            ));
        }
        if let Some(speed) = self.serve_speed
            && speed <= 0.0
        {
            return Err(ConfigError::invalid("serve_speed", "must be positive"));
        }
        if self.max_speed < self.initial_speed() {
            return Err(ConfigError::invalid(
                "max_speed",
                "must be at least the serve speed",
            ));
        }
        if self.speed_ramp < 1.0 {
            return Err(ConfigError::invalid("speed_ramp", "must be >= 1.0"));
        }
        if let BounceModel::AngleRange { min_deg, max_deg } = self.bounce
            && !(0.0 < min_deg && min_deg < max_deg && max_deg < 180.0)
        {
            return Err(ConfigError::invalid(
                "bounce",
                "angle range must satisfy 0 < min < max < 180",
            ));
        }
        if self.bricks.rows == 0 || self.bricks.cols == 0 {
            return Err(ConfigError::invalid("bricks", "grid must not be empty"));
        }
        if self.bricks.left(self.field_width) < 0.0 {
            return Err(ConfigError::invalid("bricks", "grid is wider than the field"));
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::invalid("initial_lives", "must be at least 1"));
        }
        if self.life_lost_delay < 0.0 {
            return Err(ConfigError::invalid("life_lost_delay", "must not be negative"));
        }
        if let Some(powerups) = &self.powerups {
            if !(0.0..=1.0).contains(&powerups.spawn_chance) {
                return Err(ConfigError::invalid(
                    "powerups.spawn_chance",
                    "must be within [0, 1]",
                ));
            }
            if powerups.min_width <= 0.0 || powerups.min_width > self.paddle_width {
                return Err(ConfigError::invalid(
                    "powerups.min_width",
                    "must be in (0, paddle_width]",
                ));
            }
            if powerups.shrink_rate < 0.0 {
                return Err(ConfigError::invalid("powerups.shrink_rate", "must not be negative"));
            }
            if powerups.fall_speed <= 0.0 {
                return Err(ConfigError::invalid("powerups.fall_speed", "must be positive"));
            }
            if powerups.size <= 0.0 {
                return Err(ConfigError::invalid("powerups.size", "must be positive"));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_breaker_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from LocalStorage");
                    return config;
                }
                Err(e) => log::warn!("Ignoring stored config: {}", e),
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Config saved");
        }
    }
}
