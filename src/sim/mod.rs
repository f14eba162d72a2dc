//! Gameplay core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod events;
pub mod physics;
pub mod rules;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Wall, ball_rect_collision};
pub use controller::{GameplayController, InputEvent, Key};
pub use events::{GameEvent, Message, SoundEffect};
pub use physics::Contact;
pub use state::{Ball, Brick, BrickField, GamePhase, GameState, Paddle, PowerUp, ROW_COLORS};
pub use tick::{FixedStep, TickInput, run_frame, tick};
