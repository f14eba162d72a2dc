//! Events the gameplay core reports to its presentation layer

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

/// Named, fire-and-forget sound triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball destroys a brick
    BrickHit,
    /// Ball hits paddle
    PaddleHit,
    /// Ball bounces off a side or the top
    WallHit,
    /// Last brick destroyed
    Win,
    /// Ball fell out of the field
    LifeLost,
    /// Last life lost
    GameOver,
    /// Paddle caught a power-up
    PowerUp,
}

impl SoundEffect {
    /// Asset key of the sound
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::BrickHit => "brick_hit",
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::WallHit => "wall_hit",
            SoundEffect::Win => "win_sound",
            SoundEffect::LifeLost => "life_lost",
            SoundEffect::GameOver => "game_over",
            SoundEffect::PowerUp => "power_up",
        }
    }
}

/// Overlay messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    ClickToStart,
    GameOver,
    YouWin,
    Paused,
}

impl Message {
    pub fn text(&self) -> &'static str {
        match self {
            Message::ClickToStart => "Click to Start",
            Message::GameOver => "Game Over! Click to Restart",
            Message::YouWin => "You Win! Click to Restart",
            Message::Paused => "Paused",
        }
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    PhaseChanged { from: GamePhase, to: GamePhase },
    ShowMessage(Message),
    HideMessage,
    Sound(SoundEffect),
    /// Global simulation frozen (terminal phase or pause)
    PhysicsPaused,
    PhysicsResumed,
    BrickDestroyed { index: usize },
    PowerUpSpawned { index: usize },
    PowerUpCollected,
}
