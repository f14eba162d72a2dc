//! Presentation contract
//!
//! The gameplay core never draws, plays audio or touches the DOM. It queues
//! [`GameEvent`]s; a host implements [`PresentationHost`] and [`present`]
//! replays the queue onto it.

use crate::sim::{GameEvent, SoundEffect};

/// What the core needs from whoever shows the game
pub trait PresentationHost {
    fn set_score(&mut self, score: u64);
    fn set_lives(&mut self, lives: u8);
    fn show_message(&mut self, text: &str);
    fn hide_message(&mut self);
    /// Fire-and-forget
    fn play_sound(&mut self, sound: SoundEffect);
    /// Global simulation frozen or resumed
    fn physics_paused(&mut self, _paused: bool) {}
}

/// Replay queued events onto a host
pub fn present<H, I>(events: I, host: &mut H)
where
    H: PresentationHost + ?Sized,
    I: IntoIterator<Item = GameEvent>,
{
    for event in events {
        match event {
            GameEvent::ScoreChanged(score) => host.set_score(score),
            GameEvent::LivesChanged(lives) => host.set_lives(lives),
            GameEvent::ShowMessage(message) => host.show_message(message.text()),
            GameEvent::HideMessage => host.hide_message(),
            GameEvent::Sound(sound) => host.play_sound(sound),
            GameEvent::PhysicsPaused => host.physics_paused(true),
            GameEvent::PhysicsResumed => host.physics_paused(false),
            GameEvent::PhaseChanged { .. }
            | GameEvent::BrickDestroyed { .. }
            | GameEvent::PowerUpSpawned { .. }
            | GameEvent::PowerUpCollected => {}
        }
    }
}

/// Host that writes everything to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogHost {
    pub score: u64,
    pub lives: u8,
    pub message: Option<String>,
}

impl PresentationHost for LogHost {
    fn set_score(&mut self, score: u64) {
        self.score = score;
        log::debug!("Score: {}", score);
    }

    fn set_lives(&mut self, lives: u8) {
        self.lives = lives;
        log::info!("Lives: {}", lives);
    }

    fn show_message(&mut self, text: &str) {
        self.message = Some(text.to_string());
        log::info!("[{}]", text);
    }

    fn hide_message(&mut self) {
        self.message = None;
    }

    fn play_sound(&mut self, sound: SoundEffect) {
        log::trace!("♪ {}", sound.name());
    }

    fn physics_paused(&mut self, paused: bool) {
        log::debug!("Physics {}", if paused { "paused" } else { "resumed" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{GameplayController, InputEvent};

    /// Records every call in order
    #[derive(Default)]
    struct FakeHost {
        calls: Vec<String>,
    }

    impl PresentationHost for FakeHost {
        fn set_score(&mut self, score: u64) {
            self.calls.push(format!("score {}", score));
        }
        fn set_lives(&mut self, lives: u8) {
            self.calls.push(format!("lives {}", lives));
        }
        fn show_message(&mut self, text: &str) {
            self.calls.push(format!("show {}", text));
        }
        fn hide_message(&mut self) {
            self.calls.push("hide".to_string());
        }
        fn play_sound(&mut self, sound: SoundEffect) {
            self.calls.push(format!("sound {}", sound.name()));
        }
    }

    #[test]
    fn test_session_start_and_serve() {
        let mut ctrl = GameplayController::new(GameConfig::default(), 1);
        let mut host = FakeHost::default();

        present(ctrl.drain_events(), &mut host);
        assert_eq!(host.calls, ["score 0", "lives 3", "show Click to Start"]);

        host.calls.clear();
        ctrl.handle_input(InputEvent::PointerDown);
        ctrl.on_ball_brick(0);
        present(ctrl.drain_events(), &mut host);
        assert_eq!(host.calls, ["hide", "score 10", "sound brick_hit"]);
    }

    #[test]
    fn test_game_over_messages() {
        let mut config = GameConfig::default();
        config.initial_lives = 1;
        let mut ctrl = GameplayController::new(config, 1);
        ctrl.serve();
        ctrl.drain_events();

        ctrl.state_mut().ball.pos.y = 650.0;
        ctrl.check_ball_exit();

        let mut host = LogHost::default();
        present(ctrl.drain_events(), &mut host);
        assert_eq!(host.lives, 0);
        assert_eq!(host.message.as_deref(), Some("Game Over! Click to Restart"));

        ctrl.restart();
        present(ctrl.drain_events(), &mut host);
        assert_eq!(host.lives, 1);
        assert_eq!(host.score, 0);
        assert_eq!(host.message.as_deref(), Some("Click to Start"));
    }
}
