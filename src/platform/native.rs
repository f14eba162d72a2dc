//! Headless native runner
//!
//! No window: the autopilot plays fixed-timestep ticks and every event goes
//! to a presentation host (usually [`LogHost`](crate::host::LogHost)).

use crate::consts::SIM_DT;
use crate::host::{PresentationHost, present};
use crate::sim::{GamePhase, GameplayController, TickInput, tick};

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Games that reached Won or GameOver
    pub games_finished: u32,
    pub wins: u32,
    pub best_score: u64,
    pub final_phase: GamePhase,
}

/// Let the autopilot play for `seconds` of simulated time
pub fn run_headless<H>(ctrl: &mut GameplayController, seconds: f32, host: &mut H) -> RunSummary
where
    H: PresentationHost + ?Sized,
{
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let ticks = (seconds.max(0.0) / SIM_DT).ceil() as u64;

    let mut summary = RunSummary {
        ticks,
        games_finished: 0,
        wins: 0,
        best_score: 0,
        final_phase: ctrl.phase(),
    };

    present(ctrl.drain_events(), host);
    for _ in 0..ticks {
        let before = ctrl.phase();
        tick(ctrl, &input, SIM_DT);
        let after = ctrl.phase();

        if !before.is_terminal() && after.is_terminal() {
            summary.games_finished += 1;
            if after == GamePhase::Won {
                summary.wins += 1;
            }
            log::info!("Game {} finished: {:?}", summary.games_finished, after);
        }
        summary.best_score = summary.best_score.max(ctrl.score());
        present(ctrl.drain_events(), host);
    }

    summary.final_phase = ctrl.phase();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::host::LogHost;

    #[test]
    fn test_headless_run_plays() {
        let mut ctrl = GameplayController::new(GameConfig::default(), 2024);
        let mut host = LogHost::default();
        let summary = run_headless(&mut ctrl, 20.0, &mut host);

        assert_eq!(summary.ticks, 2400);
        assert!(summary.best_score > 0);
        // The host saw every score update
        assert_eq!(host.score, ctrl.score());
        assert_eq!(host.lives, ctrl.lives());
    }

    #[test]
    fn test_zero_seconds() {
        let mut ctrl = GameplayController::new(GameConfig::default(), 1);
        let mut host = LogHost::default();
        let summary = run_headless(&mut ctrl, 0.0, &mut host);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.final_phase, GamePhase::ReadyToServe);
        assert_eq!(host.message.as_deref(), Some("Click to Start"));
    }
}
