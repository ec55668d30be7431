//! Game loop thread: drives the round controller on the wall clock.
//!
//! The controller is moved into this thread and owned there exclusively.
//! Commands arrive via an `mpsc` channel. Every pass advances the controller
//! to the current time, forwards the snapshot to the display sink and stores
//! it in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};

use meteor_core::state::RoundSnapshot;
use meteor_sim::RoundController;

use crate::display::{self, DisplaySink};
use crate::state::GameLoopCommand;

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    controller: RoundController,
    display: Box<dyn DisplaySink + Send>,
    latest_snapshot: Arc<Mutex<Option<RoundSnapshot>>>,
) -> (mpsc::Sender<GameLoopCommand>, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("meteor-game-loop".into())
        .spawn(move || {
            run_game_loop(controller, display, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut controller: RoundController,
    mut display: Box<dyn DisplaySink + Send>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<RoundSnapshot>>,
) {
    let epoch = Instant::now();
    let frame_period = Duration::from_millis(controller.config().timing.frame_ms);
    info!("Game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Round(cmd)) => {
                    debug!("Queued {cmd:?}");
                    controller.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!("Game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Run every task due by now
        let snapshot = controller.advance_to(epoch.elapsed());

        // 3. Hand the step to the display
        display::publish(display.as_mut(), &snapshot);

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next deadline, polling at least once per frame
        let wait = sleep_duration(controller.next_deadline(), epoch.elapsed(), frame_period);
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}

/// Time until `deadline`, capped at one frame so commands stay responsive.
pub(crate) fn sleep_duration(deadline: Option<Duration>, now: Duration, frame: Duration) -> Duration {
    deadline
        .map(|due| due.saturating_sub(now))
        .unwrap_or(frame)
        .min(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NotifyingDisplay;
    use crate::display::LogDisplay;
    use meteor_core::commands::RoundCommand;
    use meteor_core::config::GameConfig;
    use meteor_core::enums::RoundPhase;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Round(RoundCommand::IncreaseGuess))
            .unwrap();
        tx.send(GameLoopCommand::Round(RoundCommand::Start { guess: None }))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Round(RoundCommand::IncreaseGuess)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::Round(RoundCommand::Start { guess: None })
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_sleep_duration() {
        let frame = ms(16);
        assert_eq!(sleep_duration(None, ms(500), frame), frame);
        assert_eq!(sleep_duration(Some(ms(510)), ms(500), frame), ms(10));
        assert_eq!(sleep_duration(Some(ms(2_000)), ms(500), frame), frame);
        assert_eq!(sleep_duration(Some(ms(400)), ms(500), frame), Duration::ZERO);
    }

    #[test]
    fn test_loop_plays_short_round_to_completion() {
        let mut config = GameConfig::default();
        config.round.duration_secs = 2;
        config.timing.countdown_ms = 25;

        let (outcome_tx, outcome_rx) = mpsc::channel();
        let latest = Arc::new(Mutex::new(None));
        let (cmd_tx, handle) = spawn_game_loop(
            RoundController::new(config),
            Box::new(NotifyingDisplay::new(LogDisplay::default(), outcome_tx)),
            latest.clone(),
        );

        cmd_tx
            .send(GameLoopCommand::Round(RoundCommand::Start { guess: Some(0) }))
            .unwrap();
        let outcome = outcome_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("round should end");
        assert_eq!(outcome.guess, 0);

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();

        let snapshot = latest.lock().unwrap().clone().expect("snapshot stored");
        assert_eq!(snapshot.phase, RoundPhase::Ended);
        assert_eq!(snapshot.round.time_remaining, 0);
    }

    #[test]
    fn test_loop_exits_on_disconnect() {
        let latest = Arc::new(Mutex::new(None));
        let (cmd_tx, handle) = spawn_game_loop(
            RoundController::new(GameConfig::default()),
            Box::new(LogDisplay::default()),
            latest,
        );
        drop(cmd_tx);
        handle.join().unwrap();
    }
}
