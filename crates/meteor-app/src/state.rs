//! Application state shared between the front end and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use meteor_core::commands::RoundCommand;
use meteor_core::state::RoundSnapshot;
use meteor_sim::RoundController;

use crate::display::DisplaySink;
use crate::game_loop;

/// Commands sent from the front end to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A round command to forward to the controller.
    Round(RoundCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Game loop already running")]
    AlreadyRunning,
    #[error("Game loop not started")]
    NotStarted,
    #[error("Game loop is gone: {0}")]
    Disconnected(String),
    #[error("Shared state lock poisoned")]
    Poisoned,
}

/// Handle to the game loop and its latest published snapshot.
///
/// Everything sits behind a `Mutex` so the handle can be shared across
/// threads (`mpsc::Sender` is Send but not Sync).
pub struct AppState {
    /// `None` before `start_loop` and after `shutdown`.
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each pass.
    latest_snapshot: Arc<Mutex<Option<RoundSnapshot>>>,
    loop_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop thread unless one is already running.
    pub fn start_loop(
        &self,
        controller: RoundController,
        display: impl DisplaySink + Send + 'static,
    ) -> Result<(), AppError> {
        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let (cmd_tx, handle) = game_loop::spawn_game_loop(
            controller,
            Box::new(display),
            self.latest_snapshot.clone(),
        );
        *tx_lock = Some(cmd_tx);
        *self.loop_thread.lock().map_err(|_| AppError::Poisoned)? = Some(handle);
        Ok(())
    }

    /// Forward a round command to the game loop.
    pub fn send_command(&self, command: RoundCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::Round(command))
                .map_err(|e| AppError::Disconnected(e.to_string())),
            None => Err(AppError::NotStarted),
        }
    }

    /// Latest snapshot published by the loop, if any.
    pub fn get_snapshot(&self) -> Result<Option<RoundSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    pub fn is_running(&self) -> bool {
        self.command_tx
            .lock()
            .map(|tx| tx.is_some())
            .unwrap_or(false)
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let tx = self
            .command_tx
            .lock()
            .map_err(|_| AppError::Poisoned)?
            .take()
            .ok_or(AppError::NotStarted)?;
        // A loop that already exited has dropped its receiver; joining is enough.
        let _ = tx.send(GameLoopCommand::Shutdown);

        let handle = self.loop_thread.lock().map_err(|_| AppError::Poisoned)?.take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| AppError::Disconnected("game loop panicked".into()))?;
        }
        Ok(())
    }
}
