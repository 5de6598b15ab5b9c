//! Application state shared between the console and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};

use rugflip_core::commands::PlayerCommand;
use rugflip_core::components::GameState;
use rugflip_core::state::GameStateSnapshot;

use crate::config::AppConfig;
use crate::game_loop;

/// Commands sent from the console to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the engine.
    PlayerCommand(PlayerCommand),
    /// Dispose the engine and stop the game loop thread.
    Shutdown,
}

/// Handle to a running game loop.
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    command_tx: mpsc::Sender<GameLoopCommand>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    loop_thread: JoinHandle<GameState>,
}

impl AppState {
    /// Spawn the game loop thread.
    pub fn launch(config: AppConfig) -> Result<Self> {
        let latest_snapshot = Arc::new(Mutex::new(None));
        let (command_tx, loop_thread) =
            game_loop::spawn_game_loop(config, Arc::clone(&latest_snapshot))
                .context("failed to spawn game loop thread")?;

        Ok(Self {
            command_tx,
            latest_snapshot,
            loop_thread,
        })
    }

    /// Forward a player command to the engine.
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| anyhow!("game loop is not running"))
    }

    /// The most recent snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the game loop and wait for it to exit. Returns the final state
    /// of the disposed engine.
    pub fn shutdown(self) -> Result<GameState> {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.loop_thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}
