//! Game loop thread: drives the engine from the wall clock and publishes snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for synchronous polling.

use std::io;
use std::sync::mpsc;
use std::sync::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use rugflip_core::components::GameState;
use rugflip_core::events::GameEvent;
use rugflip_core::format::format_amount;
use rugflip_core::state::GameStateSnapshot;
use rugflip_sim::engine::{EngineConfig, GameEngine};
use rugflip_sim::persistence::{FileStore, MemoryStore};
use rugflip_sim::SystemClock;

use crate::config::AppConfig;
use crate::state::GameLoopCommand;

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the console to use and the thread handle.
/// The thread yields the final state of the disposed engine.
pub fn spawn_game_loop(
    config: AppConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<GameState>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("rugflip-game-loop".into())
        .spawn(move || {
            let engine = create_engine(&config);
            run_game_loop(engine, &config, cmd_rx, &latest_snapshot)
        })?;

    Ok((cmd_tx, handle))
}

/// Build the engine on a file store, falling back to memory if the save
/// directory is unusable.
pub fn create_engine(config: &AppConfig) -> GameEngine {
    let engine_config = EngineConfig {
        seed: config.seed,
        ..Default::default()
    };

    match FileStore::new(&config.save_dir) {
        Ok(store) => {
            tracing::info!(dir = %store.base_dir().display(), "Using save directory");
            GameEngine::create(engine_config, SystemClock::new(), store)
        }
        Err(err) => {
            tracing::warn!(
                dir = %config.save_dir.display(),
                error = %err,
                "Save directory unavailable, progress will not be kept"
            );
            GameEngine::create(engine_config, SystemClock::new(), MemoryStore::new())
        }
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: GameEngine,
    config: &AppConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> GameState {
    let mut next_poll_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    // Commands sent before shutdown still count.
                    engine.tick();
                    return engine.dispose();
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Run due rules and queued commands
        let snapshot = engine.tick();

        // 3. Report what happened
        for event in engine.drain_events() {
            log_event(&event);
        }

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next poll
        next_poll_time += config.poll_interval;
        let now = Instant::now();
        if next_poll_time > now {
            std::thread::sleep(next_poll_time - now);
        } else if now - next_poll_time > config.poll_interval * 2 {
            // Too far behind; the engine replays missed firings on its own.
            next_poll_time = now;
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ObstacleSpawned { obstacle_id, kind } => {
            tracing::info!("Obstacle #{obstacle_id} appeared: {kind:?} (type `hit {obstacle_id}`)");
        }
        GameEvent::ObstacleDismissed { obstacle_id } => {
            tracing::info!("Obstacle #{obstacle_id} dismissed");
        }
        GameEvent::ObstacleExpired {
            obstacle_id,
            kind,
            damage,
        } => {
            tracing::warn!(
                "Obstacle #{obstacle_id} ({kind:?}) hit you for ${}",
                format_amount(*damage)
            );
        }
        GameEvent::UpgradePurchased {
            upgrade_id,
            new_level,
            cost,
        } => {
            tracing::info!(
                "Bought {upgrade_id} level {new_level} for ${}",
                format_amount(*cost)
            );
        }
        GameEvent::Victory { market_cap } => {
            tracing::info!("Target reached at ${}. You win!", format_amount(*market_cap));
        }
        GameEvent::Defeat => {
            tracing::info!("Market cap wiped out. Game over.");
        }
    }
}
