//! Host configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Runtime settings for the headless host.
///
/// Game balance is fixed in `rugflip_core::constants`; only host concerns
/// are configurable here.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Directory holding the saved game.
    pub save_dir: PathBuf,
    /// Seed for obstacle spawning.
    pub seed: u64,
    /// How often the game loop polls the engine.
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            seed: time_seed(),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl AppConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUGFLIP_SAVE_DIR` - save directory (default: `./saves`)
    /// - `RUGFLIP_SEED` - obstacle RNG seed (default: derived from the current time)
    /// - `RUGFLIP_POLL_MS` - game loop poll interval in ms (default: 50, min: 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RUGFLIP_SAVE_DIR") {
            if !dir.trim().is_empty() {
                config.save_dir = PathBuf::from(dir);
            }
        }
        if let Some(seed) = read_env::<u64>("RUGFLIP_SEED") {
            config.seed = seed;
        }
        if let Some(poll_ms) = read_env::<u64>("RUGFLIP_POLL_MS") {
            config.poll_interval = Duration::from_millis(poll_ms.max(1));
        }

        config
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
