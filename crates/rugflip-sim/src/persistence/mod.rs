//! Save-game persistence.
//!
//! Progress is stored as one JSON record in a key-value store. Live obstacles
//! and the instructions overlay are never part of the record. Loading never
//! fails: unreadable data is reported as [`LoadOutcome::Corrupt`] and the
//! caller starts a fresh game.

mod error;
mod file;
mod memory;

pub use error::{PersistenceError, Result};
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use rugflip_core::components::{initial_upgrades, GameState};
use rugflip_core::constants::BASE_CLICK_VALUE;

/// A string key-value store. Writes are last-write-wins.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// The durable part of a [`GameState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveRecord {
    pub resource: u64,
    pub click_count: u64,
    pub click_value: u64,
    pub upgrades: Vec<SavedUpgrade>,
    pub started: bool,
    pub won: bool,
    pub lost: bool,
}

/// Owned level of one upgrade line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedUpgrade {
    pub id: String,
    pub level: u32,
}

impl Default for SaveRecord {
    fn default() -> Self {
        Self {
            resource: 0,
            click_count: 0,
            click_value: BASE_CLICK_VALUE,
            upgrades: Vec::new(),
            started: false,
            won: false,
            lost: false,
        }
    }
}

impl SaveRecord {
    pub fn capture(state: &GameState) -> Self {
        Self {
            resource: state.market_cap,
            click_count: state.click_count,
            click_value: state.click_value,
            upgrades: state
                .upgrades
                .iter()
                .map(|u| SavedUpgrade {
                    id: u.id().to_string(),
                    level: u.level,
                })
                .collect(),
            started: state.started,
            won: state.won,
            lost: state.lost,
        }
    }

    /// Reject records that no reachable game state could have produced.
    pub fn validate(&self) -> Result<()> {
        if self.won && self.lost {
            return Err(PersistenceError::Invalid(
                "record is marked both won and lost".into(),
            ));
        }
        Ok(())
    }

    /// Rebuild a game state from this record.
    ///
    /// Upgrade levels are matched by id against the current catalog; unknown
    /// ids are dropped and missing ones stay at level 0. Obstacles start empty
    /// and the instructions overlay is always shown. A record already at the
    /// target comes back won.
    pub fn restore(&self) -> GameState {
        let mut upgrades = initial_upgrades();
        for saved in &self.upgrades {
            match upgrades.iter_mut().find(|u| u.id() == saved.id) {
                Some(upgrade) => upgrade.level = saved.level,
                None => tracing::debug!(id = %saved.id, "ignoring unknown upgrade in saved game"),
            }
        }

        let mut state = GameState {
            market_cap: self.resource,
            click_count: self.click_count,
            click_value: self.click_value,
            upgrades,
            obstacles: Vec::new(),
            started: self.started,
            won: self.won,
            lost: self.lost,
            show_instructions: true,
        };
        if state.check_victory() {
            tracing::debug!(market_cap = state.market_cap, "saved game was already at the target");
        }
        state
    }
}

/// Result of reading the saved game.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(SaveRecord),
    Absent,
    Corrupt(PersistenceError),
}

impl LoadOutcome {
    /// The state to resume from. Absent and corrupt records both yield a fresh game.
    pub fn into_state(self) -> GameState {
        match self {
            LoadOutcome::Loaded(record) => record.restore(),
            LoadOutcome::Absent | LoadOutcome::Corrupt(_) => GameState::new(),
        }
    }
}

/// Read and validate the record stored under `key`.
pub fn load(store: &dyn KeyValueStore, key: &str) -> LoadOutcome {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LoadOutcome::Absent,
        Err(err) => return LoadOutcome::Corrupt(err),
    };

    let record: SaveRecord = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(err) => return LoadOutcome::Corrupt(err.into()),
    };

    match record.validate() {
        Ok(()) => LoadOutcome::Loaded(record),
        Err(err) => LoadOutcome::Corrupt(err),
    }
}

/// Write the durable part of `state` under `key`.
pub fn save(store: &mut dyn KeyValueStore, key: &str, state: &GameState) -> Result<()> {
    let json = serde_json::to_string(&SaveRecord::capture(state))?;
    store.set(key, &json)
}

/// Delete the record stored under `key`.
pub fn clear(store: &mut dyn KeyValueStore, key: &str) -> Result<()> {
    store.remove(key)
}
