//! Game state snapshot: the complete visible state handed to the frontend.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Millis, ObstacleId, Position};

/// Immutable view of the game, rebuilt on request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub phase: GamePhase,
    pub market_cap: u64,
    pub target_market_cap: u64,
    /// Progress toward the target (0-100).
    pub progress_percent: f64,
    pub click_count: u64,
    pub click_value: u64,
    /// Passive income paid per income tick.
    pub passive_income_per_sec: u64,
    pub upgrades: Vec<UpgradeView>,
    pub obstacles: Vec<ObstacleView>,
    pub started: bool,
    pub won: bool,
    pub lost: bool,
    pub show_instructions: bool,
}

/// One upgrade line for the shop panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub level: u32,
    /// Price of the next level. `None` when it cannot be represented.
    pub cost: Option<u64>,
    /// Income granted by each level.
    pub income_per_level: u64,
    /// Income currently granted by all owned levels.
    pub contribution: u64,
    pub affordable: bool,
}

/// A live obstacle for the obstacle layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub position: Position,
    pub age_ms: Millis,
    /// Time left before it expires (countdown ring).
    pub remaining_ms: Millis,
    pub damage_percent: f64,
}
