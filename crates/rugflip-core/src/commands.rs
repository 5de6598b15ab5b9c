//! Player commands sent from the frontend to the engine.
//!
//! Commands are fire-and-forget. The engine validates each one and silently
//! ignores it when the phase or target id does not allow it.

use serde::{Deserialize, Serialize};

use crate::types::ObstacleId;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Leave the briefing and begin playing.
    StartGame,
    /// Wipe all progress and the saved game.
    ResetGame,
    /// Show or hide the instructions overlay.
    ToggleInstructions,
    /// Tap the main button.
    ClickMain,
    /// Dismiss a live obstacle before it expires.
    ClickObstacle { obstacle_id: ObstacleId },
    /// Buy one level of an upgrade.
    BuyUpgrade { upgrade_id: String },
}
