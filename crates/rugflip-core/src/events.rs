//! Events emitted by the engine for UI and sound feedback.

use serde::{Deserialize, Serialize};

use crate::enums::ObstacleKind;
use crate::types::ObstacleId;

/// Something the presentation layer may want to animate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A new obstacle appeared.
    ObstacleSpawned { obstacle_id: ObstacleId, kind: ObstacleKind },
    /// The player dismissed an obstacle in time.
    ObstacleDismissed { obstacle_id: ObstacleId },
    /// An obstacle timed out and hit the market cap.
    ObstacleExpired {
        obstacle_id: ObstacleId,
        kind: ObstacleKind,
        damage: u64,
    },
    /// One upgrade level was bought.
    UpgradePurchased {
        upgrade_id: String,
        new_level: u32,
        cost: u64,
    },
    /// The market cap reached the target.
    Victory { market_cap: u64 },
    /// The market cap was wiped out.
    Defeat,
}
