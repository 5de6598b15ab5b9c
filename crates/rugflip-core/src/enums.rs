//! Enumeration types used throughout the game.

use serde::{Deserialize, Serialize};

use crate::constants::{FAKE_RUG_DAMAGE_BPS, PUMP_TRAP_DAMAGE_BPS, SCAM_BOT_DAMAGE_BPS};

/// Obstacle kind. Each kind carries a fixed damage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObstacleKind {
    /// Fake rug pull: 10% of market cap.
    FakeRug,
    /// Scam bot: 5% of market cap.
    ScamBot,
    /// Pump trap: 15% of market cap.
    PumpTrap,
}

impl ObstacleKind {
    /// Every kind, in spawn-table order.
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::FakeRug,
        ObstacleKind::ScamBot,
        ObstacleKind::PumpTrap,
    ];

    /// Damage dealt on expiry, in basis points of the market cap.
    pub fn damage_bps(&self) -> u32 {
        match self {
            ObstacleKind::FakeRug => FAKE_RUG_DAMAGE_BPS,
            ObstacleKind::ScamBot => SCAM_BOT_DAMAGE_BPS,
            ObstacleKind::PumpTrap => PUMP_TRAP_DAMAGE_BPS,
        }
    }

    /// Damage as a whole percentage, for display.
    pub fn damage_percent(&self) -> f64 {
        self.damage_bps() as f64 / 100.0
    }
}

/// Game phase (top-level state), derived from the started/won/lost flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    /// Whether gameplay rules and clicks take effect.
    pub fn is_playing(&self) -> bool {
        *self == GamePhase::Playing
    }

    /// Whether the game has ended in victory or defeat.
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}
