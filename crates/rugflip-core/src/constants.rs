//! Game constants and tuning parameters.

use crate::components::UpgradeDef;

// --- Win condition ---

/// Market cap at which the game is won (11.3B).
pub const TARGET_MARKET_CAP: u64 = 11_300_000_000;

// --- Clicking ---

/// Market cap added per main-button click at game start.
pub const BASE_CLICK_VALUE: u64 = 10_000;

// --- Rule timers (milliseconds) ---

/// Interval between passive income payouts.
pub const PASSIVE_INCOME_INTERVAL_MS: u64 = 1_000;

/// Interval between obstacle spawn attempts.
pub const OBSTACLE_SPAWN_INTERVAL_MS: u64 = 5_000;

/// Interval between obstacle expiry checks.
pub const OBSTACLE_EXPIRY_CHECK_INTERVAL_MS: u64 = 1_000;

/// How long an obstacle stays on screen before it hits the market cap.
pub const OBSTACLE_LIFETIME_MS: u64 = 3_000;

// --- Obstacle spawning ---

/// Obstacles only spawn once the market cap reaches this floor.
pub const OBSTACLE_SPAWN_MIN_MARKET_CAP: u64 = 100_000;

/// Horizontal spawn range, percent of play-area width.
pub const OBSTACLE_SPAWN_X_MIN: f64 = 10.0;
pub const OBSTACLE_SPAWN_X_MAX: f64 = 90.0;

/// Vertical spawn range, percent of play-area height.
pub const OBSTACLE_SPAWN_Y_MIN: f64 = 20.0;
pub const OBSTACLE_SPAWN_Y_MAX: f64 = 80.0;

// --- Obstacle damage (basis points of current market cap) ---

/// Fake rug: 10%.
pub const FAKE_RUG_DAMAGE_BPS: u32 = 1_000;

/// Scam bot: 5%.
pub const SCAM_BOT_DAMAGE_BPS: u32 = 500;

/// Pump trap: 15%.
pub const PUMP_TRAP_DAMAGE_BPS: u32 = 1_500;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

// --- Persistence ---

/// Key of the single saved-game record.
pub const STORAGE_KEY: &str = "rugflip-game-state";

// --- Upgrades ---

/// The fixed upgrade catalog, in display order.
pub const UPGRADE_CATALOG: [UpgradeDef; 4] = [
    UpgradeDef {
        id: "auto-flipper",
        name: "Auto Flipper",
        description: "Automatically flips rugs for passive income",
        base_cost: 50_000,
        cost_multiplier: 1.5,
        passive_income: 100,
    },
    UpgradeDef {
        id: "whale-investor",
        name: "Whale Investor",
        description: "Attracts big investors for massive passive gains",
        base_cost: 500_000,
        cost_multiplier: 1.8,
        passive_income: 1_000,
    },
    UpgradeDef {
        id: "marketing-bot",
        name: "Marketing Bot",
        description: "Spreads hype and increases market cap generation",
        base_cost: 2_000_000,
        cost_multiplier: 2.0,
        passive_income: 5_000,
    },
    UpgradeDef {
        id: "diamond-hands",
        name: "Diamond Hands",
        description: "Prevents market cap loss from obstacles",
        base_cost: 10_000_000,
        cost_multiplier: 2.2,
        passive_income: 20_000,
    },
];
