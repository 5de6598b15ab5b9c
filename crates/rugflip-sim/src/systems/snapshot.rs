//! Snapshot system: builds a complete GameStateSnapshot from the game state.
//!
//! This system is read-only. It never modifies the state.

use rugflip_core::components::{GameState, Obstacle, Upgrade};
use rugflip_core::constants::TARGET_MARKET_CAP;
use rugflip_core::state::*;
use rugflip_core::types::Millis;

/// Build a snapshot of `state` as seen at time `now`.
pub fn build_snapshot(state: &GameState, now: Millis, obstacle_lifetime: Millis) -> GameStateSnapshot {
    GameStateSnapshot {
        phase: state.phase(),
        market_cap: state.market_cap,
        target_market_cap: TARGET_MARKET_CAP,
        progress_percent: state.progress_percent(),
        click_count: state.click_count,
        click_value: state.click_value,
        passive_income_per_sec: state.total_passive_income(),
        upgrades: state
            .upgrades
            .iter()
            .map(|u| build_upgrade(u, state.market_cap))
            .collect(),
        obstacles: state
            .obstacles
            .iter()
            .map(|o| build_obstacle(o, now, obstacle_lifetime))
            .collect(),
        started: state.started,
        won: state.won,
        lost: state.lost,
        show_instructions: state.show_instructions,
    }
}

fn build_upgrade(upgrade: &Upgrade, market_cap: u64) -> UpgradeView {
    let cost = upgrade.cost();
    UpgradeView {
        id: upgrade.def.id.to_string(),
        name: upgrade.def.name.to_string(),
        description: upgrade.def.description.to_string(),
        level: upgrade.level,
        cost,
        income_per_level: upgrade.def.passive_income,
        contribution: upgrade.contribution(),
        affordable: cost.is_some_and(|c| market_cap >= c),
    }
}

fn build_obstacle(obstacle: &Obstacle, now: Millis, lifetime: Millis) -> ObstacleView {
    let age_ms = obstacle.age(now);
    ObstacleView {
        id: obstacle.id,
        kind: obstacle.kind,
        position: obstacle.position,
        age_ms,
        remaining_ms: lifetime.saturating_sub(age_ms),
        damage_percent: obstacle.kind.damage_percent(),
    }
}
