//! Domain records: upgrades, obstacles, and the `GameState` aggregate.
//!
//! These are plain data with derived-value helpers. Rules that mutate them
//! over time live in the simulation crate.

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_CLICK_VALUE, TARGET_MARKET_CAP, UPGRADE_CATALOG};
use crate::enums::{GamePhase, ObstacleKind};
use crate::types::{Millis, ObstacleId, Position};

/// Static economics of one upgrade line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: u64,
    /// Cost growth per owned level. Greater than 1.
    pub cost_multiplier: f64,
    /// Market cap per second granted by each level.
    pub passive_income: u64,
}

impl UpgradeDef {
    /// `floor(base_cost * cost_multiplier^level)`.
    ///
    /// Returns `None` when the result is not a finite, representable amount;
    /// callers treat that as unaffordable.
    pub fn cost_at(&self, level: u32) -> Option<u64> {
        let raw = self.base_cost as f64 * self.cost_multiplier.powf(level as f64);
        if !raw.is_finite() || raw < 0.0 || raw >= u64::MAX as f64 {
            return None;
        }
        Some(raw.floor() as u64)
    }
}

/// An upgrade line plus the number of levels the player owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    pub def: UpgradeDef,
    pub level: u32,
}

impl Upgrade {
    pub fn new(def: UpgradeDef) -> Self {
        Self { def, level: 0 }
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    /// Price of the next level.
    pub fn cost(&self) -> Option<u64> {
        self.def.cost_at(self.level)
    }

    /// Passive income this upgrade currently generates per payout.
    pub fn contribution(&self) -> u64 {
        self.def.passive_income.saturating_mul(self.level as u64)
    }
}

/// Fresh copies of the whole catalog, every level at zero.
pub fn initial_upgrades() -> Vec<Upgrade> {
    UPGRADE_CATALOG.iter().copied().map(Upgrade::new).collect()
}

/// A live obstacle on the play area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub position: Position,
    /// Engine clock time at which the obstacle spawned.
    pub created_at: Millis,
}

impl Obstacle {
    /// Age at `now`. Zero if `now` precedes the creation time.
    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.created_at)
    }

    pub fn is_expired(&self, now: Millis, lifetime: Millis) -> bool {
        self.age(now) >= lifetime
    }

    /// `floor(market_cap * damage%)`, computed exactly in integers.
    pub fn damage_against(&self, market_cap: u64) -> u64 {
        damage_for(self.kind, market_cap)
    }
}

/// Damage an obstacle of `kind` deals against `market_cap`.
pub fn damage_for(kind: ObstacleKind, market_cap: u64) -> u64 {
    let scaled = market_cap as u128 * kind.damage_bps() as u128;
    (scaled / crate::constants::BPS_DENOMINATOR as u128) as u64
}

/// The complete authoritative state of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub market_cap: u64,
    pub click_count: u64,
    /// Market cap per main click. Constant today but kept as state so it can scale.
    pub click_value: u64,
    /// Catalog order.
    pub upgrades: Vec<Upgrade>,
    /// Unordered.
    pub obstacles: Vec<Obstacle>,
    pub started: bool,
    pub won: bool,
    pub lost: bool,
    pub show_instructions: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            market_cap: 0,
            click_count: 0,
            click_value: BASE_CLICK_VALUE,
            upgrades: initial_upgrades(),
            obstacles: Vec::new(),
            started: false,
            won: false,
            lost: false,
            show_instructions: true,
        }
    }
}

impl GameState {
    /// A fresh game with the instructions overlay visible.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        if self.won {
            GamePhase::Won
        } else if self.lost {
            GamePhase::Lost
        } else if self.started {
            GamePhase::Playing
        } else {
            GamePhase::NotStarted
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id() == id)
    }

    pub fn upgrade_mut(&mut self, id: &str) -> Option<&mut Upgrade> {
        self.upgrades.iter_mut().find(|u| u.id() == id)
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Sum of `passive_income * level` over the catalog.
    pub fn total_passive_income(&self) -> u64 {
        self.upgrades
            .iter()
            .fold(0u64, |total, u| total.saturating_add(u.contribution()))
    }

    /// Whether the next level of `id` can be bought right now.
    pub fn can_afford(&self, id: &str) -> bool {
        self.upgrade(id)
            .and_then(Upgrade::cost)
            .is_some_and(|cost| self.market_cap >= cost)
    }

    /// Sets `won` if the market cap reached the target. Returns true on the transition.
    ///
    /// Live obstacles are discarded without dealing damage: nothing expires
    /// once the game is over.
    pub fn check_victory(&mut self) -> bool {
        if !self.won && !self.lost && self.market_cap >= TARGET_MARKET_CAP {
            self.won = true;
            self.obstacles.clear();
            return true;
        }
        false
    }

    /// Progress toward the target, clamped to 0..=100.
    pub fn progress_percent(&self) -> f64 {
        (self.market_cap as f64 / TARGET_MARKET_CAP as f64 * 100.0).min(100.0)
    }
}
