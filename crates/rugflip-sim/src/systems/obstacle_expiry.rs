//! Obstacle expiry system: removes obstacles that outlived their lifetime and
//! charges their damage against the market cap.
//!
//! Every obstacle expiring in the same firing is priced off the market cap as
//! it stood before the firing. Damages are summed and subtracted once. A
//! firing that ends the game drops the obstacles still alive.

use rugflip_core::components::{GameState, Obstacle};
use rugflip_core::types::Millis;

/// What one expiry check did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpiryOutcome {
    /// Expired obstacles with the damage each one dealt.
    pub expired: Vec<(Obstacle, u64)>,
    pub total_damage: u64,
    /// The damage wiped out a positive market cap.
    pub defeat: bool,
}

/// Expire every obstacle whose age at `now` reached `lifetime`.
pub fn run(state: &mut GameState, now: Millis, lifetime: Millis) -> ExpiryOutcome {
    let (expired, live): (Vec<Obstacle>, Vec<Obstacle>) = std::mem::take(&mut state.obstacles)
        .into_iter()
        .partition(|o| o.is_expired(now, lifetime));
    state.obstacles = live;

    if expired.is_empty() {
        return ExpiryOutcome::default();
    }

    let before = state.market_cap;
    let expired: Vec<(Obstacle, u64)> = expired
        .into_iter()
        .map(|o| {
            let damage = o.damage_against(before);
            (o, damage)
        })
        .collect();
    let total_damage = expired
        .iter()
        .fold(0u64, |sum, (_, damage)| sum.saturating_add(*damage));

    state.market_cap = before.saturating_sub(total_damage);

    let defeat = before > 0 && state.market_cap == 0 && !state.won && !state.lost;
    if defeat {
        state.lost = true;
        state.obstacles.clear();
    }

    ExpiryOutcome {
        expired,
        total_damage,
        defeat,
    }
}
