//! Obstacle spawning system: drops one random obstacle per firing once the
//! market cap is large enough to be worth attacking.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rugflip_core::components::{GameState, Obstacle};
use rugflip_core::constants::{
    OBSTACLE_SPAWN_MIN_MARKET_CAP, OBSTACLE_SPAWN_X_MAX, OBSTACLE_SPAWN_X_MIN,
    OBSTACLE_SPAWN_Y_MAX, OBSTACLE_SPAWN_Y_MIN,
};
use rugflip_core::enums::ObstacleKind;
use rugflip_core::types::{Millis, ObstacleId, Position};

/// Spawn an obstacle at time `now` unless the market cap is below the spawn floor.
///
/// Returns a copy of the new obstacle.
pub fn run(
    state: &mut GameState,
    rng: &mut ChaCha8Rng,
    next_obstacle_id: &mut u64,
    now: Millis,
) -> Option<Obstacle> {
    if state.market_cap < OBSTACLE_SPAWN_MIN_MARKET_CAP {
        return None;
    }

    let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
    let position = Position::new(
        rng.gen_range(OBSTACLE_SPAWN_X_MIN..OBSTACLE_SPAWN_X_MAX),
        rng.gen_range(OBSTACLE_SPAWN_Y_MIN..OBSTACLE_SPAWN_Y_MAX),
    );

    let id = ObstacleId(*next_obstacle_id);
    *next_obstacle_id += 1;

    let obstacle = Obstacle {
        id,
        kind,
        position,
        created_at: now,
    };
    state.obstacles.push(obstacle.clone());
    Some(obstacle)
}
