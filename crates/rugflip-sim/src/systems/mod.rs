//! Rule systems that operate on the game state when their timer fires.
//!
//! Systems are plain functions over `&mut GameState` (or `&GameState` for
//! read-only). They do not own state; persistence and events are the
//! engine's job.

pub mod obstacle_expiry;
pub mod obstacle_spawner;
pub mod passive_income;
pub mod snapshot;
