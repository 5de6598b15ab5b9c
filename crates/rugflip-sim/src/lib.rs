//! Game engine for RUGFLIP.
//!
//! Owns the authoritative `GameState`, applies player commands, runs the
//! timed rules (passive income, obstacle spawn, obstacle expiry) against an
//! injected clock, and persists progress to a key-value store.

pub mod clock;
pub mod engine;
pub mod persistence;
pub mod schedule;
pub mod systems;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineConfig, GameEngine, RuleTimings};
pub use rugflip_core as core;

#[cfg(test)]
mod tests;
