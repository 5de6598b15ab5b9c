//! RUGFLIP headless host.
//!
//! This crate wires the game engine to the wall clock and a save directory,
//! runs it on a dedicated game loop thread, and exposes a small line-based
//! console in place of the browser frontend.

pub mod config;
pub mod console;
pub mod game_loop;
pub mod state;

pub use rugflip_core as core;
