//! Core types and definitions for the RUGFLIP game engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, and constants.
//! It has no dependency on any runtime, timer, or storage backend.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod format;
pub mod state;
pub mod types;
