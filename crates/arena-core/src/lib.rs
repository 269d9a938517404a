//! # Arena Core
//!
//! Game logic for the Cyber Fantasy Battle Arena, independent of any user
//! interface: configuration and credential loading, the completion API
//! client, monster generation, narration and the battle state machine.
//!
//! ## Modules
//!
//! - `credential`: API key loading from `.env` / the process environment
//! - `settings`: `config.toml` + `ARENA_*` settings and combat rules
//! - `cloud`: OpenAI-compatible chat completion client
//! - `monster`, `hero`, `narrative`, `battle`: the game itself
//! - `theme`: UI palettes

pub mod battle;
pub mod cloud;
pub mod credential;
pub mod error;
pub mod hero;
pub mod monster;
pub mod narrative;
pub mod settings;
pub mod theme;

#[cfg(test)]
mod testing;

pub use error::{ArenaError, Result};
