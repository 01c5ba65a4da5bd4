//! Card Duel - turn-based card battle engine
//!
//! Two combatants draw from rarity-weighted pools, trade cards each round and
//! resolve power, defense and ability effects until one side falls. The
//! engine owns all game rules; presentation layers drive it through
//! [`game::GameStore`] and read back its state.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod simulate;
pub mod zones;

pub use config::{GameConfig, GameMode};
pub use error::{DuelError, Result};
