//! Core engine types: players, element ids, arguments, RNG, configuration, state.
//!
//! This module holds the game-agnostic building blocks every other module
//! shares. Games never extend it; they configure it.

pub mod argument;
pub mod config;
pub mod element;
pub mod player;
pub mod rng;
pub mod state;

pub use argument::{Args, Argument, ElementList};
pub use config::{EngineConfig, DEFAULT_NUMBER_MIN, DEFAULT_UNBOUNDED_THRESHOLD};
pub use element::ElementId;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::GameState;
