//! Simple worker-placement game for exercising the engine.
//!
//! A minimal game built only on the public API:
//! - A 3x3 map of spaces, each yielding oil or garbage
//! - Each player has a mat (resources and score) and a supply of workers
//! - On your turn: place a worker on an empty space, trade resources for
//!   points, or pass
//! - Bonus spaces grant an immediate extra trade
//! - The game ends once every player passes in a row
//!
//! Supports 2-4 players.

mod game;

pub use game::{holding, mat_of, registry, SimpleFlow, SimpleGameBuilder, RESOURCES};
