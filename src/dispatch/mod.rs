//! Action registry and action-level aggregation.
//!
//! - `ActionRegistry`: action names to per-player factories
//! - `TurnFlow`: the turn-structure seam games implement
//! - `Game`: `allowed_actions`, `resolved_selections`, `process_move`

mod flow;
mod game;
mod registry;

pub use flow::{ActionStep, TurnFlow};
pub use game::{Game, ResolvedMoves};
pub use registry::{ActionFactory, ActionRegistry};
