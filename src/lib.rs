//! # rust-tabletop
//!
//! Action-resolution engine for turn-based board games.
//!
//! ## Design Principles
//!
//! 1. **Declared, not coded**: games declare actions as ordered selections
//!    plus behaviors; the engine works out what a player can do next.
//!
//! 2. **Lookahead is read-only**: the feasibility search only ever sees
//!    `&GameState`. Behaviors, which run once a move is complete, are the
//!    only code handed `&mut GameState`.
//!
//! 3. **Errors are values**: infeasible, incomplete and invalid moves are
//!    ordinary `Err` results. Only game-definition bugs panic.
//!
//! ## Architecture
//!
//! - **Feasibility search**: `Action::resolved_selections` explores
//!   remaining selections depth-first, prunes dead-end candidates, skips
//!   single-valued choices and expands choices ahead of time on request.
//!
//! - **Persistent Data Structures**: `Args` is an `im::OrdMap`, so each
//!   hypothetical extension during the search is cheap.
//!
//! - **Trust boundary**: client input arrives as wire arguments with
//!   `$p[..]`/`$el[..]` handles and is rehydrated against the live board.
//!
//! ## Modules
//!
//! - `core`: players, elements, arguments, RNG, configuration, game state
//! - `board`: element graph and queries
//! - `selection`: typed choices and their resolution
//! - `action`: actions, pending moves, move processing
//! - `dispatch`: action registry, turn-flow seam, `Game` facade
//! - `wire`: argument and pending-move serialization
//! - `error`: error types

pub mod action;
pub mod board;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod games;
pub mod selection;
pub mod wire;

// Re-export commonly used types
pub use crate::core::{
    Args, Argument, ElementId, ElementList, EngineConfig, GameRng, GameRngState, GameState,
    PlayerId, PlayerMap,
};

pub use crate::board::{
    AttributeValue, Attributes, Board, Element, ElementFilter, ElementQuery, Visibility,
};

pub use crate::selection::{
    Choice, Field, ResolveContext, ResolvedKind, ResolvedSelection, Selection,
};

pub use crate::action::{
    Action, FollowUp, MoveContext, MoveOutcome, PendingMove, PendingStep, Resolution,
};

pub use crate::dispatch::{ActionRegistry, ActionStep, Game, ResolvedMoves, TurnFlow};

pub use crate::error::{BehaviorError, EngineError, MoveError, ValidationError, WireError};

pub use crate::wire::{deserialize_arg, serialize_arg, WireArgument};
