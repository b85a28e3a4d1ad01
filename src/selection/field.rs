//! Constant-or-computed selection fields.
//!
//! Most selection settings are known when the game is defined. Some depend
//! on earlier choices in the same move ("pick up to as many as the number
//! you chose"); those are `Computed` and evaluated once per resolution.

use std::rc::Rc;

use crate::board::ElementQuery;
use crate::core::{Args, ElementId, GameState, PlayerId};

/// Read-only inputs available to computed fields.
///
/// Holds a shared borrow of the game state: computed fields can query the
/// board but never change it.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Current game state.
    pub state: &'a GameState,
    /// Arguments chosen so far in this move.
    pub args: &'a Args,
}

impl<'a> ResolveContext<'a> {
    /// Create a new context.
    #[must_use]
    pub fn new(state: &'a GameState, args: &'a Args) -> Self {
        Self { state, args }
    }

    /// Player whose viewpoint is active.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        self.state.viewpoint()
    }

    /// Board query from the active viewpoint.
    #[must_use]
    pub fn all(&self, query: &ElementQuery) -> Vec<ElementId> {
        self.state.all(query)
    }
}

/// Computation over prior arguments.
pub type Compute<T> = Rc<dyn Fn(&ResolveContext<'_>) -> T>;

/// A selection setting: either fixed or computed from prior arguments.
pub enum Field<T> {
    /// Known at definition time.
    Constant(T),
    /// Evaluated against prior arguments at resolution time.
    Computed(Compute<T>),
}

impl<T: Clone> Field<T> {
    /// Wrap a computation.
    pub fn computed(f: impl Fn(&ResolveContext<'_>) -> T + 'static) -> Self {
        Field::Computed(Rc::new(f))
    }

    /// Collapse to a concrete value.
    #[must_use]
    pub fn resolve(&self, cx: &ResolveContext<'_>) -> T {
        match self {
            Field::Constant(v) => v.clone(),
            Field::Computed(f) => f(cx),
        }
    }

    /// Whether this field depends on prior arguments.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, Field::Computed(_))
    }

    /// The constant value, if this field has one.
    #[must_use]
    pub fn constant(&self) -> Option<&T> {
        match self {
            Field::Constant(v) => Some(v),
            Field::Computed(_) => None,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Constant(value)
    }
}

impl<T: Clone> Clone for Field<T> {
    fn clone(&self) -> Self {
        match self {
            Field::Constant(v) => Field::Constant(v.clone()),
            Field::Computed(f) => Field::Computed(Rc::clone(f)),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Field::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
