//! Action registry.
//!
//! Maps action names to factories that build an `Action` for the acting
//! player and the current state. Actions are built fresh for every
//! resolution, so conditions and choices can close over the player.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::action::Action;
use crate::core::{GameState, PlayerId};

/// Builds an action for a player.
pub type ActionFactory = Rc<dyn Fn(PlayerId, &GameState) -> Action>;

/// Registry of the game's actions.
///
/// ## Example
///
/// ```
/// use rust_tabletop::action::Action;
/// use rust_tabletop::core::{GameState, PlayerId};
/// use rust_tabletop::dispatch::ActionRegistry;
///
/// let mut registry = ActionRegistry::new();
/// registry.register("pass", |_, _| Action::new().prompt("Pass"));
///
/// let state = GameState::new(2, 1);
/// let pass = registry.build("pass", PlayerId::new(0), &state);
/// assert_eq!(pass.name(), "pass");
/// ```
#[derive(Clone, Default)]
pub struct ActionRegistry {
    factories: FxHashMap<String, ActionFactory>,
    order: Vec<String>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry").field("actions", &self.order).finish()
    }
}

impl ActionRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action factory.
    ///
    /// Panics if an action with the same name already exists.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(PlayerId, &GameState) -> Action + 'static,
    ) {
        let name = name.into();
        if self.factories.contains_key(&name) {
            panic!("Action {name} already registered");
        }
        self.order.push(name.clone());
        self.factories.insert(name, Rc::new(factory));
    }

    /// Build the named action for `player`.
    ///
    /// Panics if no such action was registered.
    #[must_use]
    pub fn build(&self, name: &str, player: PlayerId, state: &GameState) -> Action {
        let factory = self
            .factories
            .get(name)
            .unwrap_or_else(|| panic!("Action {name} not registered"));
        factory(player, state).named(name)
    }

    /// Check if an action is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Get the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Action names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
