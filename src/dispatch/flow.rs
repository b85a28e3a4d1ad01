//! Turn-flow seam.
//!
//! Games implement `TurnFlow` to say which actions a player may take right
//! now, and to advance their own turn structure once a move completes.
//! The dispatch layer never interprets phases or turn order itself.

use serde::{Deserialize, Serialize};

use crate::action::MoveOutcome;
use crate::core::{GameState, PlayerId};

/// Actions currently offered to a player, with the fold policy to apply
/// across them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    /// Prompt for choosing among the actions.
    pub prompt: Option<String>,
    /// Allowed action names.
    pub actions: Vec<String>,
    /// Skip the choose-action step when only one action is feasible.
    pub skip_if_only_one: bool,
    /// Surface every action's first selections together.
    pub expand: bool,
}

impl ActionStep {
    /// Offer `actions` with the default policy.
    pub fn new<S: Into<String>>(actions: impl IntoIterator<Item = S>) -> Self {
        Self {
            prompt: None,
            actions: actions.into_iter().map(Into::into).collect(),
            skip_if_only_one: true,
            expand: false,
        }
    }

    /// Nothing allowed.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set whether a lone feasible action is surfaced directly.
    #[must_use]
    pub fn with_skip_if_only_one(mut self, skip: bool) -> Self {
        self.skip_if_only_one = skip;
        self
    }

    /// Set whether actions are expanded into their first selections.
    #[must_use]
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Check if an action is allowed.
    #[must_use]
    pub fn allows(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}

/// Turn structure of a game.
///
/// ## Implementation Notes
///
/// - `allowed_actions`: return `ActionStep::none()` when the player can't act
/// - `after_move`: called once per completed move, after its behaviors
pub trait TurnFlow {
    /// Actions `player` may take now.
    fn allowed_actions(&self, state: &GameState, player: PlayerId) -> ActionStep;

    /// Advance the flow after `player` completed `action`.
    ///
    /// Follow-ups queued by behaviors are in `outcome`.
    fn after_move(
        &mut self,
        _state: &mut GameState,
        _player: PlayerId,
        _action: &str,
        _outcome: &MoveOutcome,
    ) {
    }
}
