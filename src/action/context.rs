//! Execution context for completed moves.

use serde::{Deserialize, Serialize};

use crate::core::{Args, GameState, PlayerId};

/// An action a behavior asks the flow to run next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    /// Action name.
    pub action: String,
    /// Arguments already chosen for it.
    pub args: Args,
}

/// What behaviors see while a completed move is applied.
///
/// The only place the game state is reachable mutably during a move.
pub struct MoveContext<'a> {
    /// Game state, mutable.
    pub state: &'a mut GameState,
    /// Player making the move.
    pub player: PlayerId,
    follow_ups: Vec<FollowUp>,
}

impl<'a> MoveContext<'a> {
    /// Create a context for `player`.
    pub fn new(state: &'a mut GameState, player: PlayerId) -> Self {
        Self {
            state,
            player,
            follow_ups: Vec::new(),
        }
    }

    /// Queue an action for the flow to run after this move.
    pub fn follow_up(&mut self, action: impl Into<String>, args: Args) {
        self.follow_ups.push(FollowUp {
            action: action.into(),
            args,
        });
    }

    /// Follow-ups queued so far.
    #[must_use]
    pub fn follow_ups(&self) -> &[FollowUp] {
        &self.follow_ups
    }

    pub(crate) fn into_follow_ups(self) -> Vec<FollowUp> {
        self.follow_ups
    }
}

/// Result of a completed move.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Actions queued by behaviors, in the order queued.
    pub follow_ups: Vec<FollowUp>,
    /// Interpolated action messages.
    pub messages: Vec<String>,
}
