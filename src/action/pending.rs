//! Pending moves and resolution results.

use serde::{Deserialize, Serialize};

use crate::core::Args;
use crate::selection::ResolvedSelection;

/// What the player has to do next for a pending move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PendingStep {
    /// Pick this action among several.
    ChooseAction,
    /// Supply a value for this selection.
    Select(ResolvedSelection),
    /// Every selection is filled; submit to complete.
    Confirm,
}

/// One step of an in-progress move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingMove {
    /// Action name.
    pub action: String,
    /// Arguments accumulated so far.
    pub args: Args,
    /// Next step.
    pub step: PendingStep,
}

impl PendingMove {
    /// Pending move asking for `selection`.
    #[must_use]
    pub fn select(action: impl Into<String>, args: Args, selection: ResolvedSelection) -> Self {
        Self {
            action: action.into(),
            args,
            step: PendingStep::Select(selection),
        }
    }

    /// The selection to fill, if this step has one.
    #[must_use]
    pub fn selection(&self) -> Option<&ResolvedSelection> {
        match &self.step {
            PendingStep::Select(selection) => Some(selection),
            PendingStep::ChooseAction | PendingStep::Confirm => None,
        }
    }

    /// Name of the selection to fill, if any.
    #[must_use]
    pub fn selection_name(&self) -> Option<&str> {
        self.selection().map(|s| s.name.as_str())
    }
}

/// Result of exploring a partial move.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// No completion exists for these arguments.
    Infeasible,
    /// Remaining steps; empty when the move is fully specified.
    Steps(Vec<PendingMove>),
}

impl Resolution {
    /// Whether no completion exists.
    #[must_use]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Resolution::Infeasible)
    }

    /// Whether the move is fully specified.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Resolution::Steps(steps) if steps.is_empty())
    }

    /// Remaining steps; empty when infeasible.
    #[must_use]
    pub fn steps(&self) -> &[PendingMove] {
        match self {
            Resolution::Infeasible => &[],
            Resolution::Steps(steps) => steps,
        }
    }

    /// Remaining steps, or `None` when infeasible.
    #[must_use]
    pub fn into_steps(self) -> Option<Vec<PendingMove>> {
        match self {
            Resolution::Infeasible => None,
            Resolution::Steps(steps) => Some(steps),
        }
    }
}
