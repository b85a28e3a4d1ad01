//! Engine errors.
//!
//! Everything a player can cause (an infeasible choice, a bad value, an
//! unfinished move, a failing behavior) is an ordinary `Err` value.
//! Game-definition bugs (unknown action names, duplicate registrations)
//! panic instead.

/// Why a supplied value was rejected by its selection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Value is not one of the enumerated choices.
    #[error("{value} is not a valid choice")]
    NotAChoice { value: String },

    /// Element is not among the selectable elements.
    #[error("{value} is not a valid selection")]
    NotAnElement { value: String },

    /// Multi-select picked too few or too many elements.
    #[error("must select between {min} and {max} elements, got {got}")]
    WrongCount { min: usize, max: String, got: usize },

    /// Numeric selection received something else.
    #[error("must be a number")]
    NotANumber,

    /// Number below the minimum.
    #[error("must be at least {min}")]
    BelowMinimum { min: i64 },

    /// Number above the maximum.
    #[error("must be at most {max}")]
    AboveMaximum { max: i64 },

    /// Text does not match the selection's pattern.
    #[error("must match {pattern}")]
    PatternMismatch { pattern: String },

    /// Button pressed with a value it does not carry.
    #[error("invalid button")]
    WrongButton,

    /// Value of the wrong kind altogether.
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
}

/// Error raised by an action behavior.
///
/// Any message will do; it is surfaced to the player unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BehaviorError(pub String);

impl From<&str> for BehaviorError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for BehaviorError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Outcome of submitting a move that did not complete.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// No completion exists for the supplied arguments.
    #[error("{action}: no valid completion for this move")]
    Infeasible { action: String },

    /// Valid so far, but more selections remain.
    #[error("{action}: incomplete action")]
    Incomplete { action: String },

    /// A supplied argument failed validation.
    #[error("{selection}: {reason}")]
    Invalid {
        selection: String,
        reason: ValidationError,
    },

    /// A behavior failed while the move was being applied.
    #[error("{action}: {source}")]
    Behavior {
        action: String,
        #[source]
        source: BehaviorError,
    },

    /// The action is not currently allowed for this player.
    #[error("{action} is not allowed now")]
    NotAllowed { action: String },

    /// The player does not exist in this game.
    #[error("no such player")]
    NoSuchPlayer,
}

impl MoveError {
    /// Whether the move only needs more input.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, MoveError::Incomplete { .. })
    }
}

/// Failure converting an argument from its wire form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// A `$`-prefixed handle that could not be parsed.
    #[error("malformed handle {0}")]
    MalformedHandle(String),

    /// Player position not seated in this game.
    #[error("no player at position {0}")]
    UnknownPlayer(usize),

    /// Branch path that does not exist on this board.
    #[error("no element at branch {0}")]
    UnknownBranch(String),

    /// A list containing something other than element handles.
    #[error("lists may only contain elements")]
    MixedList,
}

/// Failure saving or restoring a game snapshot.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Binary (de)serialization failed.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    /// JSON (de)serialization failed.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Wire argument conversion failed.
    #[error(transparent)]
    Wire(#[from] WireError),
}
