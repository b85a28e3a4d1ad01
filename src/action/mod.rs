//! Actions: ordered selections, recursive resolution, and completion.
//!
//! The resolution state machine of a single move:
//!
//! ```text
//! gathering(args) --validate+resolve--> gathering(more args)
//!                                   \-> infeasible   (MoveError::Infeasible)
//!                                   \-> complete     (behaviors run)
//! ```

mod context;
mod definition;
mod pending;

pub use context::{FollowUp, MoveContext, MoveOutcome};
pub use definition::{Action, Behavior};
pub use pending::{PendingMove, PendingStep, Resolution};
