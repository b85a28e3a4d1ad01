//! Typed choices within an action.
//!
//! - `Selection`: definition-time descriptor with constant or computed settings
//! - `ResolvedSelection`: snapshot evaluated against prior arguments
//! - `Field`: the constant-or-computed wrapper

mod definition;
mod field;
mod resolved;

pub use definition::Selection;
pub use field::{Compute, Field, ResolveContext};
pub use resolved::{combinations, Choice, ResolvedKind, ResolvedSelection};
