//! Board graph: the queryable, mutable data source behind board selections.
//!
//! Games build their board at setup from spaces and pieces, then let
//! behaviors move pieces around. Selections only ever read it.

pub mod attributes;
pub mod element;
pub mod graph;
pub mod query;

pub use attributes::{AttributeValue, Attributes};
pub use element::{Element, Visibility};
pub use graph::{Board, BRANCH_SEPARATOR};
pub use query::{ElementFilter, ElementPredicate, ElementQuery};
