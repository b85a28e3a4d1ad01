//! Move arguments.
//!
//! An `Argument` is one value supplied by (or on behalf of) a player for a
//! selection. `Args` maps selection names to the values chosen so far.
//!
//! `Args` is backed by `im::OrdMap`, so the feasibility search can extend
//! it once per candidate without deep-copying the map.
//!
//! ```
//! use rust_tabletop::core::{Args, Argument};
//!
//! let args = Args::new().with("resource", "oil").with("amount", 3);
//! assert_eq!(args.text("resource"), Some("oil"));
//! assert_eq!(args.number("amount"), Some(3));
//! assert_eq!(args.get("missing"), None);
//! ```

use im::OrdMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::element::ElementId;
use super::player::PlayerId;
use crate::board::Board;

/// Element list of a multi-select argument. Inline up to 4 elements.
pub type ElementList = SmallVec<[ElementId; 4]>;

/// A single argument value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// Free text or a text choice.
    Text(String),
    /// Integer value.
    Number(i64),
    /// Boolean value.
    Flag(bool),
    /// A single board element.
    Element(ElementId),
    /// Several board elements (multi-select).
    Elements(ElementList),
    /// A player.
    Player(PlayerId),
}

impl Argument {
    /// Get as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Argument::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as number.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Argument::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as flag.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Argument::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as a single element.
    #[must_use]
    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            Argument::Element(e) => Some(*e),
            _ => None,
        }
    }

    /// Get as an element list.
    #[must_use]
    pub fn as_elements(&self) -> Option<&[ElementId]> {
        match self {
            Argument::Elements(list) => Some(list),
            _ => None,
        }
    }

    /// Get as player.
    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            Argument::Player(p) => Some(*p),
            _ => None,
        }
    }

    /// Human-readable rendering, naming elements from `board`.
    #[must_use]
    pub fn describe(&self, board: &Board) -> String {
        match self {
            Argument::Text(s) => s.clone(),
            Argument::Number(n) => n.to_string(),
            Argument::Flag(b) => b.to_string(),
            Argument::Element(e) => board.name_of(*e),
            Argument::Elements(list) => list
                .iter()
                .map(|e| board.name_of(*e))
                .collect::<Vec<_>>()
                .join(", "),
            Argument::Player(p) => p.to_string(),
        }
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Argument::Text(s) => f.write_str(s),
            Argument::Number(n) => write!(f, "{n}"),
            Argument::Flag(b) => write!(f, "{b}"),
            Argument::Element(e) => write!(f, "{e}"),
            Argument::Elements(list) => {
                let parts: Vec<_> = list.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Argument::Player(p) => write!(f, "{p}"),
        }
    }
}

impl From<&str> for Argument {
    fn from(v: &str) -> Self {
        Argument::Text(v.to_string())
    }
}

impl From<String> for Argument {
    fn from(v: String) -> Self {
        Argument::Text(v)
    }
}

impl From<i64> for Argument {
    fn from(v: i64) -> Self {
        Argument::Number(v)
    }
}

impl From<i32> for Argument {
    fn from(v: i32) -> Self {
        Argument::Number(i64::from(v))
    }
}

impl From<bool> for Argument {
    fn from(v: bool) -> Self {
        Argument::Flag(v)
    }
}

impl From<ElementId> for Argument {
    fn from(v: ElementId) -> Self {
        Argument::Element(v)
    }
}

impl From<PlayerId> for Argument {
    fn from(v: PlayerId) -> Self {
        Argument::Player(v)
    }
}

impl From<Vec<ElementId>> for Argument {
    fn from(v: Vec<ElementId>) -> Self {
        Argument::Elements(ElementList::from_vec(v))
    }
}

impl From<&[ElementId]> for Argument {
    fn from(v: &[ElementId]) -> Self {
        Argument::Elements(ElementList::from_slice(v))
    }
}

/// Arguments of an in-progress move, keyed by selection name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Args(OrdMap<String, Argument>);

impl Args {
    /// Empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of these arguments with one more value (builder pattern).
    #[must_use]
    pub fn with(&self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        Self(self.0.update(name.into(), value.into()))
    }

    /// Set a value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Argument>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove a value.
    pub fn remove(&mut self, name: &str) -> Option<Argument> {
        self.0.remove(name)
    }

    /// Get a value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.0.get(name)
    }

    /// Check if a selection has a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no values are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (name, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Argument)> {
        self.0.iter()
    }

    /// Selection names with a value.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Text value of `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Argument::as_text)
    }

    /// Numeric value of `name`.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Argument::as_number)
    }

    /// Flag value of `name`.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Argument::as_flag)
    }

    /// Element value of `name`.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<ElementId> {
        self.get(name).and_then(Argument::as_element)
    }

    /// Element list value of `name`.
    #[must_use]
    pub fn elements(&self, name: &str) -> Option<&[ElementId]> {
        self.get(name).and_then(Argument::as_elements)
    }

    /// Player value of `name`.
    #[must_use]
    pub fn player(&self, name: &str) -> Option<PlayerId> {
        self.get(name).and_then(Argument::as_player)
    }
}

impl<K: Into<String>, V: Into<Argument>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
