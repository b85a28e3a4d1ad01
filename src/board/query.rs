//! Board queries.
//!
//! An `ElementQuery` is a conjunction of filters evaluated against every
//! element of the board in document order. Board selections use queries
//! to compute their candidate sets.
//!
//! ```
//! use rust_tabletop::board::{Board, ElementQuery};
//! use rust_tabletop::core::{ElementId, PlayerId};
//!
//! let mut board = Board::new();
//! let p1 = PlayerId::new(0);
//! board.create_owned(ElementId::ROOT, "piece", "a", p1);
//! board.create(ElementId::ROOT, "piece", "b");
//!
//! let mine = board.all(&ElementQuery::class("piece").mine(), Some(p1));
//! assert_eq!(mine.len(), 1);
//! ```

use std::rc::Rc;

use super::attributes::AttributeValue;
use super::element::Element;
use super::graph::Board;
use crate::core::{ElementId, PlayerId};

/// Custom element predicate.
pub type ElementPredicate = Rc<dyn Fn(&Element, &Board) -> bool>;

/// One filter of an element query.
#[derive(Clone)]
pub enum ElementFilter {
    /// Element class equals.
    Class(String),
    /// Element name equals.
    Name(String),
    /// Owned by a specific player.
    OwnedBy(PlayerId),
    /// Owned by the player whose viewpoint is active.
    Mine,
    /// Owned by nobody.
    Unowned,
    /// Strict descendant of an element.
    Within(ElementId),
    /// Direct child of an element.
    ChildOf(ElementId),
    /// Attribute equals a value.
    Attribute(String, AttributeValue),
    /// Has no children.
    Empty,
    /// Visible from the active viewpoint.
    Visible,
    /// Game-specific predicate.
    Custom(ElementPredicate),
}

impl std::fmt::Debug for ElementFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(c) => f.debug_tuple("Class").field(c).finish(),
            Self::Name(n) => f.debug_tuple("Name").field(n).finish(),
            Self::OwnedBy(p) => f.debug_tuple("OwnedBy").field(p).finish(),
            Self::Mine => f.write_str("Mine"),
            Self::Unowned => f.write_str("Unowned"),
            Self::Within(e) => f.debug_tuple("Within").field(e).finish(),
            Self::ChildOf(e) => f.debug_tuple("ChildOf").field(e).finish(),
            Self::Attribute(k, v) => f.debug_tuple("Attribute").field(k).field(v).finish(),
            Self::Empty => f.write_str("Empty"),
            Self::Visible => f.write_str("Visible"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Conjunction of element filters.
///
/// The root element never matches.
#[derive(Clone, Debug, Default)]
pub struct ElementQuery {
    filters: Vec<ElementFilter>,
}

impl ElementQuery {
    /// Query matching every element.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Query matching elements of a class.
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::any().with(ElementFilter::Class(class.into()))
    }

    /// Add a filter (builder pattern).
    #[must_use]
    pub fn with(mut self, filter: ElementFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Restrict to a name.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        self.with(ElementFilter::Name(name.into()))
    }

    /// Restrict to elements owned by `player`.
    #[must_use]
    pub fn owned_by(self, player: PlayerId) -> Self {
        self.with(ElementFilter::OwnedBy(player))
    }

    /// Restrict to elements owned by the viewer.
    #[must_use]
    pub fn mine(self) -> Self {
        self.with(ElementFilter::Mine)
    }

    /// Restrict to unowned elements.
    #[must_use]
    pub fn unowned(self) -> Self {
        self.with(ElementFilter::Unowned)
    }

    /// Restrict to descendants of `ancestor`.
    #[must_use]
    pub fn within(self, ancestor: ElementId) -> Self {
        self.with(ElementFilter::Within(ancestor))
    }

    /// Restrict to direct children of `parent`.
    #[must_use]
    pub fn child_of(self, parent: ElementId) -> Self {
        self.with(ElementFilter::ChildOf(parent))
    }

    /// Restrict to elements whose attribute equals `value`.
    #[must_use]
    pub fn attribute(self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with(ElementFilter::Attribute(key.into(), value.into()))
    }

    /// Restrict to elements with no children.
    #[must_use]
    pub fn empty(self) -> Self {
        self.with(ElementFilter::Empty)
    }

    /// Restrict to elements the viewer can see.
    #[must_use]
    pub fn visible(self) -> Self {
        self.with(ElementFilter::Visible)
    }

    /// Restrict with a custom predicate.
    #[must_use]
    pub fn matching(self, predicate: impl Fn(&Element, &Board) -> bool + 'static) -> Self {
        self.with(ElementFilter::Custom(Rc::new(predicate)))
    }

    /// Check a single element.
    #[must_use]
    pub fn matches(&self, board: &Board, element: &Element, viewer: Option<PlayerId>) -> bool {
        if element.id.is_root() {
            return false;
        }
        self.filters
            .iter()
            .all(|filter| Self::passes(board, element, filter, viewer))
    }

    fn passes(
        board: &Board,
        element: &Element,
        filter: &ElementFilter,
        viewer: Option<PlayerId>,
    ) -> bool {
        match filter {
            ElementFilter::Class(class) => element.class == *class,
            ElementFilter::Name(name) => element.name == *name,
            ElementFilter::OwnedBy(player) => element.owner == Some(*player),
            ElementFilter::Mine => viewer.is_some() && element.owner == viewer,
            ElementFilter::Unowned => element.owner.is_none(),
            ElementFilter::Within(ancestor) => board.is_descendant_of(element.id, *ancestor),
            ElementFilter::ChildOf(parent) => element.parent() == Some(*parent),
            ElementFilter::Attribute(key, value) => element.attribute(key) == Some(value),
            ElementFilter::Empty => element.is_empty(),
            ElementFilter::Visible => board.is_visible_to(element.id, viewer),
            ElementFilter::Custom(predicate) => predicate(element, board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Board, ElementId, ElementId, ElementId) {
        let mut board = Board::new();
        let area = board.create(ElementId::ROOT, "space", "area");
        let red = board.create_owned(area, "piece", "red", PlayerId::new(0));
        let blue = board.create_owned(ElementId::ROOT, "piece", "blue", PlayerId::new(1));
        board.set_attribute(red, "value", 3);
        (board, area, red, blue)
    }

    #[test]
    fn test_class_query() {
        let (board, _, red, blue) = sample();
        let pieces = board.all(&ElementQuery::class("piece"), None);
        assert_eq!(pieces, vec![red, blue]);
    }

    #[test]
    fn test_root_never_matches() {
        let (board, area, red, blue) = sample();
        let everything = board.all(&ElementQuery::any(), None);
        assert_eq!(everything, vec![area, red, blue]);
    }

    #[test]
    fn test_owner_filters() {
        let (board, area, red, blue) = sample();
        let p1 = PlayerId::new(0);

        assert_eq!(board.all(&ElementQuery::any().mine(), Some(p1)), vec![red]);
        assert!(board.all(&ElementQuery::any().mine(), None).is_empty());
        assert_eq!(board.all(&ElementQuery::any().owned_by(PlayerId::new(1)), None), vec![blue]);
        assert_eq!(board.all(&ElementQuery::any().unowned(), None), vec![area]);
    }

    #[test]
    fn test_structure_filters() {
        let (board, area, red, _) = sample();

        assert_eq!(board.all(&ElementQuery::any().within(area), None), vec![red]);
        assert_eq!(board.all(&ElementQuery::any().child_of(area), None), vec![red]);
        assert!(!board.all(&ElementQuery::class("space").empty(), None).contains(&area));
    }

    #[test]
    fn test_attribute_and_custom() {
        let (board, _, red, blue) = sample();

        assert_eq!(board.all(&ElementQuery::any().attribute("value", 3), None), vec![red]);

        let named_b = ElementQuery::class("piece").matching(|el, _| el.name.starts_with('b'));
        assert_eq!(board.all(&named_b, None), vec![blue]);
    }

    #[test]
    fn test_debug_custom() {
        let query = ElementQuery::any().matching(|_, _| true);
        assert!(format!("{query:?}").contains("Custom(..)"));
    }
}
