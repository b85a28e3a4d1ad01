//! Board elements.
//!
//! An element is any node of the board graph: the board itself, spaces,
//! decks, pieces. Elements form a tree; `class` groups them for queries
//! ("piece", "space") and `name` identifies them for players and logs.

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeValue, Attributes};
use crate::core::{ElementId, PlayerId};

/// Who may see an element's contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible to all players (the board, open spaces).
    #[default]
    Public,
    /// Visible only to the element's owner (a hand).
    OwnerOnly,
    /// Visible to nobody (a face-down deck).
    Hidden,
}

/// A single node of the board graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Arena id.
    pub id: ElementId,

    /// Element class, used by queries.
    pub class: String,

    /// Display name.
    pub name: String,

    /// Owning player, if any.
    pub owner: Option<PlayerId>,

    /// Visibility rule for this element.
    pub visibility: Visibility,

    /// Game-defined properties.
    pub attributes: Attributes,

    pub(super) parent: Option<ElementId>,
    pub(super) children: Vec<ElementId>,
}

impl Element {
    pub(super) fn new(id: ElementId, class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            class: class.into(),
            name: name.into(),
            owner: None,
            visibility: Visibility::Public,
            attributes: Attributes::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Parent element; `None` only for the root.
    #[must_use]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Check if the element has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Whether this element alone permits `viewer` to see it.
    ///
    /// Ancestors are not consulted; use `Board::is_visible_to` for that.
    #[must_use]
    pub fn permits(&self, viewer: Option<PlayerId>) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::OwnerOnly => viewer.is_some() && self.owner == viewer,
            Visibility::Hidden => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_element_defaults() {
        let el = Element::new(ElementId(3), "piece", "red-1");
        assert_eq!(el.class, "piece");
        assert_eq!(el.name, "red-1");
        assert!(el.is_empty());
        assert_eq!(el.parent(), None);
        assert_eq!(el.visibility, Visibility::Public);
    }

    #[test]
    fn test_permits() {
        let mut hand = Element::new(ElementId(1), "hand", "hand");
        hand.owner = Some(PlayerId::new(0));
        hand.visibility = Visibility::OwnerOnly;

        assert!(hand.permits(Some(PlayerId::new(0))));
        assert!(!hand.permits(Some(PlayerId::new(1))));
        assert!(!hand.permits(None));

        hand.visibility = Visibility::Hidden;
        assert!(!hand.permits(Some(PlayerId::new(0))));
    }
}
