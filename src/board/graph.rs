//! Board graph: element arena, tree structure, and queries.
//!
//! The `Board` owns every element and tracks the parent/child structure.
//! It supports:
//! - Element creation and movement between parents
//! - Document-order queries (preorder from the root)
//! - Branch paths: stable, snapshot-independent element addresses
//!
//! Only mutation methods take `&mut self`, so anything handed a shared
//! `&Board` (every computed selection field) cannot change it.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeValue;
use super::element::{Element, Visibility};
use super::query::ElementQuery;
use crate::core::{ElementId, PlayerId};

/// Separator between child indices in a branch path.
pub const BRANCH_SEPARATOR: char = '/';

/// Arena-backed element tree.
///
/// ## Usage
///
/// ```
/// use rust_tabletop::board::{Board, ElementQuery};
/// use rust_tabletop::core::ElementId;
///
/// let mut board = Board::new();
/// let space = board.create(ElementId::ROOT, "space", "market");
/// let coin = board.create(ElementId::ROOT, "piece", "coin");
///
/// board.put_into(coin, space);
/// assert_eq!(board.branch(coin), "0/0/0");
/// assert_eq!(board.at_branch("0/0/0"), Some(coin));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    elements: Vec<Element>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board containing only its root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new(ElementId::ROOT, "board", "board")],
        }
    }

    /// Number of elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// A board always has its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get an element.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Get an element mutably.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    /// Get an element that must exist.
    ///
    /// Panics on an id from a different board.
    #[must_use]
    pub fn element(&self, id: ElementId) -> &Element {
        self.get(id)
            .unwrap_or_else(|| panic!("{id} does not belong to this board"))
    }

    /// Display name of an element, or its id if unknown.
    #[must_use]
    pub fn name_of(&self, id: ElementId) -> String {
        self.get(id).map_or_else(|| id.to_string(), |el| el.name.clone())
    }

    // === Mutation ===

    /// Create an element as the last child of `parent`.
    pub fn create(
        &mut self,
        parent: ElementId,
        class: impl Into<String>,
        name: impl Into<String>,
    ) -> ElementId {
        assert!(parent.index() < self.elements.len(), "Unknown parent {parent}");

        let id = ElementId(self.elements.len() as u32);
        let mut element = Element::new(id, class, name);
        element.parent = Some(parent);
        self.elements.push(element);
        self.elements[parent.index()].children.push(id);
        id
    }

    /// Create an element owned by `owner`.
    pub fn create_owned(
        &mut self,
        parent: ElementId,
        class: impl Into<String>,
        name: impl Into<String>,
        owner: PlayerId,
    ) -> ElementId {
        let id = self.create(parent, class, name);
        self.elements[id.index()].owner = Some(owner);
        id
    }

    /// Set an element's visibility.
    pub fn set_visibility(&mut self, id: ElementId, visibility: Visibility) {
        if let Some(el) = self.get_mut(id) {
            el.visibility = visibility;
        }
    }

    /// Set an element's owner.
    pub fn set_owner(&mut self, id: ElementId, owner: Option<PlayerId>) {
        if let Some(el) = self.get_mut(id) {
            el.owner = owner;
        }
    }

    /// Set an attribute.
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.insert(key.into(), value.into());
        }
    }

    /// Move an element to be the last child of `new_parent`.
    ///
    /// Returns the old parent. Panics when moving the root or moving an
    /// element into its own subtree.
    pub fn put_into(&mut self, id: ElementId, new_parent: ElementId) -> ElementId {
        assert!(!id.is_root(), "The board root cannot be moved");
        assert!(
            id != new_parent && !self.is_descendant_of(new_parent, id),
            "Cannot move {id} into its own subtree"
        );

        let old_parent = self.element(id).parent.unwrap_or(ElementId::ROOT);
        self.elements[old_parent.index()].children.retain(|&c| c != id);
        self.elements[new_parent.index()].children.push(id);
        self.elements[id.index()].parent = Some(new_parent);
        old_parent
    }

    // === Structure ===

    /// Check whether `id` lies strictly below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.get(id).and_then(Element::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(Element::parent);
        }
        false
    }

    /// Check whether `viewer` may see an element and all its ancestors.
    #[must_use]
    pub fn is_visible_to(&self, id: ElementId, viewer: Option<PlayerId>) -> bool {
        let mut current = Some(id);
        while let Some(el) = current.and_then(|c| self.get(c)) {
            if !el.permits(viewer) {
                return false;
            }
            current = el.parent;
        }
        true
    }

    /// All elements in document order (preorder), root first.
    #[must_use]
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = vec![ElementId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.element(id).children.iter().rev());
        }
        order
    }

    // === Queries ===

    /// Every element matching `query`, in document order.
    ///
    /// `viewer` is the player whose viewpoint scopes `mine`/`visible`.
    #[must_use]
    pub fn all(&self, query: &ElementQuery, viewer: Option<PlayerId>) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|&id| query.matches(self, self.element(id), viewer))
            .collect()
    }

    /// First element matching `query`, in document order.
    #[must_use]
    pub fn first(&self, query: &ElementQuery, viewer: Option<PlayerId>) -> Option<ElementId> {
        self.document_order()
            .into_iter()
            .find(|&id| query.matches(self, self.element(id), viewer))
    }

    // === Branch paths ===

    /// Child-index path from the root, e.g. `"0/2/1"`.
    ///
    /// The root itself is `"0"`.
    #[must_use]
    pub fn branch(&self, id: ElementId) -> String {
        let mut indices = Vec::new();
        let mut current = id;
        while let Some(parent) = self.get(current).and_then(Element::parent) {
            let position = self
                .element(parent)
                .children
                .iter()
                .position(|&c| c == current)
                .unwrap_or_default();
            indices.push(position.to_string());
            current = parent;
        }
        indices.push("0".to_string());
        indices.reverse();
        indices.join(&BRANCH_SEPARATOR.to_string())
    }

    /// Resolve a branch path back to an element.
    #[must_use]
    pub fn at_branch(&self, branch: &str) -> Option<ElementId> {
        let mut parts = branch.split(BRANCH_SEPARATOR);
        if parts.next()? != "0" {
            return None;
        }
        let mut current = ElementId::ROOT;
        for part in parts {
            let index: usize = part.parse().ok()?;
            current = *self.get(current)?.children.get(index)?;
        }
        Some(current)
    }
}
