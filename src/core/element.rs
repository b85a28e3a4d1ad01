//! Board element identification.
//!
//! Every piece, space and container on the board has a unique `ElementId`,
//! allocated by the board arena in creation order. The root element of
//! every board is `ElementId(0)`.
//!
//! ```
//! use rust_tabletop::core::ElementId;
//!
//! assert!(ElementId::ROOT.is_root());
//! assert!(!ElementId(4).is_root());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a board element.
///
/// Ids are arena indices: stable for the lifetime of a board and identical
/// across a snapshot/restore cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    /// The board root.
    pub const ROOT: ElementId = ElementId(0);

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena index of this element.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the board root.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Element({})", self.0)
    }
}
