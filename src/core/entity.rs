//! Card identification.
//!
//! Every work item on the board has a unique `CardId`, allocated by the
//! board in creation order starting at 1.
//!
//! ## Usage
//!
//! ```
//! use sprint_board::core::CardId;
//!
//! let card = CardId::new(7);
//! assert_eq!(card.raw(), 7);
//! assert_eq!(format!("{}", card), "Card(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// First ID handed out by a fresh board.
    pub const FIRST: CardId = CardId(1);

    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The ID allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}
