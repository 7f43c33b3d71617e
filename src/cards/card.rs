//! Cards - work items flowing across the board.
//!
//! A `Card` tracks its own stage, how often it was knocked back, how much
//! capacity has been sunk into it, and when it first shipped.

use serde::{Deserialize, Serialize};

use crate::core::entity::CardId;
use crate::stages::Stage;

/// Card size in effort points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffortSize {
    Small,
    Medium,
    Large,
}

impl EffortSize {
    /// Parse a raw point value. Only 1, 3 and 5 are valid sizes.
    #[must_use]
    pub const fn from_points(points: u32) -> Option<Self> {
        match points {
            1 => Some(EffortSize::Small),
            3 => Some(EffortSize::Medium),
            5 => Some(EffortSize::Large),
            _ => None,
        }
    }

    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            EffortSize::Small => 1,
            EffortSize::Medium => 3,
            EffortSize::Large => 5,
        }
    }
}

/// Request to create a card. The board assigns the id and creation turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    pub description: String,
    /// Raw effort points; validated when the card is added.
    pub effort: u32,
    pub technical_debt: bool,
}

impl NewCard {
    pub fn new(title: impl Into<String>, effort: u32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            effort,
            technical_debt: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the card as a technical-debt item.
    #[must_use]
    pub fn technical_debt(mut self) -> Self {
        self.technical_debt = true;
        self
    }
}

/// A work item on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub effort: EffortSize,

    /// Current stage. Kept in sync with the stage manager by the board.
    pub stage: Stage,

    /// Turn the card was created in.
    pub created_turn: u32,

    /// Adverse outcomes suffered so far.
    pub revert_count: u32,

    /// Turns from creation to first arrival in Production.
    pub cycle_time: Option<u32>,

    pub assignee: Option<String>,
    pub technical_debt: bool,

    /// Capacity allocated to this card across all turns.
    pub allocated_effort: u32,
}

impl Card {
    /// Create a card in the Funnel.
    #[must_use]
    pub fn new(id: CardId, request: NewCard, effort: EffortSize, created_turn: u32) -> Self {
        Self {
            id,
            title: request.title,
            description: request.description,
            effort,
            stage: Stage::Funnel,
            created_turn,
            revert_count: 0,
            cycle_time: None,
            assignee: None,
            technical_debt: request.technical_debt,
            allocated_effort: 0,
        }
    }

    /// Effort points not yet covered by allocations.
    #[must_use]
    pub fn remaining_effort(&self) -> u32 {
        self.effort.points().saturating_sub(self.allocated_effort)
    }

    /// Has the card ever reached Production?
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.cycle_time.is_some()
    }

    /// Record an arrival in Production.
    ///
    /// Returns `true` only for the first arrival, which fixes the cycle time.
    pub fn mark_delivered(&mut self, turn: u32) -> bool {
        if self.is_delivered() {
            return false;
        }
        self.cycle_time = Some(turn.saturating_sub(self.created_turn));
        true
    }
}
