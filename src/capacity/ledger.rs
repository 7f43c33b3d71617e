//! Team capacity ledger.
//!
//! Tracks the effort points the team can spend this turn and how many are
//! already committed. Validation and recording are split so callers can
//! check every precondition before mutating anything.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, EngineResult};

/// Effort budget for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLedger {
    /// Effort points available per turn.
    pub team_capacity: u32,
    /// Effort points allocated so far this turn.
    pub used: u32,
}

impl CapacityLedger {
    #[must_use]
    pub const fn new(team_capacity: u32) -> Self {
        Self { team_capacity, used: 0 }
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.team_capacity.saturating_sub(self.used)
    }

    /// Validate a raw effort value against an optional per-target ceiling
    /// and the remaining budget.
    ///
    /// Effort checks come first (`InvalidEffort`), then the budget
    /// (`CapacityExceeded`). Returns the effort as points.
    ///
    /// ```
    /// use sprint_board::capacity::CapacityLedger;
    ///
    /// let ledger = CapacityLedger::new(4);
    /// assert_eq!(ledger.validate(3, Some(5)).unwrap(), 3);
    /// assert!(ledger.validate(-1, None).is_err());
    /// assert!(ledger.validate(5, Some(5)).is_err());
    /// ```
    pub fn validate(&self, effort: i32, ceiling: Option<u32>) -> EngineResult<u32> {
        let Ok(points) = u32::try_from(effort) else {
            return Err(EngineError::InvalidEffort {
                effort: i64::from(effort),
                reason: "effort must not be negative",
            });
        };

        if ceiling.is_some_and(|max| points > max) {
            return Err(EngineError::InvalidEffort {
                effort: i64::from(effort),
                reason: "effort exceeds the card's unallocated size",
            });
        }

        if points > self.remaining() {
            return Err(EngineError::CapacityExceeded {
                requested: points,
                remaining: self.remaining(),
            });
        }

        Ok(points)
    }

    /// Commit validated effort.
    pub fn record(&mut self, points: u32) {
        self.used += points;
    }

    /// Start a fresh turn's budget.
    pub fn reset(&mut self) {
        self.used = 0;
    }
}
