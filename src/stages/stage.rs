//! Workflow stages and per-stage data storage.
//!
//! ## Stage
//!
//! The eight board columns a card travels through, in fixed order.
//!
//! ## StageMap
//!
//! Per-stage data storage backed by a fixed array for O(1) access.
//! Supports iteration and indexing by `Stage`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A board column. Declaration order is workflow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Funnel,
    ProductBacklog,
    SprintBacklog,
    Implementation,
    Integration,
    Testing,
    PreDeployment,
    Production,
}

impl Stage {
    /// Number of stages on the board.
    pub const COUNT: usize = 8;

    /// All stages, in workflow order.
    pub const ALL: [Stage; Stage::COUNT] = [
        Stage::Funnel,
        Stage::ProductBacklog,
        Stage::SprintBacklog,
        Stage::Implementation,
        Stage::Integration,
        Stage::Testing,
        Stage::PreDeployment,
        Stage::Production,
    ];

    /// Stages where a die roll decides the next move.
    pub const EXECUTION: [Stage; 4] = [
        Stage::Implementation,
        Stage::Integration,
        Stage::Testing,
        Stage::PreDeployment,
    ];

    /// Position in workflow order (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stage at the given workflow position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    /// The immediate successor, or `None` for Production.
    ///
    /// ```
    /// use sprint_board::stages::Stage;
    ///
    /// assert_eq!(Stage::Testing.next(), Some(Stage::PreDeployment));
    /// assert_eq!(Stage::PreDeployment.next(), Some(Stage::Production));
    /// assert_eq!(Stage::Production.next(), None);
    /// ```
    #[must_use]
    pub fn next(self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }

    /// Is this one of the four dice-driven stages?
    #[must_use]
    pub const fn is_execution(self) -> bool {
        matches!(
            self,
            Stage::Implementation | Stage::Integration | Stage::Testing | Stage::PreDeployment
        )
    }

    /// Funnel and Production never limit their active slots.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Stage::Funnel | Stage::Production)
    }

    /// Human-readable column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Funnel => "Funnel",
            Stage::ProductBacklog => "Product Backlog",
            Stage::SprintBacklog => "Sprint Backlog",
            Stage::Implementation => "Implementation",
            Stage::Integration => "Integration",
            Stage::Testing => "Testing",
            Stage::PreDeployment => "Pre-Deployment",
            Stage::Production => "Production",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-stage data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use sprint_board::stages::{Stage, StageMap};
///
/// let mut counts: StageMap<usize> = StageMap::with_value(0);
/// counts[Stage::Testing] += 2;
///
/// assert_eq!(counts[Stage::Testing], 2);
/// assert_eq!(counts.iter().map(|(_, n)| *n).sum::<usize>(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageMap<T> {
    data: [T; Stage::COUNT],
}

impl<T> StageMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Stage) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| factory(Stage::ALL[i])),
        }
    }

    /// Create a map with every entry set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    #[must_use]
    pub fn get(&self, stage: Stage) -> &T {
        &self.data[stage.index()]
    }

    pub fn get_mut(&mut self, stage: Stage) -> &mut T {
        &mut self.data[stage.index()]
    }

    /// Iterate over (Stage, &T) pairs in workflow order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &T)> {
        Stage::ALL.into_iter().zip(self.data.iter())
    }

    /// Apply a function to every entry, keeping the stage keys.
    pub fn map<U>(&self, f: impl Fn(Stage, &T) -> U) -> StageMap<U> {
        StageMap::new(|stage| f(stage, self.get(stage)))
    }
}

impl<T: Default> Default for StageMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Stage> for StageMap<T> {
    type Output = T;

    fn index(&self, stage: Stage) -> &T {
        self.get(stage)
    }
}

impl<T> IndexMut<Stage> for StageMap<T> {
    fn index_mut(&mut self, stage: Stage) -> &mut T {
        self.get_mut(stage)
    }
}
