//! Die outcomes and the mitigations that soften them.
//!
//! The base table maps a roll to an `Outcome`. Mitigations are layered on
//! top as tagged variants, each lowering severity by one tier:
//!
//! ```text
//! CriticalFailure -> TechnicalImpediment -> Progress
//! ```
//!
//! CriticalSuccess, Progress and ScopeCreep are never softened.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::stages::Stage;

/// Base outcome of a die roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Roll 1: straight to Production.
    CriticalSuccess,
    /// Roll 2 or 3: on to the next stage.
    Progress,
    /// Roll 4: back to the Product Backlog.
    ScopeCreep,
    /// Roll 5: back to Implementation.
    TechnicalImpediment,
    /// Roll 6: back to the Sprint Backlog.
    CriticalFailure,
}

impl Outcome {
    /// Look up a roll. Returns `None` outside 1..=6.
    #[must_use]
    pub const fn from_roll(roll: u8) -> Option<Outcome> {
        match roll {
            1 => Some(Outcome::CriticalSuccess),
            2 | 3 => Some(Outcome::Progress),
            4 => Some(Outcome::ScopeCreep),
            5 => Some(Outcome::TechnicalImpediment),
            6 => Some(Outcome::CriticalFailure),
            _ => None,
        }
    }

    /// Where a card rolled in `from` ends up.
    ///
    /// ```
    /// use sprint_board::outcomes::Outcome;
    /// use sprint_board::stages::Stage;
    ///
    /// assert_eq!(Outcome::Progress.target(Stage::Testing), Stage::PreDeployment);
    /// assert_eq!(Outcome::Progress.target(Stage::PreDeployment), Stage::Production);
    /// assert_eq!(Outcome::CriticalFailure.target(Stage::Testing), Stage::SprintBacklog);
    /// ```
    #[must_use]
    pub fn target(self, from: Stage) -> Stage {
        match self {
            Outcome::CriticalSuccess => Stage::Production,
            Outcome::Progress => from.next().unwrap_or(from),
            Outcome::ScopeCreep => Stage::ProductBacklog,
            Outcome::TechnicalImpediment => Stage::Implementation,
            Outcome::CriticalFailure => Stage::SprintBacklog,
        }
    }

    /// One severity tier lower, if this outcome can be softened.
    #[must_use]
    pub const fn softened(self) -> Option<Outcome> {
        match self {
            Outcome::CriticalFailure => Some(Outcome::TechnicalImpediment),
            Outcome::TechnicalImpediment => Some(Outcome::Progress),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::CriticalSuccess => "Critical Success",
            Outcome::Progress => "Standard Progress",
            Outcome::ScopeCreep => "Scope Creep",
            Outcome::TechnicalImpediment => "Technical Impediment",
            Outcome::CriticalFailure => "Critical Failure",
        }
    }
}

/// A source of softening applied on top of the base outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mitigation {
    /// Active technical-debt investment; only applies to a critical failure.
    TechnicalDebt,
    /// A Scrum Master token spent right after the roll.
    Token,
}

/// A base outcome plus the mitigations applied to it, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOutcome {
    pub base: Outcome,
    pub mitigations: SmallVec<[Mitigation; 2]>,
}

impl ResolvedOutcome {
    #[must_use]
    pub fn new(base: Outcome) -> Self {
        Self {
            base,
            mitigations: SmallVec::new(),
        }
    }

    /// The outcome after every mitigation has been applied.
    #[must_use]
    pub fn effective(&self) -> Outcome {
        self.mitigations
            .iter()
            .fold(self.base, |outcome, _| outcome.softened().unwrap_or(outcome))
    }

    /// Layer a mitigation on top. Returns `None` when the effective outcome
    /// cannot be softened any further.
    #[must_use]
    pub fn mitigate(&self, mitigation: Mitigation) -> Option<Self> {
        self.effective().softened()?;
        let mut next = self.clone();
        next.mitigations.push(mitigation);
        Some(next)
    }

    #[must_use]
    pub fn is_mitigated(&self) -> bool {
        !self.mitigations.is_empty()
    }
}
