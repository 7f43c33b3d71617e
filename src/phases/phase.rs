//! Turn phases and per-phase operation gating.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, EngineResult};

/// One phase of a turn, in cycle order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    SprintPlanning,
    Execution,
    SprintReview,
    Retrospective,
}

impl Phase {
    /// All phases, in cycle order.
    pub const ALL: [Phase; 4] = [
        Phase::SprintPlanning,
        Phase::Execution,
        Phase::SprintReview,
        Phase::Retrospective,
    ];

    /// The following phase. Retrospective wraps to SprintPlanning.
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::SprintPlanning => Phase::Execution,
            Phase::Execution => Phase::SprintReview,
            Phase::SprintReview => Phase::Retrospective,
            Phase::Retrospective => Phase::SprintPlanning,
        }
    }

    /// Does leaving this phase start a new turn?
    #[must_use]
    pub const fn ends_turn(self) -> bool {
        matches!(self, Phase::Retrospective)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::SprintPlanning => "Sprint Planning",
            Phase::Execution => "Execution",
            Phase::SprintReview => "Sprint Review",
            Phase::Retrospective => "Retrospective",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase-gated engine operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    MoveCard,
    PullToSprint,
    ResolveRoll,
    UseToken,
    AllocateCapacity,
    InvestTechnicalDebt,
    AcceptCard,
    RejectCard,
}

impl Operation {
    /// Is this operation permitted during `phase`?
    #[must_use]
    pub const fn allowed_in(self, phase: Phase) -> bool {
        match self {
            Operation::MoveCard => matches!(phase, Phase::SprintPlanning | Phase::SprintReview),
            Operation::PullToSprint => matches!(phase, Phase::SprintPlanning),
            Operation::ResolveRoll
            | Operation::UseToken
            | Operation::AllocateCapacity
            | Operation::InvestTechnicalDebt => matches!(phase, Phase::Execution),
            Operation::AcceptCard | Operation::RejectCard => matches!(phase, Phase::SprintReview),
        }
    }

    /// Fail with `PhaseNotAllowed` unless permitted during `phase`.
    pub fn ensure_allowed(self, phase: Phase) -> EngineResult<()> {
        if self.allowed_in(phase) {
            Ok(())
        } else {
            Err(EngineError::PhaseNotAllowed { operation: self, phase })
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Operation::MoveCard => "move card",
            Operation::PullToSprint => "pull to sprint",
            Operation::ResolveRoll => "resolve roll",
            Operation::UseToken => "use token",
            Operation::AllocateCapacity => "allocate capacity",
            Operation::InvestTechnicalDebt => "invest in technical debt",
            Operation::AcceptCard => "accept card",
            Operation::RejectCard => "reject card",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
