//! Engine error type.
//!
//! Every operation validates before it mutates, so an `Err` always means the
//! session is exactly as it was before the call. Nothing is retried
//! internally; callers decide whether to surface or retry.

use thiserror::Error;

use super::entity::CardId;
use crate::phases::{Operation, Phase};
use crate::roles::Role;
use crate::stages::Stage;

/// Result alias used by every engine operation.
pub type EngineResult<T> = Result<T, EngineError>;

/// Validation failures returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The role does not own the stage it tried to act on.
    #[error("{role} is not permitted to act on {stage}")]
    PermissionDenied { role: Role, stage: Stage },

    /// The move breaks the successor/Production adjacency rule.
    #[error("cannot move a card from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },

    /// The card is absent, or not in the stage the caller named.
    #[error("{card} not found{}", .stage.map(|s| format!(" in {s}")).unwrap_or_default())]
    StageNotFound { card: CardId, stage: Option<Stage> },

    /// The card is not in an active slot of an execution stage.
    #[error("{card} in {stage} cannot be rolled for")]
    InvalidRollTarget { card: CardId, stage: Stage },

    /// Die value outside 1..=6.
    #[error("roll {0} is outside 1..=6")]
    InvalidRoll(u8),

    /// The operation is gated to other phases.
    #[error("{operation} is not allowed during {phase}")]
    PhaseNotAllowed { operation: Operation, phase: Phase },

    /// Every Scrum Master token has been spent.
    #[error("no Scrum Master tokens available")]
    NoTokensAvailable,

    /// The card has no fresh roll of 5 or 6 to soften.
    #[error("no softenable outcome pending for {card}")]
    TokenNotApplicable { card: CardId },

    /// The allocation would overrun the team's capacity this turn.
    #[error("allocating {requested} effort exceeds remaining capacity {remaining}")]
    CapacityExceeded { requested: u32, remaining: u32 },

    /// Effort is negative, too large for the card, or not a valid card size.
    #[error("invalid effort {effort}: {reason}")]
    InvalidEffort { effort: i64, reason: &'static str },

    /// The retrospective has no recorded adaptation yet.
    #[error("retrospective for turn {turn} has no recorded adaptation")]
    RetrospectiveIncomplete { turn: u32 },

    /// Adaptation text was blank.
    #[error("adaptation text is empty")]
    EmptyAdaptation,

    /// A snapshot blob could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl EngineError {
    /// Machine-readable code for response envelopes.
    ///
    /// ```
    /// use sprint_board::core::EngineError;
    ///
    /// assert_eq!(EngineError::NoTokensAvailable.code(), "NO_TOKENS_AVAILABLE");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::StageNotFound { .. } => "STAGE_NOT_FOUND",
            Self::InvalidRollTarget { .. } => "INVALID_ROLL_TARGET",
            Self::InvalidRoll(_) => "INVALID_ROLL",
            Self::PhaseNotAllowed { .. } => "PHASE_NOT_ALLOWED",
            Self::NoTokensAvailable => "NO_TOKENS_AVAILABLE",
            Self::TokenNotApplicable { .. } => "TOKEN_NOT_APPLICABLE",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::InvalidEffort { .. } => "INVALID_EFFORT",
            Self::RetrospectiveIncomplete { .. } => "RETROSPECTIVE_INCOMPLETE",
            Self::EmptyAdaptation => "EMPTY_ADAPTATION",
            Self::Snapshot(_) => "SNAPSHOT_ERROR",
        }
    }
}
