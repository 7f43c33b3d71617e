//! # sprint-board
//!
//! A workflow engine for a Scrum-board game: cards flow through eight
//! stages, dice decide how work goes, and role permissions, WIP limits,
//! capacity and phases constrain what players may do.
//!
//! ## Design Principles
//!
//! 1. **Validate, Then Mutate**: Every operation checks all of its
//!    preconditions before touching state. An error leaves the game as it was.
//!
//! 2. **Rolls Are Inputs**: The engine never rolls on its own. Hosts pass a
//!    roll value, or a caller-owned `GameRng` for reproducible games.
//!
//! 3. **Configuration Over Convention**: Capacity, tokens, WIP limits and
//!    technical-debt tuning come from `BoardConfig`.
//!
//! ## Modules
//!
//! - `core`: Card IDs, configuration, RNG, board state, errors
//! - `stages`: Stage order, WIP lanes and queue promotion
//! - `roles`: Role ownership and move/roll permissions
//! - `cards`: Work items and their sizes
//! - `outcomes`: Die outcome table and mitigations
//! - `capacity`: Per-turn effort ledger
//! - `mitigation`: Scrum Master tokens and technical-debt softening
//! - `phases`: Turn phases and per-phase operation gating
//! - `metrics`: Velocity, score, cumulative flow and revert history
//! - `game`: `GameSession`, the public operation surface

pub mod core;
pub mod stages;
pub mod roles;
pub mod cards;
pub mod outcomes;
pub mod capacity;
pub mod mitigation;
pub mod phases;
pub mod metrics;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, BoardState, CardId,
    EngineError, EngineResult,
    GameRng, RngCheckpoint,
};

pub use crate::stages::{Location, Placement, Slot, Stage, StageManager, StageMap};

pub use crate::roles::Role;

pub use crate::cards::{Card, EffortSize, NewCard};

pub use crate::outcomes::{Mitigation, Outcome, Resolution};

pub use crate::phases::{Operation, Phase};

pub use crate::metrics::{FlowSnapshot, Metrics, RetrospectiveSummary, RevertEvent};

pub use crate::game::{
    Adaptation, GameBuilder, GameSession, GameSnapshot,
    MoveReport, PhaseChange, RollReport,
};
