//! Phase state machine types.
//!
//! A turn cycles SprintPlanning → Execution → SprintReview → Retrospective.
//! Each phase enables a different subset of operations; `Operation` carries
//! that gating table. Phase finalization lives on `GameSession`, which owns
//! the state each transition touches.

pub mod phase;

pub use phase::{Operation, Phase};
