//! Outcome resolution for die rolls.
//!
//! ## Key Types
//!
//! - `Outcome`: Base roll table (1 success, 2-3 progress, 4-6 setbacks)
//! - `Mitigation`: Tagged softening layered on an outcome
//! - `ResolvedOutcome`: Base outcome plus applied mitigations
//! - `Resolution`: Roll, source stage and target stage

pub mod outcome;
pub mod resolver;

pub use outcome::{Mitigation, Outcome, ResolvedOutcome};
pub use resolver::{resolve, Resolution};
