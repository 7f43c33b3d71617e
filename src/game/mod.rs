//! Game sessions: the engine's public operations.
//!
//! ## Key Types
//!
//! - `GameSession`: One game; every engine operation is a method on it
//! - `GameBuilder`: Start a session with a seeded Funnel
//! - `GameSnapshot`: Full state for persistence and restore

pub mod builder;
pub mod session;
pub mod snapshot;

pub use builder::GameBuilder;
pub use session::{Adaptation, GameSession, MoveReport, PendingToken, PhaseChange, RollReport};
pub use snapshot::GameSnapshot;
