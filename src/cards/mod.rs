//! Card system: work items and their sizes.
//!
//! ## Key Types
//!
//! - `Card`: Runtime card state (stage, reverts, cycle time, allocations)
//! - `NewCard`: Creation request; the board assigns id and creation turn
//! - `EffortSize`: The three legal card sizes (1, 3, 5 points)

pub mod card;

pub use card::{Card, EffortSize, NewCard};
