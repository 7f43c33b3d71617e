//! Board stages: ordering, WIP limits and waiting queues.
//!
//! ## Key Types
//!
//! - `Stage`: The eight ordered workflow columns
//! - `StageMap`: Per-stage storage indexed by `Stage`
//! - `StageManager`: Card location tracking, queueing and promotion
//! - `Location` / `Slot`: Where a card sits (active slot or queue)

pub mod manager;
pub mod stage;

pub use manager::{Location, Placement, Promotions, Slot, StageLane, StageManager};
pub use stage::{Stage, StageMap};
