//! Role-permission table.
//!
//! A fixed role/stage bijection plus the rules for which transitions each
//! role may initiate. Pure lookups, no state.

pub mod permissions;

pub use permissions::{can_initiate_move, can_move_to, can_roll, check_move, Role};
