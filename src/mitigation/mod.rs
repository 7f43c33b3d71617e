//! Mitigation resources: Scrum Master tokens and technical-debt investment.
//!
//! Tokens soften a fresh roll of 5 or 6 by one tier. Technical-debt
//! investment above a threshold softens every roll of 6 for a few turns.

pub mod scrum_master;

pub use scrum_master::ScrumMasterState;
