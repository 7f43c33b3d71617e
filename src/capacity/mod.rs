//! Capacity ledger for team effort points.

pub mod ledger;

pub use ledger::CapacityLedger;
