//! Metrics aggregation: velocity, score, cumulative flow and revert log.

pub mod aggregator;

pub use aggregator::{FlowSnapshot, Metrics, RetrospectiveSummary, RevertEvent};
