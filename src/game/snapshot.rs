//! Full-state snapshots.
//!
//! A `GameSnapshot` is plain data: hosts persist it however they like. The
//! `encode`/`decode` pair gives a compact bincode blob for storage.

use serde::{Deserialize, Serialize};

use super::session::{Adaptation, PendingToken};
use crate::core::{BoardConfig, BoardState, EngineResult};
use crate::metrics::Metrics;
use crate::mitigation::ScrumMasterState;

/// Everything needed to rebuild a `GameSession`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: BoardConfig,
    pub board: BoardState,
    pub scrum_master: ScrumMasterState,
    pub metrics: Metrics,
    pub adaptations: Vec<Adaptation>,
    /// The roll a token may still soften, if any.
    pub pending_token: Option<PendingToken>,
}

impl GameSnapshot {
    /// Serialize to a bincode blob.
    pub fn encode(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from a bincode blob.
    pub fn decode(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
