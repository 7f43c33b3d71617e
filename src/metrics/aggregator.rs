//! Turn-by-turn metrics for retrospectives.
//!
//! Uses `im::Vector` for the append-only logs so snapshotting a session is
//! cheap no matter how long the game has run.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::entity::CardId;
use crate::stages::{Stage, StageMap};

/// Stage occupancy at the close of a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    /// Turn that was closed.
    pub turn: u32,
    /// Cards per stage, active plus queued.
    pub counts: StageMap<usize>,
}

/// One adverse transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertEvent {
    pub card: CardId,
    pub turn: u32,
    /// Die value, or `None` for a Sprint Review rejection.
    pub roll: Option<u8>,
    pub from: Stage,
    pub to: Stage,
}

/// Aggregated game metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Cards newly delivered, one entry per completed turn.
    pub velocity_per_turn: Vector<u32>,
    /// Sum of delivered effort points.
    pub accumulated_score: u32,
    pub cumulative_flow: Vector<FlowSnapshot>,
    pub revert_events: Vector<RevertEvent>,
    /// First-time deliveries since the last snapshot.
    pub delivered_this_turn: u32,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a first arrival in Production.
    pub fn record_delivery(&mut self, effort: u32) {
        self.delivered_this_turn += 1;
        self.accumulated_score += effort;
    }

    pub fn record_revert(&mut self, event: RevertEvent) {
        self.revert_events.push_back(event);
    }

    /// Close a turn: append its flow snapshot and velocity entry.
    pub fn close_turn(&mut self, turn: u32, counts: StageMap<usize>) {
        self.cumulative_flow.push_back(FlowSnapshot { turn, counts });
        self.velocity_per_turn.push_back(self.delivered_this_turn);
        self.delivered_this_turn = 0;
    }

    #[must_use]
    pub fn total_velocity(&self) -> u32 {
        self.velocity_per_turn.iter().sum()
    }

    /// Mean velocity over completed turns; 0.0 before the first turn closes.
    #[must_use]
    pub fn average_velocity(&self) -> f64 {
        if self.velocity_per_turn.is_empty() {
            return 0.0;
        }
        f64::from(self.total_velocity()) / self.velocity_per_turn.len() as f64
    }

    #[must_use]
    pub fn latest_velocity(&self) -> Option<u32> {
        self.velocity_per_turn.last().copied()
    }

    /// Reverts suffered by one card.
    pub fn reverts_for(&self, card: CardId) -> impl Iterator<Item = &RevertEvent> {
        self.revert_events.iter().filter(move |e| e.card == card)
    }
}

/// Figures shown at a retrospective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrospectiveSummary {
    pub turns_completed: usize,
    pub total_velocity: u32,
    pub average_velocity: f64,
    pub accumulated_score: u32,
    pub revert_events: usize,
    pub tokens_used: u32,
    /// Mean cycle time of delivered cards, if any were delivered.
    pub average_cycle_time: Option<f64>,
}
