//! Board state: cards, their locations, turn, phase and capacity.
//!
//! `BoardState` owns every `Card` and the `StageManager` that places them.
//! It keeps `Card::stage` in sync with the manager on every relocation, so a
//! card is always found in exactly one stage location.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::BoardConfig;
use super::entity::CardId;
use super::error::{EngineError, EngineResult};
use crate::capacity::CapacityLedger;
use crate::cards::Card;
use crate::phases::Phase;
use crate::stages::{Location, Placement, Slot, Stage, StageManager, StageMap};

/// Complete board state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardState {
    /// Turn number (starts at 1).
    pub turn: u32,

    /// Current phase.
    pub phase: Phase,

    /// Team effort budget for this turn.
    pub capacity: CapacityLedger,

    /// Card placement across stages.
    stages: StageManager,

    /// Cards by ID.
    cards: FxHashMap<CardId, Card>,

    /// Next card ID to allocate.
    next_card_id: CardId,
}

impl BoardState {
    /// Create an empty board.
    #[must_use]
    pub fn new(config: &BoardConfig) -> Self {
        let limits = StageMap::new(|stage| config.wip_limit(stage));
        Self {
            turn: 1,
            phase: Phase::default(),
            capacity: CapacityLedger::new(config.team_capacity),
            stages: StageManager::new(limits),
            cards: FxHashMap::default(),
            next_card_id: CardId::FIRST,
        }
    }

    /// Read-only view of card placement.
    #[must_use]
    pub fn stages(&self) -> &StageManager {
        &self.stages
    }

    // === Cards ===

    /// Allocate a new card ID.
    ///
    /// Skips IDs already on the board, so a restored state with a stale
    /// counter never hands out a duplicate.
    pub fn alloc_card_id(&mut self) -> CardId {
        let mut id = self.next_card_id;
        while self.cards.contains_key(&id) || self.stages.contains(id) {
            id = id.next();
        }
        self.next_card_id = id.next();
        id
    }

    /// Put a new card on the board in its current stage.
    pub fn add_card(&mut self, card: Card) -> Slot {
        let slot = self.stages.insert(card.id, card.stage);
        self.cards.insert(card.id, card);
        slot
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Get a card or fail with `StageNotFound`.
    pub fn require_card(&self, id: CardId) -> EngineResult<&Card> {
        self.card(id)
            .ok_or(EngineError::StageNotFound { card: id, stage: None })
    }

    /// All cards, in no particular order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Cards in a stage: active slots first, then the queue.
    pub fn cards_in(&self, stage: Stage) -> impl Iterator<Item = &Card> + '_ {
        self.stages
            .lane(stage)
            .cards()
            .filter_map(move |id| self.cards.get(&id))
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    // === Placement ===

    /// Where a card is, or `StageNotFound`.
    pub fn locate(&self, id: CardId) -> EngineResult<Location> {
        self.stages
            .location(id)
            .ok_or(EngineError::StageNotFound { card: id, stage: None })
    }

    /// Check that a card is in `stage` (slot or queue).
    pub fn expect_in(&self, id: CardId, stage: Stage) -> EngineResult<Location> {
        let location = self.locate(id)?;
        if location.stage != stage {
            return Err(EngineError::StageNotFound { card: id, stage: Some(stage) });
        }
        Ok(location)
    }

    /// Move a card, backfilling the stage it left.
    pub fn relocate(&mut self, id: CardId, to: Stage) -> EngineResult<Placement> {
        let placement = self
            .stages
            .move_to(id, to)
            .ok_or(EngineError::StageNotFound { card: id, stage: None })?;
        if let Some(card) = self.cards.get_mut(&id) {
            card.stage = to;
        }
        Ok(placement)
    }

    /// Promote queued cards on every stage.
    pub fn promote_all(&mut self) -> Vec<(Stage, CardId)> {
        self.stages.promote_all()
    }

    /// Per-stage card counts.
    #[must_use]
    pub fn occupancy(&self) -> StageMap<usize> {
        self.stages.occupancy()
    }
}
