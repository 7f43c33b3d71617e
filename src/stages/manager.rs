//! Stage manager for card locations, WIP limits and queue promotion.
//!
//! The `StageManager` tracks where every card sits on the board. Each stage
//! has:
//! - Active slots, bounded by the stage's WIP limit (insertion order kept)
//! - A FIFO waiting queue for arrivals that found the slots full
//!
//! Any departure from a stage's active slots backfills that stage from its
//! own queue. Funnel and Production are unbounded, so their queues stay empty.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stage::{Stage, StageMap};
use crate::core::entity::CardId;

/// Which part of a stage a card occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Counted against the WIP limit; eligible for work.
    Active,
    /// Waiting for an active slot to free up.
    Queued,
}

/// A card's position on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub stage: Stage,
    pub slot: Slot,
}

/// Cards promoted from a queue into active slots, in promotion order.
pub type Promotions = SmallVec<[CardId; 4]>;

/// Result of placing a card on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Where the card ended up.
    pub location: Location,
    /// Stage the card left, if it moved.
    pub vacated: Option<Stage>,
    /// Cards promoted into the vacated stage's slots.
    pub promoted: Promotions,
}

/// One column of the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLane {
    /// Active slots in arrival order.
    pub active: Vec<CardId>,
    /// Waiting queue, head first.
    pub queue: VecDeque<CardId>,
}

impl StageLane {
    /// Cards in the lane: active slots first, then the queue.
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.active.iter().chain(self.queue.iter()).copied()
    }

    /// Active plus queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len() + self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.queue.is_empty()
    }
}

/// Tracks card locations across stages.
///
/// ## Usage
///
/// ```
/// use sprint_board::core::CardId;
/// use sprint_board::stages::{Slot, Stage, StageManager, StageMap};
///
/// let mut limits: StageMap<Option<usize>> = StageMap::with_default();
/// limits[Stage::Implementation] = Some(1);
/// let mut manager = StageManager::new(limits);
///
/// assert_eq!(manager.insert(CardId(1), Stage::Implementation), Slot::Active);
/// assert_eq!(manager.insert(CardId(2), Stage::Implementation), Slot::Queued);
///
/// // Card 1 leaves, card 2 takes its slot.
/// let placement = manager.move_to(CardId(1), Stage::Integration).unwrap();
/// assert_eq!(placement.promoted.as_slice(), &[CardId(2)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageManager {
    /// WIP limit per stage. `None` for unlimited.
    limits: StageMap<Option<usize>>,

    /// Slots and queue per stage.
    lanes: StageMap<StageLane>,

    /// Card locations: card_id -> location
    locations: FxHashMap<CardId, Location>,
}

impl StageManager {
    /// Create an empty board with the given WIP limits.
    ///
    /// Limits configured for Funnel or Production are ignored.
    #[must_use]
    pub fn new(limits: StageMap<Option<usize>>) -> Self {
        Self {
            limits: limits.map(|stage, limit| if stage.is_unbounded() { None } else { *limit }),
            lanes: StageMap::with_default(),
            locations: FxHashMap::default(),
        }
    }

    /// WIP limit of a stage. `None` means unlimited.
    #[must_use]
    pub fn limit(&self, stage: Stage) -> Option<usize> {
        self.limits[stage]
    }

    /// Can the stage take another card into its active slots?
    #[must_use]
    pub fn has_room(&self, stage: Stage) -> bool {
        self.limit(stage)
            .map_or(true, |limit| self.lanes[stage].active.len() < limit)
    }

    /// Get a stage's slots and queue.
    #[must_use]
    pub fn lane(&self, stage: Stage) -> &StageLane {
        &self.lanes[stage]
    }

    /// Get the location of a card.
    #[must_use]
    pub fn location(&self, card: CardId) -> Option<Location> {
        self.locations.get(&card).copied()
    }

    /// Check if the manager tracks a card.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.locations.contains_key(&card)
    }

    /// Add a new card to a stage.
    ///
    /// Panics if the card is already on the board.
    pub fn insert(&mut self, card: CardId, stage: Stage) -> Slot {
        if self.locations.contains_key(&card) {
            panic!("Card {:?} already exists on the board", card);
        }
        self.place(card, stage)
    }

    /// Move a card to another stage (or re-enter its own stage at the back).
    ///
    /// Returns `None` if the card isn't on the board.
    pub fn move_to(&mut self, card: CardId, to: Stage) -> Option<Placement> {
        let (from, promoted) = self.remove(card)?;
        let slot = self.place(card, to);

        Some(Placement {
            location: Location { stage: to, slot },
            vacated: Some(from.stage),
            promoted,
        })
    }

    /// Remove a card from the board entirely.
    ///
    /// Returns its former location and any cards promoted into the freed slot.
    pub fn remove(&mut self, card: CardId) -> Option<(Location, Promotions)> {
        let location = self.locations.remove(&card)?;
        let lane = &mut self.lanes[location.stage];

        let promoted = match location.slot {
            Slot::Active => {
                lane.active.retain(|&c| c != card);
                self.promote(location.stage)
            }
            Slot::Queued => {
                lane.queue.retain(|&c| c != card);
                Promotions::new()
            }
        };

        Some((location, promoted))
    }

    /// Fill free active slots from the head of the stage's queue.
    ///
    /// Idempotent: a second call with no intervening change promotes nothing.
    pub fn promote(&mut self, stage: Stage) -> Promotions {
        let mut promoted = Promotions::new();

        while self.has_room(stage) {
            let Some(card) = self.lanes[stage].queue.pop_front() else {
                break;
            };
            self.lanes[stage].active.push(card);
            self.locations.insert(card, Location { stage, slot: Slot::Active });
            promoted.push(card);
        }

        promoted
    }

    /// Promote across every stage, in workflow order.
    pub fn promote_all(&mut self) -> Vec<(Stage, CardId)> {
        let mut promoted = Vec::new();
        for stage in Stage::ALL {
            promoted.extend(self.promote(stage).into_iter().map(|card| (stage, card)));
        }
        promoted
    }

    /// Cards in a stage's active slots.
    #[must_use]
    pub fn active_count(&self, stage: Stage) -> usize {
        self.lanes[stage].active.len()
    }

    /// Cards waiting in a stage's queue.
    #[must_use]
    pub fn queued_count(&self, stage: Stage) -> usize {
        self.lanes[stage].queue.len()
    }

    /// Per-stage card counts (active plus queued).
    #[must_use]
    pub fn occupancy(&self) -> StageMap<usize> {
        self.lanes.map(|_, lane| lane.len())
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    fn place(&mut self, card: CardId, stage: Stage) -> Slot {
        let slot = if self.has_room(stage) {
            self.lanes[stage].active.push(card);
            Slot::Active
        } else {
            self.lanes[stage].queue.push_back(card);
            Slot::Queued
        };
        self.locations.insert(card, Location { stage, slot });
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_limit(stage: Stage, limit: usize) -> StageManager {
        let mut limits: StageMap<Option<usize>> = StageMap::with_default();
        limits[stage] = Some(limit);
        StageManager::new(limits)
    }

    #[test]
    fn test_insert_and_locate() {
        let mut manager = manager_with_limit(Stage::Implementation, 2);

        manager.insert(CardId(1), Stage::Funnel);
        manager.insert(CardId(2), Stage::Implementation);

        assert_eq!(
            manager.location(CardId(1)),
            Some(Location { stage: Stage::Funnel, slot: Slot::Active })
        );
        assert_eq!(manager.location(CardId(2)).map(|l| l.stage), Some(Stage::Implementation));
        assert_eq!(manager.location(CardId(99)), None);
        assert_eq!(manager.total_cards(), 2);
    }

    #[test]
    fn test_overflow_goes_to_queue() {
        let mut manager = manager_with_limit(Stage::Implementation, 2);

        assert_eq!(manager.insert(CardId(1), Stage::Implementation), Slot::Active);
        assert_eq!(manager.insert(CardId(2), Stage::Implementation), Slot::Active);
        assert_eq!(manager.insert(CardId(3), Stage::Implementation), Slot::Queued);
        assert_eq!(manager.insert(CardId(4), Stage::Implementation), Slot::Queued);

        assert_eq!(manager.active_count(Stage::Implementation), 2);
        assert_eq!(manager.queued_count(Stage::Implementation), 2);
        assert_eq!(
            manager.lane(Stage::Implementation).queue,
            VecDeque::from(vec![CardId(3), CardId(4)])
        );
    }

    #[test]
    fn test_departure_promotes_queue_head() {
        let mut manager = manager_with_limit(Stage::Implementation, 2);
        for id in 1..=4 {
            manager.insert(CardId(id), Stage::Implementation);
        }

        let placement = manager.move_to(CardId(1), Stage::Integration).unwrap();

        assert_eq!(placement.vacated, Some(Stage::Implementation));
        assert_eq!(placement.promoted.as_slice(), &[CardId(3)]);
        assert_eq!(manager.lane(Stage::Implementation).active, vec![CardId(2), CardId(3)]);
        assert_eq!(
            manager.location(CardId(3)),
            Some(Location { stage: Stage::Implementation, slot: Slot::Active })
        );
        assert_eq!(manager.queued_count(Stage::Implementation), 1);
    }

    #[test]
    fn test_queued_departure_promotes_nothing() {
        let mut manager = manager_with_limit(Stage::Testing, 1);
        manager.insert(CardId(1), Stage::Testing);
        manager.insert(CardId(2), Stage::Testing);

        let (location, promoted) = manager.remove(CardId(2)).unwrap();
        assert_eq!(location.slot, Slot::Queued);
        assert!(promoted.is_empty());
        assert_eq!(manager.lane(Stage::Testing).active, vec![CardId(1)]);
    }

    #[test]
    fn test_reentry_joins_the_back() {
        let mut manager = manager_with_limit(Stage::Implementation, 2);
        for id in 1..=3 {
            manager.insert(CardId(id), Stage::Implementation);
        }

        // Card 1 leaves and comes back: card 3 was promoted, so card 1 waits.
        let placement = manager.move_to(CardId(1), Stage::Implementation).unwrap();
        assert_eq!(placement.location.slot, Slot::Queued);
        assert_eq!(manager.lane(Stage::Implementation).active, vec![CardId(2), CardId(3)]);
    }

    #[test]
    fn test_unbounded_stages_never_queue() {
        let mut limits: StageMap<Option<usize>> = StageMap::with_value(Some(1));
        limits[Stage::Funnel] = Some(0);
        let mut manager = StageManager::new(limits);

        for id in 0..10 {
            assert_eq!(manager.insert(CardId(id), Stage::Funnel), Slot::Active);
        }
        assert_eq!(manager.limit(Stage::Funnel), None);
        assert_eq!(manager.limit(Stage::Production), None);
        assert_eq!(manager.queued_count(Stage::Funnel), 0);
    }

    #[test]
    fn test_promote_is_idempotent() {
        let mut manager = manager_with_limit(Stage::Integration, 1);
        manager.insert(CardId(1), Stage::Integration);
        manager.insert(CardId(2), Stage::Integration);

        manager.remove(CardId(1));
        assert!(manager.promote(Stage::Integration).is_empty());
        assert!(manager.promote(Stage::Integration).is_empty());
        assert_eq!(manager.lane(Stage::Integration).active, vec![CardId(2)]);
    }

    #[test]
    fn test_occupancy() {
        let mut manager = manager_with_limit(Stage::Testing, 1);
        manager.insert(CardId(1), Stage::Testing);
        manager.insert(CardId(2), Stage::Testing);
        manager.insert(CardId(3), Stage::Funnel);

        let counts = manager.occupancy();
        assert_eq!(counts[Stage::Testing], 2);
        assert_eq!(counts[Stage::Funnel], 1);
        assert_eq!(counts[Stage::Production], 0);
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_card_panics() {
        let mut manager = StageManager::new(StageMap::with_default());
        manager.insert(CardId(1), Stage::Funnel);
        manager.insert(CardId(1), Stage::Funnel);
    }

    #[test]
    fn test_move_missing_card() {
        let mut manager = StageManager::new(StageMap::with_default());
        assert!(manager.move_to(CardId(7), Stage::Funnel).is_none());
    }
}
