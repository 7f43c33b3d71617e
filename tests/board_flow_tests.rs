//! Board flow integration tests.
//!
//! These tests drive cards across the board through `GameSession` and check
//! WIP queueing, role permissions and sprint review decisions.

use sprint_board::core::{BoardConfig, CardId, EngineError};
use sprint_board::game::{GameBuilder, GameSession};
use sprint_board::phases::Phase;
use sprint_board::roles::Role;
use sprint_board::stages::{Slot, Stage};
use sprint_board::NewCard;

/// Session with `count` effort-1 cards in the Funnel.
fn session_with(config: BoardConfig, count: usize) -> GameSession {
    GameBuilder::new()
        .config(config)
        .cards((0..count).map(|i| NewCard::new(format!("Story {i}"), 1)))
        .build()
        .unwrap()
}

fn ids(count: usize) -> Vec<CardId> {
    (1..=count as u32).map(CardId).collect()
}

/// Walk cards from the Funnel into the Sprint Backlog.
fn into_sprint(session: &mut GameSession, cards: &[CardId]) {
    for &id in cards {
        session
            .move_card(Role::Stakeholder, id, Stage::Funnel, Stage::ProductBacklog)
            .unwrap();
    }
    session.pull_to_sprint(cards).unwrap();
}

// =============================================================================
// WIP Limit Tests
// =============================================================================

/// Three cards into a two-slot Implementation: the third waits in the queue
/// and takes the first freed slot.
#[test]
fn test_wip_queue_and_promotion() {
    let config = BoardConfig::default().with_wip_limit(Stage::Implementation, 2);
    let mut session = session_with(config, 3);
    let cards = ids(3);
    into_sprint(&mut session, &cards);

    let mut slots = Vec::new();
    for &id in &cards {
        let report = session
            .move_card(Role::ScrumMaster, id, Stage::SprintBacklog, Stage::Implementation)
            .unwrap();
        slots.push(report.placement.location.slot);
    }
    assert_eq!(slots, vec![Slot::Active, Slot::Active, Slot::Queued]);

    let stages = session.board().stages();
    assert_eq!(stages.active_count(Stage::Implementation), 2);
    assert_eq!(stages.queued_count(Stage::Implementation), 1);

    session.advance_phase().unwrap();
    let report = session.resolve_roll(cards[0], 2).unwrap();

    assert_eq!(report.placement.vacated, Some(Stage::Implementation));
    assert_eq!(report.placement.promoted.as_slice(), &[cards[2]]);
    assert_eq!(session.board().locate(cards[2]).unwrap().slot, Slot::Active);
    assert_eq!(session.board().stages().queued_count(Stage::Implementation), 0);
}

/// Funnel and Production never queue.
#[test]
fn test_unbounded_stages() {
    let config = BoardConfig::default().with_wip_limit(Stage::Funnel, 1);
    let session = session_with(config, 5);

    assert_eq!(session.board().stages().active_count(Stage::Funnel), 5);
    assert_eq!(session.board().stages().limit(Stage::Production), None);
}

// =============================================================================
// Permission Tests
// =============================================================================

/// Only the owner of the source stage may move a card out of it.
#[test]
fn test_move_requires_owner() {
    let mut session = session_with(BoardConfig::default(), 1);
    let id = CardId(1);

    let err = session
        .move_card(Role::ProductOwner, id, Stage::Funnel, Stage::ProductBacklog)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::PermissionDenied { role: Role::ProductOwner, stage: Stage::Funnel }
    ));
    assert_eq!(session.card(id).unwrap().stage, Stage::Funnel);
}

/// Skipping a stage is rejected, but Production is always reachable.
#[test]
fn test_adjacency_and_production_shortcut() {
    let mut session = session_with(BoardConfig::default(), 1);
    let id = CardId(1);

    let err = session
        .move_card(Role::Stakeholder, id, Stage::Funnel, Stage::SprintBacklog)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));

    let report = session
        .move_card(Role::Stakeholder, id, Stage::Funnel, Stage::Production)
        .unwrap();
    assert!(report.delivered);
    assert_eq!(session.metrics().delivered_this_turn, 1);
}

/// Naming the wrong source stage fails without moving the card.
#[test]
fn test_move_from_wrong_stage() {
    let mut session = session_with(BoardConfig::default(), 1);

    let err = session
        .move_card(Role::ProductOwner, CardId(1), Stage::ProductBacklog, Stage::SprintBacklog)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::StageNotFound { stage: Some(Stage::ProductBacklog), .. }
    ));

    let err = session
        .move_card(Role::Stakeholder, CardId(42), Stage::Funnel, Stage::ProductBacklog)
        .unwrap_err();
    assert!(matches!(err, EngineError::StageNotFound { stage: None, .. }));
}

// =============================================================================
// Sprint Planning Tests
// =============================================================================

/// A batch pull is all-or-nothing.
#[test]
fn test_pull_to_sprint_all_or_nothing() {
    let mut session = session_with(BoardConfig::default(), 3);
    let cards = ids(3);
    for &id in &cards[..2] {
        session
            .move_card(Role::Stakeholder, id, Stage::Funnel, Stage::ProductBacklog)
            .unwrap();
    }

    let err = session.pull_to_sprint(&cards).unwrap_err();
    assert!(matches!(err, EngineError::StageNotFound { card: CardId(3), .. }));
    assert_eq!(session.board().stages().active_count(Stage::SprintBacklog), 0);

    let reports = session.pull_to_sprint(&cards[..2]).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(session.board().stages().active_count(Stage::SprintBacklog), 2);
}

/// Pulling is a planning activity.
#[test]
fn test_pull_outside_planning() {
    let mut session = session_with(BoardConfig::default(), 1);
    session
        .move_card(Role::Stakeholder, CardId(1), Stage::Funnel, Stage::ProductBacklog)
        .unwrap();
    session.advance_phase().unwrap();

    let err = session.pull_to_sprint(&[CardId(1)]).unwrap_err();
    assert!(matches!(err, EngineError::PhaseNotAllowed { phase: Phase::Execution, .. }));
}

// =============================================================================
// Sprint Review Tests
// =============================================================================

/// Accept delivers, reject sends the card back and logs a revert.
#[test]
fn test_review_decisions() {
    let mut session = session_with(BoardConfig::default(), 2);
    let cards = ids(2);
    into_sprint(&mut session, &cards);

    let path = [
        (Role::ScrumMaster, Stage::SprintBacklog, Stage::Implementation),
        (Role::DeveloperImplementation, Stage::Implementation, Stage::Integration),
        (Role::DeveloperIntegration, Stage::Integration, Stage::Testing),
        (Role::QaTester, Stage::Testing, Stage::PreDeployment),
    ];
    for &id in &cards {
        for (role, from, to) in path {
            session.move_card(role, id, from, to).unwrap();
        }
    }

    assert!(session.accept_card(cards[0]).is_err());

    session.advance_phase().unwrap();
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), Phase::SprintReview);

    let accepted = session.accept_card(cards[0]).unwrap();
    assert!(accepted.delivered);
    session.reject_card(cards[1]).unwrap();

    let rejected = session.card(cards[1]).unwrap();
    assert_eq!(rejected.stage, Stage::ProductBacklog);
    assert_eq!(rejected.revert_count, 1);
    assert_eq!(session.metrics().revert_events.len(), 1);
    assert_eq!(session.metrics().velocity_per_turn.len(), 0);
    assert_eq!(session.metrics().delivered_this_turn, 1);
}

/// Assignment is free-form metadata.
#[test]
fn test_assign_card() {
    let mut session = session_with(BoardConfig::default(), 1);
    session.assign_card(CardId(1), Some("dana".into())).unwrap();
    assert_eq!(session.card(CardId(1)).unwrap().assignee.as_deref(), Some("dana"));

    session.assign_card(CardId(1), None).unwrap();
    assert_eq!(session.card(CardId(1)).unwrap().assignee, None);

    assert!(session.assign_card(CardId(9), None).is_err());
}
