//! The game session: one owned, independently mutable game.
//!
//! `GameSession` exposes every engine operation. Each call validates first
//! and mutates second, so a returned error leaves the session untouched.
//! Exclusive access comes from `&mut self`; hosts serving several clients
//! wrap a session in whatever per-game lock or actor they already use.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::snapshot::GameSnapshot;
use crate::cards::{Card, EffortSize, NewCard};
use crate::core::{BoardConfig, BoardState, CardId, EngineError, EngineResult, GameRng};
use crate::metrics::{Metrics, RetrospectiveSummary, RevertEvent};
use crate::mitigation::ScrumMasterState;
use crate::outcomes::{resolve, Resolution};
use crate::phases::{Operation, Phase};
use crate::roles::{can_roll, check_move, Role};
use crate::stages::{Placement, Slot, Stage};

/// A process change agreed on during a retrospective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adaptation {
    /// Turn whose retrospective recorded it.
    pub turn: u32,
    pub text: String,
}

/// Result of moving a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub card: CardId,
    pub placement: Placement,
    /// First arrival in Production.
    pub delivered: bool,
}

/// Result of resolving (or softening) a roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollReport {
    pub card: CardId,
    pub resolution: Resolution,
    pub placement: Placement,
    /// First arrival in Production.
    pub delivered: bool,
}

/// Result of a phase transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
    /// Turn after the transition.
    pub turn: u32,
    /// Cards promoted out of queues during finalization.
    pub promoted: Vec<(Stage, CardId)>,
}

/// The latest roll of 5 or 6, still open to a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingToken {
    pub card: CardId,
    pub resolution: Resolution,
}

/// One game of the board.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: BoardConfig,
    board: BoardState,
    scrum_master: ScrumMasterState,
    metrics: Metrics,
    adaptations: Vec<Adaptation>,

    /// Cleared by every stage mutation and phase change.
    pending_token: Option<PendingToken>,
}

impl GameSession {
    /// Start a game with an empty board.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            board: BoardState::new(&config),
            scrum_master: ScrumMasterState::new(config.tokens),
            metrics: Metrics::new(),
            adaptations: Vec::new(),
            pending_token: None,
            config,
        }
    }

    /// Rebuild a session from a full snapshot. No merging: the snapshot
    /// replaces everything.
    #[must_use]
    pub fn restore(snapshot: GameSnapshot) -> Self {
        Self {
            config: snapshot.config,
            board: snapshot.board,
            scrum_master: snapshot.scrum_master,
            metrics: snapshot.metrics,
            adaptations: snapshot.adaptations,
            pending_token: snapshot.pending_token,
        }
    }

    /// Capture the full session state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config.clone(),
            board: self.board.clone(),
            scrum_master: self.scrum_master.clone(),
            metrics: self.metrics.clone(),
            adaptations: self.adaptations.clone(),
            pending_token: self.pending_token.clone(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn scrum_master(&self) -> &ScrumMasterState {
        &self.scrum_master
    }

    #[must_use]
    pub fn adaptations(&self) -> &[Adaptation] {
        &self.adaptations
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.board.card(id)
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.board.turn
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.board.phase
    }

    // === Cards ===

    /// Seed a card into the Funnel.
    pub fn add_card(&mut self, request: NewCard) -> EngineResult<CardId> {
        let effort = EffortSize::from_points(request.effort).ok_or(EngineError::InvalidEffort {
            effort: i64::from(request.effort),
            reason: "card size must be 1, 3 or 5",
        })?;

        let id = self.board.alloc_card_id();
        let card = Card::new(id, request, effort, self.board.turn);
        self.board.add_card(card);

        debug!(card = %id, effort = effort.points(), "card added to funnel");
        Ok(id)
    }

    /// Set or clear a card's assignee.
    pub fn assign_card(&mut self, id: CardId, assignee: Option<String>) -> EngineResult<()> {
        let card = self
            .board
            .card_mut(id)
            .ok_or(EngineError::StageNotFound { card: id, stage: None })?;
        card.assignee = assignee;
        Ok(())
    }

    // === Movement ===

    /// Move a card one stage on (or straight to Production) as `role`.
    pub fn move_card(
        &mut self,
        role: Role,
        card: CardId,
        from: Stage,
        to: Stage,
    ) -> EngineResult<MoveReport> {
        self.ensure_phase(Operation::MoveCard)?;
        self.board.expect_in(card, from)?;
        check_move(role, from, to)?;

        let report = self.relocate(card, to)?;
        debug!(%card, %role, %from, %to, slot = ?report.placement.location.slot, "card moved");
        Ok(report)
    }

    /// Pull a batch of cards from the Product Backlog into the Sprint Backlog.
    ///
    /// All-or-nothing: every card must be in the Product Backlog. Duplicate
    /// ids are pulled once.
    pub fn pull_to_sprint(&mut self, cards: &[CardId]) -> EngineResult<Vec<MoveReport>> {
        self.ensure_phase(Operation::PullToSprint)?;
        check_move(Role::ProductOwner, Stage::ProductBacklog, Stage::SprintBacklog)?;

        let mut seen = FxHashSet::default();
        let batch: Vec<CardId> = cards.iter().copied().filter(|id| seen.insert(*id)).collect();
        for &card in &batch {
            self.board.expect_in(card, Stage::ProductBacklog)?;
        }

        let mut reports = Vec::with_capacity(batch.len());
        for card in batch {
            reports.push(self.relocate(card, Stage::SprintBacklog)?);
        }

        info!(count = reports.len(), "cards pulled into sprint");
        Ok(reports)
    }

    /// Sprint Review acceptance: Pre-Deployment to Production.
    pub fn accept_card(&mut self, card: CardId) -> EngineResult<MoveReport> {
        self.ensure_phase(Operation::AcceptCard)?;
        self.board.expect_in(card, Stage::PreDeployment)?;

        let report = self.relocate(card, Stage::Production)?;
        info!(%card, "card accepted at sprint review");
        Ok(report)
    }

    /// Sprint Review rejection: Pre-Deployment back to the Product Backlog.
    pub fn reject_card(&mut self, card: CardId) -> EngineResult<MoveReport> {
        self.ensure_phase(Operation::RejectCard)?;
        self.board.expect_in(card, Stage::PreDeployment)?;

        let report = self.relocate(card, Stage::ProductBacklog)?;
        self.record_revert(card, None, Stage::PreDeployment, Stage::ProductBacklog);
        info!(%card, "card rejected at sprint review");
        Ok(report)
    }

    // === Rolls ===

    /// Resolve a caller-supplied roll for a card in an active execution slot.
    pub fn resolve_roll(&mut self, card: CardId, roll: u8) -> EngineResult<RollReport> {
        self.ensure_phase(Operation::ResolveRoll)?;
        let from = self.roll_target(card)?;
        let resolution = resolve(roll, from, self.scrum_master.technical_debt_active)?;

        let moved = self.relocate(card, resolution.to)?;
        if resolution.is_revert() {
            self.record_revert(card, Some(roll), resolution.from, resolution.to);
        }
        if resolution.accepts_token() {
            self.pending_token = Some(PendingToken {
                card,
                resolution: resolution.clone(),
            });
        }

        debug!(
            %card,
            roll,
            outcome = resolution.outcome.effective().label(),
            %from,
            to = %resolution.to,
            "roll resolved"
        );
        Ok(RollReport {
            card,
            resolution,
            placement: moved.placement,
            delivered: moved.delivered,
        })
    }

    /// Roll the die for a card as `role`, using a caller-owned RNG.
    ///
    /// Nothing is drawn from `rng` unless the roll is allowed.
    pub fn roll_d6(
        &mut self,
        role: Role,
        card: CardId,
        rng: &mut GameRng,
    ) -> EngineResult<RollReport> {
        self.ensure_phase(Operation::ResolveRoll)?;
        let stage = self.roll_target(card)?;
        if !can_roll(role, stage) {
            return Err(EngineError::PermissionDenied { role, stage });
        }

        let roll = rng.roll_d6();
        self.resolve_roll(card, roll)
    }

    /// Spend a token to soften the roll just resolved for `card`.
    ///
    /// Only the most recent roll qualifies, and only if it was a 5 or 6 and
    /// nothing has touched the board since.
    pub fn use_token(&mut self, card: CardId) -> EngineResult<RollReport> {
        self.ensure_phase(Operation::UseToken)?;
        self.scrum_master.ensure_token()?;

        let softened = self
            .pending_token
            .as_ref()
            .filter(|pending| pending.card == card)
            .and_then(|pending| pending.resolution.with_token())
            .ok_or(EngineError::TokenNotApplicable { card })?;

        let moved = self.relocate(card, softened.to)?;
        self.scrum_master.consume_token();

        info!(
            %card,
            to = %softened.to,
            tokens_left = self.scrum_master.tokens_available(),
            "token softened roll"
        );
        Ok(RollReport {
            card,
            resolution: softened,
            placement: moved.placement,
            delivered: moved.delivered,
        })
    }

    // === Capacity ===

    /// Allocate team effort to a card this turn.
    ///
    /// Returns the capacity left afterwards.
    pub fn allocate_capacity(&mut self, card: CardId, effort: i32) -> EngineResult<u32> {
        self.ensure_phase(Operation::AllocateCapacity)?;
        let unallocated = self.board.require_card(card)?.remaining_effort();
        let points = self.board.capacity.validate(effort, Some(unallocated))?;

        self.board.capacity.record(points);
        if let Some(target) = self.board.card_mut(card) {
            target.allocated_effort += points;
        }

        debug!(%card, points, remaining = self.board.capacity.remaining(), "capacity allocated");
        Ok(self.board.capacity.remaining())
    }

    /// Invest team effort in technical debt this turn.
    ///
    /// Returns `true` if this investment switched on roll-6 softening.
    pub fn invest_technical_debt(&mut self, effort: i32) -> EngineResult<bool> {
        self.ensure_phase(Operation::InvestTechnicalDebt)?;
        let points = self.board.capacity.validate(effort, None)?;

        self.board.capacity.record(points);
        let activated = self.scrum_master.record_investment(
            points,
            self.config.technical_debt_threshold,
            self.config.technical_debt_duration,
            self.board.turn,
        );

        if activated {
            info!(
                expires_at = ?self.scrum_master.technical_debt_expires_at,
                "technical debt softening active"
            );
        } else {
            debug!(
                points,
                invested = self.scrum_master.technical_debt_invested,
                "technical debt investment"
            );
        }
        Ok(activated)
    }

    // === Phases ===

    /// Record a retrospective adaptation for the current turn.
    pub fn record_adaptation(&mut self, text: impl Into<String>) -> EngineResult<()> {
        let text = text.into();
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyAdaptation);
        }

        self.adaptations.push(Adaptation {
            turn: self.board.turn,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Has the current turn's retrospective recorded an adaptation?
    #[must_use]
    pub fn retrospective_ready(&self) -> bool {
        self.adaptations.iter().any(|a| a.turn == self.board.turn)
    }

    /// Finalize the current phase and enter the next one.
    pub fn advance_phase(&mut self) -> EngineResult<PhaseChange> {
        let from = self.board.phase;
        if from.ends_turn() && !self.retrospective_ready() {
            return Err(EngineError::RetrospectiveIncomplete { turn: self.board.turn });
        }

        self.pending_token = None;
        let mut promoted = Vec::new();
        match from {
            Phase::SprintPlanning => self.board.capacity.reset(),
            Phase::Execution => promoted = self.board.promote_all(),
            Phase::SprintReview => {}
            Phase::Retrospective => self.close_turn(),
        }
        self.board.phase = from.next();

        info!(
            %from,
            to = %self.board.phase,
            turn = self.board.turn,
            promoted = promoted.len(),
            "phase advanced"
        );
        Ok(PhaseChange {
            from,
            to: self.board.phase,
            turn: self.board.turn,
            promoted,
        })
    }

    /// Run the rest of the current turn's phases.
    ///
    /// Fails up front, with nothing changed, if no adaptation is recorded.
    /// Returns the new turn number.
    pub fn advance_turn(&mut self) -> EngineResult<u32> {
        if !self.retrospective_ready() {
            return Err(EngineError::RetrospectiveIncomplete { turn: self.board.turn });
        }

        let start = self.board.turn;
        while self.board.turn == start {
            self.advance_phase()?;
        }
        Ok(self.board.turn)
    }

    // === Metrics ===

    /// Figures for the retrospective view.
    #[must_use]
    pub fn retrospective_summary(&self) -> RetrospectiveSummary {
        let cycle_times: Vec<u32> = self.board.cards().filter_map(|c| c.cycle_time).collect();
        let average_cycle_time = (!cycle_times.is_empty())
            .then(|| f64::from(cycle_times.iter().sum::<u32>()) / cycle_times.len() as f64);

        RetrospectiveSummary {
            turns_completed: self.metrics.velocity_per_turn.len(),
            total_velocity: self.metrics.total_velocity(),
            average_velocity: self.metrics.average_velocity(),
            accumulated_score: self.metrics.accumulated_score,
            revert_events: self.metrics.revert_events.len(),
            tokens_used: self.scrum_master.tokens_used,
            average_cycle_time,
        }
    }

    // === Internals ===

    fn ensure_phase(&self, operation: Operation) -> EngineResult<()> {
        operation.ensure_allowed(self.board.phase)
    }

    /// Stage of a card eligible for a roll: active slot, execution stage.
    fn roll_target(&self, card: CardId) -> EngineResult<Stage> {
        let location = self.board.locate(card)?;
        if !location.stage.is_execution() || location.slot != Slot::Active {
            return Err(EngineError::InvalidRollTarget { card, stage: location.stage });
        }
        Ok(location.stage)
    }

    /// Move a card and settle delivery accounting.
    fn relocate(&mut self, card: CardId, to: Stage) -> EngineResult<MoveReport> {
        let placement = self.board.relocate(card, to)?;
        self.pending_token = None;
        let delivered = to == Stage::Production && self.settle_delivery(card);
        Ok(MoveReport { card, placement, delivered })
    }

    /// Count a first arrival in Production. Re-arrivals count nothing.
    fn settle_delivery(&mut self, id: CardId) -> bool {
        let turn = self.board.turn;
        let Some(card) = self.board.card_mut(id) else {
            return false;
        };
        if !card.mark_delivered(turn) {
            return false;
        }

        let effort = card.effort.points();
        let cycle_time = card.cycle_time;
        self.metrics.record_delivery(effort);
        info!(card = %id, effort, cycle_time = ?cycle_time, "card delivered to production");
        true
    }

    fn record_revert(&mut self, card: CardId, roll: Option<u8>, from: Stage, to: Stage) {
        if let Some(target) = self.board.card_mut(card) {
            target.revert_count += 1;
        }
        self.metrics.record_revert(RevertEvent {
            card,
            turn: self.board.turn,
            roll,
            from,
            to,
        });
    }

    fn close_turn(&mut self) {
        let closed = self.board.turn;
        self.metrics.close_turn(closed, self.board.occupancy());

        self.board.turn += 1;
        if self.scrum_master.expire(self.board.turn) {
            info!(turn = self.board.turn, "technical debt softening expired");
        }
        self.scrum_master.reset_investment();
        self.board.capacity.reset();

        info!(turn = closed, velocity = ?self.metrics.latest_velocity(), "turn closed");
    }
}
