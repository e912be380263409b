//! Board engine: routes pointer events through gesture tracking, throttling,
//! hit-testing and the move coordinator.
//!
//! DESIGN
//! ======
//! The engine is synchronous and owns the board value. Every handler returns
//! a list of [`Action`]s for the host (re-render, move a card visually,
//! re-measure containers). Layout measurement is the only asynchronous part
//! and lives outside the engine: the host answers `RemeasureNeeded` by
//! driving [`crate::layout::LayoutRegistry::remeasure`], and the next
//! admitted move sees the result.
//!
//! Each active pointer owns one `DragSession` (the dragged card and its own
//! `ThrottleGate`). Trackers are per card, so a card released mid-animation
//! can be picked up again from where it visually is. Concurrent drags on
//! different cards interleave in arrival order; the later board value wins.
//!
//! STALE EVENTS
//! ============
//! Moves or releases for a pointer without a session (already released, or
//! never started) are dropped. The move source is always the phase that
//! holds the card on the current board, so a card dragged through several
//! phases cannot be duplicated. The session also remembers the phase the
//! card was grasped from: hovering a phase that already took the card in
//! this drag is a no-op and keeps its highlight, while hovering the grasp
//! phase clears it.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, trace};

use crate::board::{Board, Card, CardId, Phase, PhaseId};
use crate::config::EngineConfig;
use crate::coordinator::resolve_move;
use crate::forms::{CardDraft, CardEdit, FormError, IdAllocator, PhaseDraft};
use crate::geom::Point;
use crate::gesture::GestureTracker;
use crate::hit;
use crate::layout::LayoutRegistry;
use crate::throttle::ThrottleGate;

/// Host-assigned identifier of a touch/pointer.
pub type PointerId = u64;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The board value was replaced; re-render from [`BoardEngine::board`].
    BoardChanged,
    /// Render `card_id` at `offset` from its slot.
    OffsetChanged { card_id: CardId, offset: Point },
    DragStarted { pointer: PointerId, card_id: CardId },
    DragEnded { pointer: PointerId, card_id: CardId },
    /// Container geometry may have moved; measure the phases again.
    RemeasureNeeded,
}

#[derive(Debug, Clone)]
struct DragSession {
    card_id: CardId,
    /// Owner of the card when the grasp started.
    grasp_phase: Option<PhaseId>,
    gate: ThrottleGate,
}

pub struct BoardEngine {
    board: Board,
    layouts: LayoutRegistry,
    trackers: HashMap<CardId, GestureTracker>,
    sessions: HashMap<PointerId, DragSession>,
    config: EngineConfig,
    ids: IdAllocator,
}

impl BoardEngine {
    #[must_use]
    pub fn new(board: Board, layouts: LayoutRegistry, config: EngineConfig) -> Self {
        Self {
            board,
            layouts,
            trackers: HashMap::new(),
            sessions: HashMap::new(),
            config,
            ids: IdAllocator::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Shared handle to the layout registry this engine hit-tests against.
    #[must_use]
    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ids of every phase, in board order. The host measures these.
    #[must_use]
    pub fn phase_ids(&self) -> Vec<PhaseId> {
        self.board.phases().iter().map(|p| p.id).collect()
    }

    /// Visual offset of a card at `now`.
    #[must_use]
    pub fn offset(&self, card_id: CardId, now: Instant) -> Point {
        self.trackers
            .get(&card_id)
            .map_or(Point::ZERO, |t| t.offset_at(now))
    }

    #[must_use]
    pub fn is_dragging(&self, card_id: CardId) -> bool {
        self.sessions.values().any(|s| s.card_id == card_id)
    }

    #[must_use]
    pub fn active_drags(&self) -> usize {
        self.sessions.len()
    }

    /// No drag in progress and no release animation left to play.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.sessions.is_empty() && self.trackers.values().all(GestureTracker::is_settled)
    }

    // --- Gestures ---

    /// A pointer grasps `card_id`, whose absolute center is `origin`.
    pub fn grasp_start(&mut self, pointer: PointerId, card_id: CardId, origin: Point, now: Instant) -> Vec<Action> {
        if self.sessions.contains_key(&pointer) {
            trace!(pointer, card_id, "pointer already dragging; grasp ignored");
            return Vec::new();
        }
        if self.board.card(card_id).is_none() {
            trace!(pointer, card_id, "grasp on unknown card ignored");
            return Vec::new();
        }
        if self.is_dragging(card_id) {
            trace!(pointer, card_id, "card held by another pointer; grasp ignored");
            return Vec::new();
        }

        let release_duration = self.config.release_duration;
        let tracker = self
            .trackers
            .entry(card_id)
            .or_insert_with(|| GestureTracker::with_release_duration(release_duration));
        if !tracker.on_grasp_start(origin, now) {
            return Vec::new();
        }
        let offset = tracker.offset_at(now);
        let grasp_phase = self.board.phase_of_card(card_id).map(|p| p.id);
        self.sessions.insert(
            pointer,
            DragSession { card_id, grasp_phase, gate: ThrottleGate::with_window(self.config.throttle_window) },
        );
        debug!(pointer, card_id, "drag started");
        vec![Action::DragStarted { pointer, card_id }, Action::OffsetChanged { card_id, offset }]
    }

    /// The pointer moved; `delta` is the total displacement since grasp.
    pub fn grasp_move(&mut self, pointer: PointerId, delta: Point, now: Instant) -> Vec<Action> {
        let Some(session) = self.sessions.get_mut(&pointer) else {
            trace!(pointer, "move without an active drag discarded");
            return Vec::new();
        };
        let card_id = session.card_id;
        let grasp_phase = session.grasp_phase;
        let Some(probe) = self
            .trackers
            .get_mut(&card_id)
            .and_then(|t| t.on_grasp_move(delta))
        else {
            return Vec::new();
        };

        let mut actions = vec![Action::OffsetChanged { card_id, offset: probe.live_position }];

        if !session.gate.admit(now) {
            trace!(pointer, card_id, "move throttled");
            return actions;
        }

        let Some(card) = self.board.card(card_id).cloned() else {
            trace!(pointer, card_id, "dragged card no longer on the board");
            return actions;
        };
        let Some(source) = self.board.phase_of_card(card_id).map(|p| p.id) else {
            return actions;
        };

        let target = hit::resolve(probe.center, &self.layouts.snapshot());
        if target == Some(source) && grasp_phase != Some(source) {
            trace!(card_id, phase_id = source, "card already in hovered phase");
            return actions;
        }
        let next = resolve_move(&self.board, &card, source, target);
        if next != self.board {
            match target {
                Some(to) if to != source && next.phase(to).is_some_and(|p| p.contains_card(card_id)) => {
                    debug!(card_id, from = source, to, "card reassigned");
                }
                _ => trace!(card_id, "highlight cleared"),
            }
            self.board = next;
            actions.push(Action::BoardChanged);
            actions.push(Action::RemeasureNeeded);
        }
        actions
    }

    /// The pointer lifted. Membership is left as it is; only the visual
    /// offset starts settling back to the card's slot.
    pub fn release(&mut self, pointer: PointerId, now: Instant) -> Vec<Action> {
        let Some(session) = self.sessions.remove(&pointer) else {
            trace!(pointer, "release without an active drag discarded");
            return Vec::new();
        };
        let card_id = session.card_id;
        let mut actions = vec![Action::DragEnded { pointer, card_id }];
        if let Some(anim) = self
            .trackers
            .get_mut(&card_id)
            .and_then(|t| t.on_release(now))
        {
            actions.push(Action::OffsetChanged { card_id, offset: anim.sample(now) });
        }
        debug!(pointer, card_id, "drag ended");
        actions
    }

    /// Advance release animations to `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Action> {
        let mut frames: Vec<(CardId, Point)> = self
            .trackers
            .iter_mut()
            .filter_map(|(&card_id, t)| t.tick(now).map(|offset| (card_id, offset)))
            .collect();
        frames.sort_by_key(|(card_id, _)| *card_id);
        self.trackers.retain(|_, t| !t.is_settled());
        frames
            .into_iter()
            .map(|(card_id, offset)| Action::OffsetChanged { card_id, offset })
            .collect()
    }

    // --- Board CRUD ---

    pub fn add_phase(&mut self, phase: Phase) -> Vec<Action> {
        let changed = self.board.add_phase(phase);
        changed_actions(changed)
    }

    pub fn update_phase(&mut self, phase: Phase) -> Vec<Action> {
        let changed = self.board.update_phase(phase);
        changed_actions(changed)
    }

    pub fn rename_phase(&mut self, id: PhaseId, title: impl Into<String>) -> Vec<Action> {
        let changed = self.board.rename_phase(id, title);
        changed_actions(changed)
    }

    /// Remove a phase. Its layout entry is left to go stale.
    pub fn delete_phase(&mut self, id: PhaseId) -> Vec<Action> {
        let changed = self.board.delete_phase(id);
        changed_actions(changed)
    }

    pub fn add_card(&mut self, phase_id: PhaseId, card: Card) -> Vec<Action> {
        let changed = self.board.add_card(phase_id, card);
        changed_actions(changed)
    }

    pub fn update_card(&mut self, phase_id: PhaseId, card: Card) -> Vec<Action> {
        let changed = self.board.update_card(phase_id, card);
        changed_actions(changed)
    }

    pub fn delete_card(&mut self, phase_id: PhaseId, card_id: CardId) -> Vec<Action> {
        let changed = self.board.delete_card(phase_id, card_id);
        changed_actions(changed)
    }

    // --- Dialog saves ---

    /// Save the "add phase" dialog. Returns the new phase id with the actions.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyTitle`] for a blank title.
    pub fn create_phase(&mut self, draft: &PhaseDraft) -> Result<(PhaseId, Vec<Action>), FormError> {
        let phase = draft.build(&self.ids)?;
        let id = phase.id;
        Ok((id, self.add_phase(phase)))
    }

    /// Save the "add card" dialog into `phase_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyTitle`] for a blank title.
    pub fn create_card(&mut self, phase_id: PhaseId, draft: &CardDraft) -> Result<(CardId, Vec<Action>), FormError> {
        let card = draft.build(&self.ids)?;
        let id = card.id;
        Ok((id, self.add_card(phase_id, card)))
    }

    /// Save the "edit card" dialog for a card in `phase_id`.
    pub fn edit_card(&mut self, phase_id: PhaseId, card_id: CardId, edit: &CardEdit) -> Vec<Action> {
        let Some(card) = self
            .board
            .phase(phase_id)
            .and_then(|p| p.cards.iter().find(|c| c.id == card_id))
        else {
            return Vec::new();
        };
        let edited = edit.apply(card);
        self.update_card(phase_id, edited)
    }
}

fn changed_actions(changed: bool) -> Vec<Action> {
    if changed {
        vec![Action::BoardChanged, Action::RemeasureNeeded]
    } else {
        Vec::new()
    }
}
