//! Move coordinator: the pure board transition applied on every admitted
//! drag-move.
//!
//! DESIGN
//! ======
//! `resolve_move` takes the current board by reference and returns a new
//! board value. The input is never mutated, so callers detect a real change
//! with `!=`. There is no separate "drop" step: a card's membership follows
//! the pointer live, one admitted move at a time.
//!
//! Every branch is total. Unknown phases, a target that already holds the
//! card, or a source that no longer holds it all return the board unchanged;
//! hovering over nothing (or over the source) only clears highlights.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use crate::board::{Board, Card, PhaseId};

/// Apply a resolved move of `card` from `source` to `target`.
#[must_use]
pub fn resolve_move(board: &Board, card: &Card, source: PhaseId, target: Option<PhaseId>) -> Board {
    let Some(target) = target.filter(|t| *t != source) else {
        return clear_highlights(board);
    };

    let (Some(src), Some(dst)) = (board.phase(source), board.phase(target)) else {
        return board.clone();
    };

    // Duplicate guard: an earlier move in the same burst may already have
    // placed the card here.
    if dst.contains_card(card.id) {
        return board.clone();
    }
    // Appending a card the source no longer holds would duplicate it.
    if !src.contains_card(card.id) {
        return board.clone();
    }

    let mut next = board.clone();
    for phase in next.phases_mut() {
        if phase.id == source {
            phase.cards.retain(|c| c.id != card.id);
            phase.is_target_phase = false;
        } else if phase.id == target {
            phase.cards.push(card.clone());
            phase.is_target_phase = true;
        } else {
            phase.is_target_phase = false;
        }
    }
    next
}

/// Copy of `board` with every highlight cleared and memberships untouched.
#[must_use]
pub fn clear_highlights(board: &Board) -> Board {
    let mut next = board.clone();
    for phase in next.phases_mut() {
        phase.is_target_phase = false;
    }
    next
}
