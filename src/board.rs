//! Board model: phases, cards, and the in-memory board value.
//!
//! A `Board` is an ordered list of `Phase`s, each holding an ordered list of
//! `Card`s. Card membership changes between phases only through
//! [`crate::coordinator::resolve_move`]; everything in this module is plain
//! CRUD used by the dialog collaborators.
//!
//! Mutators never fail. Operations that refer to unknown ids, or that would
//! introduce a duplicate id, are absorbed as no-ops and report `false`.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Identifier of a phase. Derived from creation time in milliseconds.
pub type PhaseId = i64;

/// Identifier of a card, unique across the whole board.
pub type CardId = i64;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, title: impl Into<String>) -> Self {
        Self { id, title: title.into(), description: None }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named column of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Transient drop-target highlight. Set only by the move coordinator.
    #[serde(rename = "isTargetPhase", default)]
    pub is_target_phase: bool,
}

impl Phase {
    #[must_use]
    pub fn new(id: PhaseId, title: impl Into<String>) -> Self {
        Self { id, title: title.into(), cards: Vec::new(), is_target_phase: false }
    }

    #[must_use]
    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    /// Whether a card with `card_id` sits in this phase.
    #[must_use]
    pub fn contains_card(&self, card_id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == card_id)
    }
}

/// The whole board. Cloning is cheap enough for the list sizes a phone shows,
/// and the move coordinator relies on producing fresh values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    phases: Vec<Phase>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from already-validated phases, preserving order.
    #[must_use]
    pub fn from_phases(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    // --- Queries ---

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    #[must_use]
    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// The phase that currently owns `card_id`.
    #[must_use]
    pub fn phase_of_card(&self, card_id: CardId) -> Option<&Phase> {
        self.phases.iter().find(|p| p.contains_card(card_id))
    }

    #[must_use]
    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.phases
            .iter()
            .flat_map(|p| p.cards.iter())
            .find(|c| c.id == card_id)
    }

    /// The highlighted drop target, if any.
    #[must_use]
    pub fn target_phase(&self) -> Option<&Phase> {
        self.phases.iter().find(|p| p.is_target_phase)
    }

    /// Total number of cards across all phases.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.phases.iter().map(|p| p.cards.len()).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    // --- Phase CRUD ---

    /// Append a phase. A phase whose id is taken, or which brings a card id
    /// already on the board, is ignored.
    pub fn add_phase(&mut self, mut phase: Phase) -> bool {
        if self.phase(phase.id).is_some() {
            return false;
        }
        if has_duplicate_cards(&phase.cards) || phase.cards.iter().any(|c| self.card(c.id).is_some()) {
            return false;
        }
        phase.is_target_phase = false;
        self.phases.push(phase);
        true
    }

    /// Replace a phase wholesale (title and cards), keeping its position and
    /// highlight. Cards that live in another phase are rejected.
    pub fn update_phase(&mut self, phase: Phase) -> bool {
        let clashes = phase.cards.iter().any(|c| {
            self.phase_of_card(c.id)
                .is_some_and(|owner| owner.id != phase.id)
        });
        if clashes || has_duplicate_cards(&phase.cards) {
            return false;
        }
        let Some(slot) = self.phases.iter_mut().find(|p| p.id == phase.id) else {
            return false;
        };
        let highlighted = slot.is_target_phase;
        *slot = phase;
        slot.is_target_phase = highlighted;
        true
    }

    /// Change only the title of a phase.
    pub fn rename_phase(&mut self, id: PhaseId, title: impl Into<String>) -> bool {
        let Some(slot) = self.phases.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        slot.title = title.into();
        true
    }

    /// Remove a phase together with its cards.
    pub fn delete_phase(&mut self, id: PhaseId) -> bool {
        let before = self.phases.len();
        self.phases.retain(|p| p.id != id);
        self.phases.len() != before
    }

    // --- Card CRUD ---

    /// Append a card to the tail of a phase.
    pub fn add_card(&mut self, phase_id: PhaseId, card: Card) -> bool {
        if self.card(card.id).is_some() {
            return false;
        }
        let Some(phase) = self.phases.iter_mut().find(|p| p.id == phase_id) else {
            return false;
        };
        phase.cards.push(card);
        true
    }

    /// Replace a card's contents in place, keeping its position.
    pub fn update_card(&mut self, phase_id: PhaseId, card: Card) -> bool {
        let Some(slot) = self
            .phases
            .iter_mut()
            .find(|p| p.id == phase_id)
            .and_then(|p| p.cards.iter_mut().find(|c| c.id == card.id))
        else {
            return false;
        };
        *slot = card;
        true
    }

    /// Remove a card from a phase.
    pub fn delete_card(&mut self, phase_id: PhaseId, card_id: CardId) -> bool {
        let Some(phase) = self.phases.iter_mut().find(|p| p.id == phase_id) else {
            return false;
        };
        let before = phase.cards.len();
        phase.cards.retain(|c| c.id != card_id);
        phase.cards.len() != before
    }

    // --- Crate-internal transforms used by the move coordinator ---

    pub(crate) fn phases_mut(&mut self) -> &mut [Phase] {
        &mut self.phases
    }
}

fn has_duplicate_cards(cards: &[Card]) -> bool {
    let mut seen = HashSet::with_capacity(cards.len());
    !cards.iter().all(|c| seen.insert(c.id))
}
