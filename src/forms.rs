//! Dialog collaborators: turn raw form input into board entities.
//!
//! The create dialogs trim their fields and refuse an empty title before
//! anything reaches the board. The edit dialog keeps the card's id and takes
//! the text as typed. Ids come from [`IdAllocator`], which derives them from
//! wall-clock milliseconds.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::board::{Card, Phase};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("title must not be empty")]
    EmptyTitle,
}

// =============================================================================
// ID ALLOCATION
// =============================================================================

/// Issues creation-time ids (milliseconds since the Unix epoch).
///
/// Two creations inside the same millisecond would collide on a raw clock
/// read, so the allocator bumps to `last + 1` whenever the clock has not
/// moved past the previous id. Ids saturate at `i64::MAX`.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicI64,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id from the system clock.
    pub fn next_id(&self) -> i64 {
        self.next_id_at(now_ms())
    }

    /// Next id given an explicit clock reading.
    pub fn next_id_at(&self, clock_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = clock_ms.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(i64::MAX)
}

// =============================================================================
// DRAFTS
// =============================================================================

/// Contents of the "add phase" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseDraft {
    pub title: String,
}

impl PhaseDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    /// Validate and build an empty phase.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyTitle`] when the title is blank.
    pub fn build(&self, ids: &IdAllocator) -> Result<Phase, FormError> {
        let title = non_empty(&self.title)?;
        Ok(Phase::new(ids.next_id(), title))
    }
}

/// Contents of the "add card" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub description: String,
}

impl CardDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into() }
    }

    /// Validate and build a card. A blank description is stored as absent.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyTitle`] when the title is blank.
    pub fn build(&self, ids: &IdAllocator) -> Result<Card, FormError> {
        let title = non_empty(&self.title)?;
        let description = self.description.trim();
        let mut card = Card::new(ids.next_id(), title);
        if !description.is_empty() {
            card.description = Some(description.to_owned());
        }
        Ok(card)
    }
}

/// Contents of the "edit card" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardEdit {
    pub title: String,
    pub description: String,
}

impl CardEdit {
    /// Pre-fill the dialog from an existing card.
    #[must_use]
    pub fn from_card(card: &Card) -> Self {
        Self { title: card.title.clone(), description: card.description.clone().unwrap_or_default() }
    }

    /// Apply the edit, keeping the card's id.
    #[must_use]
    pub fn apply(&self, card: &Card) -> Card {
        Card {
            id: card.id,
            title: self.title.clone(),
            description: if self.description.is_empty() { None } else { Some(self.description.clone()) },
        }
    }
}

fn non_empty(raw: &str) -> Result<&str, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyTitle);
    }
    Ok(trimmed)
}
