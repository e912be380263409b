//! Per-session rate limiting for drag-move mutations.
//!
//! DESIGN
//! ======
//! A fixed minimum spacing between admitted events, tracked as a single
//! `Option<Instant>` owned by the drag session. Rejection has no side
//! effect, so a burst of fast moves only ever advances the gate on the
//! events it lets through. Gates for different sessions never share state.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod tests;

use std::time::{Duration, Instant};

use crate::consts::THROTTLE_WINDOW_MS;

#[derive(Debug, Clone)]
pub struct ThrottleGate {
    window: Duration,
    last_accepted_at: Option<Instant>,
}

impl ThrottleGate {
    /// Gate with the default 50ms window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(THROTTLE_WINDOW_MS))
    }

    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self { window, last_accepted_at: None }
    }

    /// Admit or reject an event arriving at `now`.
    pub fn admit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted_at {
            // `saturating_duration_since` treats out-of-order clocks as zero elapsed.
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_accepted_at = Some(now);
        true
    }

    #[must_use]
    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for ThrottleGate {
    fn default() -> Self {
        Self::new()
    }
}
