//! Shared timing constants for the drag subsystem.

// ── Throttling ──────────────────────────────────────────────────

/// Minimum spacing between two admitted move events in one drag session.
pub const THROTTLE_WINDOW_MS: u64 = 50;

// ── Release animation ───────────────────────────────────────────

/// Time for a released card to settle back to its slot.
pub const RELEASE_DURATION_MS: u64 = 250;

/// Frame interval used when the host drives the release animation on a timer.
pub const RELEASE_FRAME_MS: u64 = 16;
