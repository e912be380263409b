//! Per-card gesture tracking: grasp, move, release.
//!
//! A `GestureTracker` turns raw pointer deltas into the card's visual offset
//! and its candidate absolute center. It never decides whether the board
//! changes; it only reports where the card is so the engine can throttle,
//! hit-test and resolve the move.
//!
//! The offset is an immutable `Point` recomputed on every event from the
//! offset captured at grasp time plus the gesture's accumulated delta. On
//! release the offset settles back to the origin of the card's slot through
//! an explicit [`ReleaseAnimation`], sampled by the host's frame clock.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::time::{Duration, Instant};

use crate::consts::RELEASE_DURATION_MS;
use crate::geom::Point;

/// Lifecycle of one card's gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// Not being dragged. The card may still be settling from a release.
    #[default]
    Idle,
    /// A pointer holds the card.
    Dragging {
        /// Absolute center of the card when the grasp started.
        origin: Point,
        /// Visual offset the card already had when grasped.
        prior_offset: Point,
        /// Accumulated pointer delta since the grasp.
        delta: Point,
    },
}

/// What a single move event produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveProbe {
    /// Visual offset to render the card at.
    pub live_position: Point,
    /// Current absolute center of the card, used for hit-testing.
    pub center: Point,
}

/// Interpolation from a released offset back to (0, 0).
///
/// Ease-out cubic: each component shrinks monotonically toward zero and
/// reaches it exactly at `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseAnimation {
    from: Point,
    started_at: Instant,
    duration: Duration,
}

impl ReleaseAnimation {
    #[must_use]
    pub fn new(from: Point, started_at: Instant, duration: Duration) -> Self {
        Self { from, started_at, duration }
    }

    /// Offset at time `now`.
    #[must_use]
    pub fn sample(&self, now: Instant) -> Point {
        let progress = self.progress(now);
        let remaining = (1.0 - progress).powi(3);
        self.from.scaled(remaining)
    }

    /// Whether the animation has reached (0, 0).
    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    #[must_use]
    pub fn from(&self) -> Point {
        self.from
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Gesture controller for one rendered card.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: GestureState,
    /// Offset at the last drag event; meaningful while dragging.
    offset: Point,
    release: Option<ReleaseAnimation>,
    release_duration: Duration,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_release_duration(Duration::from_millis(RELEASE_DURATION_MS))
    }

    #[must_use]
    pub fn with_release_duration(release_duration: Duration) -> Self {
        Self { state: GestureState::Idle, offset: Point::ZERO, release: None, release_duration }
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Idle with no release animation left to play.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_dragging() && self.release.is_none()
    }

    /// Visual offset to render at `now`.
    #[must_use]
    pub fn offset_at(&self, now: Instant) -> Point {
        match (self.state, self.release) {
            (GestureState::Dragging { .. }, _) => self.offset,
            (GestureState::Idle, Some(anim)) => anim.sample(now),
            (GestureState::Idle, None) => Point::ZERO,
        }
    }

    /// Begin a drag with the card centered at `origin`.
    ///
    /// Picks the card up wherever it is visually, including mid-release.
    /// Returns `false` (and changes nothing) if a drag is already active.
    pub fn on_grasp_start(&mut self, origin: Point, now: Instant) -> bool {
        if self.is_dragging() {
            return false;
        }
        let prior_offset = self.offset_at(now);
        self.release = None;
        self.offset = prior_offset;
        self.state = GestureState::Dragging { origin, prior_offset, delta: Point::ZERO };
        true
    }

    /// Apply the gesture's accumulated `delta` since grasp.
    ///
    /// Returns `None` when no drag is active.
    pub fn on_grasp_move(&mut self, delta: Point) -> Option<MoveProbe> {
        let GestureState::Dragging { origin, prior_offset, .. } = self.state else {
            return None;
        };
        self.state = GestureState::Dragging { origin, prior_offset, delta };
        self.offset = prior_offset.offset_by(delta);
        Some(MoveProbe { live_position: self.offset, center: origin.offset_by(delta) })
    }

    /// End the drag and start settling back to (0, 0).
    ///
    /// Returns the animation that was started, or `None` when no drag was active.
    pub fn on_release(&mut self, now: Instant) -> Option<ReleaseAnimation> {
        if !self.is_dragging() {
            return None;
        }
        let anim = ReleaseAnimation::new(self.offset, now, self.release_duration);
        self.state = GestureState::Idle;
        self.offset = Point::ZERO;
        self.release = Some(anim);
        Some(anim)
    }

    /// Advance the release animation. Returns the offset to render, or `None`
    /// when nothing is animating. The final frame returns exactly (0, 0).
    pub fn tick(&mut self, now: Instant) -> Option<Point> {
        let anim = self.release?;
        if anim.is_finished(now) {
            self.release = None;
            return Some(Point::ZERO);
        }
        Some(anim.sample(now))
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}
