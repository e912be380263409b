#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::board::PhaseId;
use crate::geom::Point;
use crate::layout::{LayoutEntry, LayoutSnapshot};

/// Resolve an absolute screen point to the phase whose container holds it.
///
/// Entries are checked freshest first, so when stale and current rectangles
/// overlap (mid-scroll, mid-resize) the most recent measurement wins.
#[must_use]
pub fn resolve(point: Point, snapshot: &LayoutSnapshot) -> Option<PhaseId> {
    let mut entries: Vec<&LayoutEntry> = snapshot.entries().iter().collect();
    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.revision.cmp(&a.revision))
    });
    entries
        .into_iter()
        .find(|e| e.bbox.contains(point))
        .map(|e| e.phase_id)
}
