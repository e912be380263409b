//! Layout registry: the latest measured screen rectangle of each phase
//! container.
//!
//! DESIGN
//! ======
//! Measurements arrive asynchronously from the rendering surface, one turn of
//! the event loop (or more) after they were requested, so the registry always
//! lags real layout a little. Each completed measurement overwrites the
//! previous entry for its phase; nothing is ever removed, a deleted phase's
//! entry simply goes stale.
//!
//! The map sits behind `Arc<RwLock<..>>` so measurement tasks and the engine
//! share one registry. Hit tests read through [`LayoutRegistry::snapshot`],
//! which copies all entries under a single read lock.
//!
//! ORDERING
//! ========
//! Every write is stamped with its completion time and a registry-wide
//! revision counter. The timestamp never goes backwards for a given phase,
//! and the revision breaks ties between equal timestamps so "freshest wins"
//! stays deterministic.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::board::PhaseId;
use crate::geom::BoundingBox;

/// One completed measurement of a phase container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEntry {
    pub phase_id: PhaseId,
    pub bbox: BoundingBox,
    /// When the measurement completed. Non-decreasing per phase.
    pub timestamp: Instant,
    /// Registry-wide write order, used as the tie-break for equal timestamps.
    pub revision: u64,
}

/// Read-consistent copy of the registry used by a single hit test.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    entries: Vec<LayoutEntry>,
}

impl LayoutSnapshot {
    /// Build a snapshot directly from entries.
    #[must_use]
    pub fn from_entries(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, phase_id: PhaseId) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.phase_id == phase_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct RegistryInner {
    entries: HashMap<PhaseId, LayoutEntry>,
    revision: u64,
}

/// Shared handle to the phase layout map. Clones point at the same map.
#[derive(Clone, Default)]
pub struct LayoutRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl LayoutRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed measurement for `phase_id`, stamped now.
    pub fn update(&self, phase_id: PhaseId, bbox: BoundingBox) {
        self.update_at(phase_id, bbox, Instant::now());
    }

    /// Record a measurement with an explicit completion time.
    pub fn update_at(&self, phase_id: PhaseId, bbox: BoundingBox, at: Instant) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        inner.revision += 1;
        let revision = inner.revision;
        let timestamp = inner
            .entries
            .get(&phase_id)
            .map_or(at, |prev| prev.timestamp.max(at));
        inner
            .entries
            .insert(phase_id, LayoutEntry { phase_id, bbox, timestamp, revision });
        tracing::trace!(phase_id, revision, ?bbox, "layout updated");
    }

    /// Copy every current entry under one read lock.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        LayoutSnapshot { entries: inner.entries.values().copied().collect() }
    }

    /// Latest entry for one phase.
    #[must_use]
    pub fn get(&self, phase_id: PhaseId) -> Option<LayoutEntry> {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(&phase_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Measure each phase on `surface` in turn and store the completed
    /// results. Returns how many measurements were applied.
    ///
    /// A phase the surface cannot measure (not mounted) keeps its previous
    /// entry.
    pub async fn remeasure(&self, surface: &dyn MeasureSurface, phase_ids: &[PhaseId]) -> usize {
        let mut applied = 0;
        for &phase_id in phase_ids {
            match surface.measure(phase_id).await {
                Some(bbox) => {
                    self.update(phase_id, bbox);
                    applied += 1;
                }
                None => tracing::trace!(phase_id, "phase not measurable; keeping stale entry"),
            }
        }
        applied
    }

    /// Run [`Self::remeasure`] as a background task on the current runtime.
    pub fn spawn_remeasure(&self, surface: Arc<dyn MeasureSurface>, phase_ids: Vec<PhaseId>) -> JoinHandle<usize> {
        let registry = self.clone();
        tokio::spawn(async move { registry.remeasure(surface.as_ref(), &phase_ids).await })
    }
}

/// The rendering surface's "measure absolute bounding box" capability.
#[async_trait]
pub trait MeasureSurface: Send + Sync {
    /// Measure the container of `phase_id`. `None` when it is not mounted.
    async fn measure(&self, phase_id: PhaseId) -> Option<BoundingBox>;
}

/// A surface with fixed, host-provided rectangles. Used by the replay binary
/// and tests in place of a real renderer.
#[derive(Debug, Clone, Default)]
pub struct StaticSurface {
    boxes: Arc<RwLock<HashMap<PhaseId, BoundingBox>>>,
}

impl StaticSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or move) a phase container on the surface.
    pub fn place(&self, phase_id: PhaseId, bbox: BoundingBox) {
        self.boxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(phase_id, bbox);
    }

    /// Unmount a phase container.
    pub fn remove(&self, phase_id: PhaseId) {
        self.boxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&phase_id);
    }

    /// Ids of every mounted container.
    #[must_use]
    pub fn phase_ids(&self) -> Vec<PhaseId> {
        let mut ids: Vec<PhaseId> = self
            .boxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl MeasureSurface for StaticSurface {
    async fn measure(&self, phase_id: PhaseId) -> Option<BoundingBox> {
        // Results land on a later turn of the loop, like a real layout pass.
        tokio::task::yield_now().await;
        self.boxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&phase_id)
            .copied()
    }
}
