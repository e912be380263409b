//! Scripted replay of pointer, layout and dialog events.
//!
//! DESIGN
//! ======
//! A script is a JSON list of timed events. The runner feeds them to a
//! [`BoardEngine`] on the current (single-threaded) runtime, using a virtual
//! clock: event `at_ms` is added to a fixed start instant, so throttling and
//! animation behave exactly as they would live but the replay never sleeps.
//!
//! Container geometry goes through a [`StaticSurface`]. Every
//! `RemeasureNeeded` spawns a measurement task; pending tasks are awaited
//! before the next event, which models the one-turn lag between a board
//! change and the registry seeing the new layout.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::board::{Board, CardId, PhaseId};
use crate::config::EngineConfig;
use crate::consts::RELEASE_FRAME_MS;
use crate::engine::{Action, BoardEngine, PointerId};
use crate::forms::{CardDraft, FormError, PhaseDraft};
use crate::geom::{BoundingBox, Point};
use crate::layout::{LayoutRegistry, StaticSurface};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dialog rejected at {at_ms}ms: {source}")]
    Form {
        at_ms: u64,
        #[source]
        source: FormError,
    },
    #[error("measurement task failed: {0}")]
    Measurement(#[from] tokio::task::JoinError),
}

// =============================================================================
// SCRIPT
// =============================================================================

/// Container rectangle as written in scripts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for BoundingBox {
    fn from(r: Rect) -> Self {
        BoundingBox::new(r.x, r.y, r.width, r.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    /// Mount or move a phase container.
    Layout { phase_id: PhaseId, rect: Rect },
    /// Unmount a phase container; its registry entry goes stale.
    Unmount { phase_id: PhaseId },
    Grasp { pointer: PointerId, card_id: CardId, x: f64, y: f64 },
    /// Total displacement since the grasp.
    Move { pointer: PointerId, dx: f64, dy: f64 },
    Release { pointer: PointerId },
    Tick,
    AddPhase { title: String },
    AddCard {
        phase_id: PhaseId,
        title: String,
        #[serde(default)]
        description: String,
    },
    DeleteCard { phase_id: PhaseId, card_id: CardId },
    DeletePhase { phase_id: PhaseId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub op: ScriptOp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Read a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let raw =
            std::fs::read_to_string(path).map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub board: Board,
    /// Number of events that replaced the board value.
    pub board_changes: usize,
    /// Offset frames emitted, including release animation frames.
    pub offset_frames: usize,
    /// Completed container measurements.
    pub measurements: usize,
}

struct Runner {
    engine: BoardEngine,
    surface: Arc<StaticSurface>,
    pending: Vec<JoinHandle<usize>>,
    start: Instant,
    report_changes: usize,
    report_frames: usize,
    report_measurements: usize,
}

impl Runner {
    fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    async fn settle_measurements(&mut self) -> Result<(), ReplayError> {
        for handle in self.pending.drain(..) {
            self.report_measurements += handle.await?;
        }
        Ok(())
    }

    fn absorb(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::BoardChanged => self.report_changes += 1,
                Action::OffsetChanged { .. } => self.report_frames += 1,
                Action::RemeasureNeeded => {
                    let ids = self.engine.phase_ids();
                    let handle = self
                        .engine
                        .layouts()
                        .spawn_remeasure(self.surface.clone(), ids);
                    self.pending.push(handle);
                }
                Action::DragStarted { .. } | Action::DragEnded { .. } => {}
            }
        }
    }

    fn step(&mut self, event: &ScriptEvent) -> Result<(), ReplayError> {
        let now = self.at(event.at_ms);
        let actions = match &event.op {
            ScriptOp::Layout { phase_id, rect } => {
                self.surface.place(*phase_id, (*rect).into());
                vec![Action::RemeasureNeeded]
            }
            ScriptOp::Unmount { phase_id } => {
                self.surface.remove(*phase_id);
                Vec::new()
            }
            ScriptOp::Grasp { pointer, card_id, x, y } => {
                self.engine
                    .grasp_start(*pointer, *card_id, Point::new(*x, *y), now)
            }
            ScriptOp::Move { pointer, dx, dy } => self.engine.grasp_move(*pointer, Point::new(*dx, *dy), now),
            ScriptOp::Release { pointer } => self.engine.release(*pointer, now),
            ScriptOp::Tick => self.engine.tick(now),
            ScriptOp::AddPhase { title } => {
                let (_, actions) = self
                    .engine
                    .create_phase(&PhaseDraft::new(title.as_str()))
                    .map_err(|source| ReplayError::Form { at_ms: event.at_ms, source })?;
                actions
            }
            ScriptOp::AddCard { phase_id, title, description } => {
                let draft = CardDraft::new(title.as_str(), description.as_str());
                let (_, actions) = self
                    .engine
                    .create_card(*phase_id, &draft)
                    .map_err(|source| ReplayError::Form { at_ms: event.at_ms, source })?;
                actions
            }
            ScriptOp::DeleteCard { phase_id, card_id } => self.engine.delete_card(*phase_id, *card_id),
            ScriptOp::DeletePhase { phase_id } => self.engine.delete_phase(*phase_id),
        };
        self.absorb(actions);
        Ok(())
    }

    /// Play release animations to completion after the last event.
    fn drain_animations(&mut self, mut now_ms: u64) {
        while !self.engine.is_settled() {
            if self.engine.active_drags() > 0 {
                tracing::warn!(drags = self.engine.active_drags(), "script ended with pointers still down");
                return;
            }
            now_ms += RELEASE_FRAME_MS;
            let frames = self.engine.tick(self.at(now_ms));
            self.absorb(frames);
        }
    }
}

/// Replay `script` against `board`.
///
/// # Errors
///
/// Returns an error if a dialog event carries a blank title or a
/// measurement task panics.
pub async fn run(script: &Script, board: Board, config: EngineConfig) -> Result<ReplayReport, ReplayError> {
    let mut runner = Runner {
        engine: BoardEngine::new(board, LayoutRegistry::new(), config),
        surface: Arc::new(StaticSurface::new()),
        pending: Vec::new(),
        start: Instant::now(),
        report_changes: 0,
        report_frames: 0,
        report_measurements: 0,
    };

    let mut last_ms = 0;
    for event in &script.events {
        runner.settle_measurements().await?;
        runner.step(event)?;
        last_ms = last_ms.max(event.at_ms);
    }
    runner.settle_measurements().await?;
    runner.drain_animations(last_ms);

    tracing::info!(
        events = script.events.len(),
        board_changes = runner.report_changes,
        measurements = runner.report_measurements,
        "replay finished"
    );
    Ok(ReplayReport {
        board: runner.engine.board().clone(),
        board_changes: runner.report_changes,
        offset_frames: runner.report_frames,
        measurements: runner.report_measurements,
    })
}
