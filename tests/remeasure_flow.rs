//! Engine and layout registry driven together through the public API, with a
//! host surface whose container sizes follow the board.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use phaseboard::board::{Board, Card, Phase, PhaseId};
use phaseboard::config::EngineConfig;
use phaseboard::engine::{Action, BoardEngine};
use phaseboard::geom::{BoundingBox, Point};
use phaseboard::layout::{LayoutRegistry, MeasureSurface, StaticSurface};

const HEADER: f64 = 40.0;
const CARD: f64 = 60.0;
const GAP: f64 = 20.0;

/// Phases stacked top to bottom, each as tall as its header plus its cards.
struct StackedSurface {
    board: Mutex<Board>,
}

impl StackedSurface {
    fn new(board: &Board) -> Self {
        Self { board: Mutex::new(board.clone()) }
    }

    fn sync(&self, board: &Board) {
        *self.board.lock().unwrap() = board.clone();
    }
}

#[async_trait]
impl MeasureSurface for StackedSurface {
    async fn measure(&self, phase_id: PhaseId) -> Option<BoundingBox> {
        let board = self.board.lock().unwrap().clone();
        let mut top = 0.0;
        for phase in board.phases() {
            #[allow(clippy::cast_precision_loss)]
            let height = HEADER + CARD * phase.cards.len() as f64;
            if phase.id == phase_id {
                return Some(BoundingBox::new(0.0, top, 300.0, height));
            }
            top += height + GAP;
        }
        None
    }
}

fn board() -> Board {
    Board::from_phases(vec![
        Phase::new(1, "To Do").with_cards(vec![Card::new(10, "a"), Card::new(11, "b")]),
        Phase::new(2, "Doing"),
    ])
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test]
async fn moves_before_first_measurement_change_nothing() {
    let surface = Arc::new(StaticSurface::new());
    surface.place(1, BoundingBox::new(0.0, 0.0, 100.0, 300.0));
    surface.place(2, BoundingBox::new(120.0, 0.0, 100.0, 300.0));

    let mut engine = BoardEngine::new(board(), LayoutRegistry::new(), EngineConfig::default());
    let t0 = Instant::now();
    engine.grasp_start(1, 10, Point::new(50.0, 50.0), t0);

    let actions = engine.grasp_move(1, Point::new(120.0, 0.0), t0 + ms(10));
    assert!(!actions.contains(&Action::BoardChanged));

    let measured = engine
        .layouts()
        .spawn_remeasure(surface.clone(), engine.phase_ids())
        .await
        .unwrap();
    assert_eq!(measured, 2);

    let actions = engine.grasp_move(1, Point::new(121.0, 0.0), t0 + ms(100));
    assert!(actions.contains(&Action::BoardChanged));
    assert_eq!(engine.board().phase_of_card(10).unwrap().id, 2);
}

#[tokio::test]
async fn remeasure_after_reassignment_tracks_grown_containers() {
    let mut engine = BoardEngine::new(board(), LayoutRegistry::new(), EngineConfig::default());
    let surface = Arc::new(StackedSurface::new(engine.board()));
    engine
        .layouts()
        .remeasure(surface.as_ref(), &engine.phase_ids())
        .await;

    // To Do: y 0..160, Doing: y 180..220.
    assert_eq!(engine.layouts().get(2).unwrap().bbox, BoundingBox::new(0.0, 180.0, 300.0, 40.0));

    let t0 = Instant::now();
    engine.grasp_start(7, 10, Point::new(150.0, 70.0), t0);
    let actions = engine.grasp_move(7, Point::new(0.0, 130.0), t0 + ms(5));
    assert!(actions.contains(&Action::RemeasureNeeded));

    surface.sync(engine.board());
    engine
        .layouts()
        .spawn_remeasure(surface.clone(), engine.phase_ids())
        .await
        .unwrap();

    // To Do shrank to one card, Doing grew to one card.
    assert_eq!(engine.layouts().get(1).unwrap().bbox, BoundingBox::new(0.0, 0.0, 300.0, 100.0));
    assert_eq!(engine.layouts().get(2).unwrap().bbox, BoundingBox::new(0.0, 120.0, 300.0, 100.0));

    // Still hovering the grown container that took the card: nothing changes.
    let actions = engine.grasp_move(7, Point::new(0.0, 100.0), t0 + ms(100));
    assert!(!actions.contains(&Action::BoardChanged));
    assert_eq!(engine.board().target_phase().map(|p| p.id), Some(2));
    assert_eq!(engine.board().phase_of_card(10).unwrap().id, 2);
    assert_eq!(engine.board().card_count(), 2);
}

#[tokio::test]
async fn deleted_phase_keeps_stale_entry_but_cannot_receive_cards() {
    let surface = Arc::new(StaticSurface::new());
    surface.place(1, BoundingBox::new(0.0, 0.0, 100.0, 300.0));
    surface.place(2, BoundingBox::new(120.0, 0.0, 100.0, 300.0));

    let mut engine = BoardEngine::new(board(), LayoutRegistry::new(), EngineConfig::default());
    engine
        .layouts()
        .remeasure(surface.as_ref(), &engine.phase_ids())
        .await;

    engine.delete_phase(2);
    surface.remove(2);
    engine
        .layouts()
        .remeasure(surface.as_ref(), &engine.phase_ids())
        .await;
    assert!(engine.layouts().get(2).is_some());

    let t0 = Instant::now();
    engine.grasp_start(1, 11, Point::new(50.0, 50.0), t0);
    let actions = engine.grasp_move(1, Point::new(120.0, 0.0), t0 + ms(1));
    assert!(!actions.contains(&Action::BoardChanged));
    assert_eq!(engine.board().phase_of_card(11).unwrap().id, 1);
}
