use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

fn sample_board() -> Board {
    Board::from_phases(vec![
        Phase::new(1, "To Do").with_cards(vec![Card::new(10, "X"), Card::new(11, "Y")]),
        Phase::new(2, "Done"),
    ])
}

// =============================================================
// Queries
// =============================================================

#[test]
fn new_board_is_empty() {
    let b = Board::new();
    assert!(b.is_empty());
    assert_eq!(b.card_count(), 0);
}

#[test]
fn phase_of_card_finds_owner() {
    let b = sample_board();
    assert_eq!(b.phase_of_card(11).map(|p| p.id), Some(1));
    assert!(b.phase_of_card(99).is_none());
}

#[test]
fn card_lookup_searches_all_phases() {
    let b = sample_board();
    assert_eq!(b.card(10).map(|c| c.title.as_str()), Some("X"));
    assert!(b.card(12).is_none());
}

#[test]
fn target_phase_is_none_by_default() {
    assert!(sample_board().target_phase().is_none());
}

// =============================================================
// Phase CRUD
// =============================================================

#[test]
fn add_phase_appends_in_order() {
    let mut b = sample_board();
    assert!(b.add_phase(Phase::new(3, "Archive")));
    let ids: Vec<_> = b.phases().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn add_phase_with_taken_id_is_ignored() {
    let mut b = sample_board();
    assert!(!b.add_phase(Phase::new(2, "Other")));
    assert_eq!(b.len(), 2);
    assert_eq!(b.phase(2).unwrap().title, "Done");
}

#[test]
fn add_phase_bringing_existing_card_is_ignored() {
    let mut b = sample_board();
    assert!(!b.add_phase(Phase::new(3, "Dup").with_cards(vec![Card::new(10, "X again")])));
    assert_eq!(b.len(), 2);
}

#[test]
fn add_phase_never_arrives_highlighted() {
    let mut b = sample_board();
    let mut p = Phase::new(3, "Hot");
    p.is_target_phase = true;
    b.add_phase(p);
    assert!(b.target_phase().is_none());
}

#[test]
fn update_phase_replaces_title_and_cards() {
    let mut b = sample_board();
    let updated = Phase::new(1, "Backlog").with_cards(vec![Card::new(11, "Y")]);
    assert!(b.update_phase(updated));
    let p = b.phase(1).unwrap();
    assert_eq!(p.title, "Backlog");
    assert_eq!(p.cards.len(), 1);
}

#[test]
fn update_phase_rejects_cards_owned_elsewhere() {
    let mut b = sample_board();
    let stolen = Phase::new(2, "Done").with_cards(vec![Card::new(10, "X")]);
    assert!(!b.update_phase(stolen));
    assert!(b.phase(2).unwrap().cards.is_empty());
}

#[test]
fn update_phase_keeps_stored_highlight() {
    let mut b = sample_board();
    let mut incoming = Phase::new(2, "Done");
    incoming.is_target_phase = true;
    assert!(b.update_phase(incoming));
    assert!(b.target_phase().is_none());

    let mut lit = Phase::new(2, "Done");
    lit.is_target_phase = true;
    let mut b = Board::from_phases(vec![Phase::new(1, "Todo"), lit]);
    assert!(b.update_phase(Phase::new(2, "Shipped")));
    assert_eq!(b.target_phase().map(|p| p.title.as_str()), Some("Shipped"));
}

#[test]
fn update_unknown_phase_is_noop() {
    let mut b = sample_board();
    assert!(!b.update_phase(Phase::new(42, "Ghost")));
    assert_eq!(b, sample_board());
}

#[test]
fn rename_phase_changes_title_only() {
    let mut b = sample_board();
    assert!(b.rename_phase(1, "Inbox"));
    assert_eq!(b.phase(1).unwrap().title, "Inbox");
    assert_eq!(b.phase(1).unwrap().cards.len(), 2);
    assert!(!b.rename_phase(9, "Nope"));
}

#[test]
fn delete_phase_drops_its_cards() {
    let mut b = sample_board();
    assert!(b.delete_phase(1));
    assert!(b.card(10).is_none());
    assert!(!b.delete_phase(1));
}

// =============================================================
// Card CRUD
// =============================================================

#[test]
fn add_card_appends_to_tail() {
    let mut b = sample_board();
    assert!(b.add_card(1, Card::new(12, "Z")));
    let ids: Vec<_> = b.phase(1).unwrap().cards.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![10, 11, 12]);
}

#[test]
fn add_card_with_existing_id_is_ignored() {
    let mut b = sample_board();
    assert!(!b.add_card(2, Card::new(10, "clone")));
    assert!(b.phase(2).unwrap().cards.is_empty());
}

#[test]
fn add_card_to_unknown_phase_is_ignored() {
    let mut b = sample_board();
    assert!(!b.add_card(9, Card::new(50, "lost")));
    assert!(b.card(50).is_none());
}

#[test]
fn update_card_keeps_position() {
    let mut b = sample_board();
    let edited = Card::new(10, "X2").with_description("more");
    assert!(b.update_card(1, edited.clone()));
    assert_eq!(b.phase(1).unwrap().cards[0], edited);
}

#[test]
fn update_card_in_wrong_phase_is_noop() {
    let mut b = sample_board();
    assert!(!b.update_card(2, Card::new(10, "X2")));
    assert_eq!(b.card(10).unwrap().title, "X");
}

#[test]
fn delete_card_removes_it() {
    let mut b = sample_board();
    assert!(b.delete_card(1, 10));
    assert!(b.card(10).is_none());
    assert!(!b.delete_card(1, 10));
    assert!(!b.delete_card(7, 11));
}

// =============================================================
// Serde
// =============================================================

#[test]
fn board_serializes_as_phase_array() {
    let json = serde_json::to_value(sample_board()).unwrap();
    assert!(json.is_array());
    assert_eq!(json[0]["isTargetPhase"], false);
    assert_eq!(json[0]["cards"][0]["title"], "X");
}

#[test]
fn missing_optional_fields_default() {
    let b: Board = serde_json::from_str(r#"[{"id": 1, "title": "Only"}]"#).unwrap();
    let p = b.phase(1).unwrap();
    assert!(p.cards.is_empty());
    assert!(!p.is_target_phase);
}

#[test]
fn card_description_is_optional() {
    let c: Card = serde_json::from_str(r#"{"id": 5, "title": "T"}"#).unwrap();
    assert_eq!(c.description, None);
    let c: Card = serde_json::from_str(r#"{"id": 5, "title": "T", "description": "d"}"#).unwrap();
    assert_eq!(c.description.as_deref(), Some("d"));
}

// =============================================================
// Uniqueness under random create/delete sequences
// =============================================================

fn assert_ids_unique(board: &Board) {
    let mut phases = HashSet::new();
    let mut cards = HashSet::new();
    for p in board.phases() {
        assert!(phases.insert(p.id), "duplicate phase id {}", p.id);
        for c in &p.cards {
            assert!(cards.insert(c.id), "duplicate card id {}", c.id);
        }
    }
}

#[test]
fn ids_stay_unique_across_random_create_delete_sequences() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _round in 0..50 {
        let mut board = Board::new();
        for _ in 0..200 {
            // Small id space so collisions are attempted often.
            let id: i64 = rng.random_range(0..20);
            let phase_id: i64 = rng.random_range(0..6);
            match rng.random_range(0..4) {
                0 => {
                    board.add_phase(Phase::new(phase_id, "p"));
                }
                1 => {
                    board.add_card(phase_id, Card::new(id, "c"));
                }
                2 => {
                    board.delete_card(phase_id, id);
                }
                _ => {
                    board.delete_phase(phase_id);
                }
            }
            assert_ids_unique(&board);
        }
    }
}
