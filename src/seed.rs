//! Initial board data.
//!
//! The app starts from a bundled seed (`data/phases.json`). A seed file may
//! replace it; either way the phases are checked for duplicate ids before the
//! board is built, and any highlight flags in the file are dropped.

#[cfg(test)]
#[path = "seed_test.rs"]
mod seed_test;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::board::{Board, CardId, Phase, PhaseId};

const BUNDLED_SEED: &str = include_str!("../data/phases.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate phase id {0} in seed")]
    DuplicatePhase(PhaseId),
    #[error("duplicate card id {0} in seed")]
    DuplicateCard(CardId),
}

/// The board shipped with the app.
///
/// # Errors
///
/// Only fails if the bundled JSON itself is broken.
pub fn bundled() -> Result<Board, SeedError> {
    parse(BUNDLED_SEED)
}

/// Load a seed from `path`.
///
/// # Errors
///
/// Returns an error if the file can't be read, isn't a phase array, or
/// repeats a phase or card id.
pub fn load(path: &Path) -> Result<Board, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io { path: path.to_path_buf(), source })?;
    parse(&raw)
}

/// Load `path` when given, else the bundled seed.
///
/// # Errors
///
/// See [`load`] and [`bundled`].
pub fn load_or_bundled(path: Option<&Path>) -> Result<Board, SeedError> {
    match path {
        Some(path) => load(path),
        None => bundled(),
    }
}

/// Parse and validate a seed document.
///
/// # Errors
///
/// Returns an error on malformed JSON or duplicate ids.
pub fn parse(raw: &str) -> Result<Board, SeedError> {
    let mut phases: Vec<Phase> = serde_json::from_str(raw)?;
    validate(&phases)?;
    for phase in &mut phases {
        if phase.is_target_phase {
            tracing::warn!(phase_id = phase.id, "seed phase arrived highlighted; clearing");
            phase.is_target_phase = false;
        }
    }
    Ok(Board::from_phases(phases))
}

fn validate(phases: &[Phase]) -> Result<(), SeedError> {
    let mut phase_ids = HashSet::new();
    let mut card_ids = HashSet::new();
    for phase in phases {
        if !phase_ids.insert(phase.id) {
            return Err(SeedError::DuplicatePhase(phase.id));
        }
        for card in &phase.cards {
            if !card_ids.insert(card.id) {
                return Err(SeedError::DuplicateCard(card.id));
            }
        }
    }
    Ok(())
}
