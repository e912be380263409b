//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{RELEASE_DURATION_MS, THROTTLE_WINDOW_MS};

pub const THROTTLE_ENV: &str = "PHASEBOARD_THROTTLE_MS";
pub const RELEASE_ENV: &str = "PHASEBOARD_RELEASE_MS";
pub const SEED_ENV: &str = "PHASEBOARD_SEED";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of milliseconds, got {value:?}")]
    InvalidMillis { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum spacing between admitted move events per drag session.
    pub throttle_window: Duration,
    /// Duration of the release-to-origin animation.
    pub release_duration: Duration,
    /// Optional seed file replacing the bundled seed board.
    pub seed_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_millis(THROTTLE_WINDOW_MS),
            release_duration: Duration::from_millis(RELEASE_DURATION_MS),
            seed_path: None,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PHASEBOARD_THROTTLE_MS`: default 50
    /// - `PHASEBOARD_RELEASE_MS`: default 250
    /// - `PHASEBOARD_SEED`: path to a seed JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if a duration variable is set but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a duration value is present but not a number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let throttle_window = parse_millis(THROTTLE_ENV, lookup(THROTTLE_ENV), defaults.throttle_window)?;
        let release_duration = parse_millis(RELEASE_ENV, lookup(RELEASE_ENV), defaults.release_duration)?;
        let seed_path = lookup(SEED_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self { throttle_window, release_duration, seed_path })
    }
}

fn parse_millis(key: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidMillis { key, value: raw })
}
