//! Error types for startup configuration and leaderboard storage
//!
//! The simulation step itself never fails; only the two host boundaries do.

use thiserror::Error;

/// Failure to produce a usable [`Settings`](crate::Settings) at startup.
///
/// Always fatal: there is no sensible default game without settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Failure to persist the leaderboard.
///
/// Logged and swallowed by the simulation; gameplay never depends on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode leaderboard: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("leaderboard storage unavailable: {0}")]
    Unavailable(String),
}
