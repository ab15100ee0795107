use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by a league refresh.
///
/// Missing stats or scores are never errors; they read as zero or unscored.
/// Unknown team names resolve to `None` rather than failing.
#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("malformed schedule entry #{index}: {reason}")]
    MalformedSchedule { index: usize, reason: String },

    #[error("malformed roster entry #{index}: {reason}")]
    MalformedRoster { index: usize, reason: String },

    #[error("malformed teams info at line {line}: {reason}")]
    MalformedTeamsInfo { line: usize, reason: String },

    #[error("duplicate team id {0}")]
    DuplicateTeam(u32),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {what}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    // Network and provider failures; no retry happens at this layer.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

pub type LeagueResult<T> = std::result::Result<T, LeagueError>;
